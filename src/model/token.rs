use std::fmt;

use serde::Deserialize;

/// User token returned by `Auth_GetUserToken`.
///
/// Only the remote client can obtain one, so holding a credential proves the
/// authentication step already ran. Valid for the current run only.
#[derive(Clone, Deserialize)]
pub struct AuthCredential {
    #[serde(rename = "userId", default)]
    user_id: Option<i64>,
    token: String,
}

impl AuthCredential {
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub(crate) fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for AuthCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthCredential")
            .field("user_id", &self.user_id)
            .field("token", &"<redacted>")
            .finish()
    }
}
