use serde::{Deserialize, Serialize};

/// Team descriptor returned by `User_GetTeams`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    #[serde(rename = "teamId")]
    pub id: i64,
    pub name: String,
}
