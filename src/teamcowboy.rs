use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, info_span, instrument, warn};

use crate::error::{Error, Result};
use crate::model::event::{DateRange, REMOTE_DATETIME_FORMAT, RemoteEvent};
use crate::model::team::TeamSummary;
use crate::model::token::AuthCredential;
use crate::signer::{HttpVerb, RequestEnvelope};

pub const SECURE_BASE_URL: &str = "https://api.teamcowboy.com/v1/";
pub const PLAIN_BASE_URL: &str = "http://api.teamcowboy.com/v1/";

const EVENT_FILTER_SPECIFIC_DATES: &str = "specificDates";

/// Transport used for a call. Authentication always goes over `Secure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Secure,
    Plain,
}

#[derive(Deserialize)]
struct ResponseEnvelope {
    body: Value,
}

/// Team Cowboy API client holding the account's key pair.
#[derive(Clone)]
pub struct TeamCowboy {
    public_key: String,
    private_key: String,
    secure_base_url: String,
    plain_base_url: String,
}

impl fmt::Debug for TeamCowboy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeamCowboy")
            .field("public_key", &self.public_key)
            .field("secure_base_url", &self.secure_base_url)
            .field("plain_base_url", &self.plain_base_url)
            .finish_non_exhaustive()
    }
}

impl TeamCowboy {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            secure_base_url: SECURE_BASE_URL.to_string(),
            plain_base_url: PLAIN_BASE_URL.to_string(),
        }
    }

    /// Point the client at other endpoints, e.g. a local stub.
    pub fn with_base_urls(mut self, secure: impl Into<String>, plain: impl Into<String>) -> Self {
        self.secure_base_url = secure.into();
        self.plain_base_url = plain.into();
        self
    }

    /// `Auth_GetUserToken`: exchange a username and password for a user token.
    #[instrument(level = "info", skip_all)]
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthCredential> {
        let params = BTreeMap::from([
            ("username".to_string(), username.to_string()),
            ("password".to_string(), password.to_string()),
        ]);
        let body = self.send(HttpVerb::Post, "Auth_GetUserToken", params, Channel::Secure)?;
        let credential: AuthCredential = decode("Auth_GetUserToken", body)?;
        info!(user_id = ?credential.user_id(), "Authenticated with Team Cowboy");
        Ok(credential)
    }

    /// `Test_GetRequest`: connectivity and signing probe.
    pub fn test_get_request(&self, test_param: &str) -> Result<Value> {
        let params = BTreeMap::from([("testParam".to_string(), test_param.to_string())]);
        self.send(HttpVerb::Get, "Test_GetRequest", params, Channel::Plain)
    }

    /// `Test_PostRequest`: connectivity and signing probe over POST.
    pub fn test_post_request(&self, test_param: &str) -> Result<Value> {
        let params = BTreeMap::from([("testParam".to_string(), test_param.to_string())]);
        self.send(HttpVerb::Post, "Test_PostRequest", params, Channel::Plain)
    }

    /// `User_GetTeams`: teams the authenticated user belongs to.
    #[instrument(level = "info", skip(self, credential))]
    pub fn list_user_teams(&self, credential: &AuthCredential, dashboard_teams_only: bool) -> Result<Vec<TeamSummary>> {
        let params = BTreeMap::from([
            ("userToken".to_string(), credential.token().to_string()),
            ("dashboardTeamsOnly".to_string(), if dashboard_teams_only { "1" } else { "0" }.to_string()),
        ]);
        let body = self.send(HttpVerb::Get, "User_GetTeams", params, Channel::Plain)?;
        let teams: Vec<TeamSummary> = decode("User_GetTeams", body)?;
        info!(teams = teams.len(), "Fetched Team Cowboy teams");
        Ok(teams)
    }

    /// `Team_GetEvents` limited to an explicit date window and at most `max_count` results.
    #[instrument(level = "info", skip(self, credential))]
    pub fn fetch_team_events(
        &self,
        credential: &AuthCredential,
        team_id: i64,
        range: &DateRange,
        max_count: u32,
    ) -> Result<Vec<RemoteEvent>> {
        let params = BTreeMap::from([
            ("userToken".to_string(), credential.token().to_string()),
            ("teamId".to_string(), team_id.to_string()),
            ("seasonId".to_string(), String::new()),
            ("includeRSVPInfo".to_string(), String::new()),
            ("filter".to_string(), EVENT_FILTER_SPECIFIC_DATES.to_string()),
            ("startDateTime".to_string(), range.start.format(REMOTE_DATETIME_FORMAT).to_string()),
            ("endDateTime".to_string(), range.end.format(REMOTE_DATETIME_FORMAT).to_string()),
            ("offset".to_string(), "0".to_string()),
            ("qty".to_string(), max_count.to_string()),
        ]);
        let body = self.send(HttpVerb::Get, "Team_GetEvents", params, Channel::Plain)?;
        let raw: Vec<Value> = decode("Team_GetEvents", body)?;

        let total = raw.len();
        let events: Vec<RemoteEvent> = raw
            .into_iter()
            .filter_map(|value| {
                let event = RemoteEvent::from_value(value);
                if event.is_none() {
                    warn!("Skipping Team Cowboy event without a local start time");
                }
                event
            })
            .collect();
        info!(total, usable = events.len(), "Fetched Team Cowboy events");
        Ok(events)
    }

    /// Sign, transmit, and unwrap one call. A fresh agent is used per call and nothing is retried.
    fn send(&self, verb: HttpVerb, method: &str, params: BTreeMap<String, String>, channel: Channel) -> Result<Value> {
        let envelope = RequestEnvelope::new(verb, method, params, &self.public_key, &self.private_key);
        let url = match channel {
            Channel::Secure => self.secure_base_url.as_str(),
            Channel::Plain => self.plain_base_url.as_str(),
        };

        // Error bodies arrive with non-2xx statuses; read them before judging the status.
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();
        let response_result = {
            let _span = info_span!("teamcowboy_call", method = %method, verb = %verb).entered();
            match verb {
                HttpVerb::Get => agent.get(url).query_pairs(envelope.wire_params()).call(),
                HttpVerb::Post => agent.post(url).send_form(envelope.wire_params()),
            }
        };
        let response = response_result.map_err(|e| {
            error!(error = %e, method = %method, "Team Cowboy request failed");
            Error::Fetch { url: url.to_string(), source: e }
        })?;

        let status = response.status();
        let text = response.into_body().read_to_string().map_err(|e| {
            error!(error = %e, method = %method, "Failed to read Team Cowboy response body");
            Error::Fetch { url: url.to_string(), source: e }
        })?;
        debug!(status = status.as_u16(), bytes = text.len(), method = %method, "Team Cowboy response");

        match unwrap_body(method, &text) {
            Err(Error::RemoteApi(body)) => {
                error!(error = %body, method = %method, "Team Cowboy reported an error");
                Err(Error::RemoteApi(body))
            }
            result if status.is_success() => result,
            _ => {
                error!(status = status.as_u16(), method = %method, "Team Cowboy returned non-success status");
                Err(Error::Fetch { url: url.to_string(), source: ureq::Error::StatusCode(status.as_u16()) })
            }
        }
    }
}

/// Parse the response envelope and return its `body`, or `RemoteApi` if the body holds an `error`.
pub fn unwrap_body(method: &str, text: &str) -> Result<Value> {
    let envelope: ResponseEnvelope =
        serde_json::from_str(text).map_err(|source| Error::Decode { method: method.to_string(), source })?;
    if envelope.body.get("error").is_some() {
        return Err(Error::RemoteApi(envelope.body));
    }
    Ok(envelope.body)
}

fn decode<T: serde::de::DeserializeOwned>(method: &str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|source| Error::Decode { method: method.to_string(), source })
}
