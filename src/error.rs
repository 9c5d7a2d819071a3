use serde_json::Value;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure or non-2xx status, for the schedule page and the API alike.
    #[error("Request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("Schedule parse error: {0}")]
    Parse(String),

    /// Error body reported by Team Cowboy, kept verbatim.
    #[error("Team Cowboy error: {0}")]
    RemoteApi(Value),

    #[error("Malformed {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
