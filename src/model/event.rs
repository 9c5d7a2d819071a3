use chrono::{NaiveDateTime, NaiveTime};
use serde_json::Value;

use crate::model::game::Game;

/// Date-time format Team Cowboy uses for local event times and date filters.
pub const REMOTE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// An event already registered with Team Cowboy.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEvent {
    pub start_datetime_local: String,
    pub raw_payload: Value,
}

impl RemoteEvent {
    /// Extract the local start time from a raw `Team_GetEvents` entry.
    /// Returns `None` when the entry carries no start time.
    pub fn from_value(raw_payload: Value) -> Option<Self> {
        let start_datetime_local = raw_payload
            .pointer("/dateTimeInfo/startDateTimeLocal")
            .and_then(Value::as_str)?
            .to_string();
        Some(RemoteEvent { start_datetime_local, raw_payload })
    }

    /// Parse the start time using the service's own format.
    pub fn start_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.start_datetime_local, REMOTE_DATETIME_FORMAT).ok()
    }
}

/// Inclusive local date-time window for `Team_GetEvents`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    /// From midnight of the earliest game day to the last second of the latest one.
    pub fn covering(games: &[Game]) -> Option<Self> {
        let first = games.iter().map(|g| g.start_datetime.date()).min()?;
        let last = games.iter().map(|g| g.start_datetime.date()).max()?;
        Some(DateRange {
            start: first.and_time(NaiveTime::MIN),
            end: last.and_hms_opt(23, 59, 59)?,
        })
    }
}
