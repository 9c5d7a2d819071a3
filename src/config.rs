use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use chrono_tz::Tz;
use clap::Parser;
use url::Url;

use crate::error::{Error, Result};
use crate::translator::parse_overrides;

const DEFAULT_OUTPUT_FILE: &str = "schedule.csv";
const DEFAULT_HOME_COLOR: &str = "White";
const DEFAULT_AWAY_COLOR: &str = "Black";
const DEFAULT_TIMEZONE: &str = "US/Pacific";
const DEFAULT_MAX_EVENTS: u32 = 100;

/// Command-line options as typed by the user.
#[derive(Debug, Clone, Parser)]
#[command(name = "sportszone-import")]
#[command(about = "Convert a Sportszone team schedule into a Team Cowboy import file")]
pub struct Args {
    /// Full URL of a Sportszone schedule page; supplies any identifier not given explicitly
    #[arg(long)]
    pub url: Option<String>,

    /// Base Sportszone URL
    #[arg(long)]
    pub sportszone_url: Option<String>,

    /// Sportszone league ID
    #[arg(long)]
    pub league_id: Option<i64>,

    /// Sportszone team ID
    #[arg(long)]
    pub team_id: Option<i64>,

    /// Sportszone season ID
    #[arg(long)]
    pub season_id: Option<i64>,

    /// Output file
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// Colour of the home jerseys
    #[arg(long, default_value = DEFAULT_HOME_COLOR)]
    pub home_color: String,

    /// Colour of the away jerseys
    #[arg(long, default_value = DEFAULT_AWAY_COLOR)]
    pub away_color: String,

    /// Timezone ID written to the import file
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// Sportszone to Team Cowboy arena name, as FROM=TO (repeatable)
    #[arg(long = "arena-map")]
    pub arena_map: Vec<String>,

    /// Team Cowboy API public key
    #[arg(long, env = "TEAMCOWBOY_PUBLIC_KEY")]
    pub teamcowboy_public_key: Option<String>,

    /// Team Cowboy API private key
    #[arg(long, env = "TEAMCOWBOY_PRIVATE_KEY", hide_env_values = true)]
    pub teamcowboy_private_key: Option<String>,

    /// Team Cowboy username
    #[arg(long, env = "TEAMCOWBOY_USERNAME")]
    pub teamcowboy_username: Option<String>,

    /// Team Cowboy password
    #[arg(long, env = "TEAMCOWBOY_PASSWORD", hide_env_values = true)]
    pub teamcowboy_password: Option<String>,

    /// Team Cowboy team name; required when the account has several teams
    #[arg(long, env = "TEAMCOWBOY_TEAM")]
    pub teamcowboy_team: Option<String>,

    /// Upper bound on Team Cowboy events fetched for reconciliation
    #[arg(long, default_value_t = DEFAULT_MAX_EVENTS)]
    pub max_events: u32,
}

/// Which Sportszone schedule page to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTarget {
    pub base_url: String,
    pub league_id: i64,
    pub team_id: i64,
    pub season_id: i64,
}

impl ScheduleTarget {
    /// Explicit values win; anything missing is taken from `url`'s path and
    /// `LeagueID`/`TeamID`/`SeasonID` query values.
    pub fn resolve(
        url: Option<&str>,
        base_url: Option<String>,
        league_id: Option<i64>,
        team_id: Option<i64>,
        season_id: Option<i64>,
    ) -> Result<Self> {
        let parsed = url
            .map(|u| Url::parse(u).map_err(|e| Error::Configuration(format!("Invalid schedule URL '{}': {}", u, e))))
            .transpose()?;

        let query_id = |key: &str| -> Result<Option<i64>> {
            let Some(parsed) = parsed.as_ref() else { return Ok(None) };
            match parsed.query_pairs().find(|(k, _)| k == key) {
                Some((_, v)) => v
                    .parse::<i64>()
                    .map(Some)
                    .map_err(|_| Error::Configuration(format!("Invalid {} '{}' in schedule URL", key, v))),
                None => Ok(None),
            }
        };

        let base_url = match base_url {
            Some(b) => Some(b),
            None => parsed.as_ref().map(|p| format!("{}://{}{}", p.scheme(), authority(p), p.path())),
        };
        let league_id = match league_id {
            Some(id) => Some(id),
            None => query_id("LeagueID")?,
        };
        let team_id = match team_id {
            Some(id) => Some(id),
            None => query_id("TeamID")?,
        };
        let season_id = match season_id {
            Some(id) => Some(id),
            None => query_id("SeasonID")?,
        };

        Ok(ScheduleTarget {
            base_url: base_url.ok_or_else(|| missing("A Sportszone URL"))?,
            league_id: league_id.ok_or_else(|| missing("A Sportszone league ID"))?,
            team_id: team_id.ok_or_else(|| missing("A Sportszone team ID"))?,
            season_id: season_id.ok_or_else(|| missing("A Sportszone season ID"))?,
        })
    }
}

fn authority(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => String::new(),
    }
}

fn missing(what: &str) -> Error {
    Error::Configuration(format!("{} is required", what))
}

/// Team Cowboy account details. Present only when every required part is non-empty.
#[derive(Clone)]
pub struct RemoteCredentials {
    pub public_key: String,
    pub private_key: String,
    pub username: String,
    pub password: String,
    pub team_name: Option<String>,
}

impl RemoteCredentials {
    pub fn from_parts(
        public_key: Option<String>,
        private_key: Option<String>,
        username: Option<String>,
        password: Option<String>,
        team_name: Option<String>,
    ) -> Option<Self> {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());
        Some(RemoteCredentials {
            public_key: present(public_key)?,
            private_key: present(private_key)?,
            username: present(username)?,
            password: present(password)?,
            team_name: present(team_name),
        })
    }
}

impl fmt::Debug for RemoteCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteCredentials")
            .field("public_key", &self.public_key)
            .field("username", &self.username)
            .field("team_name", &self.team_name)
            .finish_non_exhaustive()
    }
}

/// Run configuration, built once and handed to each stage.
#[derive(Debug, Clone)]
pub struct Config {
    pub target: ScheduleTarget,
    pub output_file: PathBuf,
    pub home_color: String,
    pub away_color: String,
    pub timezone: Tz,
    pub arena_overrides: HashMap<String, String>,
    pub remote: Option<RemoteCredentials>,
    pub max_events: u32,
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        let target = ScheduleTarget::resolve(
            args.url.as_deref(),
            args.sportszone_url,
            args.league_id,
            args.team_id,
            args.season_id,
        )?;
        let timezone = args
            .timezone
            .parse::<Tz>()
            .map_err(|_| Error::Configuration(format!("Unknown timezone '{}'", args.timezone)))?;
        let remote = RemoteCredentials::from_parts(
            args.teamcowboy_public_key,
            args.teamcowboy_private_key,
            args.teamcowboy_username,
            args.teamcowboy_password,
            args.teamcowboy_team,
        );

        Ok(Config {
            target,
            output_file: args.output_file,
            home_color: args.home_color,
            away_color: args.away_color,
            timezone,
            arena_overrides: parse_overrides(&args.arena_map),
            remote,
            max_events: args.max_events,
        })
    }
}
