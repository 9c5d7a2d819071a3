use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use tracing::{info, instrument};

use crate::config::{Config, RemoteCredentials};
use crate::error::{Error, Result};
use crate::export::{ImportSettings, write_import};
use crate::matcher::remove_existing;
use crate::model::event::DateRange;
use crate::model::game::Game;
use crate::model::team::TeamSummary;
use crate::sportszone::Sportszone;
use crate::teamcowboy::TeamCowboy;
use crate::translator::{ArenaTranslator, Profile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub parsed: usize,
    pub exported: usize,
    pub output_file: PathBuf,
}

/// Fetch, reconcile, and export. Stages run in order and the first failure ends the run
/// before anything is written.
#[instrument(level = "info", skip(config), fields(league_id = config.target.league_id, team_id = config.target.team_id))]
pub fn run(config: &Config) -> Result<RunSummary> {
    let games = fetch_schedule(config)?;
    let parsed = games.len();

    let games = reconcile(config, games)?;
    export(config, &games)?;

    info!(parsed, exported = games.len(), output = %config.output_file.display(), "Wrote import file");
    Ok(RunSummary { parsed, exported: games.len(), output_file: config.output_file.clone() })
}

pub fn fetch_schedule(config: &Config) -> Result<Vec<Game>> {
    let target = &config.target;
    Sportszone::new(target.base_url.as_str(), target.league_id).get_schedule(target.team_id, target.season_id)
}

/// Remove games already on Team Cowboy. Without credentials this is a passthrough.
pub fn reconcile(config: &Config, games: Vec<Game>) -> Result<Vec<Game>> {
    match &config.remote {
        Some(credentials) => {
            let client = TeamCowboy::new(credentials.public_key.as_str(), credentials.private_key.as_str());
            reconcile_with(&client, credentials, config.max_events, games)
        }
        None => {
            info!("Team Cowboy credentials not supplied; skipping reconciliation");
            Ok(games)
        }
    }
}

/// authenticate -> team lookup -> event fetch over the schedule's date span -> match.
pub fn reconcile_with(
    client: &TeamCowboy,
    credentials: &RemoteCredentials,
    max_events: u32,
    games: Vec<Game>,
) -> Result<Vec<Game>> {
    let Some(range) = DateRange::covering(&games) else {
        return Ok(games);
    };

    let credential = client.authenticate(&credentials.username, &credentials.password)?;
    let teams = client.list_user_teams(&credential, false)?;
    let team = select_team(&teams, credentials.team_name.as_deref())?;
    info!(team_id = team.id, team = %team.name, "Using Team Cowboy team");

    let events = client.fetch_team_events(&credential, team.id, &range, max_events)?;
    Ok(remove_existing(games, &events))
}

/// Pick the team by case-insensitive name, or the only team when no name is given.
pub fn select_team<'a>(teams: &'a [TeamSummary], name: Option<&str>) -> Result<&'a TeamSummary> {
    match name {
        Some(name) => teams
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::Configuration(format!("Team Cowboy team '{}' not found", name))),
        None => match teams {
            [team] => Ok(team),
            [] => Err(Error::Configuration("Team Cowboy account has no teams".to_string())),
            _ => Err(Error::Configuration(format!(
                "Team Cowboy account has {} teams; choose one by name",
                teams.len()
            ))),
        },
    }
}

fn export(config: &Config, games: &[Game]) -> Result<()> {
    let arenas = ArenaTranslator::new(Profile::for_league(config.target.league_id), config.arena_overrides.clone());
    let settings = ImportSettings {
        home_color: &config.home_color,
        away_color: &config.away_color,
        timezone: config.timezone,
        arenas: &arenas,
    };

    let mut out = BufWriter::new(File::create(&config.output_file)?);
    write_import(&mut out, games, &settings)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teams() -> Vec<TeamSummary> {
        vec![
            TeamSummary { id: 1, name: "Yetis".to_string() },
            TeamSummary { id: 2, name: "Blackbirds".to_string() },
        ]
    }

    #[test]
    fn selects_team_by_name_ignoring_case() {
        let teams = teams();
        assert_eq!(select_team(&teams, Some("blackbirds")).unwrap().id, 2);
        assert!(matches!(select_team(&teams, Some("Sharks")), Err(Error::Configuration(_))));
    }

    #[test]
    fn single_team_needs_no_name() {
        let teams = vec![TeamSummary { id: 7, name: "Yetis".to_string() }];
        assert_eq!(select_team(&teams, None).unwrap().id, 7);
    }

    #[test]
    fn several_or_no_teams_need_a_name() {
        assert!(matches!(select_team(&teams(), None), Err(Error::Configuration(_))));
        assert!(matches!(select_team(&[], None), Err(Error::Configuration(_))));
    }
}
