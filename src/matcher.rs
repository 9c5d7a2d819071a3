use std::collections::HashSet;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::model::event::RemoteEvent;
use crate::model::game::Game;

/// Drop games whose start time is already registered remotely, keeping source order.
///
/// Matching is exact equality on the local start time. Nothing else about the
/// event (opponent, arena) is compared. With no remote events every game is kept.
pub fn remove_existing(games: Vec<Game>, events: &[RemoteEvent]) -> Vec<Game> {
    if events.is_empty() {
        return games;
    }

    let existing: HashSet<NaiveDateTime> = events
        .iter()
        .filter_map(|event| {
            let parsed = event.start_datetime();
            if parsed.is_none() {
                warn!(start = %event.start_datetime_local, "Ignoring remote event with unparsable start time");
            }
            parsed
        })
        .collect();

    let total = games.len();
    let remaining: Vec<Game> = games
        .into_iter()
        .filter(|game| !existing.contains(&game.start_datetime))
        .collect();
    info!(total, duplicates = total - remaining.len(), remaining = remaining.len(), "Reconciled schedule with Team Cowboy");
    remaining
}
