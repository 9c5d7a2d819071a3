use chrono::NaiveDate;
use serde_json::json;

use sportszone_import::matcher::remove_existing;
use sportszone_import::model::event::RemoteEvent;
use sportszone_import::model::game::{Game, HomeAway};

fn game(day: u32, hour: u32, opponent: &str) -> Game {
    Game {
        start_datetime: NaiveDate::from_ymd_opt(2015, 5, day).unwrap().and_hms_opt(hour, 0, 0).unwrap(),
        arena: "Olympic".to_string(),
        home_away: HomeAway::Home,
        opponent: opponent.to_string(),
    }
}

fn event(start: &str) -> RemoteEvent {
    RemoteEvent::from_value(json!({"dateTimeInfo": {"startDateTimeLocal": start}})).unwrap()
}

fn games() -> Vec<Game> {
    vec![game(14, 20, "Blackbirds"), game(21, 21, "Yacht Flippers"), game(28, 19, "Seal Team Sticks")]
}

#[test]
fn no_remote_events_keeps_everything() {
    assert_eq!(remove_existing(games(), &[]), games());
}

#[test]
fn all_games_registered_leaves_nothing() {
    let events = vec![event("2015-05-28 19:00:00"), event("2015-05-14 20:00:00"), event("2015-05-21 21:00:00")];
    assert!(remove_existing(games(), &events).is_empty());
}

#[test]
fn partial_overlap_removes_only_matches_in_order() {
    let events = vec![event("2015-05-21 21:00:00"), event("2015-06-01 20:00:00")];
    let remaining = remove_existing(games(), &events);
    assert_eq!(remaining, vec![game(14, 20, "Blackbirds"), game(28, 19, "Seal Team Sticks")]);
}

#[test]
fn matching_is_exact_on_time_only() {
    // One minute off does not match; a different opponent at the same time does.
    let events = vec![event("2015-05-14 20:01:00"), event("2015-05-21 21:00:00")];
    let remaining = remove_existing(vec![game(14, 20, "Blackbirds"), game(21, 21, "Somebody Else")], &events);
    assert_eq!(remaining, vec![game(14, 20, "Blackbirds")]);
}

#[test]
fn unparsable_remote_times_match_nothing() {
    let events = vec![event("May 14, 2015 8:00 PM")];
    assert_eq!(remove_existing(games(), &events), games());
}

#[test]
fn events_without_start_time_are_rejected() {
    assert!(RemoteEvent::from_value(json!({"eventId": 9})).is_none());
}
