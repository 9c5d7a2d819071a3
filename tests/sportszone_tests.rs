mod common;

use chrono::NaiveDate;

use sportszone_import::Error;
use sportszone_import::model::game::HomeAway;
use sportszone_import::sportszone::{Sportszone, parse_schedule};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
}

#[test]
fn parses_well_formed_rows_and_skips_the_rest() {
    let games = parse_schedule(include_str!("schedule.html")).expect("schedule should parse");

    // Header row, the colspan row and the nine-cell row are skipped.
    assert_eq!(games.len(), 3);

    assert_eq!(games[0].start_datetime, at(2015, 5, 14, 20, 10));
    assert_eq!(games[0].arena, "Olympic");
    assert_eq!(games[0].home_away, HomeAway::Home);
    assert_eq!(games[0].opponent, "Blackbirds");

    assert_eq!(games[1].start_datetime, at(2015, 5, 24, 22, 45));
    assert_eq!(games[1].arena, "Kngsgate");
    assert_eq!(games[1].home_away, HomeAway::Away);
    assert_eq!(games[1].opponent, "Seal Team Sticks");

    assert_eq!(games[2].start_datetime, at(2015, 6, 13, 21, 30));
    assert_eq!(games[2].home_away, HomeAway::Home);
    assert_eq!(games[2].opponent, "Yacht Flippers");
}

#[test]
fn unparsable_date_on_accepted_row_fails_the_page() {
    let result = parse_schedule(include_str!("schedule_bad_date.html"));
    match result {
        Err(Error::Parse(msg)) => assert!(msg.contains("TBD"), "message was: {}", msg),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn page_without_schedule_table_yields_no_games() {
    let games = parse_schedule("<html><body><p>Season not found</p></body></html>").unwrap();
    assert!(games.is_empty());
}

#[test]
fn fetches_and_parses_schedule_page() {
    let (base, handle) = common::serve(vec![(200, include_str!("schedule.html").to_string())]);
    let games = Sportszone::new(base, 9941).get_schedule(12, 345).expect("schedule");
    assert_eq!(games.len(), 3);

    let requests = handle.join().unwrap();
    assert!(
        requests[0].request_line.starts_with("GET /v1/?LeagueID=9941&TeamID=12&SeasonID=345&Page=Teams&Section=Schedule"),
        "request was: {}",
        requests[0].request_line
    );
}

#[test]
fn server_error_is_a_fetch_error() {
    let (base, handle) = common::serve(vec![(500, "oops".to_string())]);
    let result = Sportszone::new(base, 1).get_schedule(2, 3);
    assert!(matches!(result, Err(Error::Fetch { .. })), "got {:?}", result);
    handle.join().unwrap();
}
