use chrono::NaiveDateTime;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, info_span, instrument};

use crate::error::{Error, Result};
use crate::model::game::{Game, HomeAway};

/// Body rows of the schedule table. The page marks it with an exact class attribute.
const SCHEDULE_ROWS: &str = r#"table[class="text11"] > tbody > tr"#;
const SCHEDULE_COLUMNS: usize = 10;
const HEADER_MARKER: &str = "#";
/// e.g. "May 14, 2015 8:10 PM"
const GAME_DATETIME_FORMAT: &str = "%b %d, %Y %I:%M %p";

// Column positions within an accepted row:
//   0 game number, 1 day, 2 date, 3 time, 4 arena, 5 home/away,
//   6 opponent, 7 score, 8 result, 9 boxscore link
const DATE_COLUMN: usize = 2;
const TIME_COLUMN: usize = 3;
const ARENA_COLUMN: usize = 4;
const HOME_AWAY_COLUMN: usize = 5;
const OPPONENT_COLUMN: usize = 6;

/// Client for a Sportszone league site.
#[derive(Debug, Clone)]
pub struct Sportszone {
    base_url: String,
    league_id: i64,
}

impl Sportszone {
    pub fn new(base_url: impl Into<String>, league_id: i64) -> Self {
        Self { base_url: base_url.into(), league_id }
    }

    /// URL of a team's schedule page for one season.
    pub fn schedule_url(&self, team_id: i64, season_id: i64) -> String {
        format!(
            "{}?LeagueID={}&TeamID={}&SeasonID={}&Page=Teams&Section=Schedule",
            self.base_url, self.league_id, team_id, season_id
        )
    }

    /// Fetch and parse a team's schedule. Any failure aborts; nothing is retried.
    #[instrument(level = "info", skip(self), fields(league_id = self.league_id))]
    pub fn get_schedule(&self, team_id: i64, season_id: i64) -> Result<Vec<Game>> {
        let url = self.schedule_url(team_id, season_id);
        let body = fetch_page(&url)?;
        let games = parse_schedule(&body)?;
        info!(games = games.len(), "Parsed Sportszone schedule");
        Ok(games)
    }
}

/// Blocking GET returning the body of any 2xx response.
pub fn fetch_page(url: &str) -> Result<String> {
    let response_result = {
        let _span = info_span!("sportszone_fetch", url = %url).entered();
        ureq::get(url).call()
    };
    let response = response_result.map_err(|e| {
        error!(error = %e, url = %url, "Schedule request failed");
        Error::Fetch { url: url.to_string(), source: e }
    })?;

    let status = response.status();
    if !status.is_success() {
        error!(status = status.as_u16(), url = %url, "Schedule request returned non-success status");
        return Err(Error::Fetch { url: url.to_string(), source: ureq::Error::StatusCode(status.as_u16()) });
    }

    response.into_body().read_to_string().map_err(|e| {
        error!(error = %e, url = %url, "Failed to read schedule body");
        Error::Fetch { url: url.to_string(), source: e }
    })
}

/// Parse a schedule page (no network).
///
/// Rows that do not have exactly ten cells, and header rows, are skipped. A row
/// that passes that check but whose contents do not parse fails the whole page.
pub fn parse_schedule(html: &str) -> Result<Vec<Game>> {
    let document = Html::parse_document(html);
    let rows = Selector::parse(SCHEDULE_ROWS)
        .map_err(|e| Error::Parse(format!("Invalid schedule selector: {:?}", e)))?;

    let mut games = Vec::new();
    let mut skipped = 0usize;
    for row in document.select(&rows) {
        let cells: Vec<ElementRef> = row.children().filter_map(ElementRef::wrap).collect();
        if cells.len() != SCHEDULE_COLUMNS || text_of(cells[0]) == HEADER_MARKER {
            skipped += 1;
            continue;
        }
        games.push(parse_row(&cells)?);
    }

    debug!(accepted = games.len(), skipped, "Scanned schedule rows");
    Ok(games)
}

fn parse_row(cells: &[ElementRef]) -> Result<Game> {
    let stamp = format!("{} {}", text_of(cells[DATE_COLUMN]), text_of(cells[TIME_COLUMN]));
    let start_datetime = NaiveDateTime::parse_from_str(&stamp, GAME_DATETIME_FORMAT)
        .map_err(|e| Error::Parse(format!("Invalid game date/time '{}': {}", stamp, e)))?;

    let arena = nested_text(cells[ARENA_COLUMN], 2)
        .ok_or_else(|| Error::Parse(format!("Missing arena for game at {}", stamp)))?;
    let home_away_text = nested_text(cells[HOME_AWAY_COLUMN], 1)
        .ok_or_else(|| Error::Parse(format!("Missing home/away for game at {}", stamp)))?;
    let home_away = HomeAway::parse(&home_away_text)
        .ok_or_else(|| Error::Parse(format!("Unknown home/away value '{}' for game at {}", home_away_text, stamp)))?;
    let opponent = nested_text(cells[OPPONENT_COLUMN], 1)
        .ok_or_else(|| Error::Parse(format!("Missing opponent for game at {}", stamp)))?;

    Ok(Game { start_datetime, arena, home_away, opponent })
}

/// Text of the element reached by following the first child element `depth` times.
fn nested_text(cell: ElementRef, depth: usize) -> Option<String> {
    let mut element = cell;
    for _ in 0..depth {
        element = element.children().find_map(ElementRef::wrap)?;
    }
    let text = text_of(element);
    if text.is_empty() { None } else { Some(text) }
}

/// All descendant text with whitespace runs (including `&nbsp;`) collapsed.
fn text_of(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_cell(html: &str) -> String {
        let document = Html::parse_fragment(html);
        let td = Selector::parse("td").unwrap();
        let cell = document.select(&td).next().unwrap();
        nested_text(cell, 2).unwrap_or_default()
    }

    #[test]
    fn nested_text_follows_first_child_elements() {
        let html = "<table><tr><td><a href=\"#\"><span> Evt&nbsp;Main </span></a></td></tr></table>";
        assert_eq!(first_cell(html), "Evt Main");
    }

    #[test]
    fn nested_text_is_none_when_structure_is_missing() {
        let html = "<table><tr><td>Olympic</td></tr></table>";
        assert_eq!(first_cell(html), "");
    }

    #[test]
    fn schedule_url_carries_all_identifiers() {
        let sz = Sportszone::new("http://example.invalid/site/", 9941);
        assert_eq!(
            sz.schedule_url(12, 345),
            "http://example.invalid/site/?LeagueID=9941&TeamID=12&SeasonID=345&Page=Teams&Section=Schedule"
        );
    }
}
