use std::io::Write;

use chrono::Duration;
use chrono_tz::Tz;

use crate::error::Result;
use crate::model::game::{Game, HomeAway};
use crate::translator::ArenaTranslator;

pub const HEADER: [&str; 14] = [
    "Event Type",
    "Start Date",
    "Start Time",
    "End Date",
    "End Time",
    "Timezone ID",
    "Home or Away",
    "Opponent/Event Title",
    "Location Name",
    "Shirt Color",
    "Opponent Shirt Color",
    "Allow RSVPs",
    "Send Reminders",
    "Notes/Comments",
];

const EVENT_TYPE: &str = "game";
const ALLOW_RSVPS: &str = "Yes";
const SEND_REMINDERS: &str = "Yes";
const LINE_END: &str = "\r\n";

/// Fixed per-run values of the Team Cowboy import file.
#[derive(Debug, Clone)]
pub struct ImportSettings<'a> {
    pub home_color: &'a str,
    pub away_color: &'a str,
    pub timezone: Tz,
    pub arenas: &'a ArenaTranslator,
}

/// Write games as a tab-delimited Team Cowboy import file. Every game lasts one hour.
pub fn write_import<W: Write>(out: &mut W, games: &[Game], settings: &ImportSettings) -> Result<()> {
    write_row(out, &HEADER)?;

    let home_color = title_case(settings.home_color);
    let away_color = title_case(settings.away_color);

    for game in games {
        let start = game.start_datetime;
        let end = start + Duration::hours(1);
        let (shirt, opponent_shirt) = match game.home_away {
            HomeAway::Home => (&home_color, &away_color),
            HomeAway::Away => (&away_color, &home_color),
        };

        let start_date = start.format("%Y-%m-%d").to_string();
        let start_time = start.format("%I:%M %p").to_string();
        let end_date = end.format("%Y-%m-%d").to_string();
        let end_time = end.format("%I:%M %p").to_string();

        write_row(
            out,
            &[
                EVENT_TYPE,
                &start_date,
                &start_time,
                &end_date,
                &end_time,
                settings.timezone.name(),
                game.home_away.label(),
                &game.opponent,
                settings.arenas.translate(&game.arena),
                shirt,
                opponent_shirt,
                ALLOW_RSVPS,
                SEND_REMINDERS,
                "",
            ],
        )?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, fields: &[&str]) -> Result<()> {
    let line = fields.iter().map(|f| escape_field(f)).collect::<Vec<_>>().join("\t");
    out.write_all(line.as_bytes())?;
    out.write_all(LINE_END.as_bytes())?;
    Ok(())
}

/// Quote fields that contain the delimiter, a quote, or a line break.
fn escape_field(field: &str) -> String {
    if field.contains(['\t', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Capitalize the first letter of each word and lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_colour_conventions() {
        assert_eq!(title_case("white"), "White");
        assert_eq!(title_case("NAVY blue"), "Navy Blue");
        assert_eq!(title_case("red/black"), "Red/Black");
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a\tb"), "\"a\tb\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
