use chrono::NaiveDateTime;

/// Whether our team is the home or the visiting side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomeAway {
    Home,
    Away,
}

impl HomeAway {
    /// Normalize the schedule page's home/away cell text.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("home") {
            Some(HomeAway::Home)
        } else if text.eq_ignore_ascii_case("away") {
            Some(HomeAway::Away)
        } else {
            None
        }
    }

    /// Title-cased label used in the import file.
    pub fn label(&self) -> &'static str {
        match self {
            HomeAway::Home => "Home",
            HomeAway::Away => "Away",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Game {
    pub start_datetime: NaiveDateTime,
    pub arena: String,
    pub home_away: HomeAway,
    pub opponent: String,
}
