use std::collections::HashMap;

use tracing::warn;

/// Sportszone league id of the Greater Seattle Hockey League.
pub const GSHL_LEAGUE_ID: i64 = 9941;

/// Arena-name substitutions for a league.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Arena names pass through unchanged.
    Identity,
    Gshl,
}

impl Profile {
    /// Profile for a league id, falling back to `Identity`.
    pub fn for_league(league_id: i64) -> Self {
        match league_id {
            GSHL_LEAGUE_ID => Profile::Gshl,
            _ => Profile::Identity,
        }
    }

    /// Team Cowboy location name for a Sportszone arena name, if this profile renames it.
    pub fn arena(&self, sportszone_name: &str) -> Option<&'static str> {
        match self {
            Profile::Identity => None,
            Profile::Gshl => gshl_arena(sportszone_name),
        }
    }
}

fn gshl_arena(name: &str) -> Option<&'static str> {
    match name {
        "Castle" => Some("Castle Ice Arena"),
        "Everett" => Some("Everett Events Center (Community Ice)"),
        "Evt Main" => Some("Everett Events Center (Main Ice)"),
        "Kent" => Some("Kent Valley Ice Center"),
        "Kngsgate" => Some("Kingsgate Ice Arena"),
        "Lynnwood" => Some("Lynnwood Ice Center"),
        "Olympic" => Some("Olympic View Arena"),
        "Showare" => Some("Showare Arena"),
        _ => None,
    }
}

/// League profile plus user-supplied overrides, which win.
#[derive(Debug, Clone)]
pub struct ArenaTranslator {
    profile: Profile,
    overrides: HashMap<String, String>,
}

impl ArenaTranslator {
    pub fn new(profile: Profile, overrides: HashMap<String, String>) -> Self {
        Self { profile, overrides }
    }

    pub fn translate<'a>(&'a self, arena: &'a str) -> &'a str {
        self.overrides
            .get(arena)
            .map(String::as_str)
            .or_else(|| self.profile.arena(arena))
            .unwrap_or(arena)
    }
}

/// Parse `FROM=TO` entries. Anything without exactly one `=` is ignored with a warning.
pub fn parse_overrides<S: AsRef<str>>(entries: &[S]) -> HashMap<String, String> {
    let mut result = HashMap::new();
    for entry in entries {
        let entry = entry.as_ref();
        let parts: Vec<&str> = entry.split('=').collect();
        if parts.len() != 2 {
            warn!(entry = %entry, "Ignoring invalid arena map entry");
            continue;
        }
        result.insert(parts[0].to_string(), parts[1].to_string());
    }
    result
}
