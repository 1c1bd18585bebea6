use log::LevelFilter;
use std::path::PathBuf;

pub const ROSTER_ENV: &str = "TOURNEY_ROSTER_JSON";
pub const EDIT_ENV: &str = "TOURNEY_EDIT";
pub const LOG_ENV: &str = "TOURNEY_LOG";

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Start with result editing unlocked.
    pub edit_mode: bool,
    /// Roster file; the built-in roster is used when unset.
    pub roster_path: Option<PathBuf>,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            full_screen: false,
            log_level: value(LOG_ENV).and_then(|v| v.parse().ok()),
            edit_mode: value(EDIT_ENV).is_some_and(|v| is_truthy(&v)),
            roster_path: value(ROSTER_ENV).map(PathBuf::from),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]);
        assert!(!s.edit_mode);
        assert!(s.log_level.is_none());
        assert!(s.roster_path.is_none());
    }

    #[test]
    fn reads_environment() {
        let s = settings(&[
            (EDIT_ENV, "TRUE"),
            (LOG_ENV, "debug"),
            (ROSTER_ENV, "/tmp/cup.json"),
        ]);
        assert!(s.edit_mode);
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
        assert_eq!(s.roster_path, Some(PathBuf::from("/tmp/cup.json")));
    }

    #[test]
    fn junk_values_are_ignored() {
        let s = settings(&[(EDIT_ENV, "nope"), (LOG_ENV, "loud"), (ROSTER_ENV, "  ")]);
        assert!(!s.edit_mode);
        assert!(s.log_level.is_none());
        assert!(s.roster_path.is_none());
    }
}
