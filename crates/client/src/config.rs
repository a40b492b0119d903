//! Client configuration loaded from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Everything the headless client needs to start a session.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    pub content_dir: Option<PathBuf>,
    pub save_dir: Option<PathBuf>,
    pub session_id: Option<String>,
    pub character_name: String,
    pub class_id: String,
    pub start_zone: String,
    pub duration: Duration,
    pub seed: Option<u64>,
    pub hardcore: bool,
    pub export_events: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            save_dir: None,
            session_id: None,
            character_name: "Adventurer".to_string(),
            class_id: "warrior".to_string(),
            start_zone: "qeynos_hills".to_string(),
            duration: Duration::from_secs(120),
            seed: None,
            hardcore: false,
            export_events: false,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CONTENT_DATA_DIR` - Directory with content RON files and `config.toml` (default: bundled data)
    /// - `SAVE_DATA_DIR` - Directory for character files (default: platform-specific)
    /// - `GAME_SESSION_ID` - Session identifier used for the log directory (default: timestamp)
    /// - `CHARACTER_NAME` - Character to load or create (default: Adventurer)
    /// - `CHARACTER_CLASS` - Class for a new character (default: warrior)
    /// - `START_ZONE` - Zone for a new character (default: qeynos_hills)
    /// - `SIM_DURATION_SECS` - How long the auto battle runs (default: 120)
    /// - `SIM_SEED` - Fixed RNG seed (default: entropy)
    /// - `HARDCORE` - Create new characters in hardcore mode (default: false)
    /// - `EXPORT_EVENTS` - Print encounter and progression events as JSON lines (default: false)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let parse = |key: &str| lookup(key).map(|value| value.trim().to_string());

        config.content_dir = parse("CONTENT_DATA_DIR").map(PathBuf::from);
        config.save_dir = parse("SAVE_DATA_DIR").map(PathBuf::from);
        config.session_id = parse("GAME_SESSION_ID").filter(|id| !id.is_empty());

        if let Some(name) = parse("CHARACTER_NAME").filter(|name| !name.is_empty()) {
            config.character_name = name;
        }
        if let Some(class_id) = parse("CHARACTER_CLASS").filter(|id| !id.is_empty()) {
            config.class_id = class_id;
        }
        if let Some(zone) = parse("START_ZONE").filter(|zone| !zone.is_empty()) {
            config.start_zone = zone;
        }
        if let Some(secs) = parse("SIM_DURATION_SECS").and_then(|v| v.parse::<u64>().ok()) {
            config.duration = Duration::from_secs(secs.max(1));
        }
        config.seed = parse("SIM_SEED").and_then(|v| v.parse().ok());
        config.hardcore = parse("HARDCORE").is_some_and(|v| is_truthy(&v));
        config.export_events = parse("EXPORT_EVENTS").is_some_and(|v| is_truthy(&v));

        config
    }
}

// A set-but-empty variable counts as enabled.
fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "" | "1" | "true" | "yes" | "on"
    )
}
