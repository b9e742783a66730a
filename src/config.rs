//! Application-level configuration loading, including the codename word lists.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use time::Duration;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PUZZUP_BACK_CONFIG_PATH";
/// Hours of inactivity after which an open, unsolved session is shown as stale.
const DEFAULT_STALE_SESSION_HOURS: i64 = 48;

#[derive(Debug, Clone)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Global switch for starting testsolve sessions.
    pub testsolving_enabled: bool,
    /// Inactivity threshold before an open session is flagged stale.
    pub stale_session_hours: i64,
    /// Adjectives for generated codenames.
    pub codename_adjectives: Vec<String>,
    /// Nouns for generated codenames.
    pub codename_nouns: Vec<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let app_config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        testsolving_enabled = app_config.testsolving_enabled,
                        adjectives = app_config.codename_adjectives.len(),
                        nouns = app_config.codename_nouns.len(),
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// The stale-session threshold as a [`Duration`].
    pub fn stale_threshold(&self) -> Duration {
        Duration::hours(self.stale_session_hours)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            testsolving_enabled: true,
            stale_session_hours: DEFAULT_STALE_SESSION_HOURS,
            codename_adjectives: default_adjectives(),
            codename_nouns: default_nouns(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default = "default_true")]
    testsolving_enabled: bool,
    #[serde(default = "default_stale_hours")]
    stale_session_hours: i64,
    #[serde(default = "default_adjectives")]
    codename_adjectives: Vec<String>,
    #[serde(default = "default_nouns")]
    codename_nouns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_stale_hours() -> i64 {
    DEFAULT_STALE_SESSION_HOURS
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            testsolving_enabled: value.testsolving_enabled,
            stale_session_hours: value.stale_session_hours,
            codename_adjectives: value.codename_adjectives,
            codename_nouns: value.codename_nouns,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Built-in adjective list shipped with the binary.
fn default_adjectives() -> Vec<String> {
    [
        "abandoned", "ancient", "breezy", "cheerful", "cryptic", "dapper", "eager",
        "fearless", "gentle", "hollow", "icy", "jolly", "keen", "luminous", "mellow",
        "nimble", "opulent", "peculiar", "quirky", "rustic", "silent", "tangled",
        "unusual", "vivid", "wandering", "zealous",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

/// Built-in noun list shipped with the binary.
fn default_nouns() -> Vec<String> {
    [
        "anvil", "badger", "compass", "dolphin", "ember", "fjord", "glacier",
        "harbor", "iguana", "jukebox", "kettle", "lantern", "meadow", "nebula",
        "octopus", "parrot", "quarry", "raccoon", "sundial", "tundra", "umbrella",
        "violin", "walrus", "xylophone", "yacht", "zeppelin",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_testsolving() {
        let config = AppConfig::default();
        assert!(config.testsolving_enabled);
        assert_eq!(config.stale_session_hours, DEFAULT_STALE_SESSION_HOURS);
        assert!(!config.codename_adjectives.is_empty());
        assert!(!config.codename_nouns.is_empty());
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"testsolving_enabled": false}"#).expect("parse");
        let config: AppConfig = raw.into();
        assert!(!config.testsolving_enabled);
        assert_eq!(config.stale_session_hours, DEFAULT_STALE_SESSION_HOURS);
        assert!(!config.codename_nouns.is_empty());
    }
}
