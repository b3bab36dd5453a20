//! Run configuration.
//!
//! Settings are read from a TOML file (`event_manager.toml` by default).
//! Every field has a default, so a run with no file at all uses the
//! conventional layout: `event_attendees.csv`, `form_letter.html`,
//! `secret.key` and an `output/` directory in the working directory.
//!
//! ```toml
//! roster_path = "event_attendees.csv"
//! on_output_error = "skip"
//!
//! [civic]
//! timeout_secs = 5
//!
//! [log]
//! level = "debug"
//! file = "event_manager.log"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable that overrides the secret key file.
pub const API_KEY_ENV: &str = "CIVIC_API_KEY";

pub const DEFAULT_CONFIG_PATH: &str = "event_manager.toml";

pub const DEFAULT_FALLBACK_MESSAGE: &str =
    "You can find your representatives by visiting www.commoncause.org/take-action/find-elected-officials";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid configuration in {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
    #[error("No API key: set {env} or put the key in {path}")]
    MissingCredential { env: &'static str, path: String },
    #[error("Unknown output error policy '{0}' (expected 'abort' or 'skip')")]
    UnknownPolicy(String),
}

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// What to do when one attendee's letter cannot be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputErrorPolicy {
    /// Stop the batch at the first failure.
    #[default]
    Abort,
    /// Log the failure, count the attendee as skipped and continue.
    Skip,
}

impl FromStr for OutputErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(OutputErrorPolicy::Abort),
            "skip" => Ok(OutputErrorPolicy::Skip),
            other => Err(ConfigError::UnknownPolicy(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    pub roster_path: PathBuf,
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    pub secret_key_path: PathBuf,
    pub on_output_error: OutputErrorPolicy,
    pub civic: CivicConfig,
    pub log: LogConfig,
}

impl Default for EventConfig {
    fn default() -> Self {
        EventConfig {
            roster_path: PathBuf::from("event_attendees.csv"),
            template_path: PathBuf::from("form_letter.html"),
            output_dir: PathBuf::from("output"),
            secret_key_path: PathBuf::from("secret.key"),
            on_output_error: OutputErrorPolicy::default(),
            civic: CivicConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Civic Information API settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CivicConfig {
    pub base_url: String,
    pub levels: Vec<String>,
    pub roles: Vec<String>,
    pub timeout_secs: u64,
    /// Substituted for the officials list whenever a lookup fails.
    pub fallback_message: String,
}

impl Default for CivicConfig {
    fn default() -> Self {
        CivicConfig {
            base_url: "https://www.googleapis.com/civicinfo/v2".to_string(),
            levels: vec!["country".to_string()],
            roles: vec![
                "legislatorUpperBody".to_string(),
                "legislatorLowerBody".to_string(),
            ],
            timeout_secs: 10,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
            file: None,
            timestamps: false,
        }
    }
}

impl LogConfig {
    /// Parsed `level`, falling back to `Info` for unrecognized names.
    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::Info)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl EventConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    /// Load configuration from `path`.
    ///
    /// When `required` is false a missing file yields the defaults; any other
    /// read failure, or invalid TOML, is an error either way.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, &display),
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                Ok(EventConfig::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: display,
                source,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Resolve the Civic Information API key.
///
/// `CIVIC_API_KEY` (from the environment or a `.env` file) takes precedence;
/// otherwise the key is read from `secret_key_path` and trimmed of
/// surrounding whitespace.
pub fn load_api_key(secret_key_path: &Path) -> Result<String, ConfigError> {
    dotenv::dotenv().ok();
    resolve_api_key(std::env::var(API_KEY_ENV).ok(), secret_key_path)
}

fn resolve_api_key(from_env: Option<String>, secret_key_path: &Path) -> Result<String, ConfigError> {
    let missing = || ConfigError::MissingCredential {
        env: API_KEY_ENV,
        path: secret_key_path.display().to_string(),
    };

    if let Some(key) = from_env.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
        return Ok(key);
    }

    let key = match fs::read_to_string(secret_key_path) {
        Ok(text) => text.trim().to_string(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(missing()),
        Err(source) => {
            return Err(ConfigError::Io {
                path: secret_key_path.display().to_string(),
                source,
            });
        }
    };

    if key.is_empty() { Err(missing()) } else { Ok(key) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = EventConfig::from_toml("", "inline").unwrap();
        assert_eq!(config, EventConfig::default());
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.on_output_error, OutputErrorPolicy::Abort);
        assert_eq!(config.civic.levels, vec!["country"]);
        assert_eq!(config.civic.roles.len(), 2);
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let text = r#"
            output_dir = "letters"
            on_output_error = "skip"

            [civic]
            timeout_secs = 3

            [log]
            level = "debug"
        "#;
        let config = EventConfig::from_toml(text, "inline").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("letters"));
        assert_eq!(config.on_output_error, OutputErrorPolicy::Skip);
        assert_eq!(config.civic.timeout_secs, 3);
        assert_eq!(config.civic.fallback_message, DEFAULT_FALLBACK_MESSAGE);
        assert_eq!(config.log.level_filter(), LevelFilter::Debug);
        assert_eq!(config.roster_path, PathBuf::from("event_attendees.csv"));
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let result = EventConfig::from_toml(r#"on_output_error = "retry""#, "inline");
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
        assert!("retry".parse::<OutputErrorPolicy>().is_err());
        assert_eq!("SKIP".parse::<OutputErrorPolicy>().unwrap(), OutputErrorPolicy::Skip);
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let log = LogConfig {
            level: "chatty".to_string(),
            ..LogConfig::default()
        };
        assert_eq!(log.level_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_missing_optional_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EventConfig::load(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(config, EventConfig::default());
    }

    #[test]
    fn test_missing_required_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = EventConfig::load(&dir.path().join("absent.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    // --- Credentials --------------------------------------------------------

    #[test]
    fn test_secret_file_is_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, "  abc123\n\n").unwrap();
        assert_eq!(resolve_api_key(None, &path).unwrap(), "abc123");
    }

    #[test]
    fn test_environment_key_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, "from-file").unwrap();
        let key = resolve_api_key(Some("from-env\n".to_string()), &path).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_blank_environment_key_falls_through_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, "from-file").unwrap();
        assert_eq!(resolve_api_key(Some("  ".to_string()), &path).unwrap(), "from-file");
    }

    #[test]
    fn test_missing_or_empty_key_is_missing_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        assert!(matches!(
            resolve_api_key(None, &path),
            Err(ConfigError::MissingCredential { .. })
        ));

        fs::write(&path, " \n").unwrap();
        assert!(matches!(
            resolve_api_key(None, &path),
            Err(ConfigError::MissingCredential { .. })
        ));
    }
}
