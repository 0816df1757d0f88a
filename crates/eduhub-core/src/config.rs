//! Shared configuration for Eduhub.
//!
//! Locates the bot's state directory and builds the runtime [`Settings`]
//! from environment variables.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.eduhub/
//! ├── .env          # Secrets (bot token, admin id)
//! ├── fonts/        # Fonts used by the image renderer
//! └── state/        # Runtime state files (known chats)
//! ```
//!
//! # Environment Variables
//!
//! - `EDUHUB_STATE_DIR`: Override the base state directory
//! - `EDUHUB_FONT_DIR`: Override the font directory
//! - `EDUHUB_ADMIN_ID`: Telegram user id allowed to run admin commands
//! - `EDUHUB_EXAMS_URL`, `EDUHUB_QUIZ_POOL_URL`, `EDUHUB_PYQ_URL`,
//!   `EDUHUB_QUOTES_URL`: Content document overrides
//! - `EDUHUB_PLAY_BASE_URL`: Base URL of the quiz player
//! - `EDUHUB_HTTP_TIMEOUT_SECS`: Timeout for content fetches

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "EDUHUB_STATE_DIR";

/// Environment variable for custom font directory.
pub const FONT_DIR_ENV: &str = "EDUHUB_FONT_DIR";

/// Environment variable holding the bot admin's user id.
pub const ADMIN_ID_ENV: &str = "EDUHUB_ADMIN_ID";

pub const EXAMS_URL_ENV: &str = "EDUHUB_EXAMS_URL";
pub const QUIZ_POOL_URL_ENV: &str = "EDUHUB_QUIZ_POOL_URL";
pub const PYQ_URL_ENV: &str = "EDUHUB_PYQ_URL";
pub const QUOTES_URL_ENV: &str = "EDUHUB_QUOTES_URL";
pub const PLAY_BASE_URL_ENV: &str = "EDUHUB_PLAY_BASE_URL";
pub const HTTP_TIMEOUT_ENV: &str = "EDUHUB_HTTP_TIMEOUT_SECS";

/// Exam categories with their papers.
pub const DEFAULT_EXAMS_URL: &str =
    "https://raw.githubusercontent.com/itzfew/Eduhub-KMR/refs/heads/main/src/exams.json";

/// Subject-tagged question pool used for quiz polls.
pub const DEFAULT_QUIZ_POOL_URL: &str =
    "https://raw.githubusercontent.com/itzfew/Eduhub-KMR/master/quiz.json";

/// A previous-year paper used by `/pyq` and `/quizimg`.
pub const DEFAULT_PYQ_URL: &str = "https://raw.githubusercontent.com/itzfew/Quizes/refs/heads/main/pyq/014be169-4893-5d08-a744-5ca0749e3c20.json";

pub const DEFAULT_QUOTES_URL: &str =
    "https://raw.githubusercontent.com/itzfew/Eduhub-KMR/master/quotes.json";

pub const DEFAULT_PLAY_BASE_URL: &str = "https://quizes.pages.dev";

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Default state directory name under home.
const DEFAULT_STATE_DIR: &str = ".eduhub";

const FONTS_SUBDIR: &str = "fonts";
const STATE_SUBDIR: &str = "state";

static STATE_DIR_CACHE: OnceLock<PathBuf> = OnceLock::new();

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Get the Eduhub state directory.
///
/// The state directory is determined by:
/// 1. `EDUHUB_STATE_DIR` environment variable if set
/// 2. `~/.eduhub` if home directory is available
/// 3. `.eduhub` in current directory as fallback
pub fn state_dir() -> PathBuf {
    STATE_DIR_CACHE
        .get_or_init(|| resolve_state_dir(std::env::var(STATE_DIR_ENV).ok()))
        .clone()
}

fn resolve_state_dir(overridden: Option<String>) -> PathBuf {
    overridden
        .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the runtime state directory.
pub fn runtime_state_dir() -> PathBuf {
    state_dir().join(STATE_SUBDIR)
}

/// Known-chats file path under an explicit state directory.
pub fn chats_file_in(state_dir: &Path) -> PathBuf {
    state_dir.join(STATE_SUBDIR).join("chats.json")
}

/// Get the `.env` file path inside the state directory.
pub fn env_file() -> PathBuf {
    state_dir().join(".env")
}

/// Ensure the state directory and its subdirectories exist.
///
/// # Errors
/// Returns an error if any directory cannot be created.
pub fn ensure_all_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(runtime_state_dir())?;
    std::fs::create_dir_all(state_dir().join(FONTS_SUBDIR))?;
    Ok(())
}

/// Runtime settings for the bot.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub state_dir: PathBuf,
    pub font_dir: PathBuf,
    pub admin_id: Option<u64>,
    pub exams_url: String,
    pub quiz_pool_url: String,
    pub pyq_url: String,
    pub quotes_url: String,
    pub play_base_url: String,
    pub http_timeout: Duration,
}

impl Settings {
    /// Build settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let state_dir = resolve_state_dir(get(STATE_DIR_ENV));
        let font_dir = get(FONT_DIR_ENV)
            .map(|p| PathBuf::from(shellexpand::tilde(&p).into_owned()))
            .unwrap_or_else(|| state_dir.join(FONTS_SUBDIR));

        let admin_id = match get(ADMIN_ID_ENV) {
            Some(raw) => Some(parse_number(ADMIN_ID_ENV, &raw)?),
            None => None,
        };

        let http_timeout = match get(HTTP_TIMEOUT_ENV) {
            Some(raw) => Duration::from_secs(parse_number(HTTP_TIMEOUT_ENV, &raw)?),
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            state_dir,
            font_dir,
            admin_id,
            exams_url: get(EXAMS_URL_ENV).unwrap_or_else(|| DEFAULT_EXAMS_URL.to_string()),
            quiz_pool_url: get(QUIZ_POOL_URL_ENV)
                .unwrap_or_else(|| DEFAULT_QUIZ_POOL_URL.to_string()),
            pyq_url: get(PYQ_URL_ENV).unwrap_or_else(|| DEFAULT_PYQ_URL.to_string()),
            quotes_url: get(QUOTES_URL_ENV).unwrap_or_else(|| DEFAULT_QUOTES_URL.to_string()),
            play_base_url: get(PLAY_BASE_URL_ENV)
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_PLAY_BASE_URL.to_string()),
            http_timeout,
        })
    }

    /// Whether the given Telegram user is the bot admin.
    pub fn is_admin(&self, user_id: u64) -> bool {
        self.admin_id == Some(user_id)
    }

    /// Known-chats file for these settings.
    pub fn chats_file(&self) -> PathBuf {
        chats_file_in(&self.state_dir)
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.parse::<u64>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ConfigError::InvalidNumber {
            var,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_from(&[(STATE_DIR_ENV, "/tmp/eduhub-test")]).unwrap();

        assert_eq!(settings.state_dir, PathBuf::from("/tmp/eduhub-test"));
        assert_eq!(settings.font_dir, PathBuf::from("/tmp/eduhub-test/fonts"));
        assert_eq!(settings.admin_id, None);
        assert_eq!(settings.exams_url, DEFAULT_EXAMS_URL);
        assert_eq!(settings.play_base_url, DEFAULT_PLAY_BASE_URL);
        assert_eq!(settings.http_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_overrides() {
        let settings = settings_from(&[
            (STATE_DIR_ENV, "/srv/eduhub"),
            (FONT_DIR_ENV, "/usr/share/fonts/truetype"),
            (ADMIN_ID_ENV, "6930703214"),
            (EXAMS_URL_ENV, "http://localhost/exams.json"),
            (PLAY_BASE_URL_ENV, "https://play.example.org/"),
            (HTTP_TIMEOUT_ENV, "3"),
        ])
        .unwrap();

        assert_eq!(settings.font_dir, PathBuf::from("/usr/share/fonts/truetype"));
        assert_eq!(settings.admin_id, Some(6930703214));
        assert!(settings.is_admin(6930703214));
        assert!(!settings.is_admin(1));
        assert_eq!(settings.exams_url, "http://localhost/exams.json");
        assert_eq!(settings.play_base_url, "https://play.example.org");
        assert_eq!(settings.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let settings = settings_from(&[(STATE_DIR_ENV, "/tmp/x"), (ADMIN_ID_ENV, "  ")]).unwrap();
        assert_eq!(settings.admin_id, None);
    }

    #[test]
    fn test_invalid_admin_id() {
        let err = settings_from(&[(ADMIN_ID_ENV, "me")]).unwrap_err();
        assert!(err.to_string().contains(ADMIN_ID_ENV));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(settings_from(&[(HTTP_TIMEOUT_ENV, "0")]).is_err());
    }

    #[test]
    fn test_chats_file_name() {
        let file = chats_file_in(Path::new("/tmp/eduhub"));
        assert_eq!(file, PathBuf::from("/tmp/eduhub/state/chats.json"));
    }

    #[test]
    fn test_env_file_name() {
        assert!(env_file().ends_with(".env"));
    }
}
