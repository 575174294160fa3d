//! CLI configuration management.
//!
//! Configuration comes from three layers with increasing precedence:
//! defaults, an optional `settings.json` in the working directory, and
//! `ARTREE_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use artree_bot::BotConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Name of the optional configuration file.
const SETTINGS_FILE: &str = "settings.json";

/// Application-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bot address prefix stripped from inbound messages.
    pub prefix: String,

    /// Canvas width in pixels.
    pub width: u32,

    /// Canvas height in pixels.
    pub height: u32,

    /// Budget in seconds for generating one whole image.
    pub plot_timeout_secs: u64,

    /// Seconds to sleep between polls.
    pub poll_interval_secs: u64,

    /// Directory holding the submission store.
    pub data_dir: PathBuf,

    /// Directory polled for inbound message files. Defaults to
    /// `<data_dir>/inbox`.
    pub inbox_dir: Option<PathBuf>,

    /// Directory where generated art is published. Defaults to
    /// `<data_dir>/outbox`.
    pub outbox_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = ProjectDirs::from("dev", "artree", "artree")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("artree"));

        Self {
            prefix: "@artree".to_string(),
            width: 1024,
            height: 1024,
            plot_timeout_secs: 5 * 60,
            poll_interval_secs: 2 * 60,
            data_dir,
            inbox_dir: None,
            outbox_dir: None,
        }
    }
}

impl Config {
    /// Load configuration from the settings file and environment.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let settings = PathBuf::from(SETTINGS_FILE);
        let mut config = if settings.exists() {
            let contents = std::fs::read_to_string(&settings)
                .with_context(|| format!("Failed to read {}", settings.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", settings.display()))?
        } else {
            Self::default()
        };

        // Environment variables take precedence over the file
        if let Ok(prefix) = std::env::var("ARTREE_PREFIX") {
            config.prefix = prefix;
        }
        if let Ok(width) = std::env::var("ARTREE_WIDTH") {
            config.width = width.parse().context("Failed to parse ARTREE_WIDTH")?;
        }
        if let Ok(height) = std::env::var("ARTREE_HEIGHT") {
            config.height = height.parse().context("Failed to parse ARTREE_HEIGHT")?;
        }
        if let Ok(secs) = std::env::var("ARTREE_PLOT_TIMEOUT_SECS") {
            config.plot_timeout_secs = secs
                .parse()
                .context("Failed to parse ARTREE_PLOT_TIMEOUT_SECS")?;
        }
        if let Ok(secs) = std::env::var("ARTREE_POLL_INTERVAL_SECS") {
            config.poll_interval_secs = secs
                .parse()
                .context("Failed to parse ARTREE_POLL_INTERVAL_SECS")?;
        }
        if let Ok(dir) = std::env::var("ARTREE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("ARTREE_INBOX_DIR") {
            config.inbox_dir = Some(PathBuf::from(dir));
        }
        if let Ok(dir) = std::env::var("ARTREE_OUTBOX_DIR") {
            config.outbox_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }

    /// The directory polled for inbound messages.
    pub fn inbox_dir(&self) -> PathBuf {
        self.inbox_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("inbox"))
    }

    /// The directory generated art is published into.
    pub fn outbox_dir(&self) -> PathBuf {
        self.outbox_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("outbox"))
    }

    /// Path of the submission store file.
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }

    /// Image generation budget.
    pub fn plot_timeout(&self) -> Duration {
        Duration::from_secs(self.plot_timeout_secs)
    }

    /// The bot-facing slice of this configuration.
    pub fn bot_config(&self) -> BotConfig {
        BotConfig {
            prefix: self.prefix.clone(),
            width: self.width,
            height: self.height,
            plot_timeout: self.plot_timeout(),
            poll_interval: Duration::from_secs(self.poll_interval_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.prefix, "@artree");
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 1024);
        assert_eq!(config.plot_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_derived_directories_follow_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/var/lib/artree"),
            ..Default::default()
        };
        assert_eq!(config.inbox_dir(), PathBuf::from("/var/lib/artree/inbox"));
        assert_eq!(config.outbox_dir(), PathBuf::from("/var/lib/artree/outbox"));
        assert_eq!(
            config.store_path(),
            PathBuf::from("/var/lib/artree/store.json")
        );
    }

    #[test]
    fn test_partial_settings_file_fills_missing_fields() {
        let partial: Config = serde_json::from_str(r#"{"width": 64}"#).unwrap();
        assert_eq!(partial.width, 64);
        assert_eq!(partial.height, 1024);
        assert_eq!(partial.prefix, "@artree");
    }
}
