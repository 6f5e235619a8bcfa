//! Configuration loaded from `redress.toml`.
//!
//! The [`RedressConfig`] struct holds every tunable parameter. Values absent
//! from the file fall back to sensible defaults. The environment variable
//! `REDRESS_REVIEW_WINDOW_SECS` takes precedence over the file.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration loaded from `redress.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct RedressConfig {
    /// Seconds a refund-only ticket may sit in review before auto-refund.
    #[serde(default = "default_review_window_secs")]
    pub review_window_secs: u64,

    /// Shortened review window used by the `demo` subcommand.
    #[serde(default = "default_demo_window_secs")]
    pub demo_window_secs: u64,

    /// Countdown tick resolution in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

// Default review window: 3 days.
fn default_review_window_secs() -> u64 {
    3 * 24 * 60 * 60
}

// Default demo window: 5 seconds, long enough to watch the race.
fn default_demo_window_secs() -> u64 {
    5
}

// Default tick: one second, matching the countdown display resolution.
fn default_tick_ms() -> u64 {
    1000
}

impl Default for RedressConfig {
    fn default() -> Self {
        Self {
            review_window_secs: default_review_window_secs(),
            demo_window_secs: default_demo_window_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl RedressConfig {
    /// Loads configuration from `redress.toml` in the current directory.
    /// Uses defaults if the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("redress.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<RedressConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment variable takes precedence over the config file.
        if let Ok(secs) = std::env::var("REDRESS_REVIEW_WINDOW_SECS")
            && let Ok(parsed) = secs.parse::<u64>()
        {
            config.review_window_secs = parsed;
        }

        Ok(config)
    }

    pub fn review_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.review_window_secs as i64)
    }

    pub fn demo_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.demo_window_secs as i64)
    }

    pub fn tick(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_values() {
        let config = RedressConfig::default();
        assert_eq!(config.review_window_secs, 259_200);
        assert_eq!(config.demo_window_secs, 5);
        assert_eq!(config.tick_ms, 1000);
    }

    #[test]
    fn deserialize_partial_toml() {
        let toml_str = r#"
            review_window_secs = 60
        "#;
        let config: RedressConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.review_window_secs, 60);
        assert_eq!(config.demo_window_secs, 5);
        assert_eq!(config.tick_ms, 1000);
    }

    #[test]
    fn load_from_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redress.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "demo_window_secs = 2\ntick_ms = 250").unwrap();

        let config = RedressConfig::load_from(&path).unwrap();
        assert_eq!(config.demo_window_secs, 2);
        assert_eq!(config.tick_ms, 250);
        assert_eq!(config.review_window_secs, 259_200);
    }

    #[test]
    fn load_from_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RedressConfig::load_from(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.tick_ms, 1000);
    }

    #[test]
    fn duration_helpers() {
        let config = RedressConfig::default();
        assert_eq!(config.review_window(), chrono::Duration::days(3));
        assert_eq!(config.tick(), std::time::Duration::from_secs(1));
    }
}
