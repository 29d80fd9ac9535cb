//! # Anti-Cheat Configuration
//!
//! Game policy and rate limits, loaded once at startup from TOML.
//!
//! ```toml
//! [rate_limits]          # optional, defaults to 6/min, 100/hour, 10s
//! max_per_minute = 6
//! max_per_hour = 100
//! cooldown_ms = 10000
//!
//! [[games]]
//! id = "regex-rush"
//! min_score = 0
//! max_score = 1000
//! min_duration_ms = 30000
//! max_duration_ms = 300000
//! max_streak = 50
//! max_score_per_minute = 1000
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::AntiCheatResult;
use crate::registry::{GameConfig, GameRegistry};
use crate::validation::RateLimitConfig;

/// On-disk layout.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    games: Vec<GameConfig>,
    #[serde(default)]
    rate_limits: RateLimitConfig,
}

/// Everything the engine needs besides a clock.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AntiCheatConfig {
    /// Per-game policy.
    pub registry: GameRegistry,
    /// Global rate policy.
    pub rate_limits: RateLimitConfig,
}

impl AntiCheatConfig {
    /// Built-in games with default rate limits.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            registry: GameRegistry::builtin(),
            rate_limits: RateLimitConfig::default(),
        }
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML, inconsistent game bounds, duplicate games or
    /// unusable rate limits.
    pub fn from_toml_str(source: &str) -> AntiCheatResult<Self> {
        let file: ConfigFile = toml::from_str(source)?;
        file.rate_limits.validate()?;
        let registry = GameRegistry::from_configs(file.games)?;

        tracing::info!(
            games = registry.len(),
            max_per_minute = file.rate_limits.max_per_minute,
            max_per_hour = file.rate_limits.max_per_hour,
            "anti-cheat config loaded"
        );

        Ok(Self {
            registry,
            rate_limits: file.rate_limits,
        })
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, or as [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> AntiCheatResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }
}
