//! # Game Config Registry
//!
//! Per-game scoring policy. Every reward-bearing game has hand-tuned bounds
//! for its scoring economy; a submission for a game that is not registered
//! is rejected outright.
//!
//! The registry is built once and never mutated. Tests and tools construct
//! their own with [`GameRegistry::from_configs`]; the free functions
//! [`get_game_config`] and [`get_supported_games`] read the built-in table.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::AntiCheatConfig;
use crate::error::{AntiCheatError, AntiCheatResult};

/// Scoring policy for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Game identifier (registry key).
    pub id: String,
    /// Lowest acceptable score.
    pub min_score: i64,
    /// Highest acceptable score.
    pub max_score: i64,
    /// Shortest plausible session (ms).
    pub min_duration_ms: i64,
    /// Longest plausible session (ms).
    pub max_duration_ms: i64,
    /// Highest plausible combo streak.
    pub max_streak: i64,
    /// Highest sustainable scoring rate.
    pub max_score_per_minute: i64,
}

impl GameConfig {
    /// Creates a new game config.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        score: (i64, i64),
        duration_ms: (i64, i64),
        max_streak: i64,
        max_score_per_minute: i64,
    ) -> Self {
        Self {
            id: id.into(),
            min_score: score.0,
            max_score: score.1,
            min_duration_ms: duration_ms.0,
            max_duration_ms: duration_ms.1,
            max_streak,
            max_score_per_minute,
        }
    }

    /// Checks the bounds are internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`AntiCheatError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> AntiCheatResult<()> {
        let reason = if self.id.trim().is_empty() {
            Some("id must not be empty".to_string())
        } else if self.min_score > self.max_score {
            Some(format!(
                "min_score {} is greater than max_score {}",
                self.min_score, self.max_score
            ))
        } else if self.min_duration_ms < 0 {
            Some(format!("min_duration_ms {} is negative", self.min_duration_ms))
        } else if self.min_duration_ms > self.max_duration_ms {
            Some(format!(
                "min_duration_ms {} is greater than max_duration_ms {}",
                self.min_duration_ms, self.max_duration_ms
            ))
        } else if self.max_streak < 0 {
            Some(format!("max_streak {} is negative", self.max_streak))
        } else if self.max_score_per_minute <= 0 {
            Some(format!(
                "max_score_per_minute {} must be positive",
                self.max_score_per_minute
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => Err(AntiCheatError::InvalidConfig {
                game_id: self.id.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

/// Read-only lookup from game identifier to [`GameConfig`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameRegistry {
    games: BTreeMap<String, GameConfig>,
}

impl GameRegistry {
    /// Builds a registry from a list of configs.
    ///
    /// # Errors
    ///
    /// Fails if any config is inconsistent or an identifier repeats.
    pub fn from_configs(configs: impl IntoIterator<Item = GameConfig>) -> AntiCheatResult<Self> {
        let mut games = BTreeMap::new();
        for config in configs {
            config.validate()?;
            if games.contains_key(&config.id) {
                return Err(AntiCheatError::DuplicateGame(config.id));
            }
            games.insert(config.id.clone(), config);
        }
        Ok(Self { games })
    }

    /// The games compiled into the platform.
    #[must_use]
    pub fn builtin() -> Self {
        let games = builtin_configs()
            .into_iter()
            .map(|config| (config.id.clone(), config))
            .collect();
        Self { games }
    }

    /// Parses a registry from the `[[games]]` tables of a TOML document.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or inconsistent configs.
    pub fn from_toml_str(source: &str) -> AntiCheatResult<Self> {
        Ok(AntiCheatConfig::from_toml_str(source)?.registry)
    }

    /// Loads a registry from a TOML file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> AntiCheatResult<Self> {
        Ok(AntiCheatConfig::load(path)?.registry)
    }

    /// Looks up a game.
    #[must_use]
    pub fn get(&self, game_id: &str) -> Option<&GameConfig> {
        self.games.get(game_id)
    }

    /// Supported game identifiers, sorted.
    #[must_use]
    pub fn supported_games(&self) -> Vec<&str> {
        self.games.keys().map(String::as_str).collect()
    }

    /// Number of registered games.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Returns true if no games are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Hand-tuned bounds for each live game.
fn builtin_configs() -> Vec<GameConfig> {
    vec![
        // Short puzzle sprints, 30s to 5min
        GameConfig::new("regex-rush", (0, 1000), (30_000, 300_000), 50, 1000),
        // Slow memory rounds, 2min to 15min
        GameConfig::new("memory-matrix", (0, 3000), (120_000, 900_000), 100, 600),
        GameConfig::new("byte-blitz", (0, 2000), (60_000, 600_000), 200, 800),
        GameConfig::new("hash-hunter", (0, 5000), (60_000, 1_200_000), 25, 1200),
    ]
}

/// Process-wide built-in registry.
#[must_use]
pub fn builtin_registry() -> &'static GameRegistry {
    static REGISTRY: OnceLock<GameRegistry> = OnceLock::new();
    REGISTRY.get_or_init(GameRegistry::builtin)
}

/// Looks up a built-in game config.
#[must_use]
pub fn get_game_config(game_id: &str) -> Option<&'static GameConfig> {
    builtin_registry().get(game_id)
}

/// Identifiers of all built-in games, sorted.
#[must_use]
pub fn get_supported_games() -> Vec<&'static str> {
    builtin_registry().supported_games()
}
