//! # Anti-Cheat Error Types
//!
//! Errors raised while building the engine. Validation itself never fails:
//! every verdict is returned as data in a [`ValidationResult`].
//!
//! [`ValidationResult`]: crate::validation::ValidationResult

use thiserror::Error;

/// Errors that can occur while loading anti-cheat configuration.
#[derive(Error, Debug)]
pub enum AntiCheatError {
    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for the expected schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A game config has inconsistent bounds.
    #[error("invalid config for game '{game_id}': {reason}")]
    InvalidConfig {
        /// The offending game.
        game_id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Rate limit policy is unusable.
    #[error("invalid rate limits: {0}")]
    InvalidRateLimits(String),

    /// The same game identifier was registered twice.
    #[error("duplicate game config: {0}")]
    DuplicateGame(String),
}

/// Result type for anti-cheat configuration operations.
pub type AntiCheatResult<T> = Result<T, AntiCheatError>;
