//! # Submission Validator
//!
//! The entry point the reward API calls before crediting a balance.
//!
//! ## Usage
//!
//! ```rust,ignore
//! // On server startup
//! let validator = SubmissionValidator::from_config(AntiCheatConfig::load("data/games.toml")?);
//!
//! // For every reward claim
//! let verdict = validator.validate(&submission);
//! if verdict.valid {
//!     wallet.credit(user, reward * verdict.confidence());
//! }
//! ```
//!
//! The validator holds no mutable state and is `Send + Sync` whenever its
//! clock is. Persisting the accepted submission into the user's history is
//! the caller's job.

use crate::clock::{Clock, EpochMillis, SystemClock};
use crate::config::AntiCheatConfig;
use crate::error::AntiCheatResult;
use crate::registry::{builtin_registry, GameRegistry};
use crate::submission::{GameSubmissionData, SubmissionRecord};
use crate::validation::{
    remaining_quota, validate_submission, RateLimitConfig, RemainingQuota, ValidationResult,
};

/// Validates submissions against an injected registry, rate policy and clock.
#[derive(Clone, Debug)]
pub struct SubmissionValidator<C = SystemClock> {
    registry: GameRegistry,
    rate_limits: RateLimitConfig,
    clock: C,
}

impl SubmissionValidator<SystemClock> {
    /// Creates a validator for `registry` with default rate limits.
    #[must_use]
    pub fn new(registry: GameRegistry) -> Self {
        Self {
            registry,
            rate_limits: RateLimitConfig::default(),
            clock: SystemClock,
        }
    }

    /// Creates a validator for the built-in games.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(GameRegistry::builtin())
    }

    /// Creates a validator from loaded configuration.
    #[must_use]
    pub fn from_config(config: AntiCheatConfig) -> Self {
        Self {
            registry: config.registry,
            rate_limits: config.rate_limits,
            clock: SystemClock,
        }
    }
}

impl Default for SubmissionValidator<SystemClock> {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<C: Clock> SubmissionValidator<C> {
    /// Replaces the time source.
    #[must_use]
    pub fn with_clock<D: Clock>(self, clock: D) -> SubmissionValidator<D> {
        SubmissionValidator {
            registry: self.registry,
            rate_limits: self.rate_limits,
            clock,
        }
    }

    /// Replaces the rate policy.
    ///
    /// # Errors
    ///
    /// Returns [`AntiCheatError::InvalidRateLimits`] if the policy could never
    /// admit a submission.
    ///
    /// [`AntiCheatError::InvalidRateLimits`]: crate::error::AntiCheatError::InvalidRateLimits
    pub fn with_rate_limits(mut self, rate_limits: RateLimitConfig) -> AntiCheatResult<Self> {
        rate_limits.validate()?;
        self.rate_limits = rate_limits;
        Ok(self)
    }

    /// Game policy in use.
    #[must_use]
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Rate policy in use.
    #[must_use]
    pub fn rate_limits(&self) -> &RateLimitConfig {
        &self.rate_limits
    }

    /// Judges a submission as of the clock's current time.
    #[must_use]
    pub fn validate(&self, data: &GameSubmissionData) -> ValidationResult {
        self.validate_at(data, self.clock.now_ms())
    }

    /// Judges a submission as of `now_ms`.
    #[must_use]
    pub fn validate_at(&self, data: &GameSubmissionData, now_ms: EpochMillis) -> ValidationResult {
        validate_submission(data, &self.registry, &self.rate_limits, now_ms)
    }

    /// Remaining quota for a user's history as of the clock's current time.
    #[must_use]
    pub fn remaining_quota(&self, history: &[SubmissionRecord]) -> RemainingQuota {
        remaining_quota(history, &self.rate_limits, self.clock.now_ms())
    }
}

/// Validates against the built-in games, default rate limits and wall-clock time.
#[must_use]
pub fn validate_game_submission(data: &GameSubmissionData) -> ValidationResult {
    validate_submission(
        data,
        builtin_registry(),
        &RateLimitConfig::default(),
        SystemClock.now_ms(),
    )
}

/// Remaining quota as of wall-clock time. `None` uses the default rate limits.
#[must_use]
pub fn get_remaining_quota(
    history: &[SubmissionRecord],
    config: Option<&RateLimitConfig>,
) -> RemainingQuota {
    let default_limits = RateLimitConfig::default();
    remaining_quota(
        history,
        config.unwrap_or(&default_limits),
        SystemClock.now_ms(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::AntiCheatError;
    use crate::registry::GameConfig;

    const NOW: EpochMillis = 1_700_000_000_000;

    #[test]
    fn test_fixed_clock_drives_rate_checks() {
        let validator = SubmissionValidator::builtin().with_clock(FixedClock(NOW));
        let data = GameSubmissionData::new("regex-rush", "u", 500, 60_000)
            .with_history(vec![SubmissionRecord::new(NOW - 5_000, "regex-rush", 400)]);

        let result = validator.validate(&data);
        assert!(result.has_error("Cooldown period not met"));
        assert_eq!(result, validator.validate_at(&data, NOW));
    }

    #[test]
    fn test_custom_registry_and_limits() {
        let registry = GameRegistry::from_configs([GameConfig::new(
            "pong",
            (0, 21),
            (10_000, 600_000),
            21,
            60,
        )])
        .unwrap();
        let validator = SubmissionValidator::new(registry)
            .with_rate_limits(RateLimitConfig {
                max_per_minute: 1,
                max_per_hour: 10,
                cooldown_ms: 0,
            })
            .unwrap()
            .with_clock(FixedClock(NOW));

        let data = GameSubmissionData::new("pong", "u", 21, 120_000);
        assert!(validator.validate(&data).valid);

        let busy = data
            .clone()
            .with_history(vec![SubmissionRecord::new(NOW - 30_000, "pong", 3)]);
        assert!(validator.validate(&busy).has_error("last minute (1/1)"));

        let rush = GameSubmissionData::new("regex-rush", "u", 500, 60_000);
        assert!(validator.validate(&rush).has_error("Unknown game: regex-rush"));
    }

    #[test]
    fn test_unusable_rate_limits_rejected() {
        let zero_minute = RateLimitConfig {
            max_per_minute: 0,
            ..RateLimitConfig::default()
        };
        let err = SubmissionValidator::builtin()
            .with_rate_limits(zero_minute)
            .unwrap_err();
        assert!(matches!(err, AntiCheatError::InvalidRateLimits(_)));

        let negative_cooldown = RateLimitConfig {
            cooldown_ms: -1,
            ..RateLimitConfig::default()
        };
        assert!(SubmissionValidator::builtin()
            .with_rate_limits(negative_cooldown)
            .is_err());
    }

    #[test]
    fn test_validator_quota() {
        let validator = SubmissionValidator::builtin().with_clock(FixedClock(NOW));
        let quota = validator.remaining_quota(&[SubmissionRecord::new(NOW - 1_000, "x", 1)]);
        assert_eq!(quota.remaining_per_minute, 5);
        assert_eq!(quota.cooldown_remaining_ms, 9_000);
    }

    #[test]
    fn test_free_functions_use_builtin_policy() {
        let result = validate_game_submission(&GameSubmissionData::new("regex-rush", "u", 500, 60_000));
        assert!(result.valid);
        assert_eq!(result.confidence, Some(1.0));

        let quota = get_remaining_quota(&[], None);
        assert_eq!(quota.remaining_per_minute, 6);
        assert_eq!(quota.remaining_per_hour, 100);
    }

    #[test]
    fn test_validator_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SubmissionValidator>();
        assert_send_sync::<SubmissionValidator<FixedClock>>();
    }
}
