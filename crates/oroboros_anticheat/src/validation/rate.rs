//! # Rate Validation
//!
//! Sliding-window submission limits and a cooldown between submissions.
//!
//! The history comes from the caller on every call and may be in any order.
//! Windows are exclusive at the far edge: an entry exactly 60 000 ms old no
//! longer counts against the minute.

use serde::{Deserialize, Serialize};

use crate::clock::EpochMillis;
use crate::error::{AntiCheatError, AntiCheatResult};
use crate::submission::{GameSubmissionData, SubmissionRecord};

use super::{SubmissionError, SubmissionWarning, ValidationResult};

/// Confidence reported when only warnings were raised.
pub const WARNED_CONFIDENCE: f32 = 0.8;

/// Short window.
pub const MINUTE_WINDOW_MS: i64 = 60_000;

/// Long window.
pub const HOUR_WINDOW_MS: i64 = 3_600_000;

/// Global submission rate policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Submissions allowed per rolling minute.
    pub max_per_minute: u32,
    /// Submissions allowed per rolling hour.
    pub max_per_hour: u32,
    /// Minimum gap between two submissions (ms).
    pub cooldown_ms: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_minute: 6,
            max_per_hour: 100,
            cooldown_ms: 10_000,
        }
    }
}

impl RateLimitConfig {
    /// Checks the policy can ever admit a submission.
    ///
    /// # Errors
    ///
    /// Returns [`AntiCheatError::InvalidRateLimits`] on zero windows or a
    /// negative cooldown.
    pub fn validate(&self) -> AntiCheatResult<()> {
        if self.max_per_minute == 0 || self.max_per_hour == 0 {
            return Err(AntiCheatError::InvalidRateLimits(
                "window limits must be at least 1".to_string(),
            ));
        }
        if self.cooldown_ms < 0 {
            return Err(AntiCheatError::InvalidRateLimits(format!(
                "cooldown_ms {} is negative",
                self.cooldown_ms
            )));
        }
        Ok(())
    }
}

/// What a player may still submit right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemainingQuota {
    /// Submissions left in the current minute.
    pub remaining_per_minute: u32,
    /// Submissions left in the current hour.
    pub remaining_per_hour: u32,
    /// Time until the cooldown expires (0 if already expired).
    pub cooldown_remaining_ms: i64,
}

/// Window occupancy at one instant.
#[derive(Clone, Copy, Debug, Default)]
struct WindowCounts {
    last_minute: u32,
    last_hour: u32,
    latest: Option<EpochMillis>,
}

impl WindowCounts {
    fn measure(history: &[SubmissionRecord], now_ms: EpochMillis) -> Self {
        let minute_start = now_ms.saturating_sub(MINUTE_WINDOW_MS);
        let hour_start = now_ms.saturating_sub(HOUR_WINDOW_MS);

        let mut counts = Self::default();
        for record in history {
            if record.timestamp > minute_start {
                counts.last_minute = counts.last_minute.saturating_add(1);
            }
            if record.timestamp > hour_start {
                counts.last_hour = counts.last_hour.saturating_add(1);
            }
            counts.latest = counts.latest.max(Some(record.timestamp));
        }
        counts
    }

    /// Time until the cooldown expires; zero or negative once it has.
    fn cooldown_left(&self, cooldown_ms: i64, now_ms: EpochMillis) -> i64 {
        self.latest.map_or(0, |latest| {
            cooldown_ms.saturating_sub(now_ms.saturating_sub(latest))
        })
    }
}

/// Checks submission frequency for the submitting user.
///
/// With no history there is nothing to judge: the result is valid, carries a
/// [`SubmissionWarning::NoHistory`] warning and leaves confidence unset.
#[must_use]
pub fn validate_rate(
    data: &GameSubmissionData,
    config: &RateLimitConfig,
    now_ms: EpochMillis,
) -> ValidationResult {
    let history = &data.submission_history;
    if history.is_empty() {
        return ValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: vec![SubmissionWarning::NoHistory],
            confidence: None,
        };
    }

    let counts = WindowCounts::measure(history, now_ms);
    let mut errors = Vec::new();

    if counts.last_minute >= config.max_per_minute {
        errors.push(SubmissionError::MinuteLimitExceeded {
            count: counts.last_minute,
            max: config.max_per_minute,
        });
    }

    if counts.last_hour >= config.max_per_hour {
        errors.push(SubmissionError::HourLimitExceeded {
            count: counts.last_hour,
            max: config.max_per_hour,
        });
    }

    let cooldown_left = counts.cooldown_left(config.cooldown_ms, now_ms);
    if cooldown_left > 0 {
        errors.push(SubmissionError::CooldownNotMet {
            remaining_ms: cooldown_left,
        });
    }

    ValidationResult::from_findings(errors, Vec::new(), WARNED_CONFIDENCE)
}

/// Remaining quota for a history, without judging a submission.
#[must_use]
pub fn remaining_quota(
    history: &[SubmissionRecord],
    config: &RateLimitConfig,
    now_ms: EpochMillis,
) -> RemainingQuota {
    let counts = WindowCounts::measure(history, now_ms);

    RemainingQuota {
        remaining_per_minute: config.max_per_minute.saturating_sub(counts.last_minute),
        remaining_per_hour: config.max_per_hour.saturating_sub(counts.last_hour),
        cooldown_remaining_ms: counts.cooldown_left(config.cooldown_ms, now_ms).max(0),
    }
}
