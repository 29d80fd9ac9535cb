//! # Submission Validation
//!
//! Server-side plausibility checks for reward-bearing score submissions.
//!
//! ## Philosophy
//!
//! NEVER trust the client. The client says "I scored X in Y seconds".
//! We verify:
//! 1. Is the score possible in this game? ([`score`])
//! 2. Is the play time possible, and does it match the session? ([`timing`])
//! 3. Is this player submitting faster than a human plays? ([`rate`])
//!
//! Each check produces a [`ValidationResult`]. [`validate_submission`] runs all
//! three and merges them: errors and warnings are concatenated in
//! score, timing, rate order and confidence is the minimum of the three.
//! One suspicious signal is never outweighed by two clean ones.

pub mod rate;
pub mod score;
pub mod timing;

use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::clock::EpochMillis;
use crate::registry::GameRegistry;
use crate::submission::GameSubmissionData;

pub use rate::{remaining_quota, validate_rate, RateLimitConfig, RemainingQuota};
pub use score::validate_score;
pub use timing::validate_timing;

/// A hard failure. The reward must not be credited.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SubmissionError {
    /// Game is not in the registry.
    #[error("Unknown game: {0}")]
    UnknownGame(String),

    /// Score under the game's floor.
    #[error("Score {score} is below minimum {min}")]
    ScoreBelowMinimum {
        /// Claimed score.
        score: i64,
        /// Game minimum.
        min: i64,
    },

    /// Score over the game's ceiling.
    #[error("Score {score} exceeds maximum {max}")]
    ScoreAboveMaximum {
        /// Claimed score.
        score: i64,
        /// Game maximum.
        max: i64,
    },

    /// Streak counters never go negative.
    #[error("Streak cannot be negative: {0}")]
    NegativeStreak(i64),

    /// Streak over the game's ceiling.
    #[error("Streak {streak} exceeds maximum {max}")]
    StreakAboveMaximum {
        /// Claimed streak.
        streak: i64,
        /// Game maximum.
        max: i64,
    },

    /// Jump from no score straight to near-maximum.
    #[error("Suspicious score progression: 0 to {0}")]
    SuspiciousProgression(i64),

    /// Points scored faster than the game allows.
    #[error("Score rate {rate:.1} per minute exceeds maximum {max}")]
    ScoreRateAboveMaximum {
        /// Observed points per minute.
        rate: f64,
        /// Game maximum points per minute.
        max: i64,
    },

    /// Durations never go negative.
    #[error("Duration cannot be negative: {0}ms")]
    NegativeDuration(i64),

    /// Session shorter than the game can be played.
    #[error("Duration {duration_ms}ms is below minimum {min_ms}ms")]
    DurationBelowMinimum {
        /// Claimed duration.
        duration_ms: i64,
        /// Game minimum.
        min_ms: i64,
    },

    /// Session longer than the game allows.
    #[error("Duration {duration_ms}ms exceeds maximum {max_ms}ms")]
    DurationAboveMaximum {
        /// Claimed duration.
        duration_ms: i64,
        /// Game maximum.
        max_ms: i64,
    },

    /// Session claims to start after "now".
    #[error("Session start time is in the future")]
    SessionInFuture,

    /// Session started too long ago to trust.
    #[error("Session is older than 24 hours")]
    SessionExpired,

    /// Scored play under one second.
    #[error("Submission impossibly fast: {0}ms")]
    ImpossiblyFast(i64),

    /// Per-minute window is full.
    #[error("Too many submissions in last minute ({count}/{max})")]
    MinuteLimitExceeded {
        /// Submissions in the window.
        count: u32,
        /// Allowed per window.
        max: u32,
    },

    /// Per-hour window is full.
    #[error("Too many submissions in last hour ({count}/{max})")]
    HourLimitExceeded {
        /// Submissions in the window.
        count: u32,
        /// Allowed per window.
        max: u32,
    },

    /// Last submission was too recent.
    #[error("Cooldown period not met: wait {remaining_ms}ms")]
    CooldownNotMet {
        /// Time left until the next submission is allowed.
        remaining_ms: i64,
    },
}

/// A soft failure. Accepted, but confidence drops.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum SubmissionWarning {
    /// Near-max streak on a low score.
    #[error("High streak with low score is unusual")]
    HighStreakLowScore,

    /// Score rose by more than half the game maximum.
    #[error("Large score jump: {from} to {to}")]
    LargeScoreJump {
        /// Previous score.
        from: i64,
        /// Claimed score.
        to: i64,
    },

    /// Session age and claimed duration disagree.
    #[error("Session timing mismatch: session age {session_age_ms}ms vs duration {duration_ms}ms")]
    SessionTimingMismatch {
        /// `now - session_start`.
        session_age_ms: i64,
        /// Claimed duration.
        duration_ms: i64,
    },

    /// Nothing to rate-limit against.
    #[error("No submission history available")]
    NoHistory,
}

impl Serialize for SubmissionError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Serialize for SubmissionWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Verdict of one validator, or of all of them merged.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True iff `errors` is empty.
    pub valid: bool,
    /// Hard failures, in the order they were detected.
    pub errors: Vec<SubmissionError>,
    /// Soft failures.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<SubmissionWarning>,
    /// How legitimate the submission looks (0.0 - 1.0).
    ///
    /// `None` means the validator had nothing to judge confidence on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl ValidationResult {
    /// Builds a verdict from findings.
    ///
    /// Confidence is `0.0` with any error, `warned_confidence` with only
    /// warnings, `1.0` when clean.
    #[must_use]
    pub fn from_findings(
        errors: Vec<SubmissionError>,
        warnings: Vec<SubmissionWarning>,
        warned_confidence: f32,
    ) -> Self {
        let confidence = if !errors.is_empty() {
            0.0
        } else if !warnings.is_empty() {
            warned_confidence
        } else {
            1.0
        };

        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            confidence: Some(confidence),
        }
    }

    /// Verdict for a game that is not registered.
    #[must_use]
    pub fn unknown_game(game_id: &str) -> Self {
        Self::from_findings(
            vec![SubmissionError::UnknownGame(game_id.to_string())],
            Vec::new(),
            0.0,
        )
    }

    /// Merges independent verdicts.
    ///
    /// Missing confidence counts as `1.0`.
    #[must_use]
    pub fn merge(parts: impl IntoIterator<Item = Self>) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut confidence = 1.0_f32;

        for part in parts {
            confidence = confidence.min(part.confidence());
            errors.extend(part.errors);
            warnings.extend(part.warnings);
        }

        if !errors.is_empty() {
            confidence = 0.0;
        }

        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
            confidence: Some(confidence.clamp(0.0, 1.0)),
        }
    }

    /// Reported confidence, `1.0` if none was reported.
    #[must_use]
    pub fn confidence(&self) -> f32 {
        self.confidence.unwrap_or(1.0)
    }

    /// Error messages as shown to operators.
    #[must_use]
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Warning messages as shown to operators.
    #[must_use]
    pub fn warning_messages(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }

    /// Returns true if any error message contains `needle`.
    #[must_use]
    pub fn has_error(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.to_string().contains(needle))
    }

    /// Returns true if any warning message contains `needle`.
    #[must_use]
    pub fn has_warning(&self, needle: &str) -> bool {
        self.warnings.iter().any(|w| w.to_string().contains(needle))
    }
}

/// Runs every validator against one submission and merges the verdicts.
#[must_use]
pub fn validate_submission(
    data: &GameSubmissionData,
    registry: &GameRegistry,
    rate_limits: &RateLimitConfig,
    now_ms: EpochMillis,
) -> ValidationResult {
    let score = validate_score(data, registry);
    let timing = validate_timing(data, registry, now_ms);
    let rate = validate_rate(data, rate_limits, now_ms);

    tracing::debug!(
        game = %data.game_id,
        score_ok = score.valid,
        timing_ok = timing.valid,
        rate_ok = rate.valid,
        "submission checks complete"
    );

    let result = ValidationResult::merge([score, timing, rate]);

    if !result.valid {
        tracing::warn!(
            game = %data.game_id,
            user = %data.user_id,
            errors = result.errors.len(),
            "submission rejected"
        );
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_findings_confidence() {
        let clean = ValidationResult::from_findings(Vec::new(), Vec::new(), 0.7);
        assert!(clean.valid);
        assert_eq!(clean.confidence, Some(1.0));

        let warned =
            ValidationResult::from_findings(Vec::new(), vec![SubmissionWarning::NoHistory], 0.7);
        assert!(warned.valid);
        assert_eq!(warned.confidence, Some(0.7));

        let failed = ValidationResult::from_findings(
            vec![SubmissionError::SessionInFuture],
            vec![SubmissionWarning::NoHistory],
            0.7,
        );
        assert!(!failed.valid);
        assert_eq!(failed.confidence, Some(0.0));
    }

    #[test]
    fn test_merge_takes_minimum() {
        let a = ValidationResult::from_findings(Vec::new(), Vec::new(), 0.7);
        let b = ValidationResult::from_findings(
            Vec::new(),
            vec![SubmissionWarning::HighStreakLowScore],
            0.7,
        );
        let c = ValidationResult::from_findings(
            Vec::new(),
            vec![SubmissionWarning::NoHistory],
            0.8,
        );

        let merged = ValidationResult::merge([a, b, c]);
        assert!(merged.valid);
        assert_eq!(merged.confidence, Some(0.7));
        assert_eq!(
            merged.warnings,
            vec![
                SubmissionWarning::HighStreakLowScore,
                SubmissionWarning::NoHistory
            ]
        );
    }

    #[test]
    fn test_merge_missing_confidence_is_neutral() {
        let unset = ValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: vec![SubmissionWarning::NoHistory],
            confidence: None,
        };
        let clean = ValidationResult::from_findings(Vec::new(), Vec::new(), 0.7);

        let merged = ValidationResult::merge([clean, unset]);
        assert_eq!(merged.confidence, Some(1.0));
        assert_eq!(merged.warnings.len(), 1);
    }

    #[test]
    fn test_merge_preserves_error_order() {
        let first = ValidationResult::unknown_game("x");
        let second = ValidationResult::from_findings(vec![SubmissionError::SessionExpired], Vec::new(), 0.75);

        let merged = ValidationResult::merge([first, second]);
        assert!(!merged.valid);
        assert_eq!(merged.confidence, Some(0.0));
        assert_eq!(
            merged.error_messages(),
            vec!["Unknown game: x".to_string(), "Session is older than 24 hours".to_string()]
        );
    }

    #[test]
    fn test_error_messages() {
        let err = SubmissionError::ScoreAboveMaximum { score: 1001, max: 1000 };
        assert_eq!(err.to_string(), "Score 1001 exceeds maximum 1000");

        let err = SubmissionError::ScoreRateAboveMaximum { rate: 1500.0, max: 1000 };
        assert_eq!(err.to_string(), "Score rate 1500.0 per minute exceeds maximum 1000");
    }

    const NOW: EpochMillis = 1_700_000_000_000;

    fn recent_history() -> Vec<crate::submission::SubmissionRecord> {
        vec![crate::submission::SubmissionRecord::new(NOW - 120_000, "regex-rush", 300)]
    }

    #[test]
    fn test_rejected_result_serializes_messages() {
        let data = GameSubmissionData::new("regex-rush", "u", 1500, 60_000)
            .with_history(recent_history());
        let result =
            validate_submission(&data, &GameRegistry::builtin(), &RateLimitConfig::default(), NOW);

        let encoded = toml::to_string(&result).unwrap();
        assert!(encoded.contains("valid = false"), "{encoded}");
        assert!(encoded.contains("\"Score 1500 exceeds maximum 1000\""), "{encoded}");
        assert!(
            encoded.contains("\"Score rate 1500.0 per minute exceeds maximum 1000\""),
            "{encoded}"
        );
        assert!(encoded.contains("confidence = 0.0"), "{encoded}");
        assert!(!encoded.contains("warnings"), "{encoded}");
    }

    #[test]
    fn test_clean_result_omits_warnings() {
        let data = GameSubmissionData::new("regex-rush", "u", 500, 60_000)
            .with_history(recent_history());
        let result =
            validate_submission(&data, &GameRegistry::builtin(), &RateLimitConfig::default(), NOW);

        let encoded = toml::to_string(&result).unwrap();
        assert!(encoded.contains("valid = true"), "{encoded}");
        assert!(encoded.contains("errors = []"), "{encoded}");
        assert!(encoded.contains("confidence = 1.0"), "{encoded}");
        assert!(!encoded.contains("warnings"), "{encoded}");
    }

    #[test]
    fn test_unset_confidence_is_omitted() {
        let data = GameSubmissionData::new("regex-rush", "u", 500, 60_000);
        let result = validate_rate(&data, &RateLimitConfig::default(), NOW);

        let encoded = toml::to_string(&result).unwrap();
        assert!(encoded.contains("\"No submission history available\""), "{encoded}");
        assert!(encoded.contains("warnings"), "{encoded}");
        assert!(!encoded.contains("confidence"), "{encoded}");
    }

    #[test]
    fn test_remaining_quota_uses_camel_case_keys() {
        let quota = remaining_quota(&recent_history(), &RateLimitConfig::default(), NOW);

        let encoded = toml::to_string(&quota).unwrap();
        assert!(encoded.contains("remainingPerMinute = 6"), "{encoded}");
        assert!(encoded.contains("remainingPerHour = 99"), "{encoded}");
        assert!(encoded.contains("cooldownRemainingMs = 0"), "{encoded}");
    }
}
