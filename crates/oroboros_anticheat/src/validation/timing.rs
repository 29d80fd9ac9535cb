//! # Timing Validation
//!
//! Play-time plausibility: per-game duration bounds, a game-independent
//! floor for scored play, and a cross-check of the claimed duration against
//! the claimed session start.

use crate::clock::EpochMillis;
use crate::registry::GameRegistry;
use crate::submission::GameSubmissionData;

use super::{SubmissionError, SubmissionWarning, ValidationResult};

/// Confidence reported when only warnings were raised.
pub const WARNED_CONFIDENCE: f32 = 0.75;

/// Allowed disagreement between session age and claimed duration.
pub const SESSION_TOLERANCE_MS: i64 = 5_000;

/// Sessions older than this are not trusted.
pub const MAX_SESSION_AGE_MS: i64 = 24 * 60 * 60 * 1000;

/// No scored play is possible under this duration, whatever the game.
pub const MIN_SCORED_DURATION_MS: i64 = 1_000;

/// Checks the claimed duration and session start against `now_ms`.
#[must_use]
pub fn validate_timing(
    data: &GameSubmissionData,
    registry: &GameRegistry,
    now_ms: EpochMillis,
) -> ValidationResult {
    let Some(config) = registry.get(&data.game_id) else {
        return ValidationResult::unknown_game(&data.game_id);
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let duration_ms = data.duration_ms;

    if duration_ms < 0 {
        errors.push(SubmissionError::NegativeDuration(duration_ms));
    }

    if duration_ms < config.min_duration_ms {
        errors.push(SubmissionError::DurationBelowMinimum {
            duration_ms,
            min_ms: config.min_duration_ms,
        });
    }

    if duration_ms > config.max_duration_ms {
        errors.push(SubmissionError::DurationAboveMaximum {
            duration_ms,
            max_ms: config.max_duration_ms,
        });
    }

    if let Some(started_at) = data.session_start_time {
        if started_at > now_ms {
            errors.push(SubmissionError::SessionInFuture);
        }

        let session_age_ms = now_ms.saturating_sub(started_at);
        if session_age_ms.saturating_sub(duration_ms).saturating_abs() > SESSION_TOLERANCE_MS {
            warnings.push(SubmissionWarning::SessionTimingMismatch {
                session_age_ms,
                duration_ms,
            });
        }

        if session_age_ms > MAX_SESSION_AGE_MS {
            errors.push(SubmissionError::SessionExpired);
        }
    }

    if duration_ms < MIN_SCORED_DURATION_MS && data.score > 0 {
        errors.push(SubmissionError::ImpossiblyFast(duration_ms));
    }

    ValidationResult::from_findings(errors, warnings, WARNED_CONFIDENCE)
}
