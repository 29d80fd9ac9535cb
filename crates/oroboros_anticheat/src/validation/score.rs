//! # Score Validation
//!
//! Score, streak and progression bounds against the game's config.

use crate::registry::GameRegistry;
use crate::submission::GameSubmissionData;

use super::{SubmissionError, SubmissionWarning, ValidationResult};

/// Confidence reported when only warnings were raised.
pub const WARNED_CONFIDENCE: f32 = 0.7;

/// A first score above this share of the maximum is rejected.
const FIRST_SCORE_CEILING: f64 = 0.9;

/// Slack on the scoring rate for timer rounding on the client.
const SCORE_RATE_SLACK: f64 = 1.1;

/// Streak share considered "high".
const HIGH_STREAK_RATIO: f64 = 0.8;

/// Score share considered "low".
const LOW_SCORE_RATIO: f64 = 0.3;

/// Improvement share that warrants a second look.
const LARGE_JUMP_RATIO: f64 = 0.5;

/// Checks the claimed score and streak.
///
/// An unknown game short-circuits with a single error. Otherwise every
/// check runs, so several errors can be reported at once.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn validate_score(data: &GameSubmissionData, registry: &GameRegistry) -> ValidationResult {
    let Some(config) = registry.get(&data.game_id) else {
        return ValidationResult::unknown_game(&data.game_id);
    };

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let score = data.score;
    let max_score = config.max_score as f64;

    if score < config.min_score {
        errors.push(SubmissionError::ScoreBelowMinimum {
            score,
            min: config.min_score,
        });
    }

    if score > config.max_score {
        errors.push(SubmissionError::ScoreAboveMaximum {
            score,
            max: config.max_score,
        });
    }

    if let Some(streak) = data.streak {
        if streak < 0 {
            errors.push(SubmissionError::NegativeStreak(streak));
        }
        if streak > config.max_streak {
            errors.push(SubmissionError::StreakAboveMaximum {
                streak,
                max: config.max_streak,
            });
        }
    }

    // New players do not open at near-max
    if data.previous_score == Some(0) && score as f64 > max_score * FIRST_SCORE_CEILING {
        errors.push(SubmissionError::SuspiciousProgression(score));
    }

    // Zero duration with a positive score is +inf and trips; zero score is NaN and never does
    let minutes = data.duration_ms as f64 / 60_000.0;
    let score_per_minute = score as f64 / minutes;
    if score_per_minute > config.max_score_per_minute as f64 * SCORE_RATE_SLACK {
        errors.push(SubmissionError::ScoreRateAboveMaximum {
            rate: score_per_minute,
            max: config.max_score_per_minute,
        });
    }

    if let Some(streak) = data.streak {
        if streak as f64 > config.max_streak as f64 * HIGH_STREAK_RATIO
            && (score as f64) < max_score * LOW_SCORE_RATIO
        {
            warnings.push(SubmissionWarning::HighStreakLowScore);
        }
    }

    if let Some(previous) = data.previous_score {
        if score.saturating_sub(previous) as f64 > max_score * LARGE_JUMP_RATIO {
            warnings.push(SubmissionWarning::LargeScoreJump {
                from: previous,
                to: score,
            });
        }
    }

    ValidationResult::from_findings(errors, warnings, WARNED_CONFIDENCE)
}
