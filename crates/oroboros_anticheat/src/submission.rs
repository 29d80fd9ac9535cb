//! # Submission Data
//!
//! What the reward API hands us: one claimed result plus the player's recent
//! submission activity. Field names follow the API's camelCase JSON so the
//! payload can be deserialized directly.

use serde::{Deserialize, Serialize};

use crate::clock::EpochMillis;

/// One prior submission by the same user (any game).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    /// When it was submitted.
    pub timestamp: EpochMillis,
    /// Which game it was for.
    pub game_id: String,
    /// Score that was submitted.
    pub score: i64,
}

impl SubmissionRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(timestamp: EpochMillis, game_id: impl Into<String>, score: i64) -> Self {
        Self {
            timestamp,
            game_id: game_id.into(),
            score,
        }
    }
}

/// A candidate submission to judge.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSubmissionData {
    /// Registry key of the game played.
    pub game_id: String,
    /// Submitting user.
    pub user_id: String,
    /// Claimed score.
    pub score: i64,
    /// Claimed combo streak, if the game has one.
    #[serde(default)]
    pub streak: Option<i64>,
    /// Claimed play time in milliseconds.
    #[serde(rename = "duration")]
    pub duration_ms: i64,
    /// When the client says the session started.
    #[serde(default)]
    pub session_start_time: Option<EpochMillis>,
    /// The user's previous score for this game.
    #[serde(default)]
    pub previous_score: Option<i64>,
    /// Recent submissions by this user, in any order.
    #[serde(default)]
    pub submission_history: Vec<SubmissionRecord>,
}

impl GameSubmissionData {
    /// Creates a submission with no optional metadata.
    #[must_use]
    pub fn new(
        game_id: impl Into<String>,
        user_id: impl Into<String>,
        score: i64,
        duration_ms: i64,
    ) -> Self {
        Self {
            game_id: game_id.into(),
            user_id: user_id.into(),
            score,
            duration_ms,
            ..Self::default()
        }
    }

    /// Sets the claimed streak.
    #[must_use]
    pub fn with_streak(mut self, streak: i64) -> Self {
        self.streak = Some(streak);
        self
    }

    /// Sets the claimed session start.
    #[must_use]
    pub fn with_session_start(mut self, started_at: EpochMillis) -> Self {
        self.session_start_time = Some(started_at);
        self
    }

    /// Sets the previous score.
    #[must_use]
    pub fn with_previous_score(mut self, previous: i64) -> Self {
        self.previous_score = Some(previous);
        self
    }

    /// Sets the recent submission history.
    #[must_use]
    pub fn with_history(mut self, history: Vec<SubmissionRecord>) -> Self {
        self.submission_history = history;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_api_payload() {
        let payload = r#"
            gameId = "regex-rush"
            userId = "player-7"
            score = 420
            duration = 90000
            streak = 12
            previousScore = 300

            [[submissionHistory]]
            timestamp = 1700000000000
            gameId = "byte-blitz"
            score = 10
        "#;

        let data: GameSubmissionData = toml::from_str(payload).unwrap();
        assert_eq!(data.game_id, "regex-rush");
        assert_eq!(data.duration_ms, 90_000);
        assert_eq!(data.streak, Some(12));
        assert_eq!(data.previous_score, Some(300));
        assert_eq!(data.session_start_time, None);
        assert_eq!(
            data.submission_history,
            vec![SubmissionRecord::new(1_700_000_000_000, "byte-blitz", 10)]
        );
    }

    #[test]
    fn test_builder() {
        let data = GameSubmissionData::new("regex-rush", "u1", 10, 60_000)
            .with_streak(3)
            .with_previous_score(5)
            .with_session_start(42);

        assert_eq!(data.streak, Some(3));
        assert_eq!(data.previous_score, Some(5));
        assert_eq!(data.session_start_time, Some(42));
        assert!(data.submission_history.is_empty());
    }
}
