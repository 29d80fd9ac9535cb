//! # OROBOROS Anti-Cheat - The Referee
//!
//! Server-side validation of reward-bearing score submissions.
//!
//! ## Features
//!
//! - **Score Bounds**: Per-game score, streak and progression limits
//! - **Timing Plausibility**: Duration bounds and session cross-checks
//! - **Rate Limiting**: Sliding minute/hour windows and a cooldown
//! - **Confidence**: Conservative merge, the weakest signal wins
//!
//! ## Architecture
//!
//! ```text
//! REWARD API                       ANTI-CHEAT
//!     │                                │
//!     │─── Submission + History ──────►│
//!     │                                ├──► Score  ──┐
//!     │                                ├──► Timing ──┤ GameRegistry
//!     │                                ├──► Rate   ──┘ RateLimitConfig
//!     │                                │
//!     │◄─── ValidationResult ─────────┤ min(confidence)
//!     │                                │
//!     ▼
//!  credit / hold / reject
//! ```
//!
//! Nothing here persists history or touches a balance. Every call is a pure
//! function of its input, the configuration and the injected clock.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod registry;
pub mod submission;
pub mod validation;

pub use clock::{Clock, EpochMillis, FixedClock, SystemClock};
pub use config::AntiCheatConfig;
pub use engine::{get_remaining_quota, validate_game_submission, SubmissionValidator};
pub use error::{AntiCheatError, AntiCheatResult};
pub use registry::{get_game_config, get_supported_games, GameConfig, GameRegistry};
pub use submission::{GameSubmissionData, SubmissionRecord};
pub use validation::{
    RateLimitConfig, RemainingQuota, SubmissionError, SubmissionWarning, ValidationResult,
};
