//! Game services: session orchestration, rewards, and stats.
//!
//! Services sit between the domain model in `shabda-core` and the
//! stores in `storage`. They own the session lifecycle and leave
//! persistence details to the storage layer.

#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;
pub mod stats;

pub use error::{RewardConfigError, SessionError};
pub use sessions::{
    AnswerOutcome, AnswerReport, PracticeService, QueueBuilder, QueuePlan, Reward, RewardCatalog,
    SessionCompletion, SessionPhase, SessionProgress, SessionRunner, SessionStart,
};
pub use shabda_core::Clock;
pub use stats::{CandyProgress, StatsOverview, StatsService};
