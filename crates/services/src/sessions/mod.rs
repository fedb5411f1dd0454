//! Session building, the in-session state machine, and rewards.

pub mod plan;
pub mod progress;
pub mod rewards;
pub mod runner;
pub mod workflow;

pub use plan::{QueueBuilder, QueuePlan};
pub use progress::SessionProgress;
pub use rewards::{Animal, Congratulation, Reward, RewardCatalog, RewardPicker};
pub use runner::{AnswerOutcome, SessionPhase, SessionRunner};
pub use workflow::{AnswerReport, PracticeService, SessionCompletion, SessionStart};
