//! Shared error types for the services crate.

use thiserror::Error;

use shabda_core::model::SessionSummaryError;
use storage::kv::StorageError;

/// Errors emitted while building the reward catalog.
///
/// An empty catalog is a configuration mistake surfaced at startup;
/// picking never fails afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RewardConfigError {
    #[error("reward catalog has no animals")]
    NoAnimals,

    #[error("reward catalog has no images")]
    NoImages,

    #[error("reward catalog has no congratulation messages")]
    NoMessages,
}

/// Errors emitted by session services.
///
/// The state-transition variants (`Completed`, `RewardPending`,
/// `NoRewardPending`) are precondition violations, not recoverable
/// game states.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no words available for session")]
    Empty,

    #[error("session already completed")]
    Completed,

    #[error("a reward is pending and must be acknowledged first")]
    RewardPending,

    #[error("no reward is pending")]
    NoRewardPending,

    #[error(transparent)]
    Summary(#[from] SessionSummaryError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
