//! # drive-score
//!
//! Reduces the reports of a finished (or interrupted) criteria tree to a
//! single score, and keeps an append-only record of past runs.
//!
//! ```text
//! CriterionReport* ──► Breakdown ──► ScoreReducer ──► ScoreRecord ──► ScoreStore
//! ```
//!
//! Reducers are pure: the same reports and run summary always give the same
//! record. Wall-clock time only appears in [`StoredScore::recorded_at`].

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod record;
pub mod reducer;
pub mod store;

pub use config::ScoringConfig;
pub use error::StoreError;
pub use record::{AbortReason, Breakdown, Outcome, ReducerKind, ScoreRecord};
pub use reducer::{reducer_for, ComputeScore, CountScore, ScoreInput, ScoreReducer};
pub use store::{ScoreStore, StoredScore};
