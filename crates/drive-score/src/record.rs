use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a run ended without reaching a verdict of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// A `terminate_on_failure` criterion failed.
    CriterionFailed(String),
    /// The ego vehicle disappeared from the world.
    EgoDestroyed,
    /// The snapshot stream ended before the run finished.
    Disconnected,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::CriterionFailed(name) => write!(f, "criterion {name} failed"),
            AbortReason::EgoDestroyed => f.write_str("ego destroyed"),
            AbortReason::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// Terminal state of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
    TimedOut,
    Aborted(AbortReason),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => f.write_str("success"),
            Outcome::Failure => f.write_str("failure"),
            Outcome::TimedOut => f.write_str("timed out"),
            Outcome::Aborted(reason) => write!(f, "aborted ({reason})"),
        }
    }
}

/// Which reducer produced a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducerKind {
    #[default]
    Count,
    Compute,
}

impl fmt::Display for ReducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReducerKind::Count => f.write_str("count"),
            ReducerKind::Compute => f.write_str("compute"),
        }
    }
}

/// Violation counts and progress extracted from the criterion reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub collisions: u32,
    pub wrong_lane: u32,
    pub off_track: u32,
    pub red_light: u32,
    /// Percentage of the route driven, 0..=100.
    pub route_completion: f64,
    pub target_reached: bool,
}

/// One scored run. Created once when the run ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: u64,
    pub scenario: String,
    pub reducer: ReducerKind,
    pub final_score: f64,
    pub outcome: Outcome,
    pub ticks: u64,
    pub elapsed_seconds: f64,
    pub breakdown: Breakdown,
    /// Raw measurement of every criterion, keyed by criterion name.
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,
}
