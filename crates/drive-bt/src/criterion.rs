use serde::{Deserialize, Serialize};

use crate::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    Collision,
    TargetRegion,
    InRoute,
    RouteCompletion,
    WrongLane,
    RedLight,
    Timeout,
}

/// What a criterion has accumulated so far.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub kind: CriterionKind,
    /// Kind-specific value: a count, metres, seconds or a percentage.
    pub value: f64,
    /// Number of discrete violations observed.
    pub violations: u32,
}

impl Measurement {
    pub fn new(kind: CriterionKind, value: f64, violations: u32) -> Self {
        Self {
            kind,
            value,
            violations,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionReport {
    pub name: String,
    pub kind: CriterionKind,
    pub status: Status,
    pub measurement: f64,
    pub violations: u32,
}
