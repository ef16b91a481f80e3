use core::fmt;

use drive_core::{SnapshotError, TickContext, WorldMut};
use serde::{Deserialize, Serialize};

use crate::Measurement;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Not ticked since construction or the last reset.
    #[default]
    Invalid,
    Running,
    Success,
    Failure,
}

impl Status {
    pub fn is_running(self) -> bool {
        self == Status::Running
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Success | Status::Failure)
    }

    pub(crate) fn tag(self) -> &'static str {
        match self {
            Status::Invalid => "invalid",
            Status::Running => "running",
            Status::Success => "success",
            Status::Failure => "failure",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Invalid => "Invalid",
            Status::Running => "Running",
            Status::Success => "Success",
            Status::Failure => "Failure",
        };
        f.write_str(s)
    }
}

/// A leaf: one condition, action or criterion.
///
/// `update` is called at most once per tick and never again after the leaf
/// has reported a terminal status, until `reset`. Conditions and criteria only
/// read the world; action leaves may write to it.
pub trait Behaviour<W>: 'static
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str;

    /// Advance one tick. A [`SnapshotError`] holds the leaf in `Running` for
    /// this tick without failing the scenario.
    fn update(&mut self, ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError>;

    fn reset(&mut self) {}

    /// When set, a `Failure` of this leaf aborts the whole tree.
    fn terminate_on_failure(&self) -> bool {
        false
    }

    /// Accumulated measurement, for leaves that act as scoring criteria.
    fn measurement(&self) -> Option<Measurement> {
        None
    }
}
