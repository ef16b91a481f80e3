use thiserror::Error;

use crate::ActorId;

/// A piece of per-tick simulator state was missing or unusable.
///
/// Snapshot errors are local: the leaf that hit one holds its previous
/// progress for the tick and the scenario keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("actor {0} is missing from the snapshot")]
    MissingActor(ActorId),

    #[error("no lane state reported for actor {0}")]
    MissingLaneState(ActorId),

    #[error("no traffic light state reported for actor {0}")]
    MissingTrafficLight(ActorId),

    #[error("malformed snapshot: {0}")]
    Malformed(String),
}
