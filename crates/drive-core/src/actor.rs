use core::fmt;

use serde::{Deserialize, Serialize};

/// Opaque handle to a simulated entity.
///
/// The simulator owns the actor; the evaluator only keeps the id and reads
/// the actor's state from each snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ActorId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Ego,
    #[default]
    Vehicle,
    Cyclist,
    Pedestrian,
}

/// The ego vehicle plus the scripted actors in spawn order.
///
/// Scenario descriptors refer to scripted actors by their index in `others`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorRoster {
    pub ego: ActorId,
    pub others: Vec<ActorId>,
}

impl ActorRoster {
    pub fn new(ego: ActorId, others: Vec<ActorId>) -> Self {
        Self { ego, others }
    }

    pub fn other(&self, index: usize) -> Option<ActorId> {
        self.others.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.others.is_empty()
    }
}
