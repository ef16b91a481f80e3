use serde::{Deserialize, Serialize};

use crate::{ActorId, Location, Route, SnapshotError, Transform, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    /// The actor that was hit, when the simulator could identify it.
    #[serde(default)]
    pub other: Option<ActorId>,
    #[serde(default)]
    pub intensity: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneState {
    /// Driving on the opposite side of the centre line.
    #[serde(default)]
    pub wrong_lane: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    #[default]
    Off,
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficLightState {
    #[serde(default)]
    pub signal: Signal,
    /// The actor crossed the stop line of the light governing its lane this tick.
    #[serde(default)]
    pub crossed_stop_line: bool,
}

impl TrafficLightState {
    pub fn is_violation(&self) -> bool {
        self.signal == Signal::Red && self.crossed_stop_line
    }
}

/// Read-only view of one simulator tick.
///
/// The simulator writes the snapshot and the evaluator reads it; the two never
/// interleave within a tick.
pub trait WorldView {
    fn transform(&self, actor: ActorId) -> Result<Transform, SnapshotError>;

    fn velocity(&self, actor: ActorId) -> Result<Vector3, SnapshotError>;

    /// Collisions the actor was involved in during this tick.
    fn collisions(&self, actor: ActorId) -> Result<&[CollisionEvent], SnapshotError>;

    fn lane_state(&self, actor: ActorId) -> Result<LaneState, SnapshotError>;

    fn traffic_light(&self, actor: ActorId) -> Result<TrafficLightState, SnapshotError>;

    /// `Ok(false)` only for an actor the stream reports as destroyed; an
    /// actor absent from the tick is a snapshot error.
    fn is_alive(&self, actor: ActorId) -> Result<bool, SnapshotError>;

    fn location(&self, actor: ActorId) -> Result<Location, SnapshotError> {
        Ok(self.transform(actor)?.location)
    }
}

/// Effect sink for action leaves.
///
/// Display calls are fire-and-forget; a world without a display ignores them.
pub trait WorldMut: WorldView {
    fn set_velocity(&mut self, actor: ActorId, velocity: Vector3);

    fn draw_route(&mut self, _route: &Route) {}

    fn draw_marker(&mut self, _location: Location, _radius: f64) {}

    fn set_camera(&mut self, _pose: Transform) {}
}
