use serde::{Deserialize, Serialize};

use crate::{
    ActorId, ActorRole, ActorRoster, CollisionEvent, LaneState, Location, Route, SnapshotError,
    TrafficLightState, Transform, Vector3, WorldMut, WorldView,
};

/// State of one actor as reported by the simulator for a single tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    pub id: ActorId,
    #[serde(default)]
    pub role: ActorRole,
    pub transform: Transform,
    #[serde(default)]
    pub velocity: Vector3,
    #[serde(default = "default_alive")]
    pub alive: bool,
    #[serde(default)]
    pub collisions: Vec<CollisionEvent>,
    #[serde(default)]
    pub lane: Option<LaneState>,
    #[serde(default)]
    pub traffic_light: Option<TrafficLightState>,
}

fn default_alive() -> bool {
    true
}

impl ActorState {
    pub fn new(id: ActorId, role: ActorRole, location: Location) -> Self {
        Self {
            id,
            role,
            transform: Transform::at(location),
            velocity: Vector3::ZERO,
            alive: true,
            collisions: Vec::new(),
            lane: None,
            traffic_light: None,
        }
    }
}

/// Effects requested by action leaves, recorded in tick order.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldCommand {
    SetVelocity { actor: ActorId, velocity: Vector3 },
    DrawRoute { waypoints: usize },
    DrawMarker { location: Location, radius: f64 },
    SetCamera { pose: Transform },
}

/// A recorded simulator tick.
///
/// This is the world used when replaying a recorded stream and in tests.
/// Mutations are not applied to the state; they are recorded as
/// [`WorldCommand`]s for the simulator side to execute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tick: u64,
    #[serde(default)]
    pub actors: Vec<ActorState>,
    #[serde(skip)]
    commands: Vec<WorldCommand>,
}

impl Snapshot {
    pub fn new(tick: u64, actors: Vec<ActorState>) -> Self {
        Self {
            tick,
            actors,
            commands: Vec::new(),
        }
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.iter().find(|a| a.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.iter_mut().find(|a| a.id == id)
    }

    /// Ego first, then every other actor in the order the snapshot lists them.
    pub fn roster(&self) -> Option<ActorRoster> {
        let ego = self.actors.iter().find(|a| a.role == ActorRole::Ego)?.id;
        let others = self
            .actors
            .iter()
            .filter(|a| a.id != ego)
            .map(|a| a.id)
            .collect();
        Some(ActorRoster::new(ego, others))
    }

    pub fn commands(&self) -> &[WorldCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<WorldCommand> {
        std::mem::take(&mut self.commands)
    }

    fn state(&self, actor: ActorId) -> Result<&ActorState, SnapshotError> {
        self.actor(actor).ok_or(SnapshotError::MissingActor(actor))
    }
}

impl WorldView for Snapshot {
    fn transform(&self, actor: ActorId) -> Result<Transform, SnapshotError> {
        Ok(self.state(actor)?.transform)
    }

    fn velocity(&self, actor: ActorId) -> Result<Vector3, SnapshotError> {
        Ok(self.state(actor)?.velocity)
    }

    fn collisions(&self, actor: ActorId) -> Result<&[CollisionEvent], SnapshotError> {
        Ok(&self.state(actor)?.collisions)
    }

    fn lane_state(&self, actor: ActorId) -> Result<LaneState, SnapshotError> {
        self.state(actor)?
            .lane
            .ok_or(SnapshotError::MissingLaneState(actor))
    }

    fn traffic_light(&self, actor: ActorId) -> Result<TrafficLightState, SnapshotError> {
        self.state(actor)?
            .traffic_light
            .ok_or(SnapshotError::MissingTrafficLight(actor))
    }

    fn is_alive(&self, actor: ActorId) -> Result<bool, SnapshotError> {
        Ok(self.state(actor)?.alive)
    }
}

impl WorldMut for Snapshot {
    fn set_velocity(&mut self, actor: ActorId, velocity: Vector3) {
        self.commands
            .push(WorldCommand::SetVelocity { actor, velocity });
    }

    fn draw_route(&mut self, route: &Route) {
        self.commands.push(WorldCommand::DrawRoute {
            waypoints: route.len(),
        });
    }

    fn draw_marker(&mut self, location: Location, radius: f64) {
        self.commands
            .push(WorldCommand::DrawMarker { location, radius });
    }

    fn set_camera(&mut self, pose: Transform) {
        self.commands.push(WorldCommand::SetCamera { pose });
    }
}
