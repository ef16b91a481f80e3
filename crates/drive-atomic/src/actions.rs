use std::borrow::Cow;

use drive_bt::{Behaviour, Status};
use drive_core::{ActorId, Location, Route, SnapshotError, TickContext, Transform, Vector3, WorldMut};

/// Gives `actor` an instantaneous velocity, releasing scripted traffic.
///
/// The write happens on the first tick the actor is present in the snapshot,
/// and the leaf succeeds on that same tick.
pub struct SetVelocity {
    name: Cow<'static, str>,
    actor: ActorId,
    velocity: Vector3,
}

impl SetVelocity {
    pub fn new(actor: ActorId, velocity: Vector3) -> Self {
        Self {
            name: Cow::Borrowed("SetVelocity"),
            actor,
            velocity,
        }
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<W> Behaviour<W> for SetVelocity
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, _ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        if !world.is_alive(self.actor)? {
            return Err(SnapshotError::MissingActor(self.actor));
        }
        world.set_velocity(self.actor, self.velocity);
        Ok(Status::Success)
    }
}

/// Fires the display side-effects for a scenario: route line, target
/// marker and camera pose.
pub struct ShowScenario {
    route: Route,
    target: Option<(Location, f64)>,
    camera: Option<Transform>,
}

impl ShowScenario {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            target: None,
            camera: None,
        }
    }

    pub fn with_target(mut self, location: Location, radius: f64) -> Self {
        self.target = Some((location, radius));
        self
    }

    pub fn with_camera(mut self, pose: Option<Transform>) -> Self {
        self.camera = pose;
        self
    }
}

impl<W> Behaviour<W> for ShowScenario
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        "ShowScenario"
    }

    fn update(&mut self, _ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        if !self.route.is_empty() {
            world.draw_route(&self.route);
        }
        if let Some((location, radius)) = self.target {
            world.draw_marker(location, radius);
        }
        if let Some(pose) = self.camera {
            world.set_camera(pose);
        }
        Ok(Status::Success)
    }
}
