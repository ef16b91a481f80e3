use std::borrow::Cow;

use drive_bt::{Behaviour, Status};
use drive_core::{ActorId, Location, SnapshotError, TickContext, Vec2, WorldMut};

use crate::DEFAULT_COLLISION_TOLERANCE;

/// Succeeds once `actor` is closer than `distance` to `reference`.
///
/// Never fails; keeps running while the actors are apart.
pub struct InTriggerDistanceToVehicle {
    name: Cow<'static, str>,
    actor: ActorId,
    reference: ActorId,
    distance: f64,
}

impl InTriggerDistanceToVehicle {
    pub fn new(actor: ActorId, reference: ActorId, distance: f64) -> Self {
        Self {
            name: Cow::Borrowed("InTriggerDistanceToVehicle"),
            actor,
            reference,
            distance,
        }
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<W> Behaviour<W> for InTriggerDistanceToVehicle
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, _ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        let a = world.location(self.actor)?;
        let b = world.location(self.reference)?;
        if a.distance(b) < self.distance {
            Ok(Status::Success)
        } else {
            Ok(Status::Running)
        }
    }
}

/// Which way the monitored actor must be heading for a region trigger to fire.
///
/// A zero direction disables the filter. Non-strict filters accept any
/// heading that does not oppose the direction; strict filters require every
/// non-zero component of the direction to have the same sign in the velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionFilter {
    pub direction: Vec2,
    pub strict: bool,
}

impl DirectionFilter {
    pub const ANY: Self = Self {
        direction: Vec2::ZERO,
        strict: false,
    };

    pub fn new(direction: Vec2, strict: bool) -> Self {
        Self { direction, strict }
    }

    pub fn accepts(&self, velocity: Vec2) -> bool {
        let d = self.direction;
        if d.is_zero() {
            return true;
        }
        if !self.strict {
            return velocity.dot(d) >= 0.0;
        }
        same_sign(d.x, velocity.x) && same_sign(d.y, velocity.y)
    }
}

fn same_sign(expected: f64, actual: f64) -> bool {
    if expected == 0.0 {
        return true;
    }
    actual != 0.0 && expected.signum() == actual.signum()
}

/// Succeeds when `actor` enters the tolerance region around a literal point
/// while heading the way the filter allows.
pub struct TriggerCollision {
    name: Cow<'static, str>,
    actor: ActorId,
    point: Location,
    tolerance: f64,
    filter: DirectionFilter,
}

impl TriggerCollision {
    pub fn new(actor: ActorId, point: Location) -> Self {
        Self {
            name: Cow::Borrowed("TriggerCollision"),
            actor,
            point,
            tolerance: DEFAULT_COLLISION_TOLERANCE,
            filter: DirectionFilter::ANY,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_direction(mut self, direction: Vec2, strict: bool) -> Self {
        self.filter = DirectionFilter::new(direction, strict);
        self
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }
}

impl<W> Behaviour<W> for TriggerCollision
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, _ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        let here = world.location(self.actor)?;
        if here.distance_2d(self.point) > self.tolerance {
            return Ok(Status::Running);
        }
        if self.filter.direction.is_zero() {
            return Ok(Status::Success);
        }
        let heading = world.velocity(self.actor)?.planar();
        if self.filter.accepts(heading) {
            Ok(Status::Success)
        } else {
            Ok(Status::Running)
        }
    }
}
