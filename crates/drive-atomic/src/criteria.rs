//! Test criteria judging the ego's drive.
//!
//! Counting criteria (collisions, wrong lane, red lights) never resolve on
//! their own: they stay `Running` and accumulate, and only fail when built
//! with `terminate_on_failure`.

use std::borrow::Cow;

use drive_bt::{Behaviour, CriterionKind, Measurement, Status};
use drive_core::{ActorId, Location, Route, SnapshotError, TickContext, WorldMut};

pub struct CollisionTest {
    name: Cow<'static, str>,
    actor: ActorId,
    terminate_on_failure: bool,
    collisions: u32,
}

impl CollisionTest {
    pub fn new(actor: ActorId) -> Self {
        Self {
            name: Cow::Borrowed("CollisionTest"),
            actor,
            terminate_on_failure: false,
            collisions: 0,
        }
    }

    pub fn with_terminate_on_failure(mut self, terminate: bool) -> Self {
        self.terminate_on_failure = terminate;
        self
    }

    pub fn collisions(&self) -> u32 {
        self.collisions
    }
}

impl<W> Behaviour<W> for CollisionTest
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        let events = world.collisions(self.actor)?;
        for event in events {
            self.collisions += 1;
            tracing::debug!(
                tick = ctx.tick,
                other = ?event.other,
                intensity = event.intensity,
                "ego collision"
            );
        }

        if self.terminate_on_failure && self.collisions > 0 {
            Ok(Status::Failure)
        } else {
            Ok(Status::Running)
        }
    }

    fn reset(&mut self) {
        self.collisions = 0;
    }

    fn terminate_on_failure(&self) -> bool {
        self.terminate_on_failure
    }

    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement::new(
            CriterionKind::Collision,
            self.collisions as f64,
            self.collisions,
        ))
    }
}

/// Succeeds once the actor is within `radius` of the target point.
pub struct InRadiusRegionTest {
    name: Cow<'static, str>,
    actor: ActorId,
    target: Location,
    radius: f64,
    reached: bool,
}

impl InRadiusRegionTest {
    pub fn new(actor: ActorId, target: Location, radius: f64) -> Self {
        Self {
            name: Cow::Borrowed("InRadiusRegionTest"),
            actor,
            target,
            radius,
            reached: false,
        }
    }
}

impl<W> Behaviour<W> for InRadiusRegionTest
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, _ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        let here = world.location(self.actor)?;
        if here.distance_2d(self.target) < self.radius {
            self.reached = true;
            Ok(Status::Success)
        } else {
            Ok(Status::Running)
        }
    }

    fn reset(&mut self) {
        self.reached = false;
    }

    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement::new(
            CriterionKind::TargetRegion,
            if self.reached { 1.0 } else { 0.0 },
            0,
        ))
    }
}

/// Accumulates the distance driven farther than `radius` from every route
/// waypoint and fails once it exceeds `offroad_max` metres.
pub struct InRouteTest {
    name: Cow<'static, str>,
    actor: ActorId,
    route: Route,
    radius: f64,
    offroad_max: f64,
    terminate_on_failure: bool,
    off_route_metres: f64,
    excursions: u32,
    off_route: bool,
    last: Option<Location>,
}

impl InRouteTest {
    pub fn new(actor: ActorId, route: Route, radius: f64, offroad_max: f64) -> Self {
        Self {
            name: Cow::Borrowed("InRouteTest"),
            actor,
            route,
            radius,
            offroad_max,
            terminate_on_failure: false,
            off_route_metres: 0.0,
            excursions: 0,
            off_route: false,
            last: None,
        }
    }

    pub fn with_terminate_on_failure(mut self, terminate: bool) -> Self {
        self.terminate_on_failure = terminate;
        self
    }

    pub fn off_route_metres(&self) -> f64 {
        self.off_route_metres
    }
}

impl<W> Behaviour<W> for InRouteTest
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        let here = world.location(self.actor)?;
        let off = self
            .route
            .distance_to_nearest(here)
            .is_some_and(|d| d > self.radius);

        if off {
            if !self.off_route {
                self.excursions += 1;
                tracing::debug!(tick = ctx.tick, excursion = self.excursions, "ego left the route");
            }
            if let Some(prev) = self.last.filter(|_| self.off_route) {
                self.off_route_metres += prev.distance_2d(here);
            }
        }
        self.off_route = off;
        self.last = Some(here);

        if self.off_route_metres > self.offroad_max {
            Ok(Status::Failure)
        } else {
            Ok(Status::Running)
        }
    }

    fn reset(&mut self) {
        self.off_route_metres = 0.0;
        self.excursions = 0;
        self.off_route = false;
        self.last = None;
    }

    fn terminate_on_failure(&self) -> bool {
        self.terminate_on_failure
    }

    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement::new(
            CriterionKind::InRoute,
            self.off_route_metres,
            self.excursions,
        ))
    }
}

/// Tracks the furthest route waypoint reached and succeeds at the last one.
///
/// Progress is monotonic: only waypoints ahead of the current one are
/// considered, so a gap in the snapshot stream never stalls it.
pub struct RouteCompletionTest {
    name: Cow<'static, str>,
    actor: ActorId,
    route: Route,
    tolerance: f64,
    terminate_on_failure: bool,
    reached: Option<usize>,
}

impl RouteCompletionTest {
    pub fn new(actor: ActorId, route: Route, tolerance: f64) -> Self {
        Self {
            name: Cow::Borrowed("RouteCompletionTest"),
            actor,
            route,
            tolerance,
            terminate_on_failure: false,
            reached: None,
        }
    }

    pub fn with_terminate_on_failure(mut self, terminate: bool) -> Self {
        self.terminate_on_failure = terminate;
        self
    }

    pub fn percentage(&self) -> f64 {
        match self.reached {
            Some(i) if !self.route.is_empty() => (i + 1) as f64 * 100.0 / self.route.len() as f64,
            _ => 0.0,
        }
    }

    fn advance(&mut self, here: Location) {
        let start = self.reached.map_or(0, |i| i + 1);
        let waypoints = self.route.waypoints();
        if let Some(j) = (start..waypoints.len())
            .rev()
            .find(|&j| waypoints[j].location.distance_2d(here) <= self.tolerance)
        {
            self.reached = Some(j);
        }
    }
}

impl<W> Behaviour<W> for RouteCompletionTest
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, _ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        let here = world.location(self.actor)?;
        self.advance(here);

        let last = self.route.len().checked_sub(1);
        if last.is_some() && self.reached == last {
            Ok(Status::Success)
        } else {
            Ok(Status::Running)
        }
    }

    fn reset(&mut self) {
        self.reached = None;
    }

    fn terminate_on_failure(&self) -> bool {
        self.terminate_on_failure
    }

    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement::new(
            CriterionKind::RouteCompletion,
            self.percentage(),
            0,
        ))
    }
}

/// Counts separate occasions of driving on the wrong side of the centre line.
pub struct WrongLaneTest {
    name: Cow<'static, str>,
    actor: ActorId,
    terminate_on_failure: bool,
    on_wrong_lane: bool,
    violations: u32,
    wrong_lane_seconds: f64,
}

impl WrongLaneTest {
    pub fn new(actor: ActorId) -> Self {
        Self {
            name: Cow::Borrowed("WrongLaneTest"),
            actor,
            terminate_on_failure: false,
            on_wrong_lane: false,
            violations: 0,
            wrong_lane_seconds: 0.0,
        }
    }

    pub fn with_terminate_on_failure(mut self, terminate: bool) -> Self {
        self.terminate_on_failure = terminate;
        self
    }

    pub fn wrong_lane_seconds(&self) -> f64 {
        self.wrong_lane_seconds
    }
}

impl<W> Behaviour<W> for WrongLaneTest
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        let lane = world.lane_state(self.actor)?;
        if lane.wrong_lane {
            self.wrong_lane_seconds += ctx.dt_seconds;
            if !self.on_wrong_lane {
                self.violations += 1;
            }
        }
        self.on_wrong_lane = lane.wrong_lane;

        if self.terminate_on_failure && self.violations > 0 {
            Ok(Status::Failure)
        } else {
            Ok(Status::Running)
        }
    }

    fn reset(&mut self) {
        self.on_wrong_lane = false;
        self.violations = 0;
        self.wrong_lane_seconds = 0.0;
    }

    fn terminate_on_failure(&self) -> bool {
        self.terminate_on_failure
    }

    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement::new(
            CriterionKind::WrongLane,
            self.violations as f64,
            self.violations,
        ))
    }
}

/// Counts stop lines crossed while the governing signal was red.
pub struct RunningRedLightTest {
    name: Cow<'static, str>,
    actor: ActorId,
    terminate_on_failure: bool,
    crossing: bool,
    violations: u32,
}

impl RunningRedLightTest {
    pub fn new(actor: ActorId) -> Self {
        Self {
            name: Cow::Borrowed("RunningRedLightTest"),
            actor,
            terminate_on_failure: false,
            crossing: false,
            violations: 0,
        }
    }

    pub fn with_terminate_on_failure(mut self, terminate: bool) -> Self {
        self.terminate_on_failure = terminate;
        self
    }
}

impl<W> Behaviour<W> for RunningRedLightTest
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        let violation = world.traffic_light(self.actor)?.is_violation();
        if violation && !self.crossing {
            self.violations += 1;
            tracing::debug!(tick = ctx.tick, count = self.violations, "red light run");
        }
        self.crossing = violation;

        if self.terminate_on_failure && self.violations > 0 {
            Ok(Status::Failure)
        } else {
            Ok(Status::Running)
        }
    }

    fn reset(&mut self) {
        self.crossing = false;
        self.violations = 0;
    }

    fn terminate_on_failure(&self) -> bool {
        self.terminate_on_failure
    }

    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement::new(
            CriterionKind::RedLight,
            self.violations as f64,
            self.violations,
        ))
    }
}
