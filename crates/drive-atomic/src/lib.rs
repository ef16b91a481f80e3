//! Leaf primitives for scenario trees.
//!
//! - triggers: conditions that release scripted traffic
//! - actions: the only leaves allowed to write to the world
//! - criteria: pass/fail tests that accumulate a measurement for scoring
//! - timer: the scenario clock

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actions;
pub mod criteria;
pub mod timer;
pub mod triggers;

pub use actions::{SetVelocity, ShowScenario};
pub use criteria::{
    CollisionTest, InRadiusRegionTest, InRouteTest, RouteCompletionTest, RunningRedLightTest,
    WrongLaneTest,
};
pub use timer::Timeout;
pub use triggers::{DirectionFilter, InTriggerDistanceToVehicle, TriggerCollision};

/// Default half-width of the region around a scripted collision point, in metres.
pub const DEFAULT_COLLISION_TOLERANCE: f64 = 2.0;
