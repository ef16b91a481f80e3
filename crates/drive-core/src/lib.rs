//! Deterministic, simulator-agnostic primitives for scenario evaluation.
//!
//! The evaluator never talks to the simulator directly. Each tick it reads a
//! snapshot through [`WorldView`] and, for the few action leaves that drive
//! scripted traffic, writes through [`WorldMut`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod actor;
pub mod error;
pub mod geom;
pub mod route;
pub mod snapshot;
pub mod tick;
pub mod world;

pub use actor::{ActorId, ActorRole, ActorRoster};
pub use error::SnapshotError;
pub use geom::{Location, Rotation, Transform, Vec2, Vector3};
pub use route::{RoadOption, Route, RouteWaypoint};
pub use snapshot::{ActorState, Snapshot, WorldCommand};
pub use tick::TickContext;
pub use world::{CollisionEvent, LaneState, Signal, TrafficLightState, WorldMut, WorldView};
