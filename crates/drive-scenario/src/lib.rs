//! # drive-scenario
//!
//! Turns a scenario descriptor into a pair of behaviour trees and drives
//! them against a snapshot stream until the run resolves.
//!
//! ```text
//! ScenarioDescriptor ──► build() ──► behaviour tree ─┐
//!   (catalog / YAML)                 criteria tree  ─┴─► ScenarioRun ──► ScoreRecord
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use drive_scenario::{catalog, ScenarioRun};
//!
//! let desc = catalog::find("OpenDay")?.with_route(route);
//! let mut run = ScenarioRun::new(&desc, &roster, 0.05)?;
//! for mut snapshot in stream {
//!     if run.tick(&mut snapshot).is_finished() {
//!         break;
//!     }
//! }
//! let record = run.finish(store.next_id()?, &CountScore::default());
//! ```

#![forbid(unsafe_code)]

pub mod builder;
pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod run;

pub use builder::{build, ScenarioTrees};
pub use config::RunnerConfig;
pub use descriptor::{
    CriteriaSpec, CriterionToggle, HazardSpec, InRouteSpec, RouteCompletionSpec,
    ScenarioDescriptor,
};
pub use error::{ConfigError, DescriptorLoadError};
pub use loader::{load_descriptor, load_route};
pub use run::{RunState, ScenarioRun};
