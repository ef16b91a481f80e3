//! Behaviour tree runtime for scenario evaluation.
//!
//! Trees are built once per scenario from [`Node`]s: leaves implementing
//! [`Behaviour`], plus [`Sequence`] and [`Parallel`] composites. The tree is
//! ticked once per simulator step against a snapshot of the world.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod bt;
pub mod criterion;
pub mod nodes;
pub mod trace;
pub mod tree;

pub use bt::{Behaviour, Status};
pub use criterion::{CriterionKind, CriterionReport, Measurement};
pub use nodes::{Condition, Leaf, Node, Parallel, ParallelPolicy, Sequence};
pub use trace::{Trace, TraceEvent, TraceLog, TraceSink};
pub use tree::BehaviourTree;
