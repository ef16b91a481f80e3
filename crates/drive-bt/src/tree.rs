use drive_core::{TickContext, WorldMut};

use crate::bt::Status;
use crate::criterion::CriterionReport;
use crate::nodes::Node;
use crate::trace::{Trace, TraceLog};

/// Owns a root node and drives it one tick per simulator step.
///
/// Once the root resolves the tree stops ticking and keeps reporting the
/// terminal status until [`BehaviourTree::reset`].
pub struct BehaviourTree<W>
where
    W: WorldMut + 'static,
{
    root: Node<W>,
    trace: Trace,
    last: Status,
    ticks: u64,
}

impl<W> BehaviourTree<W>
where
    W: WorldMut + 'static,
{
    pub fn new(root: Node<W>) -> Self {
        Self {
            root,
            trace: Trace::disabled(),
            last: Status::Invalid,
            ticks: 0,
        }
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.trace = trace;
        self
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) -> Status {
        if self.last.is_terminal() {
            return self.last;
        }
        self.last = self.root.tick(ctx, world, &mut self.trace);
        self.ticks += 1;
        self.last
    }

    pub fn status(&self) -> Status {
        self.last
    }

    /// Number of ticks the root has actually been evaluated.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn root(&self) -> &Node<W> {
        &self.root
    }

    pub fn reports(&self) -> Vec<CriterionReport> {
        self.root.reports()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn trace_mut(&mut self) -> &mut Trace {
        &mut self.trace
    }

    pub fn trace_log(&self) -> Option<&TraceLog> {
        self.trace.log()
    }

    pub fn reset(&mut self) {
        self.root.reset();
        self.last = Status::Invalid;
        self.ticks = 0;
    }
}
