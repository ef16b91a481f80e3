use std::borrow::Cow;

use drive_core::{SnapshotError, TickContext, WorldMut};
use serde::{Deserialize, Serialize};

use crate::bt::{Behaviour, Status};
use crate::criterion::CriterionReport;
use crate::trace::{Trace, TraceEvent};

/// How a [`Parallel`] folds its children's statuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParallelPolicy {
    /// Success once every child succeeded. A failed child does not stop its
    /// siblings unless it aborts the tree.
    SuccessOnAll,
    /// The first child to reach a terminal status decides the outcome.
    #[default]
    SuccessOnOne,
}

/// A behaviour tree node.
///
/// Every node caches its last status. A node that reached `Success` or
/// `Failure` keeps it without being re-evaluated until `reset`.
pub enum Node<W>
where
    W: WorldMut + 'static,
{
    Leaf(Leaf<W>),
    Sequence(Sequence<W>),
    Parallel(Parallel<W>),
}

impl<W> Node<W>
where
    W: WorldMut + 'static,
{
    pub fn leaf(behaviour: impl Behaviour<W>) -> Self {
        Node::Leaf(Leaf::new(Box::new(behaviour)))
    }

    pub fn sequence(name: impl Into<Cow<'static, str>>, children: Vec<Node<W>>) -> Self {
        Node::Sequence(Sequence::new(name, children))
    }

    pub fn parallel(
        name: impl Into<Cow<'static, str>>,
        policy: ParallelPolicy,
        children: Vec<Node<W>>,
    ) -> Self {
        Node::Parallel(Parallel::new(name, policy, children))
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W, trace: &mut Trace) -> Status {
        match self {
            Node::Leaf(n) => n.tick(ctx, world, trace),
            Node::Sequence(n) => n.tick(ctx, world, trace),
            Node::Parallel(n) => n.tick(ctx, world, trace),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Node::Leaf(n) => n.reset(),
            Node::Sequence(n) => n.reset(),
            Node::Parallel(n) => n.reset(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Node::Leaf(n) => n.status,
            Node::Sequence(n) => n.status,
            Node::Parallel(n) => n.status,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Leaf(n) => n.behaviour.name(),
            Node::Sequence(n) => &n.name,
            Node::Parallel(n) => &n.name,
        }
    }

    pub fn children(&self) -> &[Node<W>] {
        match self {
            Node::Leaf(_) => &[],
            Node::Sequence(n) => &n.children,
            Node::Parallel(n) => &n.children,
        }
    }

    /// True once a `terminate_on_failure` leaf in this subtree has failed.
    pub fn aborting(&self) -> bool {
        self.aborting_leaf().is_some()
    }

    /// Name of the first failed `terminate_on_failure` leaf, in declaration order.
    pub fn aborting_leaf(&self) -> Option<&str> {
        match self {
            Node::Leaf(n) => n.aborting().then(|| n.behaviour.name()),
            Node::Sequence(_) | Node::Parallel(_) => {
                self.children().iter().find_map(|c| c.aborting_leaf())
            }
        }
    }

    /// Reports of every criterion leaf in this subtree, in declaration order.
    pub fn reports(&self) -> Vec<CriterionReport> {
        let mut out = Vec::new();
        self.collect_reports(&mut out);
        out
    }

    fn collect_reports(&self, out: &mut Vec<CriterionReport>) {
        match self {
            Node::Leaf(n) => out.extend(n.report()),
            Node::Sequence(_) | Node::Parallel(_) => {
                for c in self.children() {
                    c.collect_reports(out);
                }
            }
        }
    }
}

impl<W> core::fmt::Debug for Node<W>
where
    W: WorldMut + 'static,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let kind = match self {
            Node::Leaf(_) => "Leaf",
            Node::Sequence(_) => "Sequence",
            Node::Parallel(_) => "Parallel",
        };
        f.debug_struct(kind)
            .field("name", &self.name())
            .field("status", &self.status())
            .field("children", &self.children())
            .finish()
    }
}

fn emit_transition(
    trace: &mut Trace,
    ctx: &TickContext,
    kind: &'static str,
    name: &str,
    status: Status,
) {
    if !trace.is_enabled() {
        return;
    }
    let tag = format!("bt.{kind}.{}", status.tag());
    trace.emit(TraceEvent::new(ctx.tick, tag).with_label(name.to_owned()));
}

pub struct Leaf<W>
where
    W: WorldMut + 'static,
{
    behaviour: Box<dyn Behaviour<W>>,
    status: Status,
}

impl<W> Leaf<W>
where
    W: WorldMut + 'static,
{
    pub fn new(behaviour: Box<dyn Behaviour<W>>) -> Self {
        Self {
            behaviour,
            status: Status::Invalid,
        }
    }

    pub fn behaviour(&self) -> &dyn Behaviour<W> {
        &*self.behaviour
    }

    pub fn status(&self) -> Status {
        self.status
    }

    fn aborting(&self) -> bool {
        self.status == Status::Failure && self.behaviour.terminate_on_failure()
    }

    fn report(&self) -> Option<CriterionReport> {
        let m = self.behaviour.measurement()?;
        Some(CriterionReport {
            name: self.behaviour.name().to_owned(),
            kind: m.kind,
            status: self.status,
            measurement: m.value,
            violations: m.violations,
        })
    }

    fn tick(&mut self, ctx: &TickContext, world: &mut W, trace: &mut Trace) -> Status {
        if self.status.is_terminal() {
            return self.status;
        }

        let status = match self.behaviour.update(ctx, world) {
            Ok(Status::Invalid) => Status::Running,
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(
                    node = %self.behaviour.name(),
                    tick = ctx.tick,
                    error = %err,
                    "snapshot error, holding leaf in Running"
                );
                Status::Running
            }
        };

        if status != self.status {
            emit_transition(trace, ctx, "leaf", self.behaviour.name(), status);
        }
        self.status = status;

        if self.aborting() {
            tracing::warn!(
                node = %self.behaviour.name(),
                tick = ctx.tick,
                "criterion failed with terminate_on_failure, aborting tree"
            );
        }
        status
    }

    fn reset(&mut self) {
        self.status = Status::Invalid;
        self.behaviour.reset();
    }
}

/// Ticks children in order, resuming at the running child.
///
/// Earlier children are not re-ticked once they succeeded. The first failure
/// fails the sequence for the tick and later children are not ticked.
pub struct Sequence<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    children: Vec<Node<W>>,
    index: usize,
    status: Status,
}

impl<W> Sequence<W>
where
    W: WorldMut + 'static,
{
    pub fn new(name: impl Into<Cow<'static, str>>, children: Vec<Node<W>>) -> Self {
        Self {
            name: name.into(),
            children,
            index: 0,
            status: Status::Invalid,
        }
    }

    /// Index of the child the next tick resumes at.
    pub fn current_index(&self) -> usize {
        self.index
    }

    fn tick(&mut self, ctx: &TickContext, world: &mut W, trace: &mut Trace) -> Status {
        if self.status.is_terminal() {
            return self.status;
        }

        let mut status = Status::Success;
        while self.index < self.children.len() {
            match self.children[self.index].tick(ctx, world, trace) {
                Status::Success => self.index += 1,
                Status::Failure => {
                    status = Status::Failure;
                    break;
                }
                Status::Running | Status::Invalid => {
                    status = Status::Running;
                    break;
                }
            }
        }

        if status != self.status {
            emit_transition(trace, ctx, "sequence", &self.name, status);
        }
        self.status = status;
        status
    }

    fn reset(&mut self) {
        self.index = 0;
        self.status = Status::Invalid;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }
}

/// Ticks every unresolved child each step, in declaration order.
pub struct Parallel<W>
where
    W: WorldMut + 'static,
{
    name: Cow<'static, str>,
    policy: ParallelPolicy,
    children: Vec<Node<W>>,
    status: Status,
}

impl<W> Parallel<W>
where
    W: WorldMut + 'static,
{
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        policy: ParallelPolicy,
        children: Vec<Node<W>>,
    ) -> Self {
        Self {
            name: name.into(),
            policy,
            children,
            status: Status::Invalid,
        }
    }

    pub fn policy(&self) -> ParallelPolicy {
        self.policy
    }

    fn tick(&mut self, ctx: &TickContext, world: &mut W, trace: &mut Trace) -> Status {
        if self.status.is_terminal() {
            return self.status;
        }

        let mut any_success = false;
        let mut any_failure = false;
        let mut all_success = true;
        let mut all_terminal = true;
        let mut aborting = false;

        for child in self.children.iter_mut() {
            match child.tick(ctx, world, trace) {
                Status::Success => any_success = true,
                Status::Failure => {
                    any_failure = true;
                    all_success = false;
                    aborting |= child.aborting();
                }
                Status::Running | Status::Invalid => {
                    all_success = false;
                    all_terminal = false;
                }
            }
        }

        let status = match self.policy {
            ParallelPolicy::SuccessOnAll => {
                if aborting {
                    Status::Failure
                } else if all_success {
                    Status::Success
                } else if all_terminal {
                    Status::Failure
                } else {
                    Status::Running
                }
            }
            ParallelPolicy::SuccessOnOne => {
                if any_success || self.children.is_empty() {
                    Status::Success
                } else if any_failure {
                    Status::Failure
                } else {
                    Status::Running
                }
            }
        };

        if status != self.status {
            emit_transition(trace, ctx, "parallel", &self.name, status);
        }
        self.status = status;
        status
    }

    fn reset(&mut self) {
        self.status = Status::Invalid;
        for c in self.children.iter_mut() {
            c.reset();
        }
    }
}

/// Leaf wrapping a predicate over the world: `Success` once it holds,
/// `Running` until then.
pub struct Condition<F> {
    name: Cow<'static, str>,
    cond: F,
}

impl<F> Condition<F> {
    pub fn new(name: impl Into<Cow<'static, str>>, cond: F) -> Self {
        Self {
            name: name.into(),
            cond,
        }
    }
}

impl<F, W> Behaviour<W> for Condition<F>
where
    F: FnMut(&TickContext, &W) -> Result<bool, SnapshotError> + 'static,
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &TickContext, world: &mut W) -> Result<Status, SnapshotError> {
        if (self.cond)(ctx, &*world)? {
            Ok(Status::Success)
        } else {
            Ok(Status::Running)
        }
    }
}
