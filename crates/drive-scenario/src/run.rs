//! The lifecycle of one scenario run.

use drive_bt::{
    BehaviourTree, CriterionKind, CriterionReport, Node, ParallelPolicy, Status, Trace, TraceEvent,
    TraceLog,
};
use drive_core::{ActorId, ActorRoster, SnapshotError, TickContext, WorldMut};
use drive_score::{AbortReason, Outcome, ScoreInput, ScoreReducer, ScoreRecord};

use crate::builder::SCENARIO_TIMEOUT;
use crate::{build, ConfigError, ScenarioDescriptor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    Running,
    Finished(Outcome),
}

impl RunState {
    pub fn is_finished(&self) -> bool {
        matches!(self, RunState::Finished(_))
    }
}

/// A scenario being evaluated against a snapshot stream.
///
/// The behaviour and criteria trees run side by side under one
/// `SuccessOnOne` root, so whichever resolves first ends the run.
pub struct ScenarioRun<W>
where
    W: WorldMut + 'static,
{
    scenario: String,
    ego: ActorId,
    timeout_seconds: f64,
    wrong_lane_budget: u32,
    dt_seconds: f64,
    tree: BehaviourTree<W>,
    tick: u64,
    evaluated: u64,
    outcome: Option<Outcome>,
}

impl<W> ScenarioRun<W>
where
    W: WorldMut + 'static,
{
    pub fn new(
        desc: &ScenarioDescriptor,
        roster: &ActorRoster,
        dt_seconds: f64,
    ) -> Result<Self, ConfigError> {
        let trees = build(desc, roster)?;
        let root = Node::parallel(
            "scenario",
            ParallelPolicy::SuccessOnOne,
            vec![trees.behaviour, trees.criteria],
        );

        tracing::info!(
            scenario = %desc.name,
            town = %desc.town,
            timeout_secs = desc.timeout_secs,
            hazards = desc.hazards.len(),
            "scenario started"
        );

        Ok(Self {
            scenario: desc.name.clone(),
            ego: roster.ego,
            timeout_seconds: trees.timeout_seconds,
            wrong_lane_budget: desc.wrong_lane_budget,
            dt_seconds,
            tree: BehaviourTree::new(root),
            tick: 0,
            evaluated: 0,
            outcome: None,
        })
    }

    /// Record a deterministic trace of node transitions and run events.
    pub fn with_trace(mut self, trace: Trace) -> Self {
        *self.tree.trace_mut() = trace;
        self
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Advance one simulator tick. Ticking a finished run does nothing.
    ///
    /// An ego reported as destroyed aborts the run before the trees are
    /// evaluated. A tick that lacks the ego entirely is skipped.
    pub fn tick(&mut self, world: &mut W) -> RunState {
        if let Some(outcome) = &self.outcome {
            return RunState::Finished(outcome.clone());
        }

        match world.is_alive(self.ego) {
            Ok(true) => {}
            Ok(false) => {
                self.abort(AbortReason::EgoDestroyed);
                return self.state();
            }
            Err(err) => return self.skip(&err),
        }

        let ctx = TickContext::new(self.tick, self.dt_seconds);
        let status = self.tree.tick(&ctx, world);
        self.tick += 1;
        self.evaluated += 1;

        if status.is_terminal() {
            let outcome = self.classify(status);
            self.conclude(outcome);
        }
        self.state()
    }

    /// Account for a tick whose snapshot could not be read at all.
    ///
    /// The trees are not evaluated, so no criterion makes progress.
    pub fn skip(&mut self, error: &SnapshotError) -> RunState {
        if self.outcome.is_none() {
            tracing::warn!(scenario = %self.scenario, tick = self.tick, error = %error, "skipping unreadable snapshot");
            self.tick += 1;
        }
        self.state()
    }

    /// End the run on the spot. No effect once the run has finished.
    pub fn abort(&mut self, reason: AbortReason) {
        if self.outcome.is_some() {
            return;
        }
        tracing::warn!(scenario = %self.scenario, tick = self.tick, reason = %reason, "scenario aborted");
        self.conclude(Outcome::Aborted(reason));
    }

    pub fn state(&self) -> RunState {
        match &self.outcome {
            Some(outcome) => RunState::Finished(outcome.clone()),
            None => RunState::Running,
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Ticks the trees were actually evaluated.
    pub fn ticks(&self) -> u64 {
        self.evaluated
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.evaluated as f64 * self.dt_seconds
    }

    pub fn status(&self) -> Status {
        self.tree.status()
    }

    /// Reports of the criteria tree, in declaration order.
    pub fn reports(&self) -> Vec<CriterionReport> {
        self.criteria().map(Node::reports).unwrap_or_default()
    }

    pub fn trace_log(&self) -> Option<&TraceLog> {
        self.tree.trace_log()
    }

    /// Score the run. A run that has not finished is scored on what it has
    /// accumulated so far, as disconnected.
    pub fn finish(&mut self, id: u64, reducer: &dyn ScoreReducer) -> ScoreRecord {
        if self.outcome.is_none() {
            self.abort(AbortReason::Disconnected);
        }
        let reports = self.reports();
        let outcome = self.outcome.clone().unwrap_or(Outcome::Aborted(AbortReason::Disconnected));

        reducer.score(&ScoreInput {
            id,
            scenario: &self.scenario,
            reports: &reports,
            outcome,
            ticks: self.evaluated,
            elapsed_seconds: self.elapsed_seconds(),
            timeout_seconds: self.timeout_seconds,
            wrong_lane_budget: self.wrong_lane_budget,
        })
    }

    fn criteria(&self) -> Option<&Node<W>> {
        self.tree.root().children().get(1)
    }

    fn classify(&self, status: Status) -> Outcome {
        if status == Status::Success {
            return Outcome::Success;
        }
        if let Some(name) = self.tree.root().aborting_leaf() {
            return Outcome::Aborted(AbortReason::CriterionFailed(name.to_owned()));
        }
        let timed_out = self.reports().iter().any(|r| {
            r.kind == CriterionKind::Timeout && r.name == SCENARIO_TIMEOUT && r.status == Status::Failure
        });
        if timed_out {
            Outcome::TimedOut
        } else {
            Outcome::Failure
        }
    }

    fn conclude(&mut self, outcome: Outcome) {
        tracing::info!(
            scenario = %self.scenario,
            ticks = self.evaluated,
            outcome = %outcome,
            "scenario finished"
        );
        let tag = match &outcome {
            Outcome::Success => "scenario.success",
            Outcome::Failure => "scenario.failure",
            Outcome::TimedOut => "scenario.timed_out",
            Outcome::Aborted(_) => "scenario.aborted",
        };
        let event = TraceEvent::new(self.tick, tag)
            .with_label(outcome.to_string())
            .with_a(self.evaluated);
        self.tree.trace_mut().emit(event);
        self.outcome = Some(outcome);
    }
}
