use drive_bt::{
    Behaviour, BehaviourTree, Condition, CriterionKind, Measurement, Node, ParallelPolicy, Status,
    Trace,
};
use drive_core::{
    ActorId, CollisionEvent, LaneState, SnapshotError, TickContext, TrafficLightState, Transform,
    Vector3, WorldMut, WorldView,
};

#[derive(Debug, Default)]
struct RecordingWorld {
    ticked: Vec<&'static str>,
}

impl WorldView for RecordingWorld {
    fn transform(&self, actor: ActorId) -> Result<Transform, SnapshotError> {
        Err(SnapshotError::MissingActor(actor))
    }

    fn velocity(&self, actor: ActorId) -> Result<Vector3, SnapshotError> {
        Err(SnapshotError::MissingActor(actor))
    }

    fn collisions(&self, _actor: ActorId) -> Result<&[CollisionEvent], SnapshotError> {
        Ok(&[])
    }

    fn lane_state(&self, actor: ActorId) -> Result<LaneState, SnapshotError> {
        Err(SnapshotError::MissingLaneState(actor))
    }

    fn traffic_light(&self, actor: ActorId) -> Result<TrafficLightState, SnapshotError> {
        Err(SnapshotError::MissingTrafficLight(actor))
    }

    fn is_alive(&self, _actor: ActorId) -> Result<bool, SnapshotError> {
        Ok(true)
    }
}

impl WorldMut for RecordingWorld {
    fn set_velocity(&mut self, _actor: ActorId, _velocity: Vector3) {}
}

/// Replays a fixed list of statuses, repeating the last one.
struct Scripted {
    name: &'static str,
    script: Vec<Status>,
    at: usize,
    terminate_on_failure: bool,
}

impl Scripted {
    fn new(name: &'static str, script: Vec<Status>) -> Self {
        Self {
            name,
            script,
            at: 0,
            terminate_on_failure: false,
        }
    }

    fn terminating(mut self) -> Self {
        self.terminate_on_failure = true;
        self
    }
}

impl Behaviour<RecordingWorld> for Scripted {
    fn name(&self) -> &str {
        self.name
    }

    fn update(
        &mut self,
        _ctx: &TickContext,
        world: &mut RecordingWorld,
    ) -> Result<Status, SnapshotError> {
        world.ticked.push(self.name);
        let status = self.script[self.at.min(self.script.len() - 1)];
        self.at += 1;
        Ok(status)
    }

    fn reset(&mut self) {
        self.at = 0;
    }

    fn terminate_on_failure(&self) -> bool {
        self.terminate_on_failure
    }

    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement::new(CriterionKind::Collision, self.at as f64, 0))
    }
}

use Status::{Failure, Running, Success};

fn leaf(name: &'static str, script: Vec<Status>) -> Node<RecordingWorld> {
    Node::leaf(Scripted::new(name, script))
}

fn ctx(tick: u64) -> TickContext {
    TickContext::new(tick, 0.05)
}

fn tick(node: &mut Node<RecordingWorld>, world: &mut RecordingWorld, t: u64) -> Status {
    node.tick(&ctx(t), world, &mut Trace::disabled())
}

#[test]
fn sequence_failure_stops_later_children_on_the_same_tick() {
    let mut world = RecordingWorld::default();
    let mut seq = Node::sequence(
        "seq",
        vec![
            leaf("a", vec![Success]),
            leaf("b", vec![Failure]),
            leaf("c", vec![Success]),
        ],
    );

    assert_eq!(tick(&mut seq, &mut world, 0), Failure);
    assert_eq!(world.ticked, vec!["a", "b"]);
}

#[test]
fn sequence_resumes_at_running_child_without_reticking_earlier_ones() {
    let mut world = RecordingWorld::default();
    let mut seq = Node::sequence(
        "seq",
        vec![
            leaf("a", vec![Success]),
            leaf("b", vec![Running, Running, Success]),
            leaf("c", vec![Success]),
        ],
    );

    assert_eq!(tick(&mut seq, &mut world, 0), Running);
    assert_eq!(tick(&mut seq, &mut world, 1), Running);
    assert_eq!(tick(&mut seq, &mut world, 2), Success);
    assert_eq!(world.ticked, vec!["a", "b", "b", "b", "c"]);
}

#[test]
fn nodes_start_invalid_and_reset_back_to_invalid() {
    let mut world = RecordingWorld::default();
    let mut seq = Node::sequence("seq", vec![leaf("a", vec![Success])]);
    assert_eq!(seq.status(), Status::Invalid);

    tick(&mut seq, &mut world, 0);
    assert_eq!(seq.status(), Success);

    seq.reset();
    assert_eq!(seq.status(), Status::Invalid);
    assert_eq!(seq.children()[0].status(), Status::Invalid);
}

#[test]
fn success_on_all_waits_for_every_child() {
    let mut world = RecordingWorld::default();
    let mut par = Node::parallel(
        "all",
        ParallelPolicy::SuccessOnAll,
        vec![
            leaf("fast", vec![Success]),
            leaf("slow", vec![Running, Running, Success]),
        ],
    );

    assert_eq!(tick(&mut par, &mut world, 0), Running);
    assert_eq!(tick(&mut par, &mut world, 1), Running);
    assert_eq!(tick(&mut par, &mut world, 2), Success);
    // Resolved children latch and are not re-evaluated.
    assert_eq!(world.ticked, vec!["fast", "slow", "slow", "slow"]);
}

#[test]
fn success_on_all_keeps_siblings_running_after_plain_failure() {
    let mut world = RecordingWorld::default();
    let mut par = Node::parallel(
        "all",
        ParallelPolicy::SuccessOnAll,
        vec![
            leaf("broken", vec![Failure]),
            leaf("timer", vec![Running, Running, Success]),
        ],
    );

    assert_eq!(tick(&mut par, &mut world, 0), Running);
    assert_eq!(tick(&mut par, &mut world, 1), Running);
    assert!(!par.aborting());
    // Every child is terminal and one failed.
    assert_eq!(tick(&mut par, &mut world, 2), Failure);
    assert_eq!(world.ticked, vec!["broken", "timer", "timer", "timer"]);
}

#[test]
fn terminate_on_failure_aborts_success_on_all_immediately() {
    let mut world = RecordingWorld::default();
    let mut par = Node::parallel(
        "all",
        ParallelPolicy::SuccessOnAll,
        vec![
            Node::leaf(Scripted::new("collision", vec![Running, Failure]).terminating()),
            leaf("timer", vec![Running]),
        ],
    );

    assert_eq!(tick(&mut par, &mut world, 0), Running);
    assert_eq!(tick(&mut par, &mut world, 1), Failure);
    assert!(par.aborting());
    assert_eq!(par.aborting_leaf(), Some("collision"));
    // Siblings are still ticked on the aborting step.
    assert_eq!(world.ticked, vec!["collision", "timer", "collision", "timer"]);
}

#[test]
fn success_on_one_succeeds_on_first_child_success() {
    let mut world = RecordingWorld::default();
    let mut par = Node::parallel(
        "one",
        ParallelPolicy::SuccessOnOne,
        vec![
            leaf("hazard", vec![Running, Running]),
            leaf("target", vec![Running, Success]),
            leaf("timeout", vec![Running, Failure]),
        ],
    );

    assert_eq!(tick(&mut par, &mut world, 0), Running);
    assert_eq!(tick(&mut par, &mut world, 1), Success);
}

#[test]
fn success_on_one_first_terminal_failure_wins() {
    let mut world = RecordingWorld::default();
    let mut par = Node::parallel(
        "one",
        ParallelPolicy::SuccessOnOne,
        vec![
            leaf("hazard", vec![Running]),
            leaf("timeout", vec![Running, Running, Failure]),
        ],
    );

    assert_eq!(tick(&mut par, &mut world, 0), Running);
    assert_eq!(tick(&mut par, &mut world, 1), Running);
    assert_eq!(tick(&mut par, &mut world, 2), Failure);
    // Resolved parallels stop evaluating.
    assert_eq!(tick(&mut par, &mut world, 3), Failure);
    assert_eq!(world.ticked.len(), 6);
}

#[test]
fn snapshot_errors_hold_leaf_in_running() {
    let mut world = RecordingWorld::default();
    let cond = Condition::new("ego-visible", |_ctx: &TickContext, w: &RecordingWorld| {
        w.transform(ActorId(1)).map(|_| true)
    });
    let mut node = Node::leaf(cond);

    assert_eq!(tick(&mut node, &mut world, 0), Running);
    assert_eq!(tick(&mut node, &mut world, 1), Running);
}

#[test]
fn reports_collect_criteria_in_declaration_order() {
    let mut world = RecordingWorld::default();
    let mut tree = BehaviourTree::new(Node::parallel(
        "criteria",
        ParallelPolicy::SuccessOnOne,
        vec![
            leaf("first", vec![Running]),
            Node::sequence("nested", vec![leaf("second", vec![Running])]),
        ],
    ));

    tree.tick(&ctx(0), &mut world);
    tree.tick(&ctx(1), &mut world);

    let reports = tree.reports();
    let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(reports[0].measurement, 2.0);
    assert_eq!(reports[0].status, Running);
}

#[test]
fn tree_stops_ticking_once_resolved_and_traces_transitions() {
    let mut world = RecordingWorld::default();
    let root = Node::sequence("root", vec![leaf("a", vec![Running, Success])]);
    let mut tree = BehaviourTree::new(root).with_trace(Trace::with_log());

    assert_eq!(tree.tick(&ctx(0), &mut world), Running);
    assert_eq!(tree.tick(&ctx(1), &mut world), Success);
    assert_eq!(tree.tick(&ctx(2), &mut world), Success);
    assert_eq!(tree.ticks(), 2);

    let log = tree.trace_log().unwrap();
    let tags: Vec<&str> = log.events.iter().map(|e| &*e.tag).collect();
    assert_eq!(
        tags,
        vec![
            "bt.leaf.running",
            "bt.sequence.running",
            "bt.leaf.success",
            "bt.sequence.success",
        ]
    );
}
