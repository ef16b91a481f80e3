use drive_bt::Trace;
use drive_core::{
    ActorId, ActorRole, ActorState, CollisionEvent, LaneState, Location, Route, Snapshot,
    TrafficLightState, Vector3, WorldCommand,
};
use drive_scenario::{catalog, RunState, ScenarioDescriptor, ScenarioRun};
use drive_score::{AbortReason, ComputeScore, CountScore, Outcome};

const EGO: ActorId = ActorId(1);
const DT: f64 = 0.25;

fn route() -> Route {
    Route::from_locations((0..=10).map(|i| Location::planar(i as f64 * 10.0, 0.0)))
}

fn open_day() -> ScenarioDescriptor {
    catalog::open_day().with_route(route())
}

fn ego(x: f64, y: f64) -> ActorState {
    let mut ego = ActorState::new(EGO, ActorRole::Ego, Location::planar(x, y));
    ego.lane = Some(LaneState::default());
    ego.traffic_light = Some(TrafficLightState::default());
    ego
}

fn frame(tick: u64, x: f64) -> Snapshot {
    Snapshot::new(tick, vec![ego(x, 0.0)])
}

fn start(desc: &ScenarioDescriptor, first: &Snapshot) -> ScenarioRun<Snapshot> {
    let roster = first.roster().unwrap();
    ScenarioRun::new(desc, &roster, DT).ok().unwrap()
}

fn drive(run: &mut ScenarioRun<Snapshot>, frames: &mut [Snapshot]) -> RunState {
    let mut state = RunState::Running;
    for f in frames.iter_mut() {
        state = run.tick(f);
        if state.is_finished() {
            break;
        }
    }
    state
}

#[test]
fn driving_the_route_succeeds() {
    let desc = open_day();
    let mut frames: Vec<Snapshot> = (0..=10).map(|t| frame(t, t as f64 * 10.0)).collect();
    let mut run = start(&desc, &frames[0]);

    assert_eq!(drive(&mut run, &mut frames), RunState::Finished(Outcome::Success));
    assert!(run.ticks() <= 11);

    let record = run.finish(1, &CountScore::default());
    assert_eq!(record.outcome, Outcome::Success);
    assert_eq!(record.breakdown.route_completion, 100.0);
    assert_eq!(record.breakdown.collisions, 0);
}

#[test]
fn terminating_collision_aborts_on_the_same_tick() {
    let desc = open_day();
    let mut frames: Vec<Snapshot> = (0..6).map(|t| frame(t, t as f64)).collect();
    frames[2].actors[0].collisions = vec![CollisionEvent {
        other: None,
        intensity: 500.0,
    }];
    let mut run = start(&desc, &frames[0]);

    let state = drive(&mut run, &mut frames);
    assert_eq!(
        state,
        RunState::Finished(Outcome::Aborted(AbortReason::CriterionFailed(
            "CollisionTest".into()
        )))
    );
    assert_eq!(run.ticks(), 3);

    let record = run.finish(2, &CountScore::default());
    assert_eq!(record.breakdown.collisions, 1);
    assert_eq!(record.final_score, 80.0);
}

#[test]
fn scenario_timeout_reports_timed_out() {
    let mut desc = open_day();
    desc.timeout_secs = 1;
    let mut frames: Vec<Snapshot> = (0..10).map(|t| frame(t, 0.0)).collect();
    let mut run = start(&desc, &frames[0]);

    for f in frames.iter_mut().take(3) {
        assert_eq!(run.tick(f), RunState::Running);
    }
    assert_eq!(run.tick(&mut frames[3]), RunState::Finished(Outcome::TimedOut));

    // Finished runs ignore further ticks.
    assert_eq!(run.tick(&mut frames[4]), RunState::Finished(Outcome::TimedOut));
    assert_eq!(run.ticks(), 4);
    assert_eq!(run.elapsed_seconds(), 1.0);
}

#[test]
fn destroyed_ego_aborts_the_run() {
    let desc = open_day();
    let mut frames: Vec<Snapshot> = (0..4).map(|t| frame(t, t as f64)).collect();
    frames[1].actors[0].alive = false;
    let mut run = start(&desc, &frames[0]);

    assert_eq!(
        drive(&mut run, &mut frames),
        RunState::Finished(Outcome::Aborted(AbortReason::EgoDestroyed))
    );
    assert_eq!(run.ticks(), 1);
}

#[test]
fn tick_without_the_ego_is_skipped_not_aborted() {
    let desc = open_day();
    let mut run = start(&desc, &frame(0, 0.0));

    assert_eq!(run.tick(&mut frame(0, 0.0)), RunState::Running);
    assert_eq!(run.tick(&mut Snapshot::new(1, Vec::new())), RunState::Running);
    assert_eq!(run.ticks(), 1);
    assert_eq!(run.tick(&mut frame(2, 10.0)), RunState::Running);
    assert_eq!(run.ticks(), 2);
    assert!(run.outcome().is_none());
}

#[test]
fn truncated_stream_still_scores() {
    let desc = open_day();
    let mut frames: Vec<Snapshot> = (0..3).map(|t| frame(t, t as f64 * 5.0)).collect();
    let mut run = start(&desc, &frames[0]);

    assert_eq!(drive(&mut run, &mut frames), RunState::Running);
    let record = run.finish(3, &ComputeScore::default());

    assert_eq!(record.outcome, Outcome::Aborted(AbortReason::Disconnected));
    assert_eq!(record.ticks, 3);
    assert_eq!(record.measurements.len(), 7);
    assert!(record.final_score > 0.0);
}

#[test]
fn unreadable_snapshots_make_no_progress() {
    let mut desc = open_day();
    desc.timeout_secs = 1;
    let mut run = start(&desc, &frame(0, 0.0));
    let malformed = drive_core::SnapshotError::Malformed("truncated line".into());

    for _ in 0..10 {
        assert_eq!(run.skip(&malformed), RunState::Running);
    }
    assert_eq!(run.ticks(), 0);
    assert_eq!(run.tick(&mut frame(10, 0.0)), RunState::Running);
}

#[test]
fn identical_streams_give_identical_traces_and_records() {
    let desc = open_day();
    let stream: Vec<Snapshot> = (0..8)
        .map(|t| {
            let mut f = frame(t, t as f64 * 3.0);
            if t == 4 {
                f.actors[0].lane = Some(LaneState { wrong_lane: true });
            }
            f
        })
        .collect();

    let replay = || {
        let mut frames = stream.clone();
        let mut run = start(&desc, &frames[0]).with_trace(Trace::with_log());
        drive(&mut run, &mut frames);
        let record = run.finish(9, &ComputeScore::default());
        (run.trace_log().cloned(), record)
    };

    let (trace_a, record_a) = replay();
    let (trace_b, record_b) = replay();
    assert_eq!(record_a, record_b);
    assert_eq!(record_a.breakdown.wrong_lane, 1);

    let trace_a = trace_a.unwrap();
    assert_eq!(Some(trace_a.clone()), trace_b);
    assert_eq!(trace_a.tagged("scenario.aborted").count(), 1);
}

#[test]
fn hazard_is_released_then_reaches_its_collision_point() {
    let mut desc = catalog::town03_gas_station_open_day().with_route(Route::from_locations(
        (0..=20).map(|i| Location::planar(60.0 + i as f64 * 10.0, -104.0)),
    ));
    desc.hazards[0].release_speed = Some(5.0);

    let cyclist = ActorId(2);
    let snapshot = |tick: u64, cyclist_x: f64| {
        let mut c = ActorState::new(cyclist, ActorRole::Cyclist, Location::planar(cyclist_x, -104.0));
        c.velocity = Vector3::new(-5.0, 0.0, 0.0);
        Snapshot::new(
            tick,
            vec![
                ego(60.0, -104.0),
                c,
                ActorState::new(ActorId(3), ActorRole::Vehicle, Location::planar(500.0, 500.0)),
                ActorState::new(ActorId(4), ActorRole::Vehicle, Location::planar(-500.0, 500.0)),
            ],
        )
    };

    let mut first = snapshot(0, 95.0);
    let mut run = start(&desc, &first);
    assert_eq!(run.tick(&mut first), RunState::Running);
    assert!(first.commands().iter().all(|c| !matches!(c, WorldCommand::SetVelocity { .. })));

    let mut second = snapshot(1, 84.0);
    assert_eq!(run.tick(&mut second), RunState::Running);
    assert!(second.commands().contains(&WorldCommand::SetVelocity {
        actor: cyclist,
        velocity: Vector3::new(-5.0, 0.0, 0.0),
    }));
}
