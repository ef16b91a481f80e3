use drive_bt::{CriterionKind, CriterionReport, Status};
use drive_score::{
    reducer_for, AbortReason, Breakdown, ComputeScore, CountScore, Outcome, ReducerKind,
    ScoreInput, ScoreReducer, ScoringConfig,
};

fn report(name: &str, kind: CriterionKind, status: Status, measurement: f64, violations: u32) -> CriterionReport {
    CriterionReport {
        name: name.to_owned(),
        kind,
        status,
        measurement,
        violations,
    }
}

fn finished_drive() -> Vec<CriterionReport> {
    vec![
        report("CollisionTest", CriterionKind::Collision, Status::Running, 1.0, 1),
        report("InRadiusRegionTest", CriterionKind::TargetRegion, Status::Success, 1.0, 0),
        report("InRouteTest", CriterionKind::InRoute, Status::Running, 12.5, 1),
        report("WrongLaneTest", CriterionKind::WrongLane, Status::Running, 3.0, 3),
        report("RunningRedLightTest", CriterionKind::RedLight, Status::Running, 0.0, 0),
        report("Timeout", CriterionKind::Timeout, Status::Running, 60.0, 0),
    ]
}

fn input<'a>(reports: &'a [CriterionReport], budget: u32) -> ScoreInput<'a> {
    ScoreInput {
        id: 7,
        scenario: "Town03GasStation",
        reports,
        outcome: Outcome::Success,
        ticks: 600,
        elapsed_seconds: 60.0,
        timeout_seconds: 300.0,
        wrong_lane_budget: budget,
    }
}

#[test]
fn breakdown_sums_violations_by_kind() {
    let b = Breakdown::from_reports(&finished_drive());
    assert_eq!(b.collisions, 1);
    assert_eq!(b.off_track, 1);
    assert_eq!(b.wrong_lane, 3);
    assert_eq!(b.red_light, 0);
    assert!(b.target_reached);
    // No route completion criterion: reaching the target counts as the whole route.
    assert_eq!(b.route_completion, 100.0);
}

#[test]
fn count_score_deducts_per_violation() {
    let reports = finished_drive();
    let record = CountScore::default().score(&input(&reports, 1));

    // 100 - 20 (collision) - 2 * 10 (wrong lane over budget) - 10 (off track) + 10 (target)
    assert_eq!(record.final_score, 60.0);
    assert_eq!(record.reducer, ReducerKind::Count);
    assert_eq!(record.id, 7);
    assert_eq!(record.measurements["InRouteTest"], 12.5);
    assert_eq!(record.measurements.len(), 6);
}

#[test]
fn count_score_floors_at_zero_before_bonus() {
    let reports = vec![
        report("CollisionTest", CriterionKind::Collision, Status::Running, 9.0, 9),
        report("InRadiusRegionTest", CriterionKind::TargetRegion, Status::Running, 0.0, 0),
    ];
    let record = CountScore::default().score(&input(&reports, 0));
    assert_eq!(record.final_score, 0.0);
    assert!(!record.breakdown.target_reached);
    assert_eq!(record.breakdown.route_completion, 0.0);
}

#[test]
fn compute_score_weighs_completion_and_time() {
    let reports = vec![
        report("RouteCompletionTest", CriterionKind::RouteCompletion, Status::Running, 50.0, 0),
        report("Timeout", CriterionKind::Timeout, Status::Running, 60.0, 0),
    ];
    let record = ComputeScore::default().score(&input(&reports, 0));

    // 70 * 0.5 + 30 * 0.5 * (1 - 60/300)
    assert!((record.final_score - 47.0).abs() < 1e-9);
    assert_eq!(record.reducer, ReducerKind::Compute);
}

#[test]
fn compute_score_gives_no_time_bonus_past_timeout() {
    let reports = vec![report(
        "RouteCompletionTest",
        CriterionKind::RouteCompletion,
        Status::Success,
        100.0,
        0,
    )];
    let mut late = input(&reports, 0);
    late.elapsed_seconds = 400.0;
    late.outcome = Outcome::TimedOut;

    let record = ComputeScore::default().score(&late);
    assert_eq!(record.final_score, 70.0);
    assert_eq!(record.outcome, Outcome::TimedOut);
}

#[test]
fn empty_reports_still_score() {
    let mut partial = input(&[], 0);
    partial.outcome = Outcome::Aborted(AbortReason::Disconnected);

    for kind in [ReducerKind::Count, ReducerKind::Compute] {
        let record = reducer_for(kind, ScoringConfig::default()).score(&partial);
        assert_eq!(record.breakdown, Breakdown::default());
        assert!(record.final_score >= 0.0);
        assert!(record.measurements.is_empty());
    }
}

#[test]
fn scoring_is_deterministic() {
    let reports = finished_drive();
    let a = ComputeScore::default().score(&input(&reports, 0));
    let b = ComputeScore::default().score(&input(&reports, 0));
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}
