use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drive_core::{ActorId, ActorRole, ActorState, LaneState, Location, Route, Snapshot, TrafficLightState};
use drive_scenario::{catalog, ScenarioRun};

fn bench_scenario_tick(c: &mut Criterion) {
    let route = Route::from_locations((0..200).map(|i| Location::planar(i as f64 * 5.0, 0.0)));
    let desc = catalog::town03_train_track().with_route(route);

    let mut actors = vec![ActorState::new(ActorId(1), ActorRole::Ego, Location::planar(0.0, 0.0))];
    actors[0].lane = Some(LaneState::default());
    actors[0].traffic_light = Some(TrafficLightState::default());
    for i in 0..3 {
        actors.push(ActorState::new(
            ActorId(10 + i),
            ActorRole::Vehicle,
            Location::planar(2000.0, 2000.0),
        ));
    }
    let mut world = Snapshot::new(0, actors);

    let Some(roster) = world.roster() else {
        return;
    };
    let Ok(mut run) = ScenarioRun::<Snapshot>::new(&desc, &roster, 0.05) else {
        return;
    };

    c.bench_function("drive-scenario/tick(town03_train_track)", |b| {
        b.iter(|| {
            black_box(run.tick(&mut world));
            world.take_commands();
        })
    });
}

criterion_group!(benches, bench_scenario_tick);
criterion_main!(benches);
