//! Built-in scenarios.
//!
//! Routes are not part of the catalog; attach one with
//! [`ScenarioDescriptor::with_route`] after loading it.

use drive_core::{Location, Route, Vec2};

use crate::{
    ConfigError, CriteriaSpec, CriterionToggle, HazardSpec, InRouteSpec, RouteCompletionSpec,
    ScenarioDescriptor,
};

const ROYAL_SOCIETY: &str = "RoyalSocietyScenarios";

pub fn builtin() -> Vec<ScenarioDescriptor> {
    vec![
        open_day(),
        town03_gas_station_open_day(),
        town03_gas_station(),
        town03_train_track(),
        town01_restaurant(),
        town04_parking_lot(),
    ]
}

/// Look a scenario up by name, case-insensitively.
pub fn find(name: &str) -> Result<ScenarioDescriptor, ConfigError> {
    builtin()
        .into_iter()
        .find(|d| d.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownScenario(name.to_owned()))
}

/// Free drive along a route, no scripted traffic.
pub fn open_day() -> ScenarioDescriptor {
    ScenarioDescriptor {
        name: "OpenDay".into(),
        town: "Town03".into(),
        category: "OpenDay".into(),
        timeout_secs: 300,
        behaviour_timeout_factor: 1,
        route: Route::default(),
        target: None,
        target_radius: 10.0,
        hazards: Vec::new(),
        camera: None,
        wrong_lane_budget: 0,
        criteria: CriteriaSpec {
            collision: CriterionToggle::TERMINATE,
            target_region: true,
            in_route: Some(InRouteSpec {
                terminate_on_failure: true,
                ..InRouteSpec::default()
            }),
            route_completion: Some(RouteCompletionSpec::default()),
            wrong_lane: CriterionToggle::default(),
            red_light: CriterionToggle::default(),
        },
    }
}

/// Gas station drive for open days: a cyclist and a car cross the ego's path.
pub fn town03_gas_station_open_day() -> ScenarioDescriptor {
    ScenarioDescriptor {
        name: "Town03GasStationOpenDay".into(),
        town: "Town03".into(),
        category: "Town03Scenarios".into(),
        timeout_secs: 300,
        behaviour_timeout_factor: 1,
        route: Route::default(),
        target: None,
        target_radius: 10.0,
        hazards: vec![
            HazardSpec::new("cyclist", 0, 25.0, Location::planar(83.0, -104.0))
                .heading(Vec2::new(-1.0, 0.0), false),
            HazardSpec::new("car", 2, 40.0, Location::planar(-8.0, 127.0))
                .heading(Vec2::new(1.0, 0.0), false),
        ],
        camera: None,
        wrong_lane_budget: 0,
        criteria: CriteriaSpec {
            collision: CriterionToggle::TERMINATE,
            target_region: true,
            in_route: None,
            route_completion: Some(RouteCompletionSpec {
                terminate_on_failure: true,
                ..RouteCompletionSpec::default()
            }),
            wrong_lane: CriterionToggle::default(),
            red_light: CriterionToggle::default(),
        },
    }
}

fn royal_society(name: &str, town: &str, hazards: Vec<HazardSpec>) -> ScenarioDescriptor {
    ScenarioDescriptor {
        name: name.into(),
        town: town.into(),
        category: ROYAL_SOCIETY.into(),
        timeout_secs: 900,
        behaviour_timeout_factor: 10,
        route: Route::default(),
        target: None,
        target_radius: 5.0,
        hazards,
        camera: None,
        wrong_lane_budget: 0,
        criteria: CriteriaSpec {
            collision: CriterionToggle::default(),
            target_region: true,
            in_route: Some(InRouteSpec::default()),
            route_completion: None,
            wrong_lane: CriterionToggle::default(),
            red_light: CriterionToggle::default(),
        },
    }
}

pub fn town03_gas_station() -> ScenarioDescriptor {
    royal_society(
        "Town03GasStation",
        "Town03",
        vec![
            HazardSpec::new("cyclist", 0, 30.0, Location::planar(78.0, -104.0))
                .heading(Vec2::new(-1.0, 0.0), true),
            HazardSpec::new("car", 4, 40.0, Location::planar(-8.0, 127.0))
                .heading(Vec2::new(1.0, 0.0), true),
        ],
    )
}

pub fn town03_train_track() -> ScenarioDescriptor {
    royal_society(
        "Town03TrainTrack",
        "Town03",
        vec![
            HazardSpec::new("cyclist", 0, 20.0, Location::planar(-114.5, 27.4))
                .heading(Vec2::new(0.0, 1.0), false),
            HazardSpec::new("car", 1, 45.0, Location::planar(-9.5, 136.3))
                .heading(Vec2::new(0.0, 1.0), true),
            HazardSpec::new("driveway car", 2, 25.0, Location::planar(146.3, 140.0))
                .heading(Vec2::new(0.0, -1.0), true),
        ],
    )
}

pub fn town01_restaurant() -> ScenarioDescriptor {
    royal_society(
        "Town01Restaurant",
        "Town01",
        vec![
            HazardSpec::new("driveway car", 0, 25.0, Location::planar(334.0, 95.2))
                .heading(Vec2::new(1.0, 0.0), true),
            HazardSpec::new("cyclist", 2, 25.0, Location::planar(202.0, 129.0))
                .heading(Vec2::new(0.0, 1.0), true),
            HazardSpec::new("car", 4, 25.0, Location::planar(92.0, 133.0))
                .heading(Vec2::new(0.0, 1.0), true),
        ],
    )
}

pub fn town04_parking_lot() -> ScenarioDescriptor {
    royal_society(
        "Town04ParkingLot",
        "Town04",
        vec![
            HazardSpec::new("car", 0, 30.0, Location::planar(310.9, -172.2))
                .heading(Vec2::new(0.0, 1.0), true),
            HazardSpec::new("cyclist", 1, 30.0, Location::planar(239.0, -172.8))
                .heading(Vec2::new(0.0, -1.0), true),
            HazardSpec::new("driveway car", 8, 25.0, Location::planar(183.7, -246.0))
                .heading(Vec2::new(0.0, -1.0), false),
        ],
    )
}
