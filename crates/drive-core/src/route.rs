use serde::{Deserialize, Serialize};

use crate::Location;

/// Lane-change option attached to a route waypoint by the route planner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadOption {
    #[default]
    Void,
    Left,
    Right,
    Straight,
    LaneFollow,
    ChangeLaneLeft,
    ChangeLaneRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteWaypoint {
    pub location: Location,
    #[serde(default)]
    pub option: RoadOption,
}

impl RouteWaypoint {
    pub fn new(location: Location, option: RoadOption) -> Self {
        Self { location, option }
    }
}

/// Ordered waypoints the ego is expected to follow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route {
    waypoints: Vec<RouteWaypoint>,
}

impl Route {
    pub fn new(waypoints: Vec<RouteWaypoint>) -> Self {
        Self { waypoints }
    }

    pub fn from_locations(locations: impl IntoIterator<Item = Location>) -> Self {
        Self::new(
            locations
                .into_iter()
                .map(|l| RouteWaypoint::new(l, RoadOption::LaneFollow))
                .collect(),
        )
    }

    pub fn waypoints(&self) -> &[RouteWaypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn last(&self) -> Option<Location> {
        self.waypoints.last().map(|w| w.location)
    }

    /// Planar distance from `location` to the closest waypoint, if any.
    pub fn distance_to_nearest(&self, location: Location) -> Option<f64> {
        self.waypoints
            .iter()
            .map(|w| w.location.distance_2d(location))
            .min_by(|a, b| a.total_cmp(b))
    }
}
