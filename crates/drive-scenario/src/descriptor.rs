//! Scenario descriptors: the literal parameters of a scenario as data.

use drive_core::{Location, Route, Transform, Vec2};
use serde::{Deserialize, Serialize};

/// Everything needed to build the trees of one scenario.
///
/// Immutable once a run starts. Built-in descriptors live in
/// [`crate::catalog`]; others are loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioDescriptor {
    pub name: String,

    #[serde(default)]
    pub town: String,

    #[serde(default)]
    pub category: String,

    /// Scenario timeout in seconds
    pub timeout_secs: u32,

    /// Behaviour-tree timeout, as a multiple of the scenario timeout
    #[serde(default = "default_behaviour_timeout_factor")]
    pub behaviour_timeout_factor: u32,

    #[serde(default)]
    pub route: Route,

    /// Target point. Defaults to the last route waypoint.
    #[serde(default)]
    pub target: Option<Location>,

    #[serde(default = "default_target_radius")]
    pub target_radius: f64,

    #[serde(default)]
    pub hazards: Vec<HazardSpec>,

    #[serde(default)]
    pub camera: Option<Transform>,

    /// Wrong-lane occasions the route itself forces; not penalised
    #[serde(default)]
    pub wrong_lane_budget: u32,

    #[serde(default)]
    pub criteria: CriteriaSpec,
}

fn default_behaviour_timeout_factor() -> u32 {
    1
}
fn default_target_radius() -> f64 {
    10.0
}

impl ScenarioDescriptor {
    pub fn with_route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    pub fn with_target(mut self, target: Location) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_camera(mut self, pose: Transform) -> Self {
        self.camera = Some(pose);
        self
    }

    /// The explicit target, or else the end of the route.
    pub fn target_point(&self) -> Option<Location> {
        self.target.or_else(|| self.route.last())
    }

    /// True when a criterion needs the route itself.
    pub fn requires_route(&self) -> bool {
        self.criteria.in_route.is_some() || self.criteria.route_completion.is_some()
    }

    pub fn behaviour_timeout_secs(&self) -> f64 {
        f64::from(self.timeout_secs) * f64::from(self.behaviour_timeout_factor.max(1))
    }
}

/// A scripted hazard: an actor released towards a collision point once the
/// ego comes close enough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardSpec {
    /// Label used in logs and node names, e.g. "cyclist".
    pub name: String,

    /// Index into the non-ego actors of the roster.
    pub actor_index: usize,

    /// Distance to the ego, in metres, below which the hazard is released.
    pub trigger_distance: f64,

    pub collision_point: Location,

    /// Heading filter for the collision trigger; zero disables it.
    #[serde(default)]
    pub direction: Vec2,

    #[serde(default)]
    pub strict: bool,

    /// Speed given to the actor along `direction` once triggered. `None`
    /// leaves the actor to the simulator's own control.
    #[serde(default)]
    pub release_speed: Option<f64>,

    #[serde(default = "default_collision_tolerance")]
    pub tolerance: f64,
}

fn default_collision_tolerance() -> f64 {
    drive_atomic::DEFAULT_COLLISION_TOLERANCE
}

impl HazardSpec {
    pub fn new(
        name: impl Into<String>,
        actor_index: usize,
        trigger_distance: f64,
        collision_point: Location,
    ) -> Self {
        Self {
            name: name.into(),
            actor_index,
            trigger_distance,
            collision_point,
            direction: Vec2::ZERO,
            strict: false,
            release_speed: None,
            tolerance: default_collision_tolerance(),
        }
    }

    pub fn heading(mut self, direction: Vec2, strict: bool) -> Self {
        self.direction = direction;
        self.strict = strict;
        self
    }

    pub fn released_at(mut self, speed: f64) -> Self {
        self.release_speed = Some(speed);
        self
    }
}

/// Which criteria judge the drive, and which of them end it on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaSpec {
    pub collision: CriterionToggle,
    pub target_region: bool,
    pub in_route: Option<InRouteSpec>,
    pub route_completion: Option<RouteCompletionSpec>,
    pub wrong_lane: CriterionToggle,
    pub red_light: CriterionToggle,
}

impl Default for CriteriaSpec {
    fn default() -> Self {
        Self {
            collision: CriterionToggle::default(),
            target_region: true,
            in_route: None,
            route_completion: None,
            wrong_lane: CriterionToggle::default(),
            red_light: CriterionToggle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriterionToggle {
    pub enabled: bool,
    pub terminate_on_failure: bool,
}

impl Default for CriterionToggle {
    fn default() -> Self {
        Self {
            enabled: true,
            terminate_on_failure: false,
        }
    }
}

impl CriterionToggle {
    pub const OFF: Self = Self {
        enabled: false,
        terminate_on_failure: false,
    };

    pub const TERMINATE: Self = Self {
        enabled: true,
        terminate_on_failure: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InRouteSpec {
    #[serde(default = "default_in_route_radius")]
    pub radius: f64,
    #[serde(default = "default_offroad_max")]
    pub offroad_max: f64,
    #[serde(default)]
    pub terminate_on_failure: bool,
}

fn default_in_route_radius() -> f64 {
    30.0
}
fn default_offroad_max() -> f64 {
    100.0
}

impl Default for InRouteSpec {
    fn default() -> Self {
        Self {
            radius: default_in_route_radius(),
            offroad_max: default_offroad_max(),
            terminate_on_failure: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteCompletionSpec {
    #[serde(default = "default_completion_tolerance")]
    pub tolerance: f64,
    #[serde(default)]
    pub terminate_on_failure: bool,
}

fn default_completion_tolerance() -> f64 {
    10.0
}

impl Default for RouteCompletionSpec {
    fn default() -> Self {
        Self {
            tolerance: default_completion_tolerance(),
            terminate_on_failure: false,
        }
    }
}
