//! Binds a descriptor to the actors of a run and builds its trees.

use drive_atomic::{
    CollisionTest, InRadiusRegionTest, InRouteTest, InTriggerDistanceToVehicle,
    RouteCompletionTest, RunningRedLightTest, SetVelocity, ShowScenario, Timeout,
    TriggerCollision, WrongLaneTest,
};
use drive_bt::{Node, ParallelPolicy};
use drive_core::{ActorId, ActorRoster, Vector3, WorldMut};

use crate::{ConfigError, HazardSpec, ScenarioDescriptor};

/// Name of the timeout leaf that bounds the criteria tree.
pub const SCENARIO_TIMEOUT: &str = "ScenarioTimeout";

pub struct ScenarioTrees<W>
where
    W: WorldMut + 'static,
{
    pub behaviour: Node<W>,
    pub criteria: Node<W>,
    pub timeout_seconds: f64,
}

/// Build the behaviour and criteria trees for `desc`.
///
/// Fails before any tick when a hazard names an actor the roster does not
/// have, or when a criterion needs a route or target that is missing.
pub fn build<W>(desc: &ScenarioDescriptor, roster: &ActorRoster) -> Result<ScenarioTrees<W>, ConfigError>
where
    W: WorldMut + 'static,
{
    if desc.timeout_secs == 0 {
        return Err(ConfigError::InvalidTimeout {
            scenario: desc.name.clone(),
        });
    }
    if desc.requires_route() && desc.route.is_empty() {
        return Err(ConfigError::MissingRoute {
            scenario: desc.name.clone(),
        });
    }

    let hazards = desc
        .hazards
        .iter()
        .map(|h| bind(h, roster).map(|actor| (h, actor)))
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let behaviour = behaviour_tree(desc, roster.ego, &hazards);
    let criteria = criteria_tree(desc, roster.ego)?;

    Ok(ScenarioTrees {
        behaviour,
        criteria,
        timeout_seconds: f64::from(desc.timeout_secs),
    })
}

fn bind(hazard: &HazardSpec, roster: &ActorRoster) -> Result<ActorId, ConfigError> {
    roster
        .other(hazard.actor_index)
        .ok_or_else(|| ConfigError::ActorIndexOutOfRange {
            role: hazard.name.clone(),
            index: hazard.actor_index,
            available: roster.len(),
        })
}

fn behaviour_tree<W>(
    desc: &ScenarioDescriptor,
    ego: ActorId,
    hazards: &[(&HazardSpec, ActorId)],
) -> Node<W>
where
    W: WorldMut + 'static,
{
    let mut show = ShowScenario::new(desc.route.clone()).with_camera(desc.camera);
    if let Some(target) = desc.target_point() {
        show = show.with_target(target, desc.target_radius);
    }

    let mut children = vec![Node::leaf(show)];
    children.extend(hazards.iter().map(|(h, actor)| hazard_branch(h, *actor, ego)));
    children.push(Node::leaf(
        Timeout::new(desc.behaviour_timeout_secs()).named("BehaviourTimeout"),
    ));

    Node::parallel(desc.name.clone(), ParallelPolicy::SuccessOnAll, children)
}

/// trigger distance → (release) → collision point, under a SuccessOnOne root.
fn hazard_branch<W>(hazard: &HazardSpec, actor: ActorId, ego: ActorId) -> Node<W>
where
    W: WorldMut + 'static,
{
    let mut steps = vec![Node::leaf(
        InTriggerDistanceToVehicle::new(actor, ego, hazard.trigger_distance)
            .named(format!("{} trigger distance", hazard.name)),
    )];

    if let Some(speed) = hazard.release_speed {
        let heading = hazard.direction.normalized().unwrap_or_default();
        steps.push(Node::leaf(
            SetVelocity::new(actor, Vector3::new(heading.x * speed, heading.y * speed, 0.0))
                .named(format!("{} release", hazard.name)),
        ));
    }

    steps.push(Node::leaf(
        TriggerCollision::new(actor, hazard.collision_point)
            .with_tolerance(hazard.tolerance)
            .with_direction(hazard.direction, hazard.strict)
            .named(format!("{} collision", hazard.name)),
    ));

    Node::parallel(
        hazard.name.clone(),
        ParallelPolicy::SuccessOnOne,
        vec![Node::sequence(format!("{} sequence", hazard.name), steps)],
    )
}

fn criteria_tree<W>(desc: &ScenarioDescriptor, ego: ActorId) -> Result<Node<W>, ConfigError>
where
    W: WorldMut + 'static,
{
    let spec = &desc.criteria;
    let mut children = Vec::new();

    if spec.collision.enabled {
        children.push(Node::leaf(
            CollisionTest::new(ego).with_terminate_on_failure(spec.collision.terminate_on_failure),
        ));
    }
    if let Some(completion) = spec.route_completion {
        children.push(Node::leaf(
            RouteCompletionTest::new(ego, desc.route.clone(), completion.tolerance)
                .with_terminate_on_failure(completion.terminate_on_failure),
        ));
    }
    if spec.target_region {
        let target = desc.target_point().ok_or_else(|| ConfigError::MissingTarget {
            scenario: desc.name.clone(),
        })?;
        children.push(Node::leaf(InRadiusRegionTest::new(ego, target, desc.target_radius)));
    }
    if let Some(in_route) = spec.in_route {
        children.push(Node::leaf(
            InRouteTest::new(ego, desc.route.clone(), in_route.radius, in_route.offroad_max)
                .with_terminate_on_failure(in_route.terminate_on_failure),
        ));
    }
    if spec.wrong_lane.enabled {
        children.push(Node::leaf(
            WrongLaneTest::new(ego).with_terminate_on_failure(spec.wrong_lane.terminate_on_failure),
        ));
    }
    if spec.red_light.enabled {
        children.push(Node::leaf(
            RunningRedLightTest::new(ego)
                .with_terminate_on_failure(spec.red_light.terminate_on_failure),
        ));
    }
    children.push(Node::leaf(
        Timeout::new(f64::from(desc.timeout_secs))
            .with_display(true)
            .named(SCENARIO_TIMEOUT),
    ));

    Ok(Node::parallel("criteria", ParallelPolicy::SuccessOnOne, children))
}
