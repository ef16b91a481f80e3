//! Scoring weights, loaded from YAML or taken from the defaults.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Weights shared by both reducers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Starting score for the counting reducer
    #[serde(default = "default_base")]
    pub base: f64,

    /// Deducted per collision
    #[serde(default = "default_collision_penalty")]
    pub collision_penalty: f64,

    /// Deducted per wrong-lane occasion beyond the scenario's budget
    #[serde(default = "default_wrong_lane_penalty")]
    pub wrong_lane_penalty: f64,

    /// Deducted per off-route excursion
    #[serde(default = "default_off_track_penalty")]
    pub off_track_penalty: f64,

    /// Deducted per red light run
    #[serde(default = "default_red_light_penalty")]
    pub red_light_penalty: f64,

    /// Added by the counting reducer when the target region was reached
    #[serde(default = "default_target_bonus")]
    pub target_bonus: f64,

    /// Points for a fully completed route (weighted reducer)
    #[serde(default = "default_route_weight")]
    pub route_weight: f64,

    /// Points for finishing instantly (weighted reducer)
    #[serde(default = "default_time_weight")]
    pub time_weight: f64,
}

fn default_base() -> f64 {
    100.0
}
fn default_collision_penalty() -> f64 {
    20.0
}
fn default_wrong_lane_penalty() -> f64 {
    10.0
}
fn default_off_track_penalty() -> f64 {
    10.0
}
fn default_red_light_penalty() -> f64 {
    15.0
}
fn default_target_bonus() -> f64 {
    10.0
}
fn default_route_weight() -> f64 {
    70.0
}
fn default_time_weight() -> f64 {
    30.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            collision_penalty: default_collision_penalty(),
            wrong_lane_penalty: default_wrong_lane_penalty(),
            off_track_penalty: default_off_track_penalty(),
            red_light_penalty: default_red_light_penalty(),
            target_bonus: default_target_bonus(),
            route_weight: default_route_weight(),
            time_weight: default_time_weight(),
        }
    }
}

impl ScoringConfig {
    /// Load weights from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scoring config: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse scoring config: {}", path.display()))?;

        Ok(config)
    }
}
