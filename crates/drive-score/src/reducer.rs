//! Reducers turning criterion reports into a final score.

use std::collections::BTreeMap;

use drive_bt::{CriterionKind, CriterionReport, Status};

use crate::{Breakdown, Outcome, ReducerKind, ScoreRecord, ScoringConfig};

/// Everything a reducer sees about a run.
#[derive(Debug, Clone)]
pub struct ScoreInput<'a> {
    pub id: u64,
    pub scenario: &'a str,
    pub reports: &'a [CriterionReport],
    pub outcome: Outcome,
    pub ticks: u64,
    pub elapsed_seconds: f64,
    pub timeout_seconds: f64,
    /// Wrong-lane occasions the route forces on the driver; not penalised.
    pub wrong_lane_budget: u32,
}

pub trait ScoreReducer {
    fn kind(&self) -> ReducerKind;

    fn final_score(&self, breakdown: &Breakdown, input: &ScoreInput<'_>) -> f64;

    /// Reduce a run to a record. Never fails: missing criteria count as zero.
    fn score(&self, input: &ScoreInput<'_>) -> ScoreRecord {
        let breakdown = Breakdown::from_reports(input.reports);
        let final_score = self.final_score(&breakdown, input);
        let measurements: BTreeMap<String, f64> = input
            .reports
            .iter()
            .map(|r| (r.name.clone(), r.measurement))
            .collect();

        tracing::debug!(
            scenario = %input.scenario,
            reducer = %self.kind(),
            final_score,
            collisions = breakdown.collisions,
            wrong_lane = breakdown.wrong_lane,
            off_track = breakdown.off_track,
            red_light = breakdown.red_light,
            "run scored"
        );

        ScoreRecord {
            id: input.id,
            scenario: input.scenario.to_owned(),
            reducer: self.kind(),
            final_score,
            outcome: input.outcome.clone(),
            ticks: input.ticks,
            elapsed_seconds: input.elapsed_seconds,
            breakdown,
            measurements,
        }
    }
}

impl Breakdown {
    pub fn from_reports(reports: &[CriterionReport]) -> Self {
        let mut out = Breakdown::default();
        let mut completion: Option<f64> = None;

        for r in reports {
            match r.kind {
                CriterionKind::Collision => out.collisions += r.violations,
                CriterionKind::WrongLane => out.wrong_lane += r.violations,
                CriterionKind::InRoute => out.off_track += r.violations,
                CriterionKind::RedLight => out.red_light += r.violations,
                CriterionKind::TargetRegion => {
                    out.target_reached |= r.status == Status::Success || r.measurement >= 1.0;
                }
                CriterionKind::RouteCompletion => {
                    completion = Some(completion.map_or(r.measurement, |c| c.max(r.measurement)));
                }
                CriterionKind::Timeout => {}
            }
        }

        // Scenarios judged by a target region alone count reaching it as the whole route.
        out.route_completion = match completion {
            Some(c) => c.clamp(0.0, 100.0),
            None if out.target_reached => 100.0,
            None => 0.0,
        };
        out
    }

    fn penalties(&self, config: &ScoringConfig, wrong_lane_budget: u32) -> f64 {
        config.collision_penalty * f64::from(self.collisions)
            + config.wrong_lane_penalty * f64::from(self.wrong_lane.saturating_sub(wrong_lane_budget))
            + config.off_track_penalty * f64::from(self.off_track)
            + config.red_light_penalty * f64::from(self.red_light)
    }
}

/// Deduction score: start from `base`, subtract a penalty per violation.
#[derive(Debug, Clone, Default)]
pub struct CountScore {
    pub config: ScoringConfig,
}

impl CountScore {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }
}

impl ScoreReducer for CountScore {
    fn kind(&self) -> ReducerKind {
        ReducerKind::Count
    }

    fn final_score(&self, breakdown: &Breakdown, input: &ScoreInput<'_>) -> f64 {
        let mut score =
            (self.config.base - breakdown.penalties(&self.config, input.wrong_lane_budget)).max(0.0);
        if breakdown.target_reached {
            score += self.config.target_bonus;
        }
        score
    }
}

/// Weighted score: route progress plus a time bonus, minus the same penalties.
#[derive(Debug, Clone, Default)]
pub struct ComputeScore {
    pub config: ScoringConfig,
}

impl ComputeScore {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }
}

impl ScoreReducer for ComputeScore {
    fn kind(&self) -> ReducerKind {
        ReducerKind::Compute
    }

    fn final_score(&self, breakdown: &Breakdown, input: &ScoreInput<'_>) -> f64 {
        let completion = breakdown.route_completion / 100.0;
        let time_left = if input.timeout_seconds > 0.0 {
            (1.0 - input.elapsed_seconds / input.timeout_seconds).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let route = self.config.route_weight * completion;
        let time = (self.config.time_weight * completion * time_left).clamp(0.0, self.config.time_weight);
        (route + time - breakdown.penalties(&self.config, input.wrong_lane_budget)).max(0.0)
    }
}

pub fn reducer_for(kind: ReducerKind, config: ScoringConfig) -> Box<dyn ScoreReducer> {
    match kind {
        ReducerKind::Count => Box::new(CountScore::new(config)),
        ReducerKind::Compute => Box::new(ComputeScore::new(config)),
    }
}
