use std::borrow::Cow;

use drive_bt::{Behaviour, CriterionKind, Measurement, Status};
use drive_core::{SnapshotError, TickContext, WorldMut};

/// Fails once the ticks it has seen, times the tick duration, reach the
/// configured number of seconds.
///
/// `display` only controls whether the remaining time is logged; it never
/// changes the verdict.
pub struct Timeout {
    name: Cow<'static, str>,
    seconds: f64,
    display: bool,
    ticks: u64,
    elapsed: f64,
    fired: bool,
    announced: Option<u64>,
}

/// Ticks of length `dt` needed for the elapsed time to reach `seconds`.
///
/// Counted in whole ticks so float rounding in `ticks * dt` cannot push the
/// verdict one tick late.
fn ticks_to_reach(seconds: f64, dt: f64) -> u64 {
    if dt <= 0.0 {
        return u64::MAX;
    }
    (seconds / dt - 1e-9).ceil().max(0.0) as u64
}

impl Timeout {
    pub fn new(seconds: f64) -> Self {
        Self {
            name: Cow::Borrowed("Timeout"),
            seconds,
            display: false,
            ticks: 0,
            elapsed: 0.0,
            fired: false,
            announced: None,
        }
    }

    pub fn with_display(mut self, display: bool) -> Self {
        self.display = display;
        self
    }

    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn remaining(&self) -> f64 {
        (self.seconds - self.elapsed).max(0.0)
    }

    pub fn fired(&self) -> bool {
        self.fired
    }
}

impl<W> Behaviour<W> for Timeout
where
    W: WorldMut + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn update(&mut self, ctx: &TickContext, _world: &mut W) -> Result<Status, SnapshotError> {
        self.ticks += 1;
        self.elapsed = self.ticks as f64 * ctx.dt_seconds;
        self.fired = self.ticks >= ticks_to_reach(self.seconds, ctx.dt_seconds);

        if self.display {
            let remaining = self.remaining().ceil() as u64;
            if self.announced != Some(remaining) {
                self.announced = Some(remaining);
                tracing::info!(timer = %self.name, remaining_seconds = remaining, "time remaining");
            }
        }

        if self.fired() {
            Ok(Status::Failure)
        } else {
            Ok(Status::Running)
        }
    }

    fn reset(&mut self) {
        self.ticks = 0;
        self.elapsed = 0.0;
        self.fired = false;
        self.announced = None;
    }

    fn measurement(&self) -> Option<Measurement> {
        Some(Measurement::new(
            CriterionKind::Timeout,
            self.elapsed,
            u32::from(self.fired()),
        ))
    }
}
