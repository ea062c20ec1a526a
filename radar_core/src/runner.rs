//! Outer polling loop around the scheduler.
//!
//! The scheduler is cooperative: the runner invokes `tick()` on a fixed
//! period and sleeps in between. The period comes from configuration, not a
//! hardcoded constant, and the loop exits on the shutdown flag or after an
//! optional tick budget (used by self-check and tests).

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use radar_traits::{RadarSensor, Transport};

use crate::core::Scheduler;

#[derive(Debug, Clone)]
pub struct RunParams {
    /// Scheduler polling period in milliseconds.
    pub tick_period_ms: u64,
    /// Stop after this many ticks; `None` runs until shutdown.
    pub max_ticks: Option<u64>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            tick_period_ms: 20,
            max_ticks: None,
        }
    }
}

/// Run the scheduler until shutdown or the tick budget is spent. Returns the
/// number of ticks executed.
pub fn run<R, T>(
    scheduler: &mut Scheduler<R, T>,
    params: &RunParams,
    shutdown: &AtomicBool,
) -> u64
where
    R: RadarSensor,
    T: Transport,
{
    let period = Duration::from_millis(params.tick_period_ms.max(1));
    let clock = scheduler.clock();
    scheduler.initialize();
    tracing::info!(
        tick_period_ms = params.tick_period_ms,
        "scheduler loop started"
    );

    let mut ticks: u64 = 0;
    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!(ticks, "scheduler loop stopped by shutdown signal");
            return ticks;
        }
        if let Some(max) = params.max_ticks
            && ticks >= max
        {
            tracing::info!(ticks, "scheduler loop finished tick budget");
            return ticks;
        }
        scheduler.tick();
        ticks += 1;
        clock.sleep(period);
    }
}
