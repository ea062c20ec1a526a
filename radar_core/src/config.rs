//! Runtime configuration for the measurement scheduler.
//!
//! These are the in-memory structs used by `Scheduler`. They are separate
//! from the TOML-deserialized schema in `radar_config`.

/// Periods for the four scheduler timers.
#[derive(Debug, Clone)]
pub struct TimerCfg {
    /// Startup delay before the measure/upload timers begin (one-shot).
    pub startup_delay_ms: u64,
    /// Interval between measurement cycles (periodic).
    pub measure_period_ms: u64,
    /// Interval between report uploads (periodic).
    pub upload_period_ms: u64,
    /// Per-phase sensor timeout (one-shot, re-armed each phase).
    pub measure_timeout_ms: u64,
}

impl Default for TimerCfg {
    fn default() -> Self {
        Self {
            startup_delay_ms: 1_000,
            measure_period_ms: 10_000,
            upload_period_ms: 60_000,
            measure_timeout_ms: 1_300,
        }
    }
}
