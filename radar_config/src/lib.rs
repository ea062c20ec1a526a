#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the radar measurement unit.
//!
//! `Config` and sub-structs are deserialized from TOML and validated.

use serde::Deserialize;

/// Timer periods for the measurement scheduler.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Timers {
    /// Delay before the periodic timers start after boot.
    pub startup_delay_ms: u64,
    /// Interval between measurement cycles.
    pub measure_period_ms: u64,
    /// Interval between report uploads.
    pub upload_period_ms: u64,
    /// Per-phase sensor timeout; also accepts alias "timeout_ms".
    #[serde(alias = "timeout_ms")]
    pub measure_timeout_ms: u64,
}

impl Default for Timers {
    fn default() -> Self {
        Self {
            startup_delay_ms: 1_000,
            measure_period_ms: 10_000,
            upload_period_ms: 60_000,
            measure_timeout_ms: 1_300,
        }
    }
}

/// Scheduler loop and capacity knobs.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerCfg {
    /// Polling period of the outer tick loop.
    pub tick_period_ms: u64,
    /// Fixed capacity of the pending-event ring.
    pub event_queue_capacity: usize,
    /// Fixed capacity of the measurement log between uploads.
    pub log_capacity: usize,
}

impl Default for SchedulerCfg {
    fn default() -> Self {
        Self {
            tick_period_ms: 20,
            event_queue_capacity: 10,
            log_capacity: 50,
        }
    }
}

/// Cellular transport settings.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct TransportCfg {
    /// Device credential sent with every report.
    pub access_token: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub timers: Timers,
    #[serde(default)]
    pub scheduler: SchedulerCfg,
    #[serde(default)]
    pub transport: TransportCfg,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Timers
        if self.timers.startup_delay_ms == 0 {
            eyre::bail!("timers.startup_delay_ms must be >= 1");
        }
        if self.timers.measure_period_ms == 0 {
            eyre::bail!("timers.measure_period_ms must be >= 1");
        }
        if self.timers.upload_period_ms == 0 {
            eyre::bail!("timers.upload_period_ms must be >= 1");
        }
        if self.timers.measure_timeout_ms == 0 {
            eyre::bail!("timers.measure_timeout_ms must be >= 1");
        }
        if self.timers.measure_timeout_ms >= self.timers.measure_period_ms {
            eyre::bail!(
                "timers.measure_timeout_ms must be shorter than measure_period_ms \
                 (a phase with one retry must resolve before the next cycle)"
            );
        }

        // Scheduler
        if self.scheduler.tick_period_ms == 0 {
            eyre::bail!("scheduler.tick_period_ms must be >= 1");
        }
        if self.scheduler.tick_period_ms > 1_000 {
            eyre::bail!("scheduler.tick_period_ms is unreasonably large (>1s)");
        }
        if self.scheduler.event_queue_capacity == 0 {
            eyre::bail!("scheduler.event_queue_capacity must be >= 1");
        }
        if self.scheduler.log_capacity == 0 {
            eyre::bail!("scheduler.log_capacity must be >= 1");
        }

        // Transport
        if self.transport.access_token.is_empty() {
            eyre::bail!("transport.access_token must be set");
        }

        Ok(())
    }
}
