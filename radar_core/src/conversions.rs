//! Mappings from the TOML schema in `radar_config` to core runtime types.

use crate::config::TimerCfg;

impl From<&radar_config::Timers> for TimerCfg {
    fn from(t: &radar_config::Timers) -> Self {
        Self {
            startup_delay_ms: t.startup_delay_ms,
            measure_period_ms: t.measure_period_ms,
            upload_period_ms: t.upload_period_ms,
            measure_timeout_ms: t.measure_timeout_ms,
        }
    }
}
