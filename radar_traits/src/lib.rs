pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Asynchronous radar sensor boards.
///
/// Both triggers are fire-and-forget: they arm the hardware and return
/// immediately. The completed reading surfaces later through the scheduler's
/// sensor port, never through these calls.
pub trait RadarSensor {
    fn trigger_distance(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn trigger_speed(
        &mut self,
        last_distance: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Cellular uplink for reports, network time, and signal power.
pub trait Transport {
    fn send_report(
        &mut self,
        payload: &str,
        access_token: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Unix network time in milliseconds; 0 when no time is available.
    fn query_network_time(&mut self) -> u64;

    /// Received signal power as a formatted string (e.g. "-97dbm").
    fn query_signal_power(&mut self) -> String;
}
