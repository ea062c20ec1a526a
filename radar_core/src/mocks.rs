//! Test and helper mocks for radar_core.

use std::sync::{Arc, Mutex};

use radar_traits::{RadarSensor, Transport};

/// Triggers observed by [`MockSensor`], in call order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Distance,
    Speed(u16),
}

/// Sensor that records its triggers; completions are injected by the test
/// through the scheduler's `SensorPort`.
#[derive(Default, Clone)]
pub struct MockSensor {
    pub triggers: Arc<Mutex<Vec<Trigger>>>,
}

impl MockSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggers(&self) -> Vec<Trigger> {
        self.triggers.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl RadarSensor for MockSensor {
    fn trigger_distance(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.triggers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Trigger::Distance);
        Ok(())
    }

    fn trigger_speed(
        &mut self,
        last_distance: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.triggers
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(Trigger::Speed(last_distance));
        Ok(())
    }
}

/// Transport that records sent payloads and serves fixed time/RSRP values.
#[derive(Clone)]
pub struct MockTransport {
    pub sent: Arc<Mutex<Vec<(String, String)>>>,
    pub network_time_ms: u64,
    pub rsrp: String,
    pub fail_sends: bool,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            network_time_ms: 0,
            rsrp: "-97dbm".to_string(),
            fail_sends: false,
        }
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_network_time(mut self, ms: u64) -> Self {
        self.network_time_ms = ms;
        self
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Transport for MockTransport {
    fn send_report(
        &mut self,
        payload: &str,
        access_token: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.sent
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push((payload.to_string(), access_token.to_string()));
        if self.fail_sends {
            return Err(Box::new(std::io::Error::other("simulated send failure")));
        }
        Ok(())
    }

    fn query_network_time(&mut self) -> u64 {
        self.network_time_ms
    }

    fn query_signal_power(&mut self) -> String {
        self.rsrp.clone()
    }
}
