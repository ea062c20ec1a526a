#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Simulated radar boards and transport.
//!
//! The simulated boards stand in for the Acconeer radar pair behind the real
//! UARTs: a trigger wakes the board, and after a power-up delay the board
//! answers over the same `D<digits>f` / `S<digits>f` wire format the real
//! ones use. The reply is fed through the frame parser and completed through
//! the scheduler's `SensorPort`, so the full trigger → completion → event
//! path is exercised without hardware.

pub mod error;
pub mod frame;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam_channel as xch;
use radar_core::SensorPort;
use radar_traits::clock::Clock;
use radar_traits::{RadarSensor, Transport};

use crate::error::HwError;

/// Behavior of a simulated radar board pair.
#[derive(Debug, Clone)]
pub struct RadarProfile {
    /// Distance the board reports; `None` means the board never answers
    /// (exercises the timeout/retry path).
    pub distance: Option<u16>,
    /// Speed the board reports; `None` means no answer.
    pub speed: Option<u16>,
    /// Power-up delay before a board answers a trigger.
    pub response_delay: Duration,
}

impl Default for RadarProfile {
    fn default() -> Self {
        Self {
            distance: Some(200),
            speed: Some(10),
            response_delay: Duration::from_millis(350),
        }
    }
}

enum Command {
    Distance,
    Speed,
}

/// Simulated radar boards. `connect()` spawns one worker thread that
/// answers triggers after the profile's delay; the thread shuts down when
/// the value is dropped. Triggers before `connect()` fail with
/// [`HwError::Disconnected`].
pub struct SimulatedRadar {
    profile: RadarProfile,
    clock: std::sync::Arc<dyn Clock + Send + Sync>,
    tx: Option<xch::Sender<Command>>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl SimulatedRadar {
    pub fn new(profile: RadarProfile, clock: std::sync::Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            profile,
            clock,
            tx: None,
            join_handle: None,
        }
    }

    /// Wire the boards to a scheduler's sensor port and start answering.
    pub fn connect(&mut self, port: SensorPort) {
        if self.tx.is_some() {
            tracing::warn!("simulated radar already connected");
            return;
        }
        let (tx, rx) = xch::unbounded::<Command>();
        let profile = self.profile.clone();
        let clock = std::sync::Arc::clone(&self.clock);
        let join_handle = std::thread::spawn(move || {
            let mut parser = frame::FrameParser::new();
            for cmd in rx {
                clock.sleep(profile.response_delay);
                let reply = match cmd {
                    Command::Distance => profile.distance.map(frame::encode_distance),
                    Command::Speed => profile.speed.map(frame::encode_speed),
                };
                let Some(reply) = reply else {
                    tracing::debug!("simulated board stays silent");
                    continue;
                };
                for byte in reply.bytes() {
                    let result = match parser.push(byte) {
                        Some(frame::Reading::Distance(v)) => Some(port.complete_distance(v)),
                        Some(frame::Reading::Speed(v)) => Some(port.complete_speed(v)),
                        None => None,
                    };
                    if let Some(Err(_)) = result {
                        tracing::warn!("event queue full, completion dropped");
                    }
                }
            }
            tracing::trace!("simulated radar thread exiting");
        });
        self.tx = Some(tx);
        self.join_handle = Some(join_handle);
    }

    fn send(&self, cmd: Command) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.tx
            .as_ref()
            .ok_or(HwError::Disconnected)?
            .send(cmd)
            .map_err(|_| Box::new(HwError::Disconnected) as _)
    }
}

impl RadarSensor for SimulatedRadar {
    fn trigger_distance(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.send(Command::Distance)
    }

    fn trigger_speed(
        &mut self,
        _last_distance: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.send(Command::Speed)
    }
}

impl Drop for SimulatedRadar {
    fn drop(&mut self) {
        // Disconnect the channel so the worker loop ends, then join.
        self.tx.take();
        if let Some(handle) = self.join_handle.take()
            && handle.join().is_err()
        {
            tracing::warn!("simulated radar thread panicked during shutdown");
        }
    }
}

/// Simulated cellular transport: reports go to the log, network time comes
/// from the host wall clock, signal power is a fixed reading.
pub struct SimulatedTransport {
    rsrp: String,
    reports_sent: u64,
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self {
            rsrp: "-97dbm".to_string(),
            reports_sent: 0,
        }
    }
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rsrp(mut self, rsrp: impl Into<String>) -> Self {
        self.rsrp = rsrp.into();
        self
    }

    pub fn reports_sent(&self) -> u64 {
        self.reports_sent
    }
}

impl Transport for SimulatedTransport {
    fn send_report(
        &mut self,
        payload: &str,
        _access_token: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.reports_sent += 1;
        tracing::info!(bytes = payload.len(), payload, "report sent (simulated)");
        Ok(())
    }

    fn query_network_time(&mut self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    fn query_signal_power(&mut self) -> String {
        self.rsrp.clone()
    }
}
