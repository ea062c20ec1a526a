//! The measurement scheduler (`Scheduler`).
//!
//! Single-threaded cooperative step function: one `tick()` per scheduler
//! period commits the pending state, polls the timers, handles a due upload,
//! consumes at most one queued event, and dispatches on (state, event).
//! The scheduler itself never fails; sensor non-response degrades into a
//! retry and then a sentinel record, and collaborator errors are logged.

use std::sync::Arc;
use std::time::Instant;

use radar_traits::clock::Clock;
use radar_traits::{RadarSensor, Transport};

use crate::event::{Event, EventQueue, Readings, SensorPort};
use crate::log::{MeasurementLog, RecordHandle};
use crate::report;
use crate::timer::Countdown;

/// Retries permitted per phase before the phase is abandoned.
pub const MAX_TIMEOUT_RETRIES: u8 = 1;
/// Reserved reading meaning "measurement failed", distinct from a genuine value.
pub const SENTINEL_FAILED: u16 = 1;

/// In-flight measurement cycle state. Exactly one per scheduler; written
/// only by the scheduler after processing an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    AwaitingDistance,
    AwaitingSpeed,
}

pub struct Scheduler<R: RadarSensor, T: Transport> {
    pub(crate) sensor: R,
    pub(crate) transport: T,
    pub(crate) clock: Arc<dyn Clock + Send + Sync>,
    pub(crate) epoch: Instant,

    pub(crate) queue: Arc<EventQueue>,
    pub(crate) readings: Arc<Readings>,
    pub(crate) log: MeasurementLog,

    pub(crate) startup: Countdown,
    pub(crate) measure: Countdown,
    pub(crate) upload: Countdown,
    pub(crate) timeout: Countdown,

    pub(crate) access_token: String,

    pub(crate) state: State,
    pub(crate) next_state: State,
    pub(crate) timeout_retries: u8,
    pub(crate) upload_due: bool,
    pub(crate) last_distance: u16,
    pub(crate) current: Option<RecordHandle>,
    pub(crate) upload_count: u64,
    pub(crate) initialized: bool,
}

impl<R: RadarSensor, T: Transport> core::fmt::Debug for Scheduler<R, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("pending_events", &self.queue.len())
            .field("pending_records", &self.log.len())
            .field("upload_due", &self.upload_due)
            .finish()
    }
}

impl<R: RadarSensor, T: Transport> Scheduler<R, T> {
    /// Arm the startup timer. Call exactly once before the first `tick()`.
    pub fn initialize(&mut self) {
        if self.initialized {
            tracing::warn!("scheduler already initialized");
            return;
        }
        let now = self.clock.ms_since(self.epoch);
        self.startup.arm(now);
        self.initialized = true;
        tracing::info!("scheduler initialized, startup timer armed");
    }

    /// One scheduler tick. Never blocks, never fails.
    pub fn tick(&mut self) {
        self.state = self.next_state;
        let now = self.clock.ms_since(self.epoch);
        self.poll_timers(now);

        // Upload is low-priority and idempotent; it is polled here rather
        // than queued so measurement events can never starve it, and a new
        // cycle may still start on this same tick.
        if self.state == State::Idle && self.upload_due {
            self.upload();
            self.upload_due = false;
        }

        let event = self.queue.take();
        self.next_state = self.dispatch(now, event);
    }

    /// Handle for the sensor collaborator: publishes readings and posts
    /// completion events from its own context.
    pub fn sensor_port(&self) -> SensorPort {
        SensorPort {
            queue: Arc::clone(&self.queue),
            readings: Arc::clone(&self.readings),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Access to the sensor collaborator, e.g. to connect a simulated board
    /// to this scheduler's port after construction.
    pub fn sensor_mut(&mut self) -> &mut R {
        &mut self.sensor
    }

    pub fn pending_records(&self) -> usize {
        self.log.len()
    }

    pub fn records_dropped(&self) -> u64 {
        self.log.dropped()
    }

    pub fn upload_count(&self) -> u64 {
        self.upload_count
    }

    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        Arc::clone(&self.clock)
    }

    // ── Private: timers, dispatch, transitions ──────────────────────────────

    fn poll_timers(&mut self, now: u64) {
        if self.startup.poll(now) {
            self.measure.arm(now);
            self.upload.arm(now);
            tracing::info!("startup delay elapsed, periodic timers running");
        }
        if self.measure.poll(now) && self.queue.post(Event::MeasureTimerFired).is_err() {
            tracing::warn!("event queue full, measure tick dropped");
        }
        if self.upload.poll(now) {
            self.upload_due = true;
        }
        if self.timeout.poll(now) {
            let generation = self.timeout.generation();
            if self
                .queue
                .post(Event::MeasurementTimeout { generation })
                .is_err()
            {
                tracing::warn!("event queue full, timeout event dropped");
            }
        }
    }

    fn dispatch(&mut self, now: u64, event: Option<Event>) -> State {
        match (self.state, event) {
            (state, None) => state,
            (State::Idle, Some(Event::MeasureTimerFired)) => self.begin_cycle(now),
            (State::AwaitingDistance, Some(Event::DistanceReceived)) => self.on_distance(now),
            (State::AwaitingSpeed, Some(Event::SpeedReceived)) => self.on_speed(),
            (state, Some(Event::MeasurementTimeout { generation })) => {
                if generation != self.timeout.generation() {
                    tracing::debug!(
                        generation,
                        current = self.timeout.generation(),
                        "stale measurement timeout discarded"
                    );
                    return state;
                }
                match state {
                    State::AwaitingDistance => self.on_distance_timeout(now),
                    State::AwaitingSpeed => self.on_speed_timeout(now),
                    State::Idle => state,
                }
            }
            (state, Some(event)) => {
                tracing::trace!(?state, ?event, "event ignored in current state");
                state
            }
        }
    }

    fn begin_cycle(&mut self, now: u64) -> State {
        let handle = self.log.start_record();
        let ts = self.transport.query_network_time();
        if ts == 0 {
            tracing::debug!("network time unavailable, recording timestamp 0");
        }
        self.log.set_time(handle, ts);
        self.current = Some(handle);
        self.timeout_retries = 0;
        if let Err(e) = self.sensor.trigger_distance() {
            tracing::warn!(error = %e, "distance trigger failed");
        }
        self.timeout.arm(now);
        tracing::debug!(ts, "measurement cycle started");
        State::AwaitingDistance
    }

    fn on_distance(&mut self, now: u64) -> State {
        self.timeout.stop();
        let distance = self.readings.distance();
        let Some(handle) = self.current else {
            tracing::warn!("distance completion without an open record");
            return State::Idle;
        };
        self.log.set_distance(handle, distance);
        if distance == 0 {
            // No target in view; legitimately skip the speed phase.
            self.log.set_speed(handle, 0);
            self.current = None;
            tracing::debug!("no target, cycle complete");
            return State::Idle;
        }
        self.last_distance = distance;
        self.timeout_retries = 0;
        if let Err(e) = self.sensor.trigger_speed(distance) {
            tracing::warn!(error = %e, "speed trigger failed");
        }
        self.timeout.arm(now);
        tracing::debug!(distance, "distance received, awaiting speed");
        State::AwaitingSpeed
    }

    fn on_speed(&mut self) -> State {
        self.timeout.stop();
        let speed = self.readings.speed();
        if let Some(handle) = self.current {
            self.log.set_speed(handle, speed);
        }
        self.current = None;
        tracing::debug!(speed, "measurement cycle complete");
        State::Idle
    }

    fn on_distance_timeout(&mut self, now: u64) -> State {
        if self.timeout_retries < MAX_TIMEOUT_RETRIES {
            self.timeout_retries += 1;
            tracing::debug!(retry = self.timeout_retries, "distance timeout, retrying");
            if let Err(e) = self.sensor.trigger_distance() {
                tracing::warn!(error = %e, "distance retry trigger failed");
            }
            self.timeout.arm(now);
            return State::AwaitingDistance;
        }
        tracing::warn!("distance phase abandoned after retry");
        if let Some(handle) = self.current {
            self.log.set_distance(handle, SENTINEL_FAILED);
            self.log.set_speed(handle, SENTINEL_FAILED);
        }
        self.current = None;
        self.timeout_retries = 0;
        State::Idle
    }

    fn on_speed_timeout(&mut self, now: u64) -> State {
        if self.timeout_retries < MAX_TIMEOUT_RETRIES {
            self.timeout_retries += 1;
            tracing::debug!(retry = self.timeout_retries, "speed timeout, retrying");
            if let Err(e) = self.sensor.trigger_speed(self.last_distance) {
                tracing::warn!(error = %e, "speed retry trigger failed");
            }
            self.timeout.arm(now);
            return State::AwaitingSpeed;
        }
        tracing::warn!("speed phase abandoned after retry");
        if let Some(handle) = self.current {
            self.log.set_speed(handle, SENTINEL_FAILED);
        }
        self.current = None;
        self.timeout_retries = 0;
        State::Idle
    }

    fn upload(&mut self) {
        let rsrp = self.transport.query_signal_power();
        let records = self.log.drain();
        let payload = report::render(&records, &rsrp);
        self.upload_count += 1;
        match self.transport.send_report(&payload, &self.access_token) {
            Ok(()) => {
                tracing::info!(
                    records = records.len(),
                    upload = self.upload_count,
                    rsrp = %rsrp,
                    "report sent"
                );
            }
            Err(e) => {
                // Not retried here; the next upload period re-attempts with
                // whatever has accumulated by then.
                tracing::warn!(error = %e, "report send failed");
            }
        }
    }
}
