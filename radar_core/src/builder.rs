//! Builder for [`Scheduler`].

use std::sync::Arc;

use radar_traits::clock::{Clock, MonotonicClock};
use radar_traits::{RadarSensor, Transport};

use crate::config::TimerCfg;
use crate::core::{Scheduler, State};
use crate::error::{BuildError, Result};
use crate::event::{DEFAULT_EVENT_QUEUE_CAPACITY, EventQueue, Readings};
use crate::log::{DEFAULT_LOG_CAPACITY, MeasurementLog};
use crate::timer::Countdown;

pub struct SchedulerBuilder<R, T> {
    sensor: Option<R>,
    transport: Option<T>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    timers: TimerCfg,
    queue_capacity: usize,
    log_capacity: usize,
    access_token: Option<String>,
}

impl<R: RadarSensor, T: Transport> Scheduler<R, T> {
    pub fn builder() -> SchedulerBuilder<R, T> {
        SchedulerBuilder {
            sensor: None,
            transport: None,
            clock: None,
            timers: TimerCfg::default(),
            queue_capacity: DEFAULT_EVENT_QUEUE_CAPACITY,
            log_capacity: DEFAULT_LOG_CAPACITY,
            access_token: None,
        }
    }
}

impl<R: RadarSensor, T: Transport> SchedulerBuilder<R, T> {
    pub fn with_sensor(mut self, sensor: R) -> Self {
        self.sensor = Some(sensor);
        self
    }

    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_timers(mut self, timers: TimerCfg) -> Self {
        self.timers = timers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_log_capacity(mut self, capacity: usize) -> Self {
        self.log_capacity = capacity;
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn build(self) -> Result<Scheduler<R, T>> {
        let sensor = self
            .sensor
            .ok_or_else(|| eyre::Report::new(BuildError::MissingSensor))?;
        let transport = self
            .transport
            .ok_or_else(|| eyre::Report::new(BuildError::MissingTransport))?;
        let access_token = self
            .access_token
            .ok_or_else(|| eyre::Report::new(BuildError::MissingAccessToken))?;
        if access_token.is_empty() {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "access token must not be empty",
            )));
        }
        let t = &self.timers;
        if t.startup_delay_ms == 0
            || t.measure_period_ms == 0
            || t.upload_period_ms == 0
            || t.measure_timeout_ms == 0
        {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "timer periods must be >= 1 ms",
            )));
        }
        if self.queue_capacity == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "event queue capacity must be >= 1",
            )));
        }
        if self.log_capacity == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "measurement log capacity must be >= 1",
            )));
        }

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        let epoch = clock.now();

        Ok(Scheduler {
            sensor,
            transport,
            clock,
            epoch,
            queue: Arc::new(EventQueue::new(self.queue_capacity)),
            readings: Arc::new(Readings::default()),
            log: MeasurementLog::new(self.log_capacity),
            startup: Countdown::one_shot(t.startup_delay_ms),
            measure: Countdown::periodic(t.measure_period_ms),
            upload: Countdown::periodic(t.upload_period_ms),
            timeout: Countdown::one_shot(t.measure_timeout_ms),
            access_token,
            state: State::Idle,
            next_state: State::Idle,
            timeout_retries: 0,
            upload_due: false,
            last_distance: 0,
            current: None,
            upload_count: 0,
            initialized: false,
        })
    }
}
