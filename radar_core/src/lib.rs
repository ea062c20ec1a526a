#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core measurement scheduling logic (hardware-agnostic).
//!
//! This crate coordinates distance/speed measurement cycles from radar
//! sensor boards and reporting over a cellular link. All hardware and
//! network interaction goes through `radar_traits::RadarSensor` and
//! `radar_traits::Transport`.
//!
//! ## Architecture
//!
//! - **Events**: queue of pending timer/completion events (`event` module)
//! - **Timers**: startup, measure, upload, and per-phase timeout countdowns
//!   (`timer` module)
//! - **Scheduler**: one-event-per-tick state machine (`Scheduler`)
//! - **Log**: bounded record log drained on upload (`log` module)
//! - **Report**: JSON payload rendering (`report` module)
//!
//! The scheduler is single-threaded and cooperative: `tick()` never blocks.
//! Sensor completions arrive from another context through [`SensorPort`],
//! which publishes the reading and posts the event.

// Module declarations
pub mod config;
pub mod conversions;
pub mod error;
pub mod event;
pub mod log;
pub mod mocks;
pub mod report;
pub mod runner;
pub mod timer;

mod builder;
mod core;

pub use crate::config::TimerCfg;
pub use crate::core::{MAX_TIMEOUT_RETRIES, SENTINEL_FAILED, Scheduler, State};
pub use crate::error::{BuildError, QueueFull};
pub use crate::event::{DEFAULT_EVENT_QUEUE_CAPACITY, Event, EventQueue, Readings, SensorPort};
pub use crate::log::{DEFAULT_LOG_CAPACITY, MeasurementLog, MeasurementRecord, RecordHandle};
pub use builder::SchedulerBuilder;
