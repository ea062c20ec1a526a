#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions)]
//! `radar` binary: runs the measurement scheduler against simulated radar
//! boards and a simulated cellular transport, driven by a TOML config.

mod cli;
mod error_fmt;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use clap::Parser;
use eyre::WrapErr;
use radar_config::{Config, Logging};
use radar_core::event::{Event, EventQueue, Readings, SensorPort};
use radar_core::runner::{self, RunParams};
use radar_core::{Scheduler, TimerCfg};
use radar_hardware::{RadarProfile, SimulatedRadar, SimulatedTransport};
use radar_traits::RadarSensor;
use radar_traits::clock::{Clock, MonotonicClock};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::{Cli, Commands, FILE_GUARD, JSON_MODE};

fn main() {
    let args = Cli::parse();
    let _ = JSON_MODE.set(args.json);
    if let Err(err) = run(args) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            let obj = serde_json::json!({
                "error": error_fmt::humanize(&err),
                "detail": format!("{err:#}"),
            });
            eprintln!("{obj}");
        } else {
            eprintln!("{}", error_fmt::humanize(&err));
        }
        std::process::exit(1);
    }
}

fn run(args: Cli) -> eyre::Result<()> {
    color_eyre::install()?;
    let Cli {
        config,
        json,
        log_level,
        cmd,
    } = args;

    match cmd {
        Commands::Run {
            ticks,
            distance,
            speed,
            silent,
        } => {
            let cfg = load_config(&config)?;
            init_logging(json, log_level.as_deref(), &cfg.logging);
            tracing::info!(config = %config.display(), "config loaded");
            run_scheduler(&cfg, ticks, distance, speed, silent)
        }
        Commands::SelfCheck => {
            // Self-check must work without a config file present.
            init_logging(json, log_level.as_deref(), &Logging::default());
            self_check()
        }
    }
}

fn load_config(path: &PathBuf) -> eyre::Result<Config> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read config {}", path.display()))?;
    let cfg = radar_config::load_toml(&text).wrap_err("failed to parse config TOML")?;
    cfg.validate()?;
    Ok(cfg)
}

fn init_logging(json: bool, cli_level: Option<&str>, logging: &Logging) {
    // An explicit --log-level beats the config file; RUST_LOG beats both.
    let level = cli_level.or(logging.level.as_deref()).unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Optional JSON-lines file sink next to the console layer.
    let file_layer = logging.file.as_deref().map(|path| {
        let path = Path::new(path);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| std::ffi::OsString::from("radar.log"), ToOwned::to_owned);
        let appender = match logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let _ = FILE_GUARD.set(guard);
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
    });

    let base = tracing_subscriber::registry().with(filter).with(file_layer);
    if json {
        base.with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        base.with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

fn run_scheduler(
    cfg: &Config,
    ticks: Option<u64>,
    distance: Option<u16>,
    speed: Option<u16>,
    silent: bool,
) -> eyre::Result<()> {
    let mut profile = RadarProfile::default();
    if silent {
        profile.distance = None;
        profile.speed = None;
    }
    if let Some(d) = distance {
        profile.distance = Some(d);
    }
    if let Some(s) = speed {
        profile.speed = Some(s);
    }

    tracing::info!(?profile, "starting scheduler against simulated boards");
    let clock: Arc<dyn Clock + Send + Sync> = Arc::new(MonotonicClock::new());
    let radar = SimulatedRadar::new(profile.clone(), Arc::clone(&clock));
    let transport = SimulatedTransport::new();

    let mut scheduler = Scheduler::builder()
        .with_sensor(radar)
        .with_transport(transport)
        .with_clock(clock)
        .with_timers(TimerCfg::from(&cfg.timers))
        .with_queue_capacity(cfg.scheduler.event_queue_capacity)
        .with_log_capacity(cfg.scheduler.log_capacity)
        .with_access_token(cfg.transport.access_token.clone())
        .build()?;
    let port = scheduler.sensor_port();
    scheduler.sensor_mut().connect(port);

    let shutdown = Arc::new(AtomicBool::new(false));
    let sd = Arc::clone(&shutdown);
    ctrlc::set_handler(move || sd.store(true, Ordering::Relaxed))
        .wrap_err("failed to install Ctrl-C handler")?;

    let params = RunParams {
        tick_period_ms: cfg.scheduler.tick_period_ms,
        max_ticks: ticks,
    };
    let ticks_run = runner::run(&mut scheduler, &params, &shutdown);
    tracing::info!(
        ticks = ticks_run,
        uploads = scheduler.upload_count(),
        records_dropped = scheduler.records_dropped(),
        "scheduler run complete"
    );
    println!(
        "ran {ticks_run} ticks: {} uploads, {} records pending, {} dropped",
        scheduler.upload_count(),
        scheduler.pending_records(),
        scheduler.records_dropped()
    );
    Ok(())
}

/// Trigger the simulated distance board once and wait for its completion
/// event, bypassing the scheduler.
fn self_check() -> eyre::Result<()> {
    let queue = Arc::new(EventQueue::new(4));
    let readings = Arc::new(Readings::default());
    let port = SensorPort::new(Arc::clone(&queue), Arc::clone(&readings));

    let profile = RadarProfile {
        response_delay: Duration::from_millis(10),
        ..RadarProfile::default()
    };
    let mut radar = SimulatedRadar::new(profile, Arc::new(MonotonicClock::new()));
    radar.connect(port);
    radar
        .trigger_distance()
        .map_err(|e| eyre::eyre!("radar trigger failed: {e}"))?;

    let deadline = Instant::now() + Duration::from_secs(1);
    loop {
        if let Some(Event::DistanceReceived) = queue.take() {
            tracing::info!(distance = readings.distance(), "self-check passed");
            println!(
                "self-check ok: simulated board answered distance {}",
                readings.distance()
            );
            return Ok(());
        }
        if Instant::now() >= deadline {
            eyre::bail!("self-check failed: no completion event within 1s");
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}
