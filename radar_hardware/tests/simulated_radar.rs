use std::sync::Arc;
use std::time::{Duration, Instant};

use radar_core::event::{Event, EventQueue, Readings, SensorPort};
use radar_hardware::error::HwError;
use radar_hardware::{RadarProfile, SimulatedRadar};
use radar_traits::RadarSensor;
use radar_traits::clock::test_clock::TestClock;

fn port() -> (Arc<EventQueue>, Arc<Readings>, SensorPort) {
    let queue = Arc::new(EventQueue::new(8));
    let readings = Arc::new(Readings::default());
    let port = SensorPort::new(Arc::clone(&queue), Arc::clone(&readings));
    (queue, readings, port)
}

/// The worker thread runs on its own schedule, so poll the queue with a
/// real-time deadline rather than sleeping a fixed amount.
fn wait_for_event(queue: &EventQueue, deadline: Duration) -> Option<Event> {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if let Some(event) = queue.take() {
            return Some(event);
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    None
}

#[test]
fn trigger_distance_completes_through_port() {
    let (queue, readings, port) = port();
    // TestClock sleeps advance simulated time only, so the response delay
    // does not slow the test down.
    let mut radar = SimulatedRadar::new(RadarProfile::default(), Arc::new(TestClock::new()));
    radar.connect(port);

    radar.trigger_distance().expect("trigger");
    assert_eq!(
        wait_for_event(&queue, Duration::from_secs(2)),
        Some(Event::DistanceReceived)
    );
    assert_eq!(readings.distance(), 200);
}

#[test]
fn trigger_speed_completes_through_port() {
    let (queue, readings, port) = port();
    let profile = RadarProfile {
        speed: Some(37),
        ..RadarProfile::default()
    };
    let mut radar = SimulatedRadar::new(profile, Arc::new(TestClock::new()));
    radar.connect(port);

    radar.trigger_speed(200).expect("trigger");
    assert_eq!(
        wait_for_event(&queue, Duration::from_secs(2)),
        Some(Event::SpeedReceived)
    );
    assert_eq!(readings.speed(), 37);
}

#[test]
fn silent_board_posts_nothing() {
    let (queue, _readings, port) = port();
    let profile = RadarProfile {
        distance: None,
        ..RadarProfile::default()
    };
    let mut radar = SimulatedRadar::new(profile, Arc::new(TestClock::new()));
    radar.connect(port);

    radar.trigger_distance().expect("trigger");
    assert_eq!(wait_for_event(&queue, Duration::from_millis(100)), None);
}

#[test]
fn trigger_before_connect_fails() {
    let mut radar = SimulatedRadar::new(RadarProfile::default(), Arc::new(TestClock::new()));
    let err = radar.trigger_distance().expect_err("not connected yet");
    let hw = err.downcast_ref::<HwError>().expect("hardware error");
    assert!(matches!(hw, HwError::Disconnected));
}
