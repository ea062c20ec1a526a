//! Events and the fixed-capacity event queue.
//!
//! Timer expiries and sensor completions are demultiplexed through a single
//! FIFO queue that the scheduler drains one event per tick. Producers run in
//! other threads (timer callbacks, the sensor worker), so the ring is guarded
//! by a mutex with short critical sections: a producer publishes the slot
//! under the lock and the consumer observes it under the same lock, which
//! gives the release/acquire pairing the producer/consumer protocol needs.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU16, Ordering};

use crate::error::QueueFull;

/// Default ring capacity; overridable through the scheduler builder.
pub const DEFAULT_EVENT_QUEUE_CAPACITY: usize = 10;

/// A pending scheduler event. Events carry no measurement payload; readings
/// are published to [`Readings`] by the sensor collaborator before the event
/// is posted, and read back by the handler.
///
/// `MeasurementTimeout` carries the generation of the timeout-timer arming
/// that produced it, so an expiry queued before the timer was stopped is
/// provably stale and gets discarded instead of racily matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    MeasureTimerFired,
    DistanceReceived,
    SpeedReceived,
    MeasurementTimeout { generation: u32 },
}

struct Ring {
    slots: Vec<Event>,
    head: usize,
    tail: usize,
    /// Disambiguates empty from full when head == tail.
    full: bool,
}

/// Bounded FIFO event queue.
///
/// Insertion order is arrival order; the scheduler must observe events in
/// the order they were generated so that a `MeasurementTimeout` is never
/// processed ahead of a completion that preceded it. Posting to a full
/// queue fails without touching the queued entries.
pub struct EventQueue {
    ring: Mutex<Ring>,
    capacity: usize,
}

impl EventQueue {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            ring: Mutex::new(Ring {
                slots: vec![Event::MeasureTimerFired; capacity],
                head: 0,
                tail: 0,
                full: false,
            }),
            capacity,
        }
    }

    /// Append an event; `Err(QueueFull)` drops it and leaves the queue as-is.
    pub fn post(&self, event: Event) -> Result<(), QueueFull> {
        let mut ring = self.ring.lock().unwrap_or_else(|p| p.into_inner());
        if ring.full {
            return Err(QueueFull);
        }
        let tail = ring.tail;
        ring.slots[tail] = event;
        ring.tail = (tail + 1) % self.capacity;
        ring.full = ring.tail == ring.head;
        Ok(())
    }

    /// Pop the oldest event, if any.
    pub fn take(&self) -> Option<Event> {
        let mut ring = self.ring.lock().unwrap_or_else(|p| p.into_inner());
        if ring.head == ring.tail && !ring.full {
            return None;
        }
        let head = ring.head;
        let event = ring.slots[head];
        ring.head = (head + 1) % self.capacity;
        ring.full = false;
        Some(event)
    }

    pub fn len(&self) -> usize {
        let ring = self.ring.lock().unwrap_or_else(|p| p.into_inner());
        if ring.full {
            self.capacity
        } else {
            (ring.tail + self.capacity - ring.head) % self.capacity
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Shared measurement state written by the sensor collaborator and read by
/// the event handlers. Single writer per field from the completion context;
/// reads are unsynchronized polls, hence the atomics.
#[derive(Debug, Default)]
pub struct Readings {
    distance: AtomicU16,
    speed: AtomicU16,
}

impl Readings {
    pub fn distance(&self) -> u16 {
        self.distance.load(Ordering::Acquire)
    }

    pub fn speed(&self) -> u16 {
        self.speed.load(Ordering::Acquire)
    }

    pub(crate) fn set_distance(&self, v: u16) {
        self.distance.store(v, Ordering::Release);
    }

    pub(crate) fn set_speed(&self, v: u16) {
        self.speed.store(v, Ordering::Release);
    }
}

/// Narrow handle given to the sensor collaborator: publish the reading, then
/// post the completion event. Clonable and cheap; safe to use from the
/// sensor's own thread.
#[derive(Clone)]
pub struct SensorPort {
    pub(crate) queue: std::sync::Arc<EventQueue>,
    pub(crate) readings: std::sync::Arc<Readings>,
}

impl SensorPort {
    pub fn new(
        queue: std::sync::Arc<EventQueue>,
        readings: std::sync::Arc<Readings>,
    ) -> Self {
        Self { queue, readings }
    }

    pub fn complete_distance(&self, distance: u16) -> Result<(), QueueFull> {
        self.readings.set_distance(distance);
        self.queue.post(Event::DistanceReceived)
    }

    pub fn complete_speed(&self, speed: u16) -> Result<(), QueueFull> {
        self.readings.set_speed(speed);
        self.queue.post(Event::SpeedReceived)
    }

    /// Raw event injection, used by timer callbacks and tests.
    pub fn post(&self, event: Event) -> Result<(), QueueFull> {
        self.queue.post(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_and_wraparound() {
        let q = EventQueue::new(3);
        assert!(q.post(Event::MeasureTimerFired).is_ok());
        assert!(q.post(Event::DistanceReceived).is_ok());
        assert_eq!(q.take(), Some(Event::MeasureTimerFired));
        // Wrap across the ring boundary.
        assert!(q.post(Event::SpeedReceived).is_ok());
        assert!(q.post(Event::MeasurementTimeout { generation: 7 }).is_ok());
        assert_eq!(q.take(), Some(Event::DistanceReceived));
        assert_eq!(q.take(), Some(Event::SpeedReceived));
        assert_eq!(q.take(), Some(Event::MeasurementTimeout { generation: 7 }));
        assert_eq!(q.take(), None);
    }

    #[test]
    fn full_queue_rejects_without_clobbering() {
        let q = EventQueue::new(2);
        q.post(Event::MeasureTimerFired).unwrap();
        q.post(Event::DistanceReceived).unwrap();
        assert_eq!(q.post(Event::SpeedReceived), Err(QueueFull));
        assert_eq!(q.len(), 2);
        assert_eq!(q.take(), Some(Event::MeasureTimerFired));
        assert_eq!(q.take(), Some(Event::DistanceReceived));
        assert_eq!(q.take(), None);
    }

    #[test]
    fn empty_and_full_disambiguated_at_equal_indices() {
        let q = EventQueue::new(1);
        assert!(q.is_empty());
        q.post(Event::MeasureTimerFired).unwrap();
        assert_eq!(q.len(), 1);
        assert_eq!(q.post(Event::MeasureTimerFired), Err(QueueFull));
        assert_eq!(q.take(), Some(Event::MeasureTimerFired));
        assert!(q.is_empty());
    }
}
