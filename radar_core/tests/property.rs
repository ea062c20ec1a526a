//! Property tests: the event ring against a model queue, and the bounded
//! log's drop-oldest policy.

use std::collections::VecDeque;

use proptest::prelude::*;
use radar_core::log::MeasurementLog;
use radar_core::{Event, EventQueue};

#[derive(Debug, Clone, Copy)]
enum Op {
    Post(Event),
    Take,
}

fn event_strategy() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::MeasureTimerFired),
        Just(Event::DistanceReceived),
        Just(Event::SpeedReceived),
        any::<u32>().prop_map(|generation| Event::MeasurementTimeout { generation }),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => event_strategy().prop_map(Op::Post),
        2 => Just(Op::Take),
    ]
}

proptest! {
    /// The ring behaves exactly like a bounded FIFO model: same accepted
    /// posts, same pop order, same occupancy.
    #[test]
    fn ring_matches_model_queue(
        capacity in 1usize..8,
        ops in proptest::collection::vec(op_strategy(), 0..64),
    ) {
        let queue = EventQueue::new(capacity);
        let mut model: VecDeque<Event> = VecDeque::new();

        for op in ops {
            match op {
                Op::Post(event) => {
                    let accepted = queue.post(event).is_ok();
                    if model.len() < capacity {
                        prop_assert!(accepted);
                        model.push_back(event);
                    } else {
                        prop_assert!(!accepted);
                    }
                }
                Op::Take => {
                    prop_assert_eq!(queue.take(), model.pop_front());
                }
            }
            prop_assert_eq!(queue.len(), model.len());
        }

        // Drain to empty in FIFO order.
        while let Some(expected) = model.pop_front() {
            prop_assert_eq!(queue.take(), Some(expected));
        }
        prop_assert_eq!(queue.take(), None);
    }

    /// However many records are started, the log never exceeds capacity and
    /// a drain yields the newest `capacity` records in start order.
    #[test]
    fn log_keeps_newest_records_up_to_capacity(
        capacity in 1usize..6,
        starts in 0usize..20,
    ) {
        let mut log = MeasurementLog::new(capacity);
        for i in 0..starts {
            let handle = log.start_record();
            log.set_distance(handle, i as u16);
            prop_assert!(log.len() <= capacity);
        }

        let records = log.drain();
        prop_assert_eq!(records.len(), starts.min(capacity));
        let first_kept = starts.saturating_sub(capacity);
        for (offset, record) in records.iter().enumerate() {
            prop_assert_eq!(record.distance, (first_kept + offset) as u16);
        }
        prop_assert_eq!(log.dropped(), first_kept as u64);
    }
}
