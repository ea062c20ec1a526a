//! Bounded, append-only log of completed measurement cycles.
//!
//! Records are produced in trigger order and drained wholesale on upload, so
//! the report sees them as an ordered sequence. The log is owned by the
//! scheduler; overflow drops the oldest record (most recent data wins) and
//! is counted and logged rather than silently corrupting the write cursor.

use std::collections::VecDeque;

use serde::Serialize;

/// Default record capacity; overridable through the scheduler builder.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// One measurement cycle result. Sentinel values (distance=1/speed=1) mark a
/// phase abandoned after the retry budget was spent; speed=0 with a genuine
/// distance of 0 means "no target".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeasurementRecord {
    /// Unix network time in ms; 0 when no time was available.
    pub timestamp_ms: u64,
    pub distance: u16,
    pub speed: u16,
}

/// Handle to an in-flight record slot, returned by [`MeasurementLog::start_record`].
/// Stays valid across setter calls unless the slot was dropped by overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHandle(u64);

#[derive(Debug)]
pub struct MeasurementLog {
    records: VecDeque<MeasurementRecord>,
    capacity: usize,
    /// Id of records.front(); handles are ids, so a drop shifts nothing.
    first_id: u64,
    next_id: u64,
    dropped: u64,
}

impl MeasurementLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            first_id: 0,
            next_id: 0,
            dropped: 0,
        }
    }

    /// Open a new record slot and return its handle. When the log is full
    /// the oldest record is dropped to make room.
    pub fn start_record(&mut self) -> RecordHandle {
        if self.records.len() == self.capacity {
            self.records.pop_front();
            self.first_id += 1;
            self.dropped += 1;
            tracing::warn!(
                capacity = self.capacity,
                dropped_total = self.dropped,
                "measurement log full, dropped oldest record"
            );
        }
        let id = self.next_id;
        self.next_id += 1;
        self.records.push_back(MeasurementRecord::default());
        RecordHandle(id)
    }

    pub fn set_time(&mut self, handle: RecordHandle, timestamp_ms: u64) {
        if let Some(rec) = self.slot(handle) {
            rec.timestamp_ms = timestamp_ms;
        }
    }

    pub fn set_distance(&mut self, handle: RecordHandle, distance: u16) {
        if let Some(rec) = self.slot(handle) {
            rec.distance = distance;
        }
    }

    pub fn set_speed(&mut self, handle: RecordHandle, speed: u16) {
        if let Some(rec) = self.slot(handle) {
            rec.speed = speed;
        }
    }

    /// Remove and return every record in append order, resetting the log.
    pub fn drain(&mut self) -> Vec<MeasurementRecord> {
        self.first_id = self.next_id;
        self.records.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total records lost to overflow since construction.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    fn slot(&mut self, handle: RecordHandle) -> Option<&mut MeasurementRecord> {
        let idx = handle.0.checked_sub(self.first_id)?;
        let rec = self.records.get_mut(idx as usize);
        if rec.is_none() {
            // Slot was dropped by overflow or already drained; the write is
            // lost, matching the drop-oldest policy.
            tracing::warn!(handle = handle.0, "write to dropped measurement record");
        }
        rec
    }
}
