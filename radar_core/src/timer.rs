//! Deadline-based countdown timers.
//!
//! The scheduler polls its timers once per tick against the shared `Clock`
//! epoch. A periodic timer re-arms itself on expiry; a one-shot disarms.
//! The generation counter ties a timeout expiry to the arming that produced
//! it: both arming and stopping bump the generation, so a queued expiry from
//! a phase that has since completed or been re-armed no longer matches.

/// One countdown timer with a period and one-shot/periodic mode.
#[derive(Debug)]
pub struct Countdown {
    period_ms: u64,
    periodic: bool,
    deadline_ms: Option<u64>,
    generation: u32,
}

impl Countdown {
    pub fn one_shot(period_ms: u64) -> Self {
        Self {
            period_ms,
            periodic: false,
            deadline_ms: None,
            generation: 0,
        }
    }

    pub fn periodic(period_ms: u64) -> Self {
        Self {
            period_ms,
            periodic: true,
            deadline_ms: None,
            generation: 0,
        }
    }

    /// Arm (or re-arm) relative to `now_ms`. Invalidates any pending expiry.
    pub fn arm(&mut self, now_ms: u64) {
        self.generation = self.generation.wrapping_add(1);
        self.deadline_ms = Some(now_ms.saturating_add(self.period_ms));
    }

    /// Disarm. Invalidates any pending expiry.
    pub fn stop(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.deadline_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Current arming generation; an expiry event is live only while its
    /// generation matches this value.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns true when the timer expired at or before `now_ms`. A periodic
    /// timer re-arms from its deadline (not from `now_ms`, so slow ticks do
    /// not accumulate drift); a one-shot disarms.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                if self.periodic {
                    self.deadline_ms = Some(deadline.saturating_add(self.period_ms));
                } else {
                    self.deadline_ms = None;
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once_then_disarms() {
        let mut t = Countdown::one_shot(1000);
        t.arm(0);
        assert!(!t.poll(999));
        assert!(t.poll(1000));
        assert!(!t.is_armed());
        assert!(!t.poll(5000));
    }

    #[test]
    fn periodic_rearms_from_deadline() {
        let mut t = Countdown::periodic(100);
        t.arm(0);
        assert!(t.poll(100));
        // Late poll: next deadline is 200, anchored to the previous one.
        assert!(t.poll(230));
        assert!(!t.poll(299));
        assert!(t.poll(300));
    }

    #[test]
    fn arm_and_stop_invalidate_generation() {
        let mut t = Countdown::one_shot(1300);
        t.arm(0);
        let g1 = t.generation();
        assert!(t.poll(1300));
        t.arm(1300);
        assert_ne!(t.generation(), g1);
        t.stop();
        assert_ne!(t.generation(), g1);
        assert!(!t.is_armed());
    }
}
