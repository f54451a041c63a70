//! Cycle scheduler.
//!
//! Replaces a bare `wait(interval)` at the top of the loop with an
//! explicit decision driven by an injected time source. The service asks
//! [`CycleScheduler::poll`] with the current time and either runs a cycle
//! or waits the returned number of milliseconds.
//!
//! ```text
//!  start(t0)          due            due            due
//!     │──── interval ───│── interval ───│── interval ───│
//!     t0           t0 + i         t0 + 2i        t0 + 3i
//! ```
//!
//! Deadlines advance by exactly one interval so a cycle that runs a
//! little late does not shift the cadence. If the loop falls more than a
//! full interval behind, missed cycles are skipped and the cadence
//! restarts from now; nothing is replayed.

use log::warn;

// ═══════════════════════════════════════════════════════════════
//  Poll result
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A cycle should run now.
    Due,
    /// Nothing to do yet; wait this long (ms).
    WaitMs(u32),
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

pub struct CycleScheduler {
    interval_ms: u32,
    /// `None` until [`start`](Self::start) is called.
    next_due_ms: Option<u64>,
    skipped_cycles: u64,
}

impl CycleScheduler {
    /// `interval_ms` is clamped to at least 1 ms.
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
            skipped_cycles: 0,
        }
    }

    /// Arm the scheduler. The first cycle is due one interval after `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms + u64::from(self.interval_ms));
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Cycles dropped because the loop fell behind.
    pub fn skipped_cycles(&self) -> u64 {
        self.skipped_cycles
    }

    /// Decide whether a cycle is due at `now_ms`. Returns [`Poll::Due`]
    /// at most once per deadline. An unstarted scheduler starts itself.
    pub fn poll(&mut self, now_ms: u64) -> Poll {
        let interval = u64::from(self.interval_ms);
        let Some(due) = self.next_due_ms else {
            self.start(now_ms);
            return Poll::WaitMs(self.interval_ms);
        };

        if now_ms < due {
            // Bounded by one interval, which fits in u32.
            return Poll::WaitMs((due - now_ms).min(interval) as u32);
        }

        let late = now_ms - due;
        if late >= interval {
            let skipped = late / interval;
            self.skipped_cycles += skipped;
            warn!("Cycle overrun: {} ms late, skipping {} cycle(s)", late, skipped);
            self.next_due_ms = Some(now_ms + interval);
        } else {
            self.next_due_ms = Some(due + interval);
        }
        Poll::Due
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
