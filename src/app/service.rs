//! Application service: the hexagonal core.
//!
//! [`PanelService`] owns the arm state, the reusable status frame and the
//! cycle scheduler. All I/O flows through port traits injected at call
//! sites, making the entire service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │      PanelService      │
//! DisplayPort ◀── │ reduce · arm · encode  │ ──▶ SerialPort (primary, debug)
//!                 └────────────────────────┘
//!                            ▲
//!                        ClockPort
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::panel::{self, ArmState, KnownTags};
use crate::protocol::{self, StatusFrame, StatusRecord};
use crate::scheduler::{CycleScheduler, Poll};
use crate::sensors::{self, Thresholds};

use super::events::AppEvent;
use super::ports::{ClockPort, DisplayPort, EventSink, Notice, SensorPort, SerialPort};

/// What one cycle produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub record: StatusRecord,
    pub state: ArmState,
    /// Whether the frame went out on the primary link.
    pub sent: bool,
}

// ───────────────────────────────────────────────────────────────
// PanelService
// ───────────────────────────────────────────────────────────────

pub struct PanelService {
    state: ArmState,
    known: KnownTags,
    thresholds: Thresholds,
    scheduler: CycleScheduler,
    /// Rewritten in place every cycle.
    frame: StatusFrame,
    last_record: StatusRecord,
    cycle_count: u64,
    frames_sent: u64,
    frames_dropped: u64,
}

impl PanelService {
    /// Construct the service from configuration. Starts unarmed.
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: ArmState::Unarmed,
            known: KnownTags::from(config),
            thresholds: Thresholds::from(config),
            scheduler: CycleScheduler::new(config.cycle_interval_ms),
            frame: StatusFrame::default(),
            last_record: StatusRecord::default(),
            cycle_count: 0,
            frames_sent: 0,
            frames_dropped: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Anchor the cycle cadence at `now_ms`; the first cycle runs one
    /// interval later.
    pub fn start(&mut self, now_ms: u64, sink: &mut impl EventSink) {
        self.scheduler.start(now_ms);
        sink.emit(&AppEvent::Started(self.state));
        info!(
            "PanelService started ({:?}, cycle every {} ms)",
            self.state,
            self.scheduler.interval_ms()
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Block on the clock until the next cycle is due, then run it.
    pub fn wait_and_tick(
        &mut self,
        clock: &mut impl ClockPort,
        hw: &mut (impl SensorPort + DisplayPort),
        primary: &mut impl SerialPort,
        debug: &mut impl SerialPort,
        sink: &mut impl EventSink,
    ) -> CycleReport {
        loop {
            match self.scheduler.poll(clock.now_ms()) {
                Poll::Due => return self.tick(hw, primary, debug, sink),
                Poll::WaitMs(ms) => clock.delay_ms(ms),
            }
        }
    }

    /// Run one full cycle: read → reduce → arm → encode → notify → publish.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`DisplayPort`]; the LCD and the sensors share one adapter.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + DisplayPort),
        primary: &mut impl SerialPort,
        debug: &mut impl SerialPort,
        sink: &mut impl EventSink,
    ) -> CycleReport {
        self.cycle_count += 1;

        // 1. Sensors
        let raw = hw.read_raw();
        let events = sensors::reduce(&raw, &self.thresholds);

        // 2. Arm state
        let next = panel::transition(self.state, events.tag, &self.known);
        if let Some(tag) = events.tag {
            if next == self.state {
                sink.emit(&AppEvent::UnknownTag(tag));
            } else {
                sink.emit(&AppEvent::ArmStateChanged {
                    from: self.state,
                    to: next,
                    tag,
                });
                if next == ArmState::Unarmed {
                    hw.clear();
                }
                self.state = next;
            }
        }

        // 3. Encode from the updated state
        let record = protocol::encode(self.state, &events);

        // 4. Notices for alarms that were not up last cycle
        for notice in new_notices(&self.last_record, &record) {
            hw.show(notice);
        }

        // 5. Frame and transmit
        record.write_to(&mut self.frame);
        sink.emit(&AppEvent::Status(record));
        let sent = protocol::publish(&self.frame, primary, debug);
        if sent {
            self.frames_sent += 1;
        } else {
            self.frames_dropped += 1;
        }
        self.last_record = record;

        CycleReport {
            record,
            state: self.state,
            sent,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> ArmState {
        self.state
    }

    /// Cycles executed since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    pub fn last_record(&self) -> StatusRecord {
        self.last_record
    }

    /// The frame buffer as written by the last cycle.
    pub fn frame(&self) -> &StatusFrame {
        &self.frame
    }
}

/// Rising edges between two records, in LCD order.
fn new_notices(prev: &StatusRecord, now: &StatusRecord) -> impl Iterator<Item = Notice> {
    [
        (prev.door, now.door, Notice::DoorOpened),
        (prev.smoke, now.smoke, Notice::SmokeDetected),
        (prev.humidity, now.humidity, Notice::WaterDetected),
        (prev.motion, now.motion, Notice::MotionDetected),
    ]
    .into_iter()
    .filter(|&(was, is, _)| is && !was)
    .map(|(_, _, notice)| notice)
}
