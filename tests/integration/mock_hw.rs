//! Mock adapters for integration tests.
//!
//! Records every display call and every byte written so tests can assert
//! on the full history without touching real GPIO or UART registers.

use std::cell::RefCell;

use secpanel::app::events::AppEvent;
use secpanel::app::ports::{
    ClockPort, ConfigError, ConfigPort, DisplayPort, EventSink, Notice, SensorPort, SerialPort,
};
use secpanel::config::SystemConfig;
use secpanel::panel::TagId;
use secpanel::sensors::RawReadings;

// ── Display call record ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayCall {
    Show(Notice),
    Clear,
}

// ── MockHardware ──────────────────────────────────────────────

/// Sensor inputs the test sets directly, plus a log of display calls.
///
/// `raw.tag` is consumed on read, like a reader that has delivered its
/// frame.
pub struct MockHardware {
    pub raw: RawReadings,
    pub calls: Vec<DisplayCall>,
    pub reads: u32,
}

#[allow(dead_code)]
impl MockHardware {
    /// Everything quiet: low humidity, clean air, door closed, no motion.
    pub fn new() -> Self {
        Self {
            raw: RawReadings {
                humidity_percent: 35,
                smoke_ppm: 80,
                door_level: true,
                motion_level: false,
                tag: None,
            },
            calls: Vec::new(),
            reads: 0,
        }
    }

    pub fn present_tag(&mut self, tag: TagId) {
        self.raw.tag = Some(tag);
    }

    pub fn open_door(&mut self) {
        self.raw.door_level = false;
    }

    pub fn close_door(&mut self) {
        self.raw.door_level = true;
    }

    pub fn clears(&self) -> usize {
        self.calls.iter().filter(|c| **c == DisplayCall::Clear).count()
    }

    pub fn shown(&self) -> Vec<Notice> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DisplayCall::Show(n) => Some(*n),
                DisplayCall::Clear => None,
            })
            .collect()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_raw(&mut self) -> RawReadings {
        self.reads += 1;
        let raw = self.raw;
        self.raw.tag = None;
        raw
    }
}

impl DisplayPort for MockHardware {
    fn show(&mut self, notice: Notice) {
        self.calls.push(DisplayCall::Show(notice));
    }

    fn clear(&mut self) {
        self.calls.push(DisplayCall::Clear);
    }
}

// ── MockSerial ────────────────────────────────────────────────

/// Byte sink that keeps one entry per `write` call.
#[derive(Default)]
pub struct MockSerial {
    pub writes: Vec<Vec<u8>>,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&[u8]> {
        self.writes.last().map(Vec::as_slice)
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.writes.concat()
    }
}

impl SerialPort for MockSerial {
    fn write(&mut self, bytes: &[u8]) {
        self.writes.push(bytes.to_vec());
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Clock whose `delay_ms` advances time instantly.
pub struct FakeClock {
    pub now: u64,
    pub delays: Vec<u32>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn at(now: u64) -> Self {
        Self {
            now,
            delays: Vec::new(),
        }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += ms;
    }
}

impl ClockPort for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.now += u64::from(ms);
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ArmStateChanged { .. }))
            .count()
    }

    pub fn unknown_tags(&self) -> Vec<TagId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::UnknownTag(t) => Some(*t),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MemConfig ─────────────────────────────────────────────────

/// In-memory config store with the same validate-before-save contract
/// as the NVS adapter.
#[derive(Default)]
pub struct MemConfig {
    pub stored: RefCell<Option<SystemConfig>>,
}

impl ConfigPort for MemConfig {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        Ok(self.stored.borrow().clone().unwrap_or_default())
    }

    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        *self.stored.borrow_mut() = Some(config.clone());
        Ok(())
    }
}
