//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ PanelService (domain)
//! ```
//!
//! Driven adapters (sensors, LCD, serial links, clock, event sinks,
//! config storage) implement these traits. The
//! [`PanelService`](super::service::PanelService) consumes them via
//! generics, so the domain core never touches hardware directly.

use core::fmt;

use crate::config::SystemConfig;
use crate::sensors::RawReadings;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per cycle.
pub trait SensorPort {
    /// Read every sensor once and return the raw snapshot.
    fn read_raw(&mut self) -> RawReadings;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → LCD)
// ───────────────────────────────────────────────────────────────

/// Alarm notices the panel puts on its local display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    DoorOpened,
    SmokeDetected,
    WaterDetected,
    MotionDetected,
}

impl Notice {
    /// Text shown on the LCD.
    pub fn text(self) -> &'static str {
        match self {
            Self::DoorOpened => "The door was opened.",
            Self::SmokeDetected => "Smoke has been detected.",
            Self::WaterDetected => "Water has been detected.",
            Self::MotionDetected => "Motion has been detected.",
        }
    }
}

/// Fire-and-forget display commands. No acknowledgement, no errors.
pub trait DisplayPort {
    fn show(&mut self, notice: Notice);

    fn clear(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Serial port (driven adapter: domain → UART)
// ───────────────────────────────────────────────────────────────

/// Outbound byte channel. Writes are treated as always completing; an
/// adapter that sees a driver fault logs it and moves on.
pub trait SerialPort {
    fn write(&mut self, bytes: &[u8]);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain ↔ time source)
// ───────────────────────────────────────────────────────────────

/// Monotonic time plus a blocking wait. Tests substitute a fake clock
/// whose `delay_ms` just advances `now_ms`.
pub trait ClockPort {
    /// Milliseconds since boot.
    fn now_ms(&self) -> u64;

    /// Suspend the caller for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid values are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
