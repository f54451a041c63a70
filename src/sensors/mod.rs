//! Sensor subsystem: individual drivers, the aggregating [`SensorHub`],
//! and the per-cycle reduction from raw readings to boolean events.
//!
//! The hub produces a [`RawReadings`] snapshot each cycle. [`reduce`]
//! turns it into [`SensorEvents`] with one fixed rule per sensor: a
//! threshold comparison for humidity and smoke, a level comparison for
//! the door contact and the PIR, and a pass-through for the tag reader.
//! No history, no debouncing, no hysteresis.

pub mod contact;
pub mod humidity;
pub mod rfid;
pub mod smoke;

use crate::config::SystemConfig;
use crate::panel::TagId;
use contact::ContactInputs;
use humidity::HumiditySensor;
use rfid::RfidReader;
use smoke::SmokeSensor;

// ---------------------------------------------------------------------------
// Raw snapshot (written by the hub / SensorPort)
// ---------------------------------------------------------------------------

/// One cycle's worth of raw sensor output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawReadings {
    /// Relative humidity from the DHT11 (%).
    pub humidity_percent: u8,
    /// Smoke concentration from the MQ-2 (ppm).
    pub smoke_ppm: u16,
    /// Door contact GPIO level.
    pub door_level: bool,
    /// PIR output GPIO level.
    pub motion_level: bool,
    /// Tag id if the reader delivered a complete frame this cycle.
    pub tag: Option<TagId>,
}

// ---------------------------------------------------------------------------
// Reduction rules
// ---------------------------------------------------------------------------

/// Thresholds and active levels used by [`reduce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub humidity_high_percent: u8,
    pub smoke_high_ppm: u16,
    pub door_open_level: bool,
    pub motion_active_level: bool,
}

impl From<&SystemConfig> for Thresholds {
    fn from(config: &SystemConfig) -> Self {
        Self {
            humidity_high_percent: config.humidity_high_percent,
            smoke_high_ppm: config.smoke_high_ppm,
            door_open_level: config.door_open_level,
            motion_active_level: config.motion_active_level,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&SystemConfig::default())
    }
}

/// Per-cycle boolean events. Transient: recomputed every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorEvents {
    pub humidity_high: bool,
    pub smoke_high: bool,
    pub door_open: bool,
    pub motion_detected: bool,
    pub tag: Option<TagId>,
}

/// Reduce raw readings to events. Independent of the arm state.
pub fn reduce(raw: &RawReadings, th: &Thresholds) -> SensorEvents {
    SensorEvents {
        humidity_high: raw.humidity_percent > th.humidity_high_percent,
        smoke_high: raw.smoke_ppm > th.smoke_high_ppm,
        door_open: raw.door_level == th.door_open_level,
        motion_detected: raw.motion_level == th.motion_active_level,
        tag: raw.tag,
    }
}

// ---------------------------------------------------------------------------
// Hub
// ---------------------------------------------------------------------------

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    pub humidity: HumiditySensor,
    pub smoke: SmokeSensor,
    pub contacts: ContactInputs,
    pub rfid: RfidReader,
}

impl SensorHub {
    /// Construct a new hub. Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(
        humidity: HumiditySensor,
        smoke: SmokeSensor,
        contacts: ContactInputs,
        rfid: RfidReader,
    ) -> Self {
        Self {
            humidity,
            smoke,
            contacts,
            rfid,
        }
    }

    /// Read every sensor once, in the panel's fixed order.
    ///
    /// A failed humidity read keeps the previous good value; a single
    /// flaky probe must not stall the cycle.
    pub fn read_all(&mut self) -> RawReadings {
        let tag = self.rfid.poll();
        let door_level = self.contacts.door_level();
        let smoke_ppm = self.smoke.read_ppm();
        let humidity_percent = self.humidity.read_percent();
        let motion_level = self.contacts.motion_level();

        RawReadings {
            humidity_percent,
            smoke_ppm,
            door_level,
            motion_level,
            tag,
        }
    }
}
