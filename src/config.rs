//! System configuration parameters
//!
//! All tunable parameters for the security panel. The defaults are the
//! values the panel ships with; a validated copy may be persisted to NVS
//! and is loaded at boot through [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Access control ---
    /// The two RFID tag ids allowed to toggle the arm state.
    pub known_tags: [u32; 2],

    // --- Sensor thresholds ---
    /// Relative humidity (%) above which a water/humidity alarm is raised.
    pub humidity_high_percent: u8,
    /// Smoke concentration (ppm) above which a smoke alarm is raised.
    pub smoke_high_ppm: u16,
    /// GPIO level the door contact reads while the door is open.
    pub door_open_level: bool,
    /// GPIO level the PIR output reads while motion is present.
    pub motion_active_level: bool,

    // --- Timing ---
    /// Interval between status cycles (milliseconds).
    pub cycle_interval_ms: u32,
    /// How long an alarm notice stays on the LCD before the cycle continues.
    pub notice_hold_ms: u32,

    // --- Serial links ---
    /// Companion link baud rate.
    pub companion_baud: u32,
    /// Debug console baud rate.
    pub debug_baud: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            known_tags: [9_804_081, 9_770_265],

            humidity_high_percent: 60,
            smoke_high_ppm: 1000,
            door_open_level: false, // contact pulls low when the door opens
            motion_active_level: true,

            cycle_interval_ms: 5000,
            notice_hold_ms: 200,

            companion_baud: 9600,
            debug_baud: 115_200,
        }
    }
}

impl SystemConfig {
    /// Range-check every field. Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [a, b] = self.known_tags;
        if a == 0 || b == 0 {
            return Err(ConfigError::ValidationFailed("known_tags must be non-zero"));
        }
        if a == b {
            return Err(ConfigError::ValidationFailed("known_tags must be distinct"));
        }
        if self.humidity_high_percent > 100 {
            return Err(ConfigError::ValidationFailed(
                "humidity_high_percent must be 0–100",
            ));
        }
        if !(100..=60_000).contains(&self.cycle_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "cycle_interval_ms must be 100–60000",
            ));
        }
        if self.notice_hold_ms >= self.cycle_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "notice_hold_ms must be shorter than cycle_interval_ms",
            ));
        }
        if self.companion_baud == 0 || self.debug_baud == 0 {
            return Err(ConfigError::ValidationFailed("baud rates must be non-zero"));
        }
        if self.companion_baud == self.debug_baud {
            return Err(ConfigError::ValidationFailed(
                "companion and debug links must use different baud rates",
            ));
        }
        Ok(())
    }
}
