//! Status record and its wire frame.
//!
//! ```text
//! ┌─────┬─────┬─────┬─────┬─────┬────┐
//! │ hum │ smk │ door│ mot │ arm │ \n │
//! │ 0/1 │ 0/1 │ 0/1 │ 0/1 │ 0/1 │    │
//! └─────┴─────┴─────┴─────┴─────┴────┘
//!   0     1     2     3     4     5
//! ```
//!
//! [`encode`] is the alarm policy: environmental hazards are always
//! reported, intrusion signals only while armed.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::panel::ArmState;
use crate::sensors::SensorEvents;

/// Content bytes subject to validation.
pub const CONTENT_LEN: usize = 5;
/// Content plus the line terminator.
pub const FRAME_LEN: usize = CONTENT_LEN + 1;

pub const HUMIDITY_POS: usize = 0;
pub const SMOKE_POS: usize = 1;
pub const DOOR_POS: usize = 2;
pub const MOTION_POS: usize = 3;
pub const ARMED_POS: usize = 4;

pub const TERMINATOR: u8 = b'\n';

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One cycle's alarm snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusRecord {
    pub humidity: bool,
    pub smoke: bool,
    pub door: bool,
    pub motion: bool,
    pub armed: bool,
}

/// Build the record for this cycle from the (already updated) arm state.
pub fn encode(state: ArmState, events: &SensorEvents) -> StatusRecord {
    let armed = state.is_armed();
    StatusRecord {
        humidity: events.humidity_high,
        smoke: events.smoke_high,
        door: events.door_open && armed,
        motion: events.motion_detected && armed,
        armed,
    }
}

impl StatusRecord {
    /// Overwrite every position of `frame`, terminator included.
    pub fn write_to(&self, frame: &mut StatusFrame) {
        let bits = [self.humidity, self.smoke, self.door, self.motion, self.armed];
        for (slot, bit) in frame.0[..CONTENT_LEN].iter_mut().zip(bits) {
            *slot = if bit { b'1' } else { b'0' };
        }
        frame.0[CONTENT_LEN] = TERMINATOR;
    }

    pub fn to_frame(&self) -> StatusFrame {
        let mut frame = StatusFrame::default();
        self.write_to(&mut frame);
        frame
    }
}

impl fmt::Display for StatusRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.to_frame();
        f.write_str(frame.content_str().unwrap_or("?????"))
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// The reusable wire buffer. Holds arbitrary bytes so that a corrupted
/// frame is representable; [`is_valid`](super::validate::is_valid)
/// decides whether it may leave the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFrame([u8; FRAME_LEN]);

impl Default for StatusFrame {
    /// An all-zero buffer, which never validates.
    fn default() -> Self {
        Self([0; FRAME_LEN])
    }
}

impl StatusFrame {
    pub const fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn content(&self) -> &[u8] {
        &self.0[..CONTENT_LEN]
    }

    pub fn content_mut(&mut self) -> &mut [u8] {
        &mut self.0[..CONTENT_LEN]
    }

    /// The content as text, if it is ASCII.
    pub fn content_str(&self) -> Option<&str> {
        let content = self.content();
        if content.is_ascii() {
            core::str::from_utf8(content).ok()
        } else {
            None
        }
    }
}
