//! Companion-side view of a status line.
//!
//! The companion reads one line per cycle from the primary link and
//! shows each position as `ALARM`/`Normal` (armed flag as
//! `Armed`/`Unarmed`). Decoding goes through the same validator the
//! panel uses, so a line the panel would never send is never shown.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::record::{
    ARMED_POS, CONTENT_LEN, DOOR_POS, FRAME_LEN, HUMIDITY_POS, MOTION_POS, SMOKE_POS, StatusFrame,
    StatusRecord, TERMINATOR,
};
use super::validate::is_valid;
use crate::panel::ArmState;

/// Why a received line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Content was not exactly five bytes.
    BadLength(usize),
    /// A content byte was not `'0'` or `'1'`.
    Malformed,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength(n) => write!(f, "expected {CONTENT_LEN} status bytes, got {n}"),
            Self::Malformed => write!(f, "status byte outside '0'/'1'"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmLevel {
    #[serde(rename = "Normal")]
    Normal,
    #[serde(rename = "ALARM")]
    Alarm,
}

impl From<bool> for AlarmLevel {
    fn from(bit: bool) -> Self {
        if bit { Self::Alarm } else { Self::Normal }
    }
}

impl fmt::Display for AlarmLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "Normal",
            Self::Alarm => "ALARM",
        })
    }
}

/// Dashboard model of one status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionStatus {
    pub flood: AlarmLevel,
    pub smoke: AlarmLevel,
    pub door: AlarmLevel,
    pub motion: AlarmLevel,
    pub armed: ArmState,
}

impl From<StatusRecord> for CompanionStatus {
    fn from(r: StatusRecord) -> Self {
        Self {
            flood: r.humidity.into(),
            smoke: r.smoke.into(),
            door: r.door.into(),
            motion: r.motion.into(),
            armed: if r.armed {
                ArmState::Armed
            } else {
                ArmState::Unarmed
            },
        }
    }
}

impl CompanionStatus {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Parse one received line. A trailing `\n` or `\r\n` is optional.
pub fn decode_line(line: &[u8]) -> Result<CompanionStatus, FrameError> {
    let content = line
        .strip_suffix(b"\r\n")
        .or_else(|| line.strip_suffix(b"\n"))
        .unwrap_or(line);
    if content.len() != CONTENT_LEN {
        return Err(FrameError::BadLength(content.len()));
    }

    let mut bytes = [TERMINATOR; FRAME_LEN];
    bytes[..CONTENT_LEN].copy_from_slice(content);
    let frame = StatusFrame::from_bytes(bytes);
    if !is_valid(&frame) {
        return Err(FrameError::Malformed);
    }

    let bit = |i: usize| frame.content()[i] == b'1';
    Ok(StatusRecord {
        humidity: bit(HUMIDITY_POS),
        smoke: bit(SMOKE_POS),
        door: bit(DOOR_POS),
        motion: bit(MOTION_POS),
        armed: bit(ARMED_POS),
    }
    .into())
}
