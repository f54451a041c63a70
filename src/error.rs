//! Unified error types for the security panel firmware.
//!
//! Driver-level failures (`SensorError`, `LinkError`, peripheral
//! bring-up) convert into the single `Error` enum that `main` sees. All
//! variants are `Copy` so they can be passed around without allocation.
//! Configuration storage has its own port-level
//! [`ConfigError`](crate::app::ports::ConfigError).
//!
//! Note that none of these ever reach the companion link: a malformed
//! status frame is dropped silently, and an unknown RFID tag is not an
//! error at all.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Firmware-level error returned across driver boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned malformed data.
    Sensor(SensorError),
    /// A serial link (companion, debug console, RFID UART) failed.
    Link(LinkError),
    /// Peripheral initialisation failed (names the peripheral).
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Link(e) => write!(f, "link: {e}"),
            Self::Init(what) => write!(f, "init: {what}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// The sensor did not answer within its protocol window.
    Timeout,
    /// A framed reading failed its checksum.
    ChecksumMismatch,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::Timeout => write!(f, "sensor timed out"),
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl core::error::Error for Error {}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Serial link errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// UART driver install or pin routing failed.
    UartInitFailed(i32),
    /// Fewer bytes were queued than requested.
    ShortWrite { written: usize, expected: usize },
    /// UART read returned an error code.
    ReadFailed(i32),
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UartInitFailed(rc) => write!(f, "UART init failed (rc={rc})"),
            Self::ShortWrite { written, expected } => {
                write!(f, "short write ({written}/{expected} bytes)")
            }
            Self::ReadFailed(rc) => write!(f, "UART read failed (rc={rc})"),
        }
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Self::Link(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
