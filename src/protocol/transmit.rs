//! Transmitter.
//!
//! Invalid frames are dropped without a trace: no retry, no log, no
//! partial write. Callers only learn the outcome from the return value.

use super::record::StatusFrame;
use super::validate::is_valid;
use crate::app::ports::SerialPort;

/// Write `frame` verbatim to `link` if it validates. Returns whether it
/// was sent.
pub fn send_if_valid<S: SerialPort + ?Sized>(frame: &StatusFrame, link: &mut S) -> bool {
    if !is_valid(frame) {
        return false;
    }
    link.write(frame.as_bytes());
    true
}

/// Mirror the frame to the debug console, then gate it onto the primary
/// link.
pub fn publish<P, D>(frame: &StatusFrame, primary: &mut P, debug: &mut D) -> bool
where
    P: SerialPort + ?Sized,
    D: SerialPort + ?Sized,
{
    debug.write(frame.as_bytes());
    send_if_valid(frame, primary)
}
