//! Frame validation gate.

use super::record::StatusFrame;

/// `true` iff every content byte is `'0'` or `'1'`. The terminator is
/// not inspected.
pub fn is_valid(frame: &StatusFrame) -> bool {
    frame.content().iter().all(|&b| b == b'0' || b == b'1')
}
