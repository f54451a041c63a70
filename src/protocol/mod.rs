//! Companion link protocol: record encoding, validation, transmission,
//! and the companion's decoding of received lines.

pub mod companion;
pub mod record;
pub mod transmit;
pub mod validate;

pub use record::{StatusFrame, StatusRecord, encode};
pub use transmit::{publish, send_if_valid};
pub use validate::is_valid;
