//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the panel's per-cycle orchestration: sensor
//! reduction, arm transitions, record encoding and gated transmission.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
