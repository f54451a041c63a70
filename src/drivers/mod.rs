//! Peripheral drivers, hardware initialisation, and the watchdog.

pub mod hw_init;
pub mod lcd;
pub mod watchdog;
