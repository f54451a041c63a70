//! Door contact switch and PIR motion detector.
//!
//! Both are plain digital inputs. The driver only reports the raw GPIO
//! level; which level counts as "open" or "motion" is a configuration
//! decision applied in [`reduce`](super::reduce).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads real GPIO levels via hw_init helpers.
//! On host/test: reads from static atomics for injection. The defaults
//! are a closed door (high, pulled up) and no motion (low).

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_DOOR_LEVEL: AtomicBool = AtomicBool::new(true);
#[cfg(not(target_os = "espidf"))]
static SIM_MOTION_LEVEL: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_door_level(high: bool) {
    SIM_DOOR_LEVEL.store(high, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_motion_level(high: bool) {
    SIM_MOTION_LEVEL.store(high, Ordering::Relaxed);
}

pub struct ContactInputs {
    _door_gpio: i32,
    _motion_gpio: i32,
}

impl ContactInputs {
    pub fn new(door_gpio: i32, motion_gpio: i32) -> Self {
        Self {
            _door_gpio: door_gpio,
            _motion_gpio: motion_gpio,
        }
    }

    #[cfg(target_os = "espidf")]
    pub fn door_level(&self) -> bool {
        hw_init::gpio_read(self._door_gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn door_level(&self) -> bool {
        SIM_DOOR_LEVEL.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    pub fn motion_level(&self) -> bool {
        hw_init::gpio_read(self._motion_gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn motion_level(&self) -> bool {
        SIM_MOTION_LEVEL.load(Ordering::Relaxed)
    }
}
