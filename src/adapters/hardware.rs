//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the character LCD, exposing them through
//! [`SensorPort`] and [`DisplayPort`]. On non-espidf targets the sensor
//! drivers use cfg-gated simulation stubs and the LCD can be any
//! `embedded-hal` pin set.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::{DisplayPort, Notice, SensorPort};
use crate::drivers::hw_init;
use crate::drivers::lcd::{Lcd, pad_to_screen};
use crate::sensors::{RawReadings, SensorHub};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P, D> {
    sensor_hub: SensorHub,
    lcd: Lcd<P, D>,
    /// Readability pause after each notice.
    notice_hold_ms: u32,
}

impl<P, D> HardwareAdapter<P, D>
where
    P: OutputPin,
    P::Error: core::fmt::Debug,
    D: DelayNs,
{
    /// `lcd` must already be initialised.
    pub fn new(sensor_hub: SensorHub, lcd: Lcd<P, D>, notice_hold_ms: u32) -> Self {
        Self {
            sensor_hub,
            lcd,
            notice_hold_ms,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P, D> SensorPort for HardwareAdapter<P, D> {
    fn read_raw(&mut self) -> RawReadings {
        self.sensor_hub.read_all()
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl<P, D> DisplayPort for HardwareAdapter<P, D>
where
    P: OutputPin,
    P::Error: core::fmt::Debug,
    D: DelayNs,
{
    fn show(&mut self, notice: Notice) {
        if let Err(e) = self.lcd.write_str(&pad_to_screen(notice.text())) {
            warn!("LCD: write failed ({:?})", e);
            return;
        }
        hw_init::delay_ms(self.notice_hold_ms);
    }

    fn clear(&mut self) {
        if let Err(e) = self.lcd.clear() {
            warn!("LCD: clear failed ({:?})", e);
        }
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::drivers::lcd::{SCREEN_CHARS, mock};
    use crate::sensors::contact::ContactInputs;
    use crate::sensors::humidity::HumiditySensor;
    use crate::sensors::rfid::RfidReader;
    use crate::sensors::smoke::SmokeSensor;

    fn adapter() -> (
        HardwareAdapter<mock::MockPin, mock::NoDelay>,
        std::rc::Rc<std::cell::RefCell<mock::Bus>>,
    ) {
        // Sensors are not read in these tests.
        let hub = SensorHub::new(
            HumiditySensor::new(0),
            SmokeSensor::new(0),
            ContactInputs::new(0, 0),
            RfidReader::new(0),
        );
        let (lcd, bus) = mock::lcd();
        (HardwareAdapter::new(hub, lcd, 0), bus)
    }

    #[test]
    fn notice_fills_the_screen() {
        let (mut hw, bus) = adapter();
        hw.show(Notice::MotionDetected);
        let text = bus.borrow().text(0);
        assert_eq!(text.len(), SCREEN_CHARS);
        assert!(text.starts_with("Motion has been detected."));
    }

    #[test]
    fn clear_reaches_the_lcd() {
        let (mut hw, bus) = adapter();
        hw.clear();
        assert_eq!(bus.borrow().bytes(0), [(false, 0x01)]);
    }
}
