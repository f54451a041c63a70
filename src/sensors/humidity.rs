//! DHT11 humidity probe.
//!
//! Single-wire protocol: the host pulls the line low for 18 ms, the probe
//! answers with an 80 µs low / 80 µs high preamble, then clocks out 40
//! bits. Each bit starts with a ~50 µs low; the length of the following
//! high pulse encodes the value (~27 µs = 0, ~70 µs = 1).
//!
//! ```text
//! byte 0   byte 1   byte 2   byte 3   byte 4
//! RH int   RH dec   T int    T dec    checksum = low byte of sum(0..4)
//! ```
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the open-drain data pin via hw_init helpers.
//! On host/test: reads from a static `AtomicU8` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU8, Ordering};

use log::debug;

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY: AtomicU8 = AtomicU8::new(45);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_humidity(percent: u8) {
    SIM_HUMIDITY.store(percent, Ordering::Relaxed);
}

/// High pulses longer than this are read as a `1` bit.
#[cfg(target_os = "espidf")]
const ONE_BIT_THRESHOLD_US: u64 = 40;
/// Upper bound for any single protocol phase.
#[cfg(target_os = "espidf")]
const PHASE_TIMEOUT_US: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dht11Reading {
    pub humidity_percent: u8,
    pub temperature_c: u8,
}

/// Validate and unpack a raw 5-byte DHT11 frame.
pub fn decode_frame(frame: [u8; 5]) -> Result<Dht11Reading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ChecksumMismatch);
    }
    if frame[0] > 100 {
        return Err(SensorError::OutOfRange);
    }
    Ok(Dht11Reading {
        humidity_percent: frame[0],
        temperature_c: frame[2],
    })
}

pub struct HumiditySensor {
    _data_gpio: i32,
    last_good: Option<Dht11Reading>,
    failed_reads: u32,
}

impl HumiditySensor {
    pub fn new(data_gpio: i32) -> Self {
        Self {
            _data_gpio: data_gpio,
            last_good: None,
            failed_reads: 0,
        }
    }

    /// Relative humidity (%). Falls back to the last good reading, or 0
    /// before the first successful read.
    pub fn read_percent(&mut self) -> u8 {
        match self.read_frame().and_then(decode_frame) {
            Ok(reading) => {
                self.last_good = Some(reading);
            }
            Err(e) => {
                self.failed_reads = self.failed_reads.saturating_add(1);
                debug!("DHT11: read failed ({}), keeping last value", e);
            }
        }
        self.last_good.map_or(0, |r| r.humidity_percent)
    }

    pub fn failed_reads(&self) -> u32 {
        self.failed_reads
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        let rh = SIM_HUMIDITY.load(Ordering::Relaxed);
        let t = 22;
        Ok([rh, 0, t, 0, rh.wrapping_add(t)])
    }

    #[cfg(target_os = "espidf")]
    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        let pin = self._data_gpio;

        // Start signal: hold low ≥ 18 ms, then release.
        hw_init::gpio_write(pin, false);
        hw_init::delay_us(18_000);
        hw_init::gpio_write(pin, true);
        hw_init::delay_us(30);

        // Preamble: low 80 µs, high 80 µs, then the first bit's low.
        wait_while(pin, true)?;
        wait_while(pin, false)?;
        wait_while(pin, true)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            wait_while(pin, false)?;
            let high_us = wait_while(pin, true)?;
            if high_us > ONE_BIT_THRESHOLD_US {
                frame[bit / 8] |= 0x80 >> (bit % 8);
            }
        }
        Ok(frame)
    }
}

/// Spin while the pin holds `level`; returns how long it held.
#[cfg(target_os = "espidf")]
fn wait_while(pin: i32, level: bool) -> Result<u64, SensorError> {
    let start = hw_init::uptime_us();
    while hw_init::gpio_read(pin) == level {
        let elapsed = hw_init::uptime_us().saturating_sub(start);
        if elapsed > PHASE_TIMEOUT_US {
            return Err(SensorError::Timeout);
        }
    }
    Ok(hw_init::uptime_us().saturating_sub(start))
}
