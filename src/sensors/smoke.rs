//! MQ-2 combustible gas / smoke sensor.
//!
//! The sensor element forms a divider with the load resistor RL; the ADC
//! reads the voltage across RL. Sensor resistance is
//! `Rs = RL · (ADCmax − raw) / raw`, and the smoke concentration follows
//! the datasheet's log-log curve through `(log10 ppm, log10 Rs/R0)`
//! point `(2.3, 0.53)` with slope `−0.44`.
//!
//! `R0` is the sensor resistance in clean air, calibrated at boot as the
//! average `Rs` divided by the datasheet clean-air ratio (9.83).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the smoke ADC1 channel via the oneshot API.
//! On host/test: reads from a static `AtomicU16` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use log::{debug, info};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_SMOKE_ADC: AtomicU16 = AtomicU16::new(2048);
#[cfg(not(target_os = "espidf"))]
static SIM_SMOKE_ADC_FAULT: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_smoke_adc(raw: u16) {
    SIM_SMOKE_ADC.store(raw, Ordering::Relaxed);
}

/// Make every following conversion fail until cleared.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_smoke_adc_fault(failing: bool) {
    SIM_SMOKE_ADC_FAULT.store(failing, Ordering::Relaxed);
}

const ADC_MAX: f32 = 4095.0;
/// Load resistor on the breakout board (kΩ).
const RL_KOHM: f32 = 5.0;
/// Rs/R0 in clean air, from the datasheet.
const CLEAN_AIR_RATIO: f32 = 9.83;

/// Smoke curve: `(log10 ppm, log10 ratio)` anchor and slope.
const SMOKE_CURVE: (f32, f32, f32) = (2.3, 0.53, -0.44);

/// Default R0 until calibration runs (kΩ).
const DEFAULT_R0_KOHM: f32 = 10.0;

pub struct SmokeSensor {
    r0_kohm: f32,
    last_ppm: u16,
    failed_reads: u32,
    _adc_gpio: i32,
}

impl SmokeSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self {
            r0_kohm: DEFAULT_R0_KOHM,
            last_ppm: 0,
            failed_reads: 0,
            _adc_gpio: adc_gpio,
        }
    }

    /// Sample the sensor in clean air and derive R0. Failed conversions
    /// are left out of the average.
    pub fn calibrate(&mut self, samples: u16) {
        let mut total = 0.0;
        let mut good = 0u16;
        for _ in 0..samples.max(1) {
            if let Ok(raw) = self.read_adc() {
                total += rs_kohm(raw);
                good += 1;
            }
        }
        let r0 = total / f32::from(good) / CLEAN_AIR_RATIO;
        if good > 0 && r0.is_finite() && r0 > 0.0 {
            self.r0_kohm = r0;
            info!("MQ-2: calibrated R0 = {:.2} kOhm", r0);
        } else {
            info!("MQ-2: calibration read implausible, keeping R0 = {:.2} kOhm", self.r0_kohm);
        }
    }

    pub fn r0_kohm(&self) -> f32 {
        self.r0_kohm
    }

    /// Smoke concentration in ppm, saturating at `u16::MAX`. A failed
    /// conversion repeats the last good value.
    pub fn read_ppm(&mut self) -> u16 {
        match self.read_adc() {
            Ok(raw) => self.last_ppm = smoke_ppm(rs_kohm(raw) / self.r0_kohm),
            Err(e) => {
                self.failed_reads = self.failed_reads.saturating_add(1);
                debug!("MQ-2: {}, keeping {} ppm", e, self.last_ppm);
            }
        }
        self.last_ppm
    }

    pub fn failed_reads(&self) -> u32 {
        self.failed_reads
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read(hw_init::ADC1_CH_SMOKE)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        if SIM_SMOKE_ADC_FAULT.load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(SIM_SMOKE_ADC.load(Ordering::Relaxed))
    }
}

/// Sensor resistance for a raw ADC count. Zero counts means an open
/// circuit (infinite resistance).
fn rs_kohm(raw: u16) -> f32 {
    if raw == 0 {
        return f32::INFINITY;
    }
    let raw = f32::from(raw).min(ADC_MAX);
    RL_KOHM * (ADC_MAX - raw) / raw
}

/// Concentration for a given Rs/R0 ratio.
pub fn smoke_ppm(ratio: f32) -> u16 {
    if !ratio.is_finite() || ratio <= 0.0 {
        return if ratio == 0.0 { u16::MAX } else { 0 };
    }
    let (x0, y0, slope) = SMOKE_CURVE;
    let log_ppm = (ratio.log10() - y0) / slope + x0;
    // Float-to-int casts saturate.
    10f32.powf(log_ppm) as u16
}
