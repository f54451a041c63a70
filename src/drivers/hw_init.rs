//! One-shot hardware peripheral initialization and raw register helpers.
//!
//! Configures the smoke ADC channel, GPIO directions and the three UARTs
//! using raw ESP-IDF sys calls. Called once from `main()` before the
//! cycle loop starts. The helpers below it (`gpio_read`, `uart_write`,
//! ...) are what the drivers call at runtime; on host targets they fall
//! back to simulation stubs.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::config::SystemConfig;
#[cfg(target_os = "espidf")]
use crate::error::SensorError;
use crate::error::{self, LinkError};
#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
    UartInitFailed { port: i32, rc: i32 },
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::UartInitFailed { port, rc } => {
                write!(f, "UART{} init failed (rc={})", port, rc)
            }
        }
    }
}

impl From<HwInitError> for error::Error {
    fn from(e: HwInitError) -> Self {
        match e {
            HwInitError::UartInitFailed { rc, .. } => Self::Link(LinkError::UartInitFailed(rc)),
            HwInitError::AdcInitFailed(_) => Self::Init("ADC1"),
            HwInitError::GpioConfigFailed(_) => Self::Init("GPIO"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

/// Bring up every peripheral the panel uses. Failures surface as
/// [`error::Error`] so `main` handles one type.
#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &SystemConfig) -> error::Result<()> {
    // SAFETY: Called once from main() before the cycle loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_inputs()?;
        init_gpio_outputs()?;
        init_uarts(config)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(_config: &SystemConfig) -> error::Result<()> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

/// ADC1 channel wired to the MQ-2 (GPIO 7 on ESP32-S3).
pub const ADC1_CH_SMOKE: u32 = 6;

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC read path. `init_adc()` completes before the loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), ADC1_CH_SMOKE, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    info!("hw_init: ADC1 configured (CH{}=smoke)", ADC1_CH_SMOKE);
    Ok(())
}

/// Raw 12-bit reading.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, SensorError> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // (pin, pull-up). The door contact switches to ground; the PIR
    // drives its output push-pull.
    let inputs = [
        (pins::DOOR_CONTACT_GPIO, true),
        (pins::MOTION_PIR_GPIO, false),
    ];

    for &(pin, pull_up) in &inputs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: if pull_up {
                gpio_pullup_t_GPIO_PULLUP_ENABLE
            } else {
                gpio_pullup_t_GPIO_PULLUP_DISABLE
            },
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured (door, PIR)");
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let lcd_pins = [
        pins::LCD_RS_GPIO,
        pins::LCD_E_GPIO,
        pins::LCD_D4_GPIO,
        pins::LCD_D5_GPIO,
        pins::LCD_D6_GPIO,
        pins::LCD_D7_GPIO,
    ];

    for &pin in &lcd_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        unsafe { gpio_set_level(pin, 0) };
    }

    // DHT11 data: open-drain so the probe can pull the line low while we
    // read it back. Idles released (high).
    let dht_cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::DHT11_DATA_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT_OUTPUT_OD,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&dht_cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::DHT11_DATA_GPIO, 1) };

    info!("hw_init: GPIO outputs configured (LCD bus, DHT11 line)");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin.
    // Main-loop only.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── Timing ────────────────────────────────────────────────────

/// Busy-wait. Used for sub-millisecond protocol timing (DHT11, LCD).
#[cfg(target_os = "espidf")]
pub fn delay_us(us: u32) {
    // SAFETY: ROM busy-wait, no shared state.
    unsafe { esp_rom_delay_us(us) };
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_us(_us: u32) {}

/// Blocking wait that yields to FreeRTOS.
#[cfg(target_os = "espidf")]
pub fn delay_ms(ms: u32) {
    esp_idf_svc::hal::delay::FreeRtos::delay_ms(ms);
}

#[cfg(not(target_os = "espidf"))]
pub fn delay_ms(_ms: u32) {}

/// Microseconds since boot.
#[cfg(target_os = "espidf")]
pub fn uptime_us() -> u64 {
    // SAFETY: esp_timer_get_time is a monotonic counter read.
    (unsafe { esp_timer_get_time() }) as u64
}

#[cfg(not(target_os = "espidf"))]
pub fn uptime_us() -> u64 {
    0
}

// ── UART ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
const UART_RX_BUF: i32 = 256;
#[cfg(target_os = "espidf")]
const UART_TX_BUF: i32 = 256;

#[cfg(target_os = "espidf")]
unsafe fn install_uart(port: i32, baud: u32, tx: i32, rx: i32) -> Result<(), HwInitError> {
    let fail = |rc| HwInitError::UartInitFailed { port, rc };

    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    let ret = unsafe { uart_param_config(port, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(fail(ret));
    }
    let ret = unsafe { uart_set_pin(port, tx, rx, -1, -1) };
    if ret != ESP_OK as i32 {
        return Err(fail(ret));
    }
    let ret = unsafe {
        uart_driver_install(port, UART_RX_BUF, UART_TX_BUF, 0, core::ptr::null_mut(), 0)
    };
    if ret != ESP_OK as i32 {
        return Err(fail(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_uarts(config: &SystemConfig) -> Result<(), HwInitError> {
    unsafe {
        install_uart(
            pins::COMPANION_UART,
            config.companion_baud,
            pins::COMPANION_TX_GPIO,
            pins::COMPANION_RX_GPIO,
        )?;
        install_uart(pins::RFID_UART, pins::RFID_BAUD, -1, pins::RFID_RX_GPIO)?;
        install_uart(
            pins::DEBUG_UART,
            config.debug_baud,
            pins::DEBUG_TX_GPIO,
            pins::DEBUG_RX_GPIO,
        )?;
    }
    info!(
        "hw_init: UARTs configured (companion={} baud, rfid={} baud, debug={} baud)",
        config.companion_baud,
        pins::RFID_BAUD,
        config.debug_baud
    );
    Ok(())
}

/// Non-blocking read of whatever is buffered on `port`.
#[cfg(target_os = "espidf")]
pub fn uart_read(port: i32, buf: &mut [u8]) -> Result<usize, LinkError> {
    // SAFETY: driver installed in init_uarts(); buf is valid for len bytes.
    let n = unsafe { uart_read_bytes(port, buf.as_mut_ptr().cast(), buf.len() as u32, 0) };
    if n < 0 {
        return Err(LinkError::ReadFailed(n));
    }
    Ok(n as usize)
}

/// Queue `bytes` for transmission on `port`.
#[cfg(target_os = "espidf")]
pub fn uart_write(port: i32, bytes: &[u8]) -> Result<(), LinkError> {
    // SAFETY: driver installed in init_uarts(); bytes is valid for len bytes.
    let n = unsafe { uart_write_bytes(port, bytes.as_ptr().cast(), bytes.len()) };
    if n < 0 || n as usize != bytes.len() {
        return Err(LinkError::ShortWrite {
            written: n.max(0) as usize,
            expected: bytes.len(),
        });
    }
    Ok(())
}

// Host: one loopback buffer per UART so tests can inject reader bytes
// and inspect what went out.

#[cfg(not(target_os = "espidf"))]
const SIM_UARTS: usize = 3;

#[cfg(not(target_os = "espidf"))]
static SIM_UART_RX: std::sync::Mutex<[Vec<u8>; SIM_UARTS]> =
    std::sync::Mutex::new([Vec::new(), Vec::new(), Vec::new()]);

#[cfg(not(target_os = "espidf"))]
static SIM_UART_TX: std::sync::Mutex<[Vec<u8>; SIM_UARTS]> =
    std::sync::Mutex::new([Vec::new(), Vec::new(), Vec::new()]);

#[cfg(not(target_os = "espidf"))]
fn sim_slot(port: i32) -> Result<usize, LinkError> {
    usize::try_from(port)
        .ok()
        .filter(|&p| p < SIM_UARTS)
        .ok_or(LinkError::ReadFailed(-1))
}

/// Queue bytes as if a peer had sent them to `port`.
#[cfg(not(target_os = "espidf"))]
pub fn sim_uart_inject(port: i32, bytes: &[u8]) {
    if let (Ok(slot), Ok(mut rx)) = (sim_slot(port), SIM_UART_RX.lock()) {
        rx[slot].extend_from_slice(bytes);
    }
}

/// Drain everything written to `port` so far.
#[cfg(not(target_os = "espidf"))]
pub fn sim_uart_take_tx(port: i32) -> Vec<u8> {
    match (sim_slot(port), SIM_UART_TX.lock()) {
        (Ok(slot), Ok(mut tx)) => core::mem::take(&mut tx[slot]),
        _ => Vec::new(),
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_read(port: i32, buf: &mut [u8]) -> Result<usize, LinkError> {
    let slot = sim_slot(port)?;
    let mut rx = SIM_UART_RX.lock().map_err(|_| LinkError::ReadFailed(-1))?;
    let n = rx[slot].len().min(buf.len());
    buf[..n].copy_from_slice(&rx[slot][..n]);
    rx[slot].drain(..n);
    Ok(n)
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_write(port: i32, bytes: &[u8]) -> Result<(), LinkError> {
    let short = LinkError::ShortWrite {
        written: 0,
        expected: bytes.len(),
    };
    let slot = sim_slot(port).map_err(|_| short)?;
    let mut tx = SIM_UART_TX.lock().map_err(|_| short)?;
    tx[slot].extend_from_slice(bytes);
    Ok(())
}

// ── embedded-hal glue ─────────────────────────────────────────

/// A configured output GPIO as an `embedded-hal` pin.
pub struct GpioOut(pub i32);

impl embedded_hal::digital::ErrorType for GpioOut {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::OutputPin for GpioOut {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.0, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        gpio_write(self.0, true);
        Ok(())
    }
}

/// Busy-wait delay provider backed by [`delay_us`].
pub struct RomDelay;

impl embedded_hal::delay::DelayNs for RomDelay {
    fn delay_ns(&mut self, ns: u32) {
        delay_us(ns.div_ceil(1000));
    }

    fn delay_ms(&mut self, ms: u32) {
        delay_ms(ms);
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_uart_loops_back_per_port() {
        // Port 0 is otherwise unused by unit tests.
        sim_uart_inject(0, b"abc");
        let mut buf = [0u8; 2];
        assert_eq!(uart_read(0, &mut buf), Ok(2));
        assert_eq!(&buf, b"ab");
        assert_eq!(uart_read(0, &mut buf), Ok(1));
        assert_eq!(uart_read(0, &mut buf), Ok(0));

        uart_write(0, b"xyz").unwrap();
        assert_eq!(sim_uart_take_tx(0), b"xyz");
        assert!(sim_uart_take_tx(0).is_empty());
    }

    #[test]
    fn unknown_port_is_rejected() {
        let mut buf = [0u8; 4];
        assert!(uart_read(7, &mut buf).is_err());
        assert!(uart_write(-1, b"x").is_err());
    }

    #[test]
    fn host_init_succeeds() {
        assert_eq!(init_peripherals(&SystemConfig::default()), Ok(()));
    }

    #[test]
    fn adc_init_failure_names_the_peripheral() {
        let e: error::Error = HwInitError::AdcInitFailed(-1).into();
        assert_eq!(e, error::Error::Init("ADC1"));
        assert_eq!(e.to_string(), "init: ADC1");
    }

    #[test]
    fn init_error_maps_into_firmware_error() {
        let e: crate::error::Error = HwInitError::UartInitFailed { port: 1, rc: -3 }.into();
        assert_eq!(e, crate::error::Error::Link(LinkError::UartInitFailed(-3)));
    }
}
