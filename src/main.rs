//! Security panel firmware entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     UartLink ×2     LogEventSink   NvsAdapter │
//! │  (Sensor+Display)    (SerialPort)    (EventSink)    (Config)   │
//! │  Esp32Clock (ClockPort)                                        │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            PanelService (pure logic)                   │    │
//! │  │  reduce · arm/disarm · encode · validate · transmit    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use secpanel::adapters::hardware::HardwareAdapter;
use secpanel::adapters::log_sink::LogEventSink;
use secpanel::adapters::nvs::NvsAdapter;
use secpanel::adapters::serial::UartLink;
use secpanel::adapters::time::Esp32Clock;
use secpanel::app::ports::{ClockPort, ConfigPort};
use secpanel::app::service::PanelService;
use secpanel::config::SystemConfig;
use secpanel::drivers::hw_init::{self, GpioOut, RomDelay};
use secpanel::drivers::lcd::Lcd;
use secpanel::drivers::watchdog::{self, Watchdog};
use secpanel::pins;
use secpanel::sensors::{self, SensorHub};

/// Clean-air samples taken for the MQ-2 R0 calibration at boot.
const SMOKE_CALIBRATION_SAMPLES: u16 = 50;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SecPanel v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new() {
        Ok(nvs) => match nvs.load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("NVS config load failed ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            SystemConfig::default()
        }
    };

    // ── 3. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals(&config) {
        // Spinning starves the idle task; the default TWDT resets the chip.
        error!("peripheral init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new(watchdog::timeout_for_cycle(config.cycle_interval_ms));

    let mut lcd = Lcd::new(
        GpioOut(pins::LCD_RS_GPIO),
        GpioOut(pins::LCD_E_GPIO),
        [
            GpioOut(pins::LCD_D4_GPIO),
            GpioOut(pins::LCD_D5_GPIO),
            GpioOut(pins::LCD_D6_GPIO),
            GpioOut(pins::LCD_D7_GPIO),
        ],
        RomDelay,
    );
    if let Err(e) = lcd.init() {
        warn!("LCD init failed ({:?}), notices will not display", e);
    }

    let mut smoke = sensors::smoke::SmokeSensor::new(pins::SMOKE_ADC_GPIO);
    smoke.calibrate(SMOKE_CALIBRATION_SAMPLES);

    let sensor_hub = SensorHub::new(
        sensors::humidity::HumiditySensor::new(pins::DHT11_DATA_GPIO),
        smoke,
        sensors::contact::ContactInputs::new(pins::DOOR_CONTACT_GPIO, pins::MOTION_PIR_GPIO),
        sensors::rfid::RfidReader::new(pins::RFID_UART),
    );

    // ── 4. Adapters ───────────────────────────────────────────
    let mut hw = HardwareAdapter::new(sensor_hub, lcd, config.notice_hold_ms);
    let mut companion = UartLink::new(pins::COMPANION_UART, "companion");
    let mut console = UartLink::new(pins::DEBUG_UART, "debug");
    let mut sink = LogEventSink::new();
    let mut clock = Esp32Clock::new();

    // ── 5. Cycle loop ─────────────────────────────────────────
    let mut panel = PanelService::new(&config);
    panel.start(clock.now_ms(), &mut sink);

    loop {
        panel.wait_and_tick(&mut clock, &mut hw, &mut companion, &mut console, &mut sink);
        watchdog.feed();
    }
}
