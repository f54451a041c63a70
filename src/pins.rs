//! GPIO / peripheral pin assignments for the security panel board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Character LCD (HD44780, 4-bit bus)
// ---------------------------------------------------------------------------

pub const LCD_RS_GPIO: i32 = 1;
pub const LCD_E_GPIO: i32 = 2;
pub const LCD_D4_GPIO: i32 = 3;
pub const LCD_D5_GPIO: i32 = 4;
pub const LCD_D6_GPIO: i32 = 5;
pub const LCD_D7_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1)
// ---------------------------------------------------------------------------

/// MQ-2 smoke sensor: analog voltage across the load resistor.
/// ADC1 channel 6 (GPIO 7 on ESP32-S3).
pub const SMOKE_ADC_GPIO: i32 = 7;

// ---------------------------------------------------------------------------
// Sensors: Digital
// ---------------------------------------------------------------------------

/// DHT11 single-wire data line (open-drain, external 10 kΩ pull-up).
pub const DHT11_DATA_GPIO: i32 = 8;

/// Magnetic door contact. Pulled up; reads LOW when the door opens.
pub const DOOR_CONTACT_GPIO: i32 = 9;

/// PIR motion detector output. HIGH while motion is present.
pub const MOTION_PIR_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// UARTs
// ---------------------------------------------------------------------------

/// Companion link (primary status channel).
pub const COMPANION_UART: i32 = 1;
pub const COMPANION_TX_GPIO: i32 = 17;
pub const COMPANION_RX_GPIO: i32 = 18;

/// ID-12 RFID reader. Receive only; the reader has no command set.
pub const RFID_UART: i32 = 2;
pub const RFID_RX_GPIO: i32 = 16;

/// Debug console (USB-serial bridge on UART0).
pub const DEBUG_UART: i32 = 0;
pub const DEBUG_TX_GPIO: i32 = 43;
pub const DEBUG_RX_GPIO: i32 = 44;

/// ID-12 line rate.
pub const RFID_BAUD: u32 = 9600;
