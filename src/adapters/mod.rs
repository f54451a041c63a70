//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                |
//! |------------|---------------------|----------------------------|
//! | `hardware` | SensorPort          | DHT11, MQ-2, contacts, RFID|
//! |            | DisplayPort         | HD44780 LCD                |
//! | `serial`   | SerialPort          | Companion / debug UARTs    |
//! | `log_sink` | EventSink           | Serial log output          |
//! | `nvs`      | ConfigPort          | NVS / in-memory store      |
//! | `time`     | ClockPort           | ESP32 system timer         |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod serial;
pub mod time;
