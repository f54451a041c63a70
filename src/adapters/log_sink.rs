//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART0 / USB-CDC in production).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::panel::ArmState;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::ArmStateChanged { to, tag, .. } => {
                let what = match to {
                    ArmState::Armed => "system armed",
                    ArmState::Unarmed => "system disarmed",
                };
                info!("ARM   | {} (tag {})", what, tag);
            }
            AppEvent::UnknownTag(tag) => {
                debug!("TAG   | unknown tag {} ignored", tag);
            }
            AppEvent::Status(record) => {
                debug!("STATUS| {}", record);
            }
        }
    }
}
