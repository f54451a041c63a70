//! UART serial adapter.
//!
//! One [`UartLink`] per outbound channel: the companion link carries the
//! validated status frames, the debug console mirrors every frame. Both
//! sit on a UART driver installed by `hw_init`; on host targets the
//! writes land in the simulated per-port TX buffer.

use log::warn;

use crate::app::ports::SerialPort;
use crate::drivers::hw_init;

pub struct UartLink {
    port: i32,
    label: &'static str,
    failed_writes: u32,
}

impl UartLink {
    pub fn new(port: i32, label: &'static str) -> Self {
        Self {
            port,
            label,
            failed_writes: 0,
        }
    }

    pub fn failed_writes(&self) -> u32 {
        self.failed_writes
    }
}

impl SerialPort for UartLink {
    fn write(&mut self, bytes: &[u8]) {
        if let Err(e) = hw_init::uart_write(self.port, bytes) {
            self.failed_writes = self.failed_writes.saturating_add(1);
            warn!("{}: {}", self.label, e);
        }
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn writes_reach_the_port() {
        // Port 2 TX is unused elsewhere in the unit tests.
        let mut link = UartLink::new(2, "test");
        link.write(b"00101\n");
        assert_eq!(hw_init::sim_uart_take_tx(2), b"00101\n");
        assert_eq!(link.failed_writes(), 0);
    }

    #[test]
    fn driver_fault_is_counted() {
        let mut link = UartLink::new(9, "bogus");
        link.write(b"x");
        assert_eq!(link.failed_writes(), 1);
    }
}
