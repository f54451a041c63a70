//! ID-12 RFID reader.
//!
//! The reader streams one ASCII frame per tag presentation on its UART:
//!
//! ```text
//! ┌─────┬──────────────────┬────────────┬────┬────┬─────┐
//! │ STX │ 10 hex chars     │ 2 hex chars│ CR │ LF │ ETX │
//! │ 02  │ 40-bit tag value │ XOR of the │ 0D │ 0A │ 03  │
//! │     │                  │ 5 data B   │    │    │     │
//! └─────┴──────────────────┴────────────┴────┴────┴─────┘
//! ```
//!
//! [`TagDecoder`] accumulates bytes and yields a [`TagId`] (the low 32
//! bits of the tag value) once a frame with a valid checksum completes.
//! Any STX restarts the frame, so the decoder resynchronises after line
//! noise without needing a reset.

use log::debug;

use crate::error::SensorError;
use crate::panel::TagId;

use crate::drivers::hw_init;

const STX: u8 = 0x02;
const ETX: u8 = 0x03;
const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// Hex characters between STX and the trailer (data + checksum).
const HEX_LEN: usize = 12;
/// Bytes between STX and ETX.
const PAYLOAD_LEN: usize = HEX_LEN + 2;
/// Full frame on the wire.
pub const FRAME_LEN: usize = PAYLOAD_LEN + 2;

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Streaming ID-12 frame decoder.
pub struct TagDecoder {
    buf: [u8; PAYLOAD_LEN],
    len: usize,
    in_frame: bool,
}

impl Default for TagDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TagDecoder {
    pub fn new() -> Self {
        Self {
            buf: [0; PAYLOAD_LEN],
            len: 0,
            in_frame: false,
        }
    }

    /// Feed one byte. Returns the tag when this byte completes a valid frame.
    pub fn feed(&mut self, byte: u8) -> Option<TagId> {
        match byte {
            STX => {
                self.in_frame = true;
                self.len = 0;
                None
            }
            _ if !self.in_frame => None,
            ETX => {
                self.in_frame = false;
                if self.len != PAYLOAD_LEN {
                    debug!("RFID: truncated frame ({} bytes)", self.len);
                    return None;
                }
                match decode_payload(&self.buf) {
                    Ok(tag) => Some(tag),
                    Err(e) => {
                        debug!("RFID: frame rejected ({})", e);
                        None
                    }
                }
            }
            _ if self.len == PAYLOAD_LEN => {
                // Overlong frame: drop it and wait for the next STX.
                self.in_frame = false;
                None
            }
            _ => {
                self.buf[self.len] = byte;
                self.len += 1;
                None
            }
        }
    }

    /// Feed a burst of bytes. If several frames complete, the last wins.
    pub fn feed_all(&mut self, bytes: &[u8]) -> Option<TagId> {
        bytes.iter().fold(None, |last, &b| self.feed(b).or(last))
    }
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

fn decode_payload(payload: &[u8; PAYLOAD_LEN]) -> Result<TagId, SensorError> {
    if payload[HEX_LEN] != CR || payload[HEX_LEN + 1] != LF {
        return Err(SensorError::OutOfRange);
    }

    let mut bytes = [0u8; HEX_LEN / 2];
    for (i, pair) in payload[..HEX_LEN].chunks_exact(2).enumerate() {
        let hi = hex_val(pair[0]).ok_or(SensorError::OutOfRange)?;
        let lo = hex_val(pair[1]).ok_or(SensorError::OutOfRange)?;
        bytes[i] = (hi << 4) | lo;
    }

    let checksum = bytes[..5].iter().fold(0u8, |acc, b| acc ^ b);
    if checksum != bytes[5] {
        return Err(SensorError::ChecksumMismatch);
    }

    Ok(TagId(u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]])))
}

/// Encode a tag the way the reader would send it (version byte 0).
pub fn encode_frame(tag: TagId) -> [u8; FRAME_LEN] {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let id = tag.0.to_be_bytes();
    let data = [0u8, id[0], id[1], id[2], id[3]];
    let checksum = data.iter().fold(0u8, |acc, b| acc ^ b);

    let mut frame = [0u8; FRAME_LEN];
    frame[0] = STX;
    for (i, b) in data.iter().chain(core::iter::once(&checksum)).enumerate() {
        frame[1 + 2 * i] = HEX[usize::from(b >> 4)];
        frame[2 + 2 * i] = HEX[usize::from(b & 0x0F)];
    }
    frame[1 + HEX_LEN] = CR;
    frame[2 + HEX_LEN] = LF;
    frame[3 + HEX_LEN] = ETX;
    frame
}

// ---------------------------------------------------------------------------
// Reader (UART side)
// ---------------------------------------------------------------------------

/// Queue bytes as if the reader had sent them.
#[cfg(not(target_os = "espidf"))]
pub fn sim_inject_rx(bytes: &[u8]) {
    hw_init::sim_uart_inject(crate::pins::RFID_UART, bytes);
}

/// Polls the reader UART once per cycle.
pub struct RfidReader {
    decoder: TagDecoder,
    uart_port: i32,
}

impl RfidReader {
    pub fn new(uart_port: i32) -> Self {
        Self {
            decoder: TagDecoder::new(),
            uart_port,
        }
    }

    /// Drain whatever the reader sent since the last cycle.
    /// `Some` only when a complete, checksum-valid frame arrived.
    pub fn poll(&mut self) -> Option<TagId> {
        let mut buf = [0u8; 64];
        let mut tag = None;
        loop {
            let n = self.read_available(&mut buf);
            if n == 0 {
                break;
            }
            tag = self.decoder.feed_all(&buf[..n]).or(tag);
        }
        tag
    }

    fn read_available(&mut self, buf: &mut [u8]) -> usize {
        match hw_init::uart_read(self.uart_port, buf) {
            Ok(n) => n,
            Err(e) => {
                debug!("RFID: {}", e);
                0
            }
        }
    }
}
