//! HD44780 16×2 character LCD, 4-bit parallel bus.
//!
//! Generic over `embedded-hal` 1.0 output pins and delay so the same
//! driver runs against ESP-IDF GPIOs on the device and recording mock
//! pins in tests.
//!
//! Text longer than one row continues on the second row; notices are
//! padded to the full 32-character screen so a shorter message fully
//! replaces a longer one.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::String;

pub const COLS: usize = 16;
pub const ROWS: usize = 2;
pub const SCREEN_CHARS: usize = COLS * ROWS;

// Instruction set (subset).
const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06; // increment, no shift
const CMD_DISPLAY_ON: u8 = 0x0C; // display on, cursor off, blink off
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;
const CMD_SET_DDRAM: u8 = 0x80;

/// DDRAM address of the first column of each row.
const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40];

pub struct Lcd<P, D> {
    rs: P,
    en: P,
    data: [P; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> Lcd<P, D> {
    /// `data` is `[D4, D5, D6, D7]`. Call [`init`](Self::init) before use.
    pub fn new(rs: P, en: P, data: [P; 4], delay: D) -> Self {
        Self { rs, en, data, delay }
    }

    /// Power-on reset sequence into 4-bit, two-line mode.
    pub fn init(&mut self) -> Result<(), P::Error> {
        self.delay.delay_ms(50);
        self.rs.set_low()?;
        self.en.set_low()?;

        // Three 8-bit "function set" nibbles to reach a known state from
        // any power-up mode, then switch to 4-bit.
        self.write_nibble(0x3)?;
        self.delay.delay_us(4_100);
        self.write_nibble(0x3)?;
        self.delay.delay_us(100);
        self.write_nibble(0x3)?;
        self.delay.delay_us(100);
        self.write_nibble(0x2)?;
        self.delay.delay_us(100);

        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.clear()?;
        self.command(CMD_ENTRY_MODE)
    }

    pub fn clear(&mut self) -> Result<(), P::Error> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_us(2_000);
        Ok(())
    }

    pub fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), P::Error> {
        let row = usize::from(row).min(ROWS - 1);
        let col = col.min(COLS as u8 - 1);
        self.command(CMD_SET_DDRAM | (ROW_OFFSETS[row] + col))
    }

    /// Write from the top-left corner, wrapping onto the second row.
    /// Characters beyond the screen are dropped; non-ASCII shows as `?`.
    pub fn write_str(&mut self, text: &str) -> Result<(), P::Error> {
        self.set_cursor(0, 0)?;
        for (i, ch) in text.chars().take(SCREEN_CHARS).enumerate() {
            if i == COLS {
                self.set_cursor(0, 1)?;
            }
            let byte = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.write_data(byte)?;
        }
        Ok(())
    }

    // ── Bus level ─────────────────────────────────────────────

    fn command(&mut self, byte: u8) -> Result<(), P::Error> {
        self.rs.set_low()?;
        self.write_byte(byte)
    }

    fn write_data(&mut self, byte: u8) -> Result<(), P::Error> {
        self.rs.set_high()?;
        self.write_byte(byte)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), P::Error> {
        self.write_nibble(byte >> 4)?;
        self.write_nibble(byte & 0x0F)?;
        // Most instructions finish in 37 µs.
        self.delay.delay_us(50);
        Ok(())
    }

    fn write_nibble(&mut self, nibble: u8) -> Result<(), P::Error> {
        for (bit, pin) in self.data.iter_mut().enumerate() {
            if nibble & (1 << bit) != 0 {
                pin.set_high()?;
            } else {
                pin.set_low()?;
            }
        }
        self.en.set_high()?;
        self.delay.delay_us(1);
        self.en.set_low()?;
        self.delay.delay_us(1);
        Ok(())
    }
}

/// Pad `text` with spaces to a full screen, truncating if longer.
pub fn pad_to_screen(text: &str) -> String<SCREEN_CHARS> {
    let mut out = String::new();
    for ch in text.chars().filter(char::is_ascii).take(SCREEN_CHARS) {
        // Capacity is never exceeded: at most SCREEN_CHARS one-byte chars.
        let _ = out.push(ch);
    }
    while out.len() < SCREEN_CHARS {
        let _ = out.push(' ');
    }
    out
}


#[cfg(test)]
mod tests {
    use super::mock;
    use super::*;

    const RESET_NIBBLES: usize = 4;

    #[test]
    fn init_sequence() {
        let (mut lcd, bus) = mock::lcd();
        lcd.init().unwrap();
        let bus = bus.borrow();
        let nibbles: Vec<u8> = bus.latched[..RESET_NIBBLES].iter().map(|&(_, n)| n).collect();
        assert_eq!(nibbles, [0x3, 0x3, 0x3, 0x2]);
        assert_eq!(
            bus.bytes(RESET_NIBBLES),
            [
                (false, CMD_FUNCTION_4BIT_2LINE),
                (false, CMD_DISPLAY_ON),
                (false, CMD_CLEAR),
                (false, CMD_ENTRY_MODE),
            ]
        );
    }

    #[test]
    fn long_text_wraps_to_second_row() {
        let (mut lcd, bus) = mock::lcd();
        lcd.write_str("Smoke has been detected.").unwrap();
        let bus = bus.borrow();
        let bytes = bus.bytes(0);
        assert_eq!(bytes[0], (false, CMD_SET_DDRAM));
        // 16 characters, then a cursor move to row 1.
        assert_eq!(bytes[17], (false, CMD_SET_DDRAM | 0x40));
        assert_eq!(bus.text(0), "Smoke has been detected.");
    }

    #[test]
    fn clear_sends_clear_instruction() {
        let (mut lcd, bus) = mock::lcd();
        lcd.clear().unwrap();
        assert_eq!(bus.borrow().bytes(0), [(false, CMD_CLEAR)]);
    }

    #[test]
    fn padding_fills_screen() {
        let padded = pad_to_screen("The door was opened.");
        assert_eq!(padded.len(), SCREEN_CHARS);
        assert!(padded.starts_with("The door was opened."));
        assert!(padded.ends_with("            "));
    }

    #[test]
    fn padding_truncates_overlong_text() {
        let long = "x".repeat(40);
        assert_eq!(pad_to_screen(&long).len(), SCREEN_CHARS);
    }
}
