//! HD44780 16x2 character LCD behind a PCF8574 I2C backpack.
//!
//! The expander drives the panel in 4-bit mode:
//!
//! | PCF8574 bit | LCD line  |
//! |-------------|-----------|
//! | P0          | RS        |
//! | P1          | RW (tied low) |
//! | P2          | EN        |
//! | P3          | backlight |
//! | P4..P7      | D4..D7    |
//!
//! Each nibble is latched by pulsing EN.  Lines are space-padded to the
//! panel width so stale characters from a longer previous line vanish.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::error::DisplayError;

pub const COLUMNS: usize = 16;
pub const ROWS: u8 = 2;

const RS: u8 = 0x01;
const EN: u8 = 0x04;
const BACKLIGHT: u8 = 0x08;

const CMD_CLEAR: u8 = 0x01;
const CMD_ENTRY_MODE: u8 = 0x06;
const CMD_DISPLAY_ON: u8 = 0x0C;
const CMD_FUNCTION_4BIT_2LINE: u8 = 0x28;

/// DDRAM address commands for rows 1 and 2.
const ROW_ADDRESS: [u8; ROWS as usize] = [0x80, 0xC0];

pub struct Lcd1602<I, D> {
    i2c: I,
    delay: D,
    address: u8,
}

impl<I: I2c, D: DelayNs> Lcd1602<I, D> {
    pub fn new(i2c: I, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Power-on initialisation into 4-bit, two-line mode.
    pub fn init(&mut self) -> Result<(), DisplayError> {
        self.command(0x03)?;
        self.command(0x03)?;
        self.command(0x03)?;
        self.command(0x02)?;
        self.command(CMD_FUNCTION_4BIT_2LINE)?;
        self.command(CMD_DISPLAY_ON)?;
        self.command(CMD_CLEAR)?;
        self.command(CMD_ENTRY_MODE)?;
        self.delay.delay_ms(200);
        Ok(())
    }

    /// Write `text` on `row` (1-based), padded or cut to the panel width.
    pub fn write_line(&mut self, row: u8, text: &str) -> Result<(), DisplayError> {
        if row == 0 || row > ROWS {
            return Err(DisplayError::InvalidRow(row));
        }
        self.command(ROW_ADDRESS[usize::from(row - 1)])?;

        let mut written = 0;
        for ch in text.chars().take(COLUMNS) {
            let code = if ch.is_ascii() { ch as u8 } else { b'?' };
            self.data(code)?;
            written += 1;
        }
        for _ in written..COLUMNS {
            self.data(b' ')?;
        }
        Ok(())
    }

    pub fn clear(&mut self) -> Result<(), DisplayError> {
        self.command(CMD_CLEAR)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    fn command(&mut self, cmd: u8) -> Result<(), DisplayError> {
        self.send(cmd, 0)
    }

    fn data(&mut self, byte: u8) -> Result<(), DisplayError> {
        self.send(byte, RS)
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<(), DisplayError> {
        self.write_nibble((byte & 0xF0) | mode)?;
        self.write_nibble(((byte << 4) & 0xF0) | mode)
    }

    fn write_nibble(&mut self, bits: u8) -> Result<(), DisplayError> {
        self.expander_write(bits)?;
        self.expander_write(bits | EN)?;
        self.delay.delay_us(500);
        self.expander_write(bits & !EN)?;
        self.delay.delay_us(100);
        Ok(())
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), DisplayError> {
        self.i2c
            .write(self.address, &[bits | BACKLIGHT])
            .map_err(|_| DisplayError::BusWriteFailed)
    }
}
