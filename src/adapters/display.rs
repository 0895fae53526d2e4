//! LCD display adapter.
//!
//! Implements [`DisplayPort`] on the I2C character LCD.  Display failures
//! never stop the control loop: they are logged and the write is dropped.
//! The panel is blanked when the adapter goes out of scope.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::app::ports::DisplayPort;
use crate::drivers::lcd::Lcd1602;
use crate::error::DisplayError;

pub struct LcdDisplay<I: I2c, D: DelayNs> {
    lcd: Lcd1602<I, D>,
}

impl<I: I2c, D: DelayNs> LcdDisplay<I, D> {
    /// Initialise the panel.  Fails if the backpack does not answer.
    pub fn new(mut lcd: Lcd1602<I, D>) -> Result<Self, DisplayError> {
        lcd.init()?;
        info!("Display: LCD ready");
        Ok(Self { lcd })
    }
}

impl<I: I2c, D: DelayNs> DisplayPort for LcdDisplay<I, D> {
    fn write_line(&mut self, row: u8, text: &str) {
        if let Err(e) = self.lcd.write_line(row, text) {
            warn!("Display: row {} not written: {}", row, e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = self.lcd.clear() {
            warn!("Display: clear failed: {}", e);
        }
    }
}

impl<I: I2c, D: DelayNs> Drop for LcdDisplay<I, D> {
    fn drop(&mut self) {
        self.clear();
    }
}
