//! 8-bit I2C analog converter for the setpoint potentiometer.
//!
//! Two interchangeable boards are supported and probed at startup:
//!
//! | Chip    | Address | Request                       | Response           |
//! |---------|---------|-------------------------------|--------------------|
//! | PCF8591 | `0x48`  | write `0x40 \| ch`, read 2    | second byte        |
//! | ADS7830 | `0x4B`  | write single-ended cmd for ch | one byte           |
//!
//! The PCF8591 returns the result of the *previous* conversion first, so the
//! second byte of a two-byte read is the fresh sample.

use embedded_hal::i2c::I2c;
use log::{info, warn};

use crate::error::SensorError;

pub const PCF8591_ADDR: u8 = 0x48;
pub const ADS7830_ADDR: u8 = 0x4B;

const PCF8591_CONTROL: u8 = 0x40;
const ADS7830_SINGLE_ENDED: u8 = 0x84;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdcChip {
    Pcf8591,
    Ads7830,
}

impl AdcChip {
    pub const fn address(self) -> u8 {
        match self {
            Self::Pcf8591 => PCF8591_ADDR,
            Self::Ads7830 => ADS7830_ADDR,
        }
    }

    pub const fn channels(self) -> u8 {
        match self {
            Self::Pcf8591 => 4,
            Self::Ads7830 => 8,
        }
    }
}

/// ADS7830 command byte for single-ended input `channel`.
///
/// The chip's channel-select bits interleave odd and even inputs.
pub const fn ads7830_command(channel: u8) -> u8 {
    let select = ((channel << 2) | (channel >> 1)) & 0x07;
    ADS7830_SINGLE_ENDED | (select << 4)
}

/// Probe the bus for a supported converter, PCF8591 first.
pub fn detect<I: I2c>(i2c: &mut I) -> Result<AdcChip, SensorError> {
    for chip in [AdcChip::Pcf8591, AdcChip::Ads7830] {
        if i2c.write(chip.address(), &[0]).is_ok() {
            info!("ADC: found {:?} at 0x{:02X}", chip, chip.address());
            return Ok(chip);
        }
    }
    warn!("ADC: no converter answered at 0x48 or 0x4B");
    Err(SensorError::NoAdcDetected)
}

/// A detected converter on its bus.
pub struct Adc<I> {
    chip: AdcChip,
    i2c: I,
}

impl<I: I2c> Adc<I> {
    pub fn new(chip: AdcChip, i2c: I) -> Self {
        Self { chip, i2c }
    }

    /// Probe and wrap in one step.
    pub fn detect(mut i2c: I) -> Result<Self, SensorError> {
        let chip = detect(&mut i2c)?;
        Ok(Self::new(chip, i2c))
    }

    pub fn chip(&self) -> AdcChip {
        self.chip
    }

    /// One conversion on `channel`, 0..=255.
    pub fn read_channel(&mut self, channel: u8) -> Result<u8, SensorError> {
        if channel >= self.chip.channels() {
            return Err(SensorError::InvalidChannel(channel));
        }
        let addr = self.chip.address();
        match self.chip {
            AdcChip::Pcf8591 => {
                let mut buf = [0u8; 2];
                self.i2c
                    .write_read(addr, &[PCF8591_CONTROL | channel], &mut buf)
                    .map_err(|_| SensorError::I2cFailed)?;
                Ok(buf[1])
            }
            AdcChip::Ads7830 => {
                let mut buf = [0u8; 1];
                self.i2c
                    .write_read(addr, &[ads7830_command(channel)], &mut buf)
                    .map_err(|_| SensorError::I2cFailed)?;
                Ok(buf[0])
            }
        }
    }
}
