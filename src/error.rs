//! Unified error types for the WaterFilter firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! startup path and the control loop's error handling uniform.
//! All variants are `Copy` so they can be logged and emitted as events
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned implausible data.
    Sensor(SensorError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// The character display could not be written.
    Display(DisplayError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Display(e) => write!(f, "display: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// GPIO read returned an error.
    GpioReadFailed,
    /// GPIO write (e.g. ultrasonic trigger) returned an error.
    GpioWriteFailed,
    /// I2C transaction with the converter failed.
    I2cFailed,
    /// Neither supported analog converter answered on the bus.
    NoAdcDetected,
    /// Requested ADC channel does not exist on the detected chip.
    InvalidChannel(u8),
    /// No device answered the 1-Wire reset with a presence pulse.
    NoPresence,
    /// DS18B20 scratchpad failed its CRC check.
    CrcMismatch,
    /// DS18B20 still holds its power-on reset value (85 °C).
    PowerOnReset,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::I2cFailed => write!(f, "I2C transaction failed"),
            Self::NoAdcDetected => write!(f, "no analog converter detected"),
            Self::InvalidChannel(ch) => write!(f, "invalid ADC channel {ch}"),
            Self::NoPresence => write!(f, "no 1-Wire presence pulse"),
            Self::CrcMismatch => write!(f, "scratchpad CRC mismatch"),
            Self::PowerOnReset => write!(f, "thermometer not converted yet"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Display errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// I2C write to the LCD backpack failed.
    BusWriteFailed,
    /// Row outside the panel.
    InvalidRow(u8),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusWriteFailed => write!(f, "LCD bus write failed"),
            Self::InvalidRow(row) => write!(f, "invalid LCD row {row}"),
        }
    }
}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Display(e)
    }
}
