//! DS18B20 digital thermometer on the 1-Wire bus.
//!
//! Bus timing, ROM search, the scratchpad CRC and temperature decoding come
//! from the `one-wire-bus` and `ds18b20` crates.  The rig carries a single
//! probe; its ROM address is found by a bus search on the first read and
//! cached, so a probe plugged in after boot is picked up on the next cycle.
//!
//! ## Validation
//!
//! A reading of exactly 85 °C is the power-on register value and means the
//! conversion never ran; it is reported as [`SensorError::PowerOnReset`].

use ds18b20::{Ds18b20, Resolution};
use embedded_hal_p2::blocking::delay::{DelayMs, DelayUs};
use embedded_hal_p2::digital::v2::{InputPin, OutputPin};
use log::{debug, info};
use one_wire_bus::{OneWire, OneWireError};

use crate::error::SensorError;

const POWER_ON_RESET_C: f32 = 85.0;

/// Reject a decoded temperature that is not the result of a conversion.
#[allow(clippy::float_cmp)]
pub fn check_conversion(celsius: f32) -> Result<f32, SensorError> {
    if celsius == POWER_ON_RESET_C {
        return Err(SensorError::PowerOnReset);
    }
    Ok(celsius)
}

/// Collapse a bus error into the sensor error reported to the control loop.
pub fn bus_error<E>(err: OneWireError<E>) -> SensorError {
    match err {
        OneWireError::CrcMismatch => SensorError::CrcMismatch,
        OneWireError::PinError(_) => SensorError::GpioReadFailed,
        _ => SensorError::NoPresence,
    }
}

/// The tank's water thermometer.
pub struct WaterThermometer<P, D> {
    bus: OneWire<P>,
    delay: D,
    probe: Option<Ds18b20>,
}

impl<P, D> WaterThermometer<P, D>
where
    P: InputPin + OutputPin<Error = <P as InputPin>::Error>,
    D: DelayUs<u16> + DelayMs<u16>,
{
    /// Take the bus pin.  Fails if the line is not pulled high.
    pub fn new(pin: P, delay: D) -> Result<Self, SensorError> {
        let bus = OneWire::new(pin).map_err(bus_error)?;
        Ok(Self {
            bus,
            delay,
            probe: None,
        })
    }

    /// Blocking 12-bit conversion and read.  Takes roughly 760 ms.
    pub fn read_celsius(&mut self) -> Result<f32, SensorError> {
        if self.probe.is_none() {
            self.probe = Some(self.discover()?);
        }

        ds18b20::start_simultaneous_temp_measurement(&mut self.bus, &mut self.delay)
            .map_err(bus_error)?;
        Resolution::Bits12.delay_for_measurement_time(&mut self.delay);

        let Some(probe) = self.probe.as_ref() else {
            return Err(SensorError::NoPresence);
        };
        let data = probe.read_data(&mut self.bus, &mut self.delay).map_err(bus_error)?;
        let celsius = check_conversion(data.temperature)?;
        debug!("DS18B20: {:.4} C", celsius);
        Ok(celsius)
    }

    /// First DS18B20 found by a ROM search.
    fn discover(&mut self) -> Result<Ds18b20, SensorError> {
        for found in self.bus.devices(false, &mut self.delay) {
            let address = found.map_err(bus_error)?;
            if address.family_code() == ds18b20::FAMILY_CODE {
                info!("DS18B20 found at {:?}", address);
                return Ds18b20::new::<<P as InputPin>::Error>(address).map_err(bus_error);
            }
        }
        Err(SensorError::NoPresence)
    }
}
