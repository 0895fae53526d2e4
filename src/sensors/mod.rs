//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns the three input devices of the rig and exposes them to the
//! control loop through [`SensorPort`](crate::app::ports::SensorPort).
//!
//! | Driver        | Device           | Bus            |
//! |---------------|------------------|----------------|
//! | `ultrasonic`  | HC-SR04 ranger   | trigger + echo |
//! | `temperature` | DS18B20 probe    | 1-Wire         |
//! | ADC           | PCF8591/ADS7830  | I2C            |

pub mod pulse;
pub mod temperature;
pub mod ultrasonic;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::I2c;
use embedded_hal_p2::blocking::delay::{DelayMs, DelayUs};
use embedded_hal_p2::digital::v2::{InputPin as OneWireInput, OutputPin as OneWireOutput};

use crate::app::ports::{MonotonicClock, SensorPort};
use crate::drivers::adc::Adc;
use crate::error::SensorError;
use temperature::WaterThermometer;
use ultrasonic::{DistanceSample, UltrasonicSensor};

/// Owns every sensor driver.  Built in `main` where peripheral ownership
/// is established.
pub struct SensorHub<T, E, D, C, I, W, WD> {
    ranger: UltrasonicSensor<T, E, D, C>,
    adc: Adc<I>,
    setpoint_channel: u8,
    thermometer: WaterThermometer<W, WD>,
}

impl<T, E, D, C, I, W, WD> SensorHub<T, E, D, C, I, W, WD>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MonotonicClock,
    I: I2c,
    W: OneWireInput + OneWireOutput<Error = <W as OneWireInput>::Error>,
    WD: DelayUs<u16> + DelayMs<u16>,
{
    pub fn new(
        ranger: UltrasonicSensor<T, E, D, C>,
        adc: Adc<I>,
        setpoint_channel: u8,
        thermometer: WaterThermometer<W, WD>,
    ) -> Self {
        Self {
            ranger,
            adc,
            setpoint_channel,
            thermometer,
        }
    }
}

impl<T, E, D, C, I, W, WD> SensorPort for SensorHub<T, E, D, C, I, W, WD>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MonotonicClock,
    I: I2c,
    W: OneWireInput + OneWireOutput<Error = <W as OneWireInput>::Error>,
    WD: DelayUs<u16> + DelayMs<u16>,
{
    fn measure_distance(&mut self) -> Result<DistanceSample, SensorError> {
        self.ranger.measure_distance()
    }

    fn read_setpoint_raw(&mut self) -> Result<u8, SensorError> {
        self.adc.read_channel(self.setpoint_channel)
    }

    fn read_water_temperature(&mut self) -> Result<f32, SensorError> {
        self.thermometer.read_celsius()
    }
}
