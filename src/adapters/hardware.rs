//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`](crate::sensors::SensorHub) (or any other
//! [`SensorPort`]) and both relays, exposing them through [`SensorPort`]
//! and [`ActuatorPort`].  Dropping the adapter releases both relays, so
//! every exit path out of `main` leaves the rig in the safe state.

use embedded_hal::digital::OutputPin;
use log::info;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::relay::Relay;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::ultrasonic::DistanceSample;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<S, H: OutputPin, V: OutputPin> {
    sensors: S,
    heater: Relay<H>,
    valve: Relay<V>,
}

impl<S, H: OutputPin, V: OutputPin> HardwareAdapter<S, H, V> {
    pub fn new(sensors: S, heater: Relay<H>, valve: Relay<V>) -> Self {
        Self {
            sensors,
            heater,
            valve,
        }
    }

    pub fn heater_on(&self) -> bool {
        self.heater.is_on()
    }

    pub fn valve_open(&self) -> bool {
        self.valve.is_on()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<S: SensorPort, H: OutputPin, V: OutputPin> SensorPort for HardwareAdapter<S, H, V> {
    fn measure_distance(&mut self) -> Result<DistanceSample, SensorError> {
        self.sensors.measure_distance()
    }

    fn read_setpoint_raw(&mut self) -> Result<u8, SensorError> {
        self.sensors.read_setpoint_raw()
    }

    fn read_water_temperature(&mut self) -> Result<f32, SensorError> {
        self.sensors.read_water_temperature()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<S, H: OutputPin, V: OutputPin> ActuatorPort for HardwareAdapter<S, H, V> {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.heater.set(on)
    }

    fn set_valve(&mut self, open: bool) -> Result<(), ActuatorError> {
        self.valve.set(open)
    }

    fn all_off(&mut self) {
        self.heater.release();
        self.valve.release();
    }
}

impl<S, H: OutputPin, V: OutputPin> Drop for HardwareAdapter<S, H, V> {
    fn drop(&mut self) {
        self.all_off();
        info!("Hardware: relays released");
    }
}
