//! HC-SR04 ultrasonic ranger pointed down at the water surface.
//!
//! A 10 µs trigger pulse starts a burst; the echo pin then stays high for
//! the round-trip time of the sound.  Distance is half the round trip at
//! 340 m/s, rounded to whole centimetres with halves going to the even
//! neighbour.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, PinState};
use log::{debug, warn};

use crate::app::ports::MonotonicClock;
use crate::error::SensorError;

use super::pulse::measure_pulse;

/// Speed of sound in centimetres per microsecond (340 m/s).
pub const SPEED_OF_SOUND_CM_PER_US: f64 = 0.0340;

/// Width of the trigger pulse.
const TRIGGER_PULSE_US: u32 = 10;

/// One ranging result in whole centimetres.  Zero means no usable echo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct DistanceSample(u32);

impl DistanceSample {
    pub const NO_ECHO: Self = Self(0);

    pub const fn from_cm(cm: u32) -> Self {
        Self(cm)
    }

    /// Convert an echo pulse width to distance: half the round trip.
    pub fn from_pulse_us(pulse_us: u32) -> Self {
        let cm = (f64::from(pulse_us) * SPEED_OF_SOUND_CM_PER_US / 2.0).round_ties_even();
        Self(cm as u32)
    }

    pub fn cm(self) -> u32 {
        self.0
    }

    /// False for the timeout sentinel (and sub-centimetre echoes).
    pub fn is_echo(self) -> bool {
        self.0 != 0
    }
}

/// Holds the trigger high; dropping it pulls the pin low again on every path.
struct TriggerPulse<'a, P: OutputPin> {
    pin: &'a mut P,
}

impl<'a, P: OutputPin> TriggerPulse<'a, P> {
    fn start(pin: &'a mut P) -> Result<Self, SensorError> {
        pin.set_high().map_err(|_| SensorError::GpioWriteFailed)?;
        Ok(Self { pin })
    }
}

impl<P: OutputPin> Drop for TriggerPulse<'_, P> {
    fn drop(&mut self) {
        if self.pin.set_low().is_err() {
            warn!("Ultrasonic: trigger release failed");
        }
    }
}

/// Ranger driver over generic trigger/echo pins, a delay and a µs clock.
pub struct UltrasonicSensor<T, E, D, C> {
    trigger: T,
    echo: E,
    delay: D,
    clock: C,
    timeout_us: u32,
}

impl<T, E, D, C> UltrasonicSensor<T, E, D, C>
where
    T: OutputPin,
    E: InputPin,
    D: DelayNs,
    C: MonotonicClock,
{
    /// `timeout_us` bounds each half of the echo wait.
    pub fn new(trigger: T, echo: E, delay: D, clock: C, timeout_us: u32) -> Self {
        Self {
            trigger,
            echo,
            delay,
            clock,
            timeout_us,
        }
    }

    /// Fire one burst and return the measured distance.
    ///
    /// Returns [`DistanceSample::NO_ECHO`] when the echo times out.
    pub fn measure_distance(&mut self) -> Result<DistanceSample, SensorError> {
        {
            let _pulse = TriggerPulse::start(&mut self.trigger)?;
            self.delay.delay_us(TRIGGER_PULSE_US);
        }

        let pulse_us = measure_pulse(&mut self.echo, PinState::High, self.timeout_us, &self.clock)?;
        let sample = DistanceSample::from_pulse_us(pulse_us);
        debug!("Ultrasonic: pulse={}us distance={}cm", pulse_us, sample.cm());
        Ok(sample)
    }

    pub fn timeout_us(&self) -> u32 {
        self.timeout_us
    }
}
