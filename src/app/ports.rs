//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, display, event sinks, clock, pacer)
//! implement these traits.  The [`ControlLoop`](super::service::ControlLoop)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::{ActuatorError, SensorError};
use crate::sensors::ultrasonic::DistanceSample;

// ───────────────────────────────────────────────────────────────
// Clock port (time source for pulse timing)
// ───────────────────────────────────────────────────────────────

/// Monotonic microsecond clock.
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed origin.
    fn now_us(&self) -> u64;
}

impl<C: MonotonicClock + ?Sized> MonotonicClock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// One ultrasonic ranging cycle.  A zero sample means no echo arrived
    /// within the timeout; that is not an error.
    fn measure_distance(&mut self) -> Result<DistanceSample, SensorError>;

    /// Raw 8-bit reading of the setpoint potentiometer.
    fn read_setpoint_raw(&mut self) -> Result<u8, SensorError>;

    /// Calibrated water temperature (°C).
    fn read_water_temperature(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Switch the heating element.  On error the relay is in its old state.
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError>;

    /// Open or close the fill valve.  On error the relay is in its old state.
    fn set_valve(&mut self, open: bool) -> Result<(), ActuatorError>;

    /// Heater off, valve closed (safe state).
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → character display)
// ───────────────────────────────────────────────────────────────

/// Fixed-width text display.  Rows are numbered from 1.
pub trait DisplayPort {
    fn write_line(&mut self, row: u8, text: &str);

    fn clear(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Pacer port (outer cadence)
// ───────────────────────────────────────────────────────────────

/// Supplies the pause between control-loop phases.
///
/// Implementations may watch for a stop request while they wait and raise
/// the loop's [`ShutdownSignal`](crate::lifecycle::ShutdownSignal).
pub trait LoopPacer {
    fn pause(&mut self, ms: u32);
}
