//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other side
//! decide what to do with them.

use crate::error::{ActuatorError, SensorError};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop has started; actuators are in the safe state.
    Started,

    /// End-of-cycle status snapshot.
    Telemetry(TelemetryData),

    /// The heater relay changed state.
    HeaterSwitched {
        on: bool,
        setpoint_c: f32,
        measured_c: f32,
    },

    /// The fill valve changed state.
    ValveSwitched { open: bool, fill_percent: f32 },

    /// A distance sample fell outside the anomaly band and was discarded.
    SampleRejected { distance_cm: u32, average_cm: f32 },

    /// No echo within the ranging timeout; fill-level logic skipped.
    EchoTimeout,

    /// A sensor read failed; the affected phase was skipped.
    SensorFault(SensorError),

    /// A relay write failed; the recorded actuator state was not changed.
    ActuatorFault(ActuatorError),

    /// Orderly shutdown finished; actuators released, display cleared.
    Stopped,
}

/// A point-in-time snapshot suitable for logging.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TelemetryData {
    pub cycle: u64,
    pub setpoint_c: Option<f32>,
    pub water_temp_c: Option<f32>,
    pub heater_on: bool,
    pub distance_cm: Option<u32>,
    pub average_cm: Option<f32>,
    pub history_len: usize,
    pub fill_percent: Option<f32>,
    pub valve_open: bool,
    pub rejected_samples: u32,
}
