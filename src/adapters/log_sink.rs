//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::{AppEvent, TelemetryData};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// `-` for a value the last cycle could not produce.
struct Opt<T>(Option<T>);

impl core::fmt::Display for Opt<f32> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.2}"),
            None => f.write_str("-"),
        }
    }
}

impl core::fmt::Display for Opt<u32> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("-"),
        }
    }
}

fn log_telemetry(t: &TelemetryData) {
    info!(
        "TELEM | cycle={} | set={}\u{00b0}C T={}\u{00b0}C heater={} | \
         dist={}cm avg={}cm hist={} | fill={}% valve={} | rejected={}",
        t.cycle,
        Opt(t.setpoint_c),
        Opt(t.water_temp_c),
        if t.heater_on { "ON" } else { "OFF" },
        Opt(t.distance_cm),
        Opt(t.average_cm),
        t.history_len,
        Opt(t.fill_percent),
        if t.valve_open { "OPEN" } else { "CLOSED" },
        t.rejected_samples,
    );
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | heater off, valve closed");
            }
            AppEvent::Telemetry(t) => log_telemetry(t),
            AppEvent::HeaterSwitched {
                on,
                setpoint_c,
                measured_c,
            } => {
                info!(
                    "HEATER | {} | set={:.2}\u{00b0}C T={:.2}\u{00b0}C",
                    if *on { "ON" } else { "OFF" },
                    setpoint_c,
                    measured_c
                );
            }
            AppEvent::ValveSwitched { open, fill_percent } => {
                info!(
                    "VALVE | {} | fill={:.1}%",
                    if *open { "OPEN" } else { "CLOSED" },
                    fill_percent
                );
            }
            AppEvent::SampleRejected {
                distance_cm,
                average_cm,
            } => {
                info!(
                    "FILTER | rejected {}cm (avg {:.2}cm)",
                    distance_cm, average_cm
                );
            }
            AppEvent::EchoTimeout => {
                warn!("FILTER | no echo, fill level skipped");
            }
            AppEvent::SensorFault(e) => {
                warn!("FAULT | {}", e);
            }
            AppEvent::ActuatorFault(e) => {
                warn!("FAULT | relay {}", e);
            }
            AppEvent::Stopped => {
                info!("STOP | relays released, display cleared");
            }
        }
    }
}
