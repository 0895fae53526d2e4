//! Mock hardware adapters for integration tests.
//!
//! `MockRig` plays back scripted sensor readings and records every
//! actuator call, so tests can assert on the full command history without
//! touching real GPIO or I2C.

use std::collections::VecDeque;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use waterfilter::app::events::AppEvent;
use waterfilter::app::ports::{ActuatorPort, DisplayPort, EventSink, LoopPacer, SensorPort};
use waterfilter::error::{ActuatorError, SensorError};
use waterfilter::lifecycle::ShutdownSignal;
use waterfilter::sensors::ultrasonic::DistanceSample;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    Heater(bool),
    Valve(bool),
    AllOff,
}

// ── MockRig ───────────────────────────────────────────────────

/// Scripted sensors plus recording actuators.
///
/// Each queue yields one value per read; once drained, the last value
/// repeats.  A relay marked as failing rejects every write, and only
/// writes that succeeded appear in `calls`.
pub struct MockRig {
    pub distances: VecDeque<Result<DistanceSample, SensorError>>,
    pub setpoints: VecDeque<Result<u8, SensorError>>,
    pub temperatures: VecDeque<Result<f32, SensorError>>,
    pub calls: Vec<ActuatorCall>,
    pub heater_fails: bool,
    pub valve_fails: bool,
    pub failed_writes: u32,
    last_distance: Result<DistanceSample, SensorError>,
    last_setpoint: Result<u8, SensorError>,
    last_temperature: Result<f32, SensorError>,
}

#[allow(dead_code)]
impl MockRig {
    pub fn new() -> Self {
        Self {
            distances: VecDeque::new(),
            setpoints: VecDeque::new(),
            temperatures: VecDeque::new(),
            calls: Vec::new(),
            heater_fails: false,
            valve_fails: false,
            failed_writes: 0,
            last_distance: Ok(DistanceSample::NO_ECHO),
            last_setpoint: Ok(0),
            last_temperature: Ok(20.0),
        }
    }

    pub fn with_distances(mut self, cms: &[u32]) -> Self {
        self.distances = cms.iter().map(|&cm| Ok(DistanceSample::from_cm(cm))).collect();
        self
    }

    pub fn with_setpoint(mut self, raw: u8) -> Self {
        self.setpoints = VecDeque::from([Ok(raw)]);
        self
    }

    pub fn with_temperatures(mut self, temps: &[f32]) -> Self {
        self.temperatures = temps.iter().map(|&t| Ok(t)).collect();
        self
    }

    pub fn heater_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Heater(on) => Some(*on),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::Valve(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn valve_open(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Valve(open) => Some(*open),
                ActuatorCall::AllOff => Some(false),
                ActuatorCall::Heater(_) => None,
            })
            .unwrap_or(false)
    }
}

impl Default for MockRig {
    fn default() -> Self {
        Self::new()
    }
}

fn next_or_last<T: Copy>(queue: &mut VecDeque<T>, last: &mut T) -> T {
    if let Some(v) = queue.pop_front() {
        *last = v;
    }
    *last
}

impl SensorPort for MockRig {
    fn measure_distance(&mut self) -> Result<DistanceSample, SensorError> {
        next_or_last(&mut self.distances, &mut self.last_distance)
    }

    fn read_setpoint_raw(&mut self) -> Result<u8, SensorError> {
        next_or_last(&mut self.setpoints, &mut self.last_setpoint)
    }

    fn read_water_temperature(&mut self) -> Result<f32, SensorError> {
        next_or_last(&mut self.temperatures, &mut self.last_temperature)
    }
}

impl ActuatorPort for MockRig {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.heater_fails {
            self.failed_writes += 1;
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.calls.push(ActuatorCall::Heater(on));
        Ok(())
    }

    fn set_valve(&mut self, open: bool) -> Result<(), ActuatorError> {
        if self.valve_fails {
            self.failed_writes += 1;
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.calls.push(ActuatorCall::Valve(open));
        Ok(())
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
    }
}

// ── MockDisplay ───────────────────────────────────────────────

#[derive(Default)]
pub struct MockDisplay {
    pub rows: [String; 2],
    pub clears: u32,
}

impl DisplayPort for MockDisplay {
    fn write_line(&mut self, row: u8, text: &str) {
        if let Some(slot) = self.rows.get_mut(usize::from(row).wrapping_sub(1)) {
            *slot = text.to_string();
        }
    }

    fn clear(&mut self) {
        self.rows = Default::default();
        self.clears += 1;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── CountingPacer ─────────────────────────────────────────────

/// Requests shutdown after a fixed number of pauses.
pub struct CountingPacer {
    pub pauses: u32,
    pub stop_after: u32,
    pub shutdown: ShutdownSignal,
}

impl LoopPacer for CountingPacer {
    fn pause(&mut self, _ms: u32) {
        self.pauses += 1;
        if self.pauses >= self.stop_after {
            self.shutdown.request();
        }
    }
}

// ── MockI2c ───────────────────────────────────────────────────

/// Bus that acknowledges only the listed addresses.
pub struct MockI2c {
    pub present: Vec<u8>,
    pub probes: Vec<u8>,
}

impl MockI2c {
    pub fn with_devices(present: &[u8]) -> Self {
        Self {
            present: present.to_vec(),
            probes: Vec::new(),
        }
    }
}

impl ErrorType for MockI2c {
    type Error = ErrorKind;
}

impl I2c for MockI2c {
    fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
        self.probes.push(address);
        if !self.present.contains(&address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            if let Operation::Read(buf) = op {
                buf.fill(0x80);
            }
        }
        Ok(())
    }
}
