//! Application service: the hexagonal core.
//!
//! [`ControlLoop`] owns the thermostat, the distance tracker and the
//! fill-level policy.  It exposes a hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the whole loop
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │         ControlLoop         │
//! ActuatorPort ◀──│ Thermostat · Tracker · Fill │ ──▶ DisplayPort
//!                 └─────────────────────────────┘
//! ```
//!
//! One cycle is three phases run in order, with a pause after each:
//! temperature regulation, fill-level control, telemetry report.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::control::anomaly::{Admission, AnomalyFilter, DistanceTracker};
use crate::control::fill_level::{FillLevelEstimator, ValveCommand};
use crate::control::thermostat::{HeaterCommand, StatusLines, TwoPointController, setpoint_from_raw};
use crate::error::{ActuatorError, SensorError};
use crate::lifecycle::ShutdownSignal;

use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, DisplayPort, EventSink, LoopPacer, SensorPort};

/// The phase [`ControlLoop::step`] will run next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Temperature,
    FillLevel,
    Report,
}

impl Phase {
    fn next(self) -> Self {
        match self {
            Self::Temperature => Self::FillLevel,
            Self::FillLevel => Self::Report,
            Self::Report => Self::Temperature,
        }
    }
}

/// Values produced during the current cycle; cleared when a new cycle starts.
#[derive(Debug, Clone, Copy, Default)]
struct CycleReadings {
    setpoint_c: Option<f32>,
    water_temp_c: Option<f32>,
    distance_cm: Option<u32>,
    fill_percent: Option<f32>,
}

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop {
    config: SystemConfig,
    thermostat: TwoPointController,
    tracker: DistanceTracker,
    fill: FillLevelEstimator,
    phase: Phase,
    cycle: u64,
    valve_open: bool,
    readings: CycleReadings,
    stopped: bool,
}

impl ControlLoop {
    pub fn new(config: SystemConfig) -> Self {
        let thermostat = TwoPointController::new(config.hysteresis_band_c);
        let tracker =
            DistanceTracker::new(AnomalyFilter::new(config.anomaly_tolerance_percent));
        let fill = FillLevelEstimator::from_config(&config);
        Self {
            config,
            thermostat,
            tracker,
            fill,
            phase: Phase::Temperature,
            cycle: 0,
            valve_open: false,
            readings: CycleReadings::default(),
            stopped: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the actuators to the safe state and announce the start.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        self.thermostat.reset();
        self.valve_open = false;
        self.stopped = false;
        sink.emit(&AppEvent::Started);
        info!("ControlLoop started, phase interval {} ms", self.config.phase_interval_ms);
    }

    /// Run until `shutdown` is requested, then shut down in order.
    ///
    /// The flag is only checked between phases; a measurement in progress
    /// always completes.
    pub fn run(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
        pacer: &mut impl LoopPacer,
        shutdown: &ShutdownSignal,
    ) {
        self.start(hw, sink);
        while !shutdown.is_requested() {
            self.step(hw, display, sink);
            pacer.pause(self.config.phase_interval_ms);
        }
        self.shutdown(hw, display, sink);
    }

    /// Release the heater and valve, blank the display.  Safe to call twice.
    pub fn shutdown(
        &mut self,
        hw: &mut impl ActuatorPort,
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        if self.stopped {
            return;
        }
        hw.all_off();
        self.thermostat.reset();
        self.valve_open = false;
        display.clear();
        self.stopped = true;
        sink.emit(&AppEvent::Stopped);
        info!("ControlLoop stopped after {} cycles", self.cycle);
    }

    // ── Phases ────────────────────────────────────────────────

    /// Run the next phase and return which one ran.
    pub fn step(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Phase {
        let phase = self.phase;
        match phase {
            Phase::Temperature => {
                self.cycle += 1;
                self.readings = CycleReadings::default();
                self.regulate_temperature(hw, display, sink);
            }
            Phase::FillLevel => self.update_fill_level(hw, sink),
            Phase::Report => self.report(sink),
        }
        self.phase = phase.next();
        phase
    }

    /// All three phases back to back, without pauses.
    pub fn run_cycle(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) {
        loop {
            if self.step(hw, display, sink) == Phase::Report {
                break;
            }
        }
    }

    /// Read setpoint and water temperature, apply the two-point policy and
    /// show both values.  Returns the display lines, or `None` when a read
    /// failed and the heater was left as it was.
    pub fn regulate_temperature(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        display: &mut impl DisplayPort,
        sink: &mut impl EventSink,
    ) -> Option<StatusLines> {
        let raw = match hw.read_setpoint_raw() {
            Ok(raw) => raw,
            Err(e) => {
                self.sensor_fault("setpoint", e, sink);
                return None;
            }
        };
        let setpoint_c = setpoint_from_raw(raw, self.config.setpoint_full_scale_c);
        self.readings.setpoint_c = Some(setpoint_c);

        let measured_c = match hw.read_water_temperature() {
            Ok(t) => t,
            Err(e) => {
                self.sensor_fault("thermometer", e, sink);
                return None;
            }
        };
        self.readings.water_temp_c = Some(measured_c);

        let wanted = match self.thermostat.decide(setpoint_c, measured_c) {
            HeaterCommand::On => Some(true),
            HeaterCommand::Off => Some(false),
            HeaterCommand::Hold => None,
        };
        if let Some(on) = wanted {
            // The state only moves once the relay has taken the command.
            match hw.set_heater(on) {
                Ok(()) => {
                    let was_on = self.thermostat.is_on();
                    self.thermostat.latch(on);
                    if on != was_on {
                        sink.emit(&AppEvent::HeaterSwitched {
                            on,
                            setpoint_c,
                            measured_c,
                        });
                    }
                }
                Err(e) => self.actuator_fault("heater", e, sink),
            }
        }

        let lines = StatusLines::new(measured_c, setpoint_c);
        display.write_line(1, &lines.measured);
        display.write_line(2, &lines.setpoint);
        Some(lines)
    }

    /// Range the water surface, filter the sample and drive the valve.
    pub fn update_fill_level(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        let sample = match hw.measure_distance() {
            Ok(s) => s,
            Err(e) => {
                self.sensor_fault("ranger", e, sink);
                return;
            }
        };
        if !sample.is_echo() {
            debug!("No echo this cycle");
            sink.emit(&AppEvent::EchoTimeout);
            return;
        }

        let distance_cm = sample.cm();
        self.readings.distance_cm = Some(distance_cm);

        match self.tracker.offer(distance_cm) {
            Admission::Rejected { average } => {
                sink.emit(&AppEvent::SampleRejected {
                    distance_cm,
                    average_cm: average,
                });
            }
            Admission::Accepted { average } => {
                debug!("Accepted {} cm, average {:.2} cm", distance_cm, average);
                let Some(percent) = self.fill.estimate(distance_cm) else {
                    return;
                };
                self.readings.fill_percent = Some(percent);
                match self.fill.decide(percent) {
                    ValveCommand::Open => self.command_valve(true, percent, hw, sink),
                    ValveCommand::Close => self.command_valve(false, percent, hw, sink),
                    ValveCommand::Hold => {}
                }
            }
        }
    }

    /// Emit the end-of-cycle telemetry snapshot.
    pub fn report(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            cycle: self.cycle,
            setpoint_c: self.readings.setpoint_c,
            water_temp_c: self.readings.water_temp_c,
            heater_on: self.thermostat.is_on(),
            distance_cm: self.readings.distance_cm,
            average_cm: self.tracker.average(),
            history_len: self.tracker.history().len(),
            fill_percent: self.readings.fill_percent,
            valve_open: self.valve_open,
            rejected_samples: self.tracker.rejected_count(),
        }
    }

    pub fn tracker(&self) -> &DistanceTracker {
        &self.tracker
    }

    pub fn heater_on(&self) -> bool {
        self.thermostat.is_on()
    }

    pub fn valve_open(&self) -> bool {
        self.valve_open
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn next_phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Internals ─────────────────────────────────────────────

    fn command_valve(
        &mut self,
        open: bool,
        fill_percent: f32,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        if let Err(e) = hw.set_valve(open) {
            self.actuator_fault("valve", e, sink);
            return;
        }
        if open != self.valve_open {
            self.valve_open = open;
            sink.emit(&AppEvent::ValveSwitched { open, fill_percent });
        }
    }

    fn actuator_fault(&self, target: &str, error: ActuatorError, sink: &mut impl EventSink) {
        warn!("{} write failed: {}; state kept", target, error);
        sink.emit(&AppEvent::ActuatorFault(error));
    }

    fn sensor_fault(&self, source: &str, error: SensorError, sink: &mut impl EventSink) {
        warn!("{} read failed: {}; phase skipped", source, error);
        sink.emit(&AppEvent::SensorFault(error));
    }
}
