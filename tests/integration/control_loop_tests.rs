//! Integration tests for the ControlLoop → ports pipeline.
//!
//! Each test scripts the sensors of a `MockRig`, drives whole cycles and
//! checks actuator commands, display rows and emitted events.

use super::mock_hw::{ActuatorCall, CountingPacer, MockDisplay, MockRig, RecordingSink};

use waterfilter::app::events::AppEvent;
use waterfilter::app::service::{ControlLoop, Phase};
use waterfilter::config::SystemConfig;
use waterfilter::error::{ActuatorError, SensorError};
use waterfilter::lifecycle::ShutdownSignal;

/// Raw ADC value that maps to a 30 °C setpoint (153 / 255 × 50).
const SETPOINT_30C: u8 = 153;

fn make_loop() -> (ControlLoop, MockDisplay, RecordingSink) {
    (
        ControlLoop::new(SystemConfig::default()),
        MockDisplay::default(),
        RecordingSink::new(),
    )
}

// ── Temperature regulation ────────────────────────────────────

#[test]
fn heater_follows_two_point_policy() {
    let (mut ctl, mut display, mut sink) = make_loop();
    let mut rig = MockRig::new()
        .with_setpoint(SETPOINT_30C)
        .with_temperatures(&[28.0, 29.5, 30.0, 29.5]);

    ctl.start(&mut rig, &mut sink);

    ctl.regulate_temperature(&mut rig, &mut display, &mut sink);
    assert!(rig.heater_on(), "28 °C is below the band: heater on");

    ctl.regulate_temperature(&mut rig, &mut display, &mut sink);
    assert!(rig.heater_on(), "29.5 °C is inside the band: unchanged");

    ctl.regulate_temperature(&mut rig, &mut display, &mut sink);
    assert!(!rig.heater_on(), "setpoint reached: heater off");

    ctl.regulate_temperature(&mut rig, &mut display, &mut sink);
    assert!(!rig.heater_on(), "back inside the band: stays off");

    let switches: Vec<bool> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::HeaterSwitched { on, .. } => Some(*on),
            _ => None,
        })
        .collect();
    assert_eq!(switches, vec![true, false]);
}

#[test]
fn status_lines_show_both_temperatures() {
    let (mut ctl, mut display, mut sink) = make_loop();
    let mut rig = MockRig::new().with_setpoint(SETPOINT_30C).with_temperatures(&[28.0]);

    let lines = ctl
        .regulate_temperature(&mut rig, &mut display, &mut sink)
        .expect("both reads succeed");

    assert_eq!(lines.measured.as_str(), "Actual: 28.00C");
    assert_eq!(lines.setpoint.as_str(), "Target: 30.00C");
    assert_eq!(display.rows[0], "Actual: 28.00C");
    assert_eq!(display.rows[1], "Target: 30.00C");
}

#[test]
fn thermometer_fault_skips_regulation() {
    let (mut ctl, mut display, mut sink) = make_loop();
    let mut rig = MockRig::new().with_setpoint(SETPOINT_30C);
    rig.temperatures.push_back(Err(SensorError::CrcMismatch));

    assert!(ctl.regulate_temperature(&mut rig, &mut display, &mut sink).is_none());
    assert!(rig.calls.is_empty(), "no heater command on a failed read");
    assert!(sink.events.contains(&AppEvent::SensorFault(SensorError::CrcMismatch)));
}

#[test]
fn failed_heater_write_keeps_heater_off() {
    let (mut ctl, mut display, mut sink) = make_loop();
    let mut rig = MockRig::new()
        .with_setpoint(SETPOINT_30C)
        .with_temperatures(&[28.0, 28.0]);
    rig.heater_fails = true;

    ctl.regulate_temperature(&mut rig, &mut display, &mut sink);

    assert!(!ctl.heater_on(), "relay never energised");
    assert!(!ctl.build_telemetry().heater_on);
    assert_eq!(rig.failed_writes, 1);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::HeaterSwitched { .. })),
        0
    );
    assert!(sink
        .events
        .contains(&AppEvent::ActuatorFault(ActuatorError::GpioWriteFailed)));

    // The command is retried next cycle and latches once the relay answers.
    rig.heater_fails = false;
    ctl.regulate_temperature(&mut rig, &mut display, &mut sink);
    assert!(ctl.heater_on());
    assert!(rig.heater_on());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::HeaterSwitched { on: true, .. })),
        1
    );
}

// ── Fill level ────────────────────────────────────────────────

#[test]
fn low_tank_opens_valve() {
    let (mut ctl, _display, mut sink) = make_loop();
    // 14 cm → 45 %
    let mut rig = MockRig::new().with_distances(&[14]);

    ctl.update_fill_level(&mut rig, &mut sink);

    assert!(rig.valve_open());
    assert!(ctl.valve_open());
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ValveSwitched { open: true, .. })),
        1
    );
}

#[test]
fn full_tank_closes_valve() {
    let (mut ctl, _display, mut sink) = make_loop();
    // 3 cm → 100 %
    let mut rig = MockRig::new().with_distances(&[3]);
    ctl.update_fill_level(&mut rig, &mut sink);
    assert_eq!(rig.calls.last(), Some(&ActuatorCall::Valve(false)));
    assert!(!ctl.valve_open());
}

#[test]
fn half_full_holds_valve_state() {
    let (mut ctl, _display, mut sink) = make_loop();
    // 13 cm → exactly 50 %: neither threshold fires.
    let mut rig = MockRig::new().with_distances(&[13]);
    ctl.update_fill_level(&mut rig, &mut sink);
    assert!(rig.calls.is_empty());
    assert_eq!(ctl.build_telemetry().fill_percent, Some(50.0));
}

#[test]
fn failed_valve_write_keeps_valve_closed() {
    let (mut ctl, _display, mut sink) = make_loop();
    // 14 cm → 45 %: the valve should open.
    let mut rig = MockRig::new().with_distances(&[14]);
    rig.valve_fails = true;

    ctl.update_fill_level(&mut rig, &mut sink);

    assert!(!ctl.valve_open());
    assert!(!ctl.build_telemetry().valve_open);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ValveSwitched { .. })), 0);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::ActuatorFault(_))),
        1
    );
}

#[test]
fn reading_on_the_band_edge_is_accepted() {
    let (mut ctl, _display, mut sink) = make_loop();
    // Mean of 26, 27, 27 is 26.67 cm; 28 cm is exactly 5 % above it.
    let mut rig = MockRig::new().with_distances(&[26, 27, 27, 28]);
    for _ in 0..4 {
        ctl.update_fill_level(&mut rig, &mut sink);
    }
    assert_eq!(ctl.tracker().history().len(), 4);
    assert_eq!(ctl.tracker().rejected_count(), 0);
    assert_eq!(sink.count(|e| matches!(e, AppEvent::SampleRejected { .. })), 0);
}

#[test]
fn echo_timeout_skips_fill_logic() {
    let (mut ctl, _display, mut sink) = make_loop();
    let mut rig = MockRig::new().with_distances(&[0]);

    ctl.update_fill_level(&mut rig, &mut sink);

    assert!(rig.calls.is_empty(), "valve untouched on timeout");
    assert!(ctl.tracker().history().is_empty(), "zero never enters history");
    assert_eq!(sink.events, vec![AppEvent::EchoTimeout]);
}

#[test]
fn outlier_is_rejected_and_valve_holds() {
    let (mut ctl, _display, mut sink) = make_loop();
    // Seed at 14 cm (valve opens), then a 3 cm spike well outside ±5 %.
    let mut rig = MockRig::new().with_distances(&[14, 3, 14]);

    ctl.update_fill_level(&mut rig, &mut sink);
    let calls_after_seed = rig.calls.len();

    ctl.update_fill_level(&mut rig, &mut sink);
    assert_eq!(rig.calls.len(), calls_after_seed, "rejected sample drives nothing");
    assert_eq!(ctl.tracker().history().len(), 1);
    assert_eq!(ctl.tracker().average(), Some(14.0));
    assert!(sink.events.contains(&AppEvent::SampleRejected {
        distance_cm: 3,
        average_cm: 14.0,
    }));

    ctl.update_fill_level(&mut rig, &mut sink);
    assert_eq!(ctl.tracker().history().len(), 2);
    assert_eq!(ctl.tracker().rejected_count(), 1);
}

#[test]
fn ranger_fault_is_reported() {
    let (mut ctl, _display, mut sink) = make_loop();
    let mut rig = MockRig::new();
    rig.distances.push_back(Err(SensorError::GpioReadFailed));
    ctl.update_fill_level(&mut rig, &mut sink);
    assert!(rig.calls.is_empty());
    assert_eq!(sink.events, vec![AppEvent::SensorFault(SensorError::GpioReadFailed)]);
}

// ── Whole cycles ──────────────────────────────────────────────

#[test]
fn cycle_ends_with_telemetry() {
    let (mut ctl, mut display, mut sink) = make_loop();
    let mut rig = MockRig::new()
        .with_setpoint(SETPOINT_30C)
        .with_temperatures(&[28.0])
        .with_distances(&[14]);

    ctl.start(&mut rig, &mut sink);
    ctl.run_cycle(&mut rig, &mut display, &mut sink);

    assert_eq!(ctl.next_phase(), Phase::Temperature);
    let Some(AppEvent::Telemetry(t)) = sink.events.last() else {
        panic!("last event should be telemetry, got {:?}", sink.events.last());
    };
    assert_eq!(t.cycle, 1);
    assert!(t.heater_on);
    assert!(t.valve_open);
    assert_eq!(t.distance_cm, Some(14));
    assert_eq!(t.history_len, 1);
    assert_eq!(t.water_temp_c, Some(28.0));
}

#[test]
fn run_stops_on_signal_and_releases_everything() {
    let (mut ctl, mut display, mut sink) = make_loop();
    let mut rig = MockRig::new()
        .with_setpoint(SETPOINT_30C)
        .with_temperatures(&[28.0])
        .with_distances(&[14]);
    let shutdown = ShutdownSignal::new();
    let mut pacer = CountingPacer {
        pauses: 0,
        stop_after: 6,
        shutdown: shutdown.clone(),
    };

    ctl.run(&mut rig, &mut display, &mut sink, &mut pacer, &shutdown);

    assert_eq!(pacer.pauses, 6, "one pause after every phase");
    assert_eq!(ctl.cycle(), 2);
    assert_eq!(rig.calls.first(), Some(&ActuatorCall::AllOff));
    assert_eq!(rig.calls.last(), Some(&ActuatorCall::AllOff));
    assert!(!rig.heater_on() && !rig.valve_open());
    assert_eq!(display.clears, 1);
    assert_eq!(sink.events.first(), Some(&AppEvent::Started));
    assert_eq!(sink.events.last(), Some(&AppEvent::Stopped));
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 2);
}

#[test]
fn shutdown_before_first_phase_runs_nothing() {
    let (mut ctl, mut display, mut sink) = make_loop();
    let mut rig = MockRig::new();
    let shutdown = ShutdownSignal::new();
    shutdown.request();
    let mut pacer = CountingPacer {
        pauses: 0,
        stop_after: 1,
        shutdown: shutdown.clone(),
    };

    ctl.run(&mut rig, &mut display, &mut sink, &mut pacer, &shutdown);

    assert_eq!(pacer.pauses, 0);
    assert_eq!(ctl.cycle(), 0);
    assert_eq!(sink.events, vec![AppEvent::Started, AppEvent::Stopped]);
}
