//! Two-point (hysteresis) heater regulation.
//!
//! The heater switches on once the water drops more than one band below the
//! setpoint and off once it reaches the setpoint.  Inside the band the last
//! command stands, which keeps the relay from chattering.

use core::fmt::Write;

use heapless::String;

/// Characters per LCD row.
pub const STATUS_LINE_LEN: usize = 16;

/// Map an 8-bit ADC reading linearly onto 0 … `full_scale_c`.
///
/// Multiplies before dividing so whole-degree setpoints come out exact
/// (153 → 30.0, not 30.000002).
pub fn setpoint_from_raw(raw: u8, full_scale_c: f32) -> f32 {
    f32::from(raw) * full_scale_c / 255.0
}

/// What the heater should do this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaterCommand {
    On,
    Off,
    Hold,
}

/// On/off regulator with a band below the setpoint.
#[derive(Debug, Clone, Copy)]
pub struct TwoPointController {
    band_c: f32,
    heater_on: bool,
}

impl TwoPointController {
    pub fn new(band_c: f32) -> Self {
        Self {
            band_c,
            heater_on: false,
        }
    }

    /// Pure decision, independent of the current heater state.
    pub fn decide(&self, setpoint_c: f32, measured_c: f32) -> HeaterCommand {
        if measured_c < setpoint_c - self.band_c {
            HeaterCommand::On
        } else if measured_c >= setpoint_c {
            HeaterCommand::Off
        } else {
            HeaterCommand::Hold
        }
    }

    /// Record the heater state once the relay has taken the command.
    pub fn latch(&mut self, on: bool) {
        self.heater_on = on;
    }

    /// Force the latched state (used on shutdown).
    pub fn reset(&mut self) {
        self.heater_on = false;
    }

    pub fn is_on(&self) -> bool {
        self.heater_on
    }
}

/// The two display rows produced by one regulation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLines {
    pub measured: String<STATUS_LINE_LEN>,
    pub setpoint: String<STATUS_LINE_LEN>,
}

impl StatusLines {
    pub fn new(measured_c: f32, setpoint_c: f32) -> Self {
        Self {
            measured: format_line("Actual", measured_c),
            setpoint: format_line("Target", setpoint_c),
        }
    }
}

fn format_line(label: &str, celsius: f32) -> String<STATUS_LINE_LEN> {
    let mut line = String::new();
    // Overflow only truncates the line; the LCD cannot show more anyway.
    let _ = write!(line, "{label}: {celsius:.2}C");
    line
}
