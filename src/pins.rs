//! GPIO / peripheral pin assignments for the WaterFilter controller board.
//!
//! Single source of truth: `main` builds every pin driver from these
//! numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Actuators (relay module, active HIGH)
// ---------------------------------------------------------------------------

/// Digital output: heating element relay.
pub const HEATER_GPIO: i32 = 18;
/// Digital output: fill valve solenoid relay. HIGH = open.
pub const VALVE_GPIO: i32 = 17;

// ---------------------------------------------------------------------------
// HC-SR04 ultrasonic ranger
// ---------------------------------------------------------------------------

/// Digital output: 10 µs trigger pulse.
pub const ULTRASONIC_TRIG_GPIO: i32 = 5;
/// Digital input: echo pulse (level-shifted to 3.3 V).
pub const ULTRASONIC_ECHO_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// DS18B20 water thermometer
// ---------------------------------------------------------------------------

/// Open-drain 1-Wire data line with external 4.7 kΩ pull-up.
pub const ONEWIRE_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// I²C bus (setpoint ADC + LCD backpack)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// Standard-mode bus clock; both the ADC and the PCF8574 top out at 100 kHz.
pub const I2C_BAUD_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// User button (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button; holding it stops the controller.
pub const STOP_BUTTON_GPIO: i32 = 0;
