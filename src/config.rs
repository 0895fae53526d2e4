//! System configuration parameters
//!
//! Every control threshold of the rig lives here as a fixed policy value.
//! The config is built once at boot from [`SystemConfig::default`] and never
//! changes while the control loop runs.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Tank geometry ---
    /// Inner height of the tank (cm)
    pub tank_height_cm: f32,
    /// Distance from the ultrasonic sensor to the 100 % water line (cm)
    pub sensor_height_cm: f32,
    /// Fill level (%) at or above which the valve is always closed
    pub max_level_percent: f32,

    // --- Fill valve ---
    /// Fill level (%) below which the valve opens
    pub valve_open_below_percent: f32,
    /// Fill level (%) at which the valve closes
    pub valve_close_at_percent: f32,

    // --- Ultrasonic ranging ---
    /// Maximum measurable distance (cm)
    pub max_distance_cm: u32,
    /// Echo timeout per centimetre of range (µs/cm)
    pub timeout_us_per_cm: u32,
    /// Deviation from the rolling average (percent) beyond which a sample is an anomaly
    pub anomaly_tolerance_percent: u32,

    // --- Temperature ---
    /// Setpoint at full-scale ADC reading (°C)
    pub setpoint_full_scale_c: f32,
    /// Width of the hysteresis band below the setpoint (°C)
    pub hysteresis_band_c: f32,
    /// ADC channel wired to the setpoint potentiometer
    pub setpoint_adc_channel: u8,

    // --- Display ---
    /// 7-bit I2C address of the LCD backpack
    pub lcd_i2c_address: u8,

    // --- Timing ---
    /// Pause after every control-loop phase (milliseconds)
    pub phase_interval_ms: u32,
    /// Stop-button hold time that requests shutdown (milliseconds)
    pub stop_hold_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Tank geometry
            tank_height_cm: 20.0,
            sensor_height_cm: 3.0,
            max_level_percent: 100.0,

            // Fill valve
            valve_open_below_percent: 50.0,
            valve_close_at_percent: 100.0,

            // Ultrasonic ranging
            max_distance_cm: 220,
            timeout_us_per_cm: 60, // 220 cm → 13.2 ms
            anomaly_tolerance_percent: 5,

            // Temperature
            setpoint_full_scale_c: 50.0,
            hysteresis_band_c: 1.0,
            setpoint_adc_channel: 0,

            // Display
            lcd_i2c_address: 0x27,

            // Timing
            phase_interval_ms: 1000,
            stop_hold_ms: 2000,
        }
    }
}

impl SystemConfig {
    /// Echo timeout bounding one ultrasonic round trip (µs).
    pub fn echo_timeout_us(&self) -> u32 {
        self.max_distance_cm * self.timeout_us_per_cm
    }
}
