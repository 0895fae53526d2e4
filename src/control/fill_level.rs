//! Fill-level estimation from the ultrasonic distance to the water surface,
//! plus the fill-valve threshold policy.
//!
//! The sensor is mounted `sensor_height_cm` above the 100 % water line and
//! the tank is `tank_height_cm` deep, so the surface distance maps linearly
//! onto 100 % … 0 %.

use crate::config::SystemConfig;

/// Fixed tank geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TankGeometry {
    pub tank_height_cm: f32,
    pub sensor_height_cm: f32,
}

impl Default for TankGeometry {
    fn default() -> Self {
        Self {
            tank_height_cm: 20.0,
            sensor_height_cm: 3.0,
        }
    }
}

/// What the valve should do after an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveCommand {
    Open,
    Close,
    /// Inside the dead band; keep the last commanded state.
    Hold,
}

/// Thresholds (%) driving the fill valve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValvePolicy {
    pub open_below_percent: f32,
    pub close_at_percent: f32,
    pub max_level_percent: f32,
}

impl Default for ValvePolicy {
    fn default() -> Self {
        Self {
            open_below_percent: 50.0,
            close_at_percent: 100.0,
            max_level_percent: 100.0,
        }
    }
}

impl ValvePolicy {
    pub fn decide(&self, percent: f32) -> ValveCommand {
        if percent < self.open_below_percent {
            ValveCommand::Open
        } else if percent >= self.close_at_percent || percent >= self.max_level_percent {
            ValveCommand::Close
        } else {
            ValveCommand::Hold
        }
    }
}

/// Stateless distance → percentage → valve command pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillLevelEstimator {
    geometry: TankGeometry,
    policy: ValvePolicy,
}

impl FillLevelEstimator {
    pub fn new(geometry: TankGeometry, policy: ValvePolicy) -> Self {
        Self { geometry, policy }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(
            TankGeometry {
                tank_height_cm: config.tank_height_cm,
                sensor_height_cm: config.sensor_height_cm,
            },
            ValvePolicy {
                open_below_percent: config.valve_open_below_percent,
                close_at_percent: config.valve_close_at_percent,
                max_level_percent: config.max_level_percent,
            },
        )
    }

    /// Fill level in [0, 100] %, or `None` for the zero "no echo" distance.
    pub fn estimate(&self, distance_cm: u32) -> Option<f32> {
        if distance_cm == 0 {
            return None;
        }
        let g = &self.geometry;
        let percent = (1.0 - (distance_cm as f32 - g.sensor_height_cm) / g.tank_height_cm) * 100.0;
        Some(percent.clamp(0.0, 100.0))
    }

    pub fn decide(&self, percent: f32) -> ValveCommand {
        self.policy.decide(percent)
    }
}
