//! Control policies: pure functions and small state machines, no I/O.
//!
//! | Module       | Policy                                         |
//! |--------------|------------------------------------------------|
//! | `anomaly`    | rolling-average outlier rejection of distances |
//! | `fill_level` | distance → fill % and fill-valve thresholds    |
//! | `thermostat` | two-point heater regulation, status text       |

pub mod anomaly;
pub mod fill_level;
pub mod thermostat;
