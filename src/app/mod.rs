//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the control loop of the rig: temperature
//! regulation, anomaly-filtered fill-level control and telemetry.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
