//! WaterFilter firmware library.
//!
//! Exposes the control core, drivers and adapters for integration testing.
//! Everything here builds on the host; ESP-IDF-specific code is gated
//! behind the `espidf` feature.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod lifecycle;
pub mod pins;
pub mod sensors;
