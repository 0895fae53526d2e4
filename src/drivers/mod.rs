//! Device drivers over `embedded-hal` traits.

pub mod adc;
pub mod button;
pub mod lcd;
pub mod relay;
