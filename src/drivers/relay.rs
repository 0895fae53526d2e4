//! Single-channel relay driver (heater element, fill solenoid).
//!
//! Active-high: GPIO high energises the coil.  The driver remembers the
//! last commanded state so callers can skip redundant writes and report
//! what the hardware was told.
//!
//! A failed GPIO write is logged and the remembered state is left
//! unchanged, so the next command retries.

use embedded_hal::digital::OutputPin;
use log::error;

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Released,
    Energised,
}

pub struct Relay<P> {
    name: &'static str,
    pin: P,
    state: RelayState,
}

impl<P: OutputPin> Relay<P> {
    /// Wraps `pin` and drives it low immediately.
    pub fn new(name: &'static str, pin: P) -> Self {
        let mut relay = Self {
            name,
            pin,
            state: RelayState::Released,
        };
        relay.release();
        relay
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        match result {
            Ok(()) => {
                self.state = if on {
                    RelayState::Energised
                } else {
                    RelayState::Released
                };
                Ok(())
            }
            Err(_) => {
                error!("{}: GPIO write failed (wanted on={})", self.name, on);
                Err(ActuatorError::GpioWriteFailed)
            }
        }
    }

    /// Best-effort release; errors are already logged by [`Self::set`].
    pub fn release(&mut self) {
        let _ = self.set(false);
    }

    pub fn state(&self) -> RelayState {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state == RelayState::Energised
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
