//! Polled stop button with debounce and hold-to-stop detection.
//!
//! ## Hardware
//!
//! Active-low momentary switch with pull-up.  The loop pacer samples the
//! pin every few milliseconds while it waits between phases, passing the
//! current monotonic time in.
//!
//! ## Gesture
//!
//! | State        | Transition                                  |
//! |--------------|---------------------------------------------|
//! | Idle         | pin low → DebounceWait                      |
//! | DebounceWait | low for `DEBOUNCE_MS` → Pressed, high → Idle|
//! | Pressed      | held `hold_ms` → stop (once), high → Idle   |
//!
//! A stop fires once per press; the button must be released before it
//! can fire again.

use embedded_hal::digital::InputPin;
use log::warn;

const DEBOUNCE_MS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GestureState {
    Idle,
    DebounceWait { since_ms: u32 },
    Pressed { since_ms: u32, fired: bool },
}

pub struct StopButton<P> {
    pin: P,
    hold_ms: u32,
    state: GestureState,
}

impl<P: InputPin> StopButton<P> {
    pub fn new(pin: P, hold_ms: u32) -> Self {
        Self {
            pin,
            hold_ms,
            state: GestureState::Idle,
        }
    }

    /// Sample the pin.  Returns `true` exactly once when a hold completes.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        let pressed = match self.pin.is_low() {
            Ok(low) => low,
            Err(_) => {
                warn!("Stop button: GPIO read failed");
                false
            }
        };

        match self.state {
            GestureState::Idle => {
                if pressed {
                    self.state = GestureState::DebounceWait { since_ms: now_ms };
                }
                false
            }

            GestureState::DebounceWait { since_ms } => {
                if !pressed {
                    self.state = GestureState::Idle;
                } else if now_ms.wrapping_sub(since_ms) >= DEBOUNCE_MS {
                    self.state = GestureState::Pressed {
                        since_ms,
                        fired: false,
                    };
                }
                false
            }

            GestureState::Pressed { since_ms, fired } => {
                if !pressed {
                    self.state = GestureState::Idle;
                    return false;
                }
                if !fired && now_ms.wrapping_sub(since_ms) >= self.hold_ms {
                    self.state = GestureState::Pressed {
                        since_ms,
                        fired: true,
                    };
                    return true;
                }
                false
            }
        }
    }
}
