//! Loop pacer that watches the stop button while it waits.
//!
//! The pause between phases is slept in short slices.  After each slice
//! the stop button is sampled; a completed hold raises the
//! [`ShutdownSignal`] and cuts the pause short so the loop can begin its
//! orderly shutdown.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

use crate::app::ports::{LoopPacer, MonotonicClock};
use crate::drivers::button::StopButton;
use crate::lifecycle::ShutdownSignal;

/// Button sampling period while pausing.
const POLL_SLICE_MS: u32 = 10;

pub struct ButtonPacer<P, D, C> {
    button: StopButton<P>,
    delay: D,
    clock: C,
    shutdown: ShutdownSignal,
}

impl<P, D, C> ButtonPacer<P, D, C>
where
    P: InputPin,
    D: DelayNs,
    C: MonotonicClock,
{
    pub fn new(button: StopButton<P>, delay: D, clock: C, shutdown: ShutdownSignal) -> Self {
        Self {
            button,
            delay,
            clock,
            shutdown,
        }
    }

    fn now_ms(&self) -> u32 {
        (self.clock.now_us() / 1_000) as u32
    }
}

impl<P, D, C> LoopPacer for ButtonPacer<P, D, C>
where
    P: InputPin,
    D: DelayNs,
    C: MonotonicClock,
{
    fn pause(&mut self, ms: u32) {
        let mut remaining = ms;
        while remaining > 0 && !self.shutdown.is_requested() {
            let slice = remaining.min(POLL_SLICE_MS);
            self.delay.delay_ms(slice);
            remaining -= slice;
            if self.button.poll(self.now_ms()) {
                log::info!("Stop button held; stopping after this phase");
                self.shutdown.request();
            }
        }
    }
}
