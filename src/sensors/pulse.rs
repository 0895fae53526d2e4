//! Bounded busy-wait pulse-width measurement.
//!
//! This is the only time-critical section in the firmware: it spins on the
//! input pin, reading a microsecond clock on every iteration, and blocks the
//! caller for at most two timeouts.  A timeout is not an error; it yields
//! the zero-duration sentinel and the caller skips the cycle.

use embedded_hal::digital::{InputPin, PinState};

use crate::app::ports::MonotonicClock;
use crate::error::SensorError;

/// Measure how long `pin` stays at `level`, in microseconds.
///
/// Waits up to `timeout_us` for the level to appear, then up to `timeout_us`
/// for it to end.  Returns `Ok(0)` if either wait times out.
pub fn measure_pulse<P, C>(
    pin: &mut P,
    level: PinState,
    timeout_us: u32,
    clock: &C,
) -> Result<u32, SensorError>
where
    P: InputPin,
    C: MonotonicClock,
{
    let timeout = u64::from(timeout_us);

    let wait_start = clock.now_us();
    while !at_level(pin, level)? {
        if clock.now_us().saturating_sub(wait_start) > timeout {
            return Ok(0);
        }
    }

    let rise = clock.now_us();
    while at_level(pin, level)? {
        if clock.now_us().saturating_sub(rise) > timeout {
            return Ok(0);
        }
    }

    let width = clock.now_us().saturating_sub(rise);
    Ok(u32::try_from(width).unwrap_or(u32::MAX))
}

fn at_level<P: InputPin>(pin: &mut P, level: PinState) -> Result<bool, SensorError> {
    let high = pin.is_high().map_err(|_| SensorError::GpioReadFailed)?;
    Ok(high == (level == PinState::High))
}
