//! Fuzz target: DS18B20 scratchpad validation
//!
//! Feeds arbitrary 9-byte scratchpads through the bus crate's CRC check and
//! the power-on check and verifies:
//! - No panics under arbitrary bytes
//! - A frame passes the CRC only when its ninth byte matches
//! - A 12-bit register value that survives is finite and never 85 °C
//!
//! cargo fuzz run fuzz_temperature_check

#![no_main]

use libfuzzer_sys::fuzz_target;
use one_wire_bus::crc::{check_crc8, crc8};
use waterfilter::error::SensorError;
use waterfilter::sensors::temperature::{bus_error, check_conversion};

fuzz_target!(|data: &[u8]| {
    let Some(bytes) = data.get(..9) else {
        return;
    };
    let mut pad = [0u8; 9];
    pad.copy_from_slice(bytes);

    // Half the inputs get a valid CRC so the conversion check is reached.
    if data.get(9).is_some_and(|b| b & 1 == 1) {
        pad[8] = crc8(&pad[..8]);
    }

    if let Err(e) = check_crc8::<()>(&pad) {
        assert_eq!(bus_error(e), SensorError::CrcMismatch);
        assert_ne!(crc8(&pad[..8]), pad[8]);
        return;
    }

    let celsius = f32::from(i16::from_le_bytes([pad[0], pad[1]])) / 16.0;
    match check_conversion(celsius) {
        Ok(c) => {
            assert!(c.is_finite());
            assert!((-2048.0..2048.0).contains(&c));
            assert!(c != 85.0, "power-on value leaked through");
        }
        Err(SensorError::PowerOnReset) => assert_eq!(celsius, 85.0),
        Err(other) => panic!("unexpected error {other:?}"),
    }
});
