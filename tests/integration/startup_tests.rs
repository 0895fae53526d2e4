//! Startup: analog converter detection on the shared I2C bus.

use super::mock_hw::MockI2c;

use waterfilter::drivers::adc::{ADS7830_ADDR, Adc, AdcChip, PCF8591_ADDR};
use waterfilter::error::{Error, SensorError};

#[test]
fn missing_converter_is_fatal() {
    let result = Adc::detect(MockI2c::with_devices(&[0x27]));
    let err = result.err().expect("detection must fail on an empty bus");
    assert_eq!(err, SensorError::NoAdcDetected);

    let err: Error = err.into();
    assert_eq!(err.to_string(), "sensor: no analog converter detected");
}

#[test]
fn probes_pcf8591_before_ads7830() {
    let mut bus = MockI2c::with_devices(&[ADS7830_ADDR]);
    let chip = waterfilter::drivers::adc::detect(&mut bus).expect("ADS7830 present");
    assert_eq!(chip, AdcChip::Ads7830);
    assert_eq!(bus.probes, vec![PCF8591_ADDR, ADS7830_ADDR]);
}

#[test]
fn detected_converter_reads_setpoint_channel() {
    let mut adc = Adc::detect(MockI2c::with_devices(&[PCF8591_ADDR, 0x27])).expect("PCF8591 present");
    assert_eq!(adc.chip(), AdcChip::Pcf8591);
    assert_eq!(adc.read_channel(0), Ok(0x80));
}
