//! WaterFilter Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LcdDisplay     LogEventSink   ButtonPacer   │
//! │  (Sensor+Actuator) (DisplayPort)  (EventSink)    (LoopPacer)   │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlLoop (pure logic)                  │    │
//! │  │  Thermostat · DistanceTracker · FillLevelEstimator     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::cell::RefCell;

use anyhow::Result;
use embedded_hal_bus::i2c::RefCellDevice;
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, PinDriver, Pull};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use log::{error, info, warn};

use waterfilter::adapters::display::LcdDisplay;
use waterfilter::adapters::hardware::HardwareAdapter;
use waterfilter::adapters::log_sink::LogEventSink;
use waterfilter::adapters::pacer::ButtonPacer;
use waterfilter::adapters::time::Esp32TimeAdapter;
use waterfilter::app::service::ControlLoop;
use waterfilter::config::SystemConfig;
use waterfilter::drivers::adc::Adc;
use waterfilter::drivers::button::StopButton;
use waterfilter::drivers::lcd::Lcd1602;
use waterfilter::drivers::relay::Relay;
use waterfilter::error::Error;
use waterfilter::lifecycle::ShutdownSignal;
use waterfilter::pins;
use waterfilter::sensors::SensorHub;
use waterfilter::sensors::temperature::WaterThermometer;
use waterfilter::sensors::ultrasonic::UltrasonicSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WaterFilter v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    match serde_json::to_string(&config) {
        Ok(json) => info!("Config: {}", json),
        Err(e) => warn!("Config could not be serialised: {}", e),
    }

    // ── 3. Shared I2C bus (ADC + LCD backpack) ────────────────
    let peripherals = Peripherals::take()?;
    // SAFETY: each GPIO number in `pins` is claimed exactly once below and
    // nothing else in the firmware touches `peripherals.pins`.
    let (sda, scl) = unsafe {
        (
            AnyIOPin::new(pins::I2C_SDA_GPIO),
            AnyIOPin::new(pins::I2C_SCL_GPIO),
        )
    };
    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::I2C_BAUD_HZ));
    let i2c = I2cDriver::new(peripherals.i2c0, sda, scl, &i2c_config)?;
    let bus = RefCell::new(i2c);

    // ── 4. Analog converter detection (fatal if absent) ───────
    let adc = match Adc::detect(RefCellDevice::new(&bus)) {
        Ok(adc) => adc,
        Err(e) => {
            error!("No PCF8591 (0x48) or ADS7830 (0x4B) found on the I2C bus.");
            error!("Check SDA/SCL wiring and run an I2C scan to confirm the address.");
            return Err(Error::from(e).into());
        }
    };

    // ── 5. GPIO ───────────────────────────────────────────────
    // SAFETY: see above; every number is distinct and used once.
    let (heater_pin, valve_pin, trig_pin, echo_pin, onewire_pin, stop_pin) = unsafe {
        (
            AnyOutputPin::new(pins::HEATER_GPIO),
            AnyOutputPin::new(pins::VALVE_GPIO),
            AnyOutputPin::new(pins::ULTRASONIC_TRIG_GPIO),
            AnyInputPin::new(pins::ULTRASONIC_ECHO_GPIO),
            AnyIOPin::new(pins::ONEWIRE_GPIO),
            AnyInputPin::new(pins::STOP_BUTTON_GPIO),
        )
    };

    let heater = Relay::new("heater", PinDriver::output(heater_pin)?);
    let valve = Relay::new("valve", PinDriver::output(valve_pin)?);

    let ranger = UltrasonicSensor::new(
        PinDriver::output(trig_pin)?,
        PinDriver::input(echo_pin)?,
        Ets,
        Esp32TimeAdapter::new(),
        config.echo_timeout_us(),
    );

    let mut onewire_driver = PinDriver::input_output_od(onewire_pin)?;
    onewire_driver.set_pull(Pull::Up)?;
    let thermometer = WaterThermometer::new(onewire_driver, Ets).map_err(Error::from)?;

    let mut stop_driver = PinDriver::input(stop_pin)?;
    stop_driver.set_pull(Pull::Up)?;

    // ── 6. Adapters ───────────────────────────────────────────
    let sensors = SensorHub::new(ranger, adc, config.setpoint_adc_channel, thermometer);
    let mut hw = HardwareAdapter::new(sensors, heater, valve);

    let lcd = Lcd1602::new(RefCellDevice::new(&bus), FreeRtos, config.lcd_i2c_address);
    let mut display = LcdDisplay::new(lcd).map_err(Error::from)?;

    let shutdown = ShutdownSignal::new();
    let mut pacer = ButtonPacer::new(
        StopButton::new(stop_driver, config.stop_hold_ms),
        FreeRtos,
        Esp32TimeAdapter::new(),
        shutdown.clone(),
    );
    let mut sink = LogEventSink::new();

    // ── 7. Control loop ───────────────────────────────────────
    info!("Entering control loop (hold the stop button to exit)");
    let mut control = ControlLoop::new(config);
    control.run(&mut hw, &mut display, &mut sink, &mut pacer, &shutdown);

    info!("Shutdown complete");
    Ok(())
}
