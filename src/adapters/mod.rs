//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                    |
//! |------------|---------------|--------------------------------|
//! | `hardware` | SensorPort    | ranger, thermometer, ADC       |
//! |            | ActuatorPort  | heater + valve relays          |
//! | `display`  | DisplayPort   | HD44780 LCD over I2C           |
//! | `log_sink` | EventSink     | Serial log output              |
//! | `pacer`    | LoopPacer     | FreeRTOS delay + stop button   |
//! | `time`     | MonotonicClock| ESP32 system timer             |

pub mod display;
pub mod hardware;
pub mod log_sink;
pub mod pacer;
pub mod time;
