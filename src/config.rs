//! Application-wide constants and compile-time configuration.
//!
//! All hardware pin assignments, timing parameters, and display
//! constants live here so they can be tuned in one place.

use crate::error::Error;

// Scheduler timing

/// How often the sensor is polled (ms).
pub const SENSOR_POLL_INTERVAL_MS: u64 = 1000;

/// How often the display is redrawn (ms). Faster than polling so the
/// button and LED feel responsive between readings.
pub const DISPLAY_REFRESH_INTERVAL_MS: u64 = 100;

/// How long the status LED stays lit after a successful poll (ms).
pub const LED_PULSE_MS: u64 = 50;

/// Button debounce window (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Press duration that counts as a hold / long-press (ms).
pub const BUTTON_HOLD_MS: u64 = 1000;

/// Time the "Bye" screen stays up before the panel is blanked (ms).
pub const SUSPEND_GRACE_MS: u64 = 500;

/// Idle time between scheduler passes in the firmware runner (ms).
pub const TICK_PERIOD_MS: u64 = 5;

// Sensor

/// BME280 I²C address (SDO tied low).
pub const BME280_ADDR: u8 = 0x76;

/// Reference sea-level pressure for the altitude estimate (hPa).
/// Use the local QNH for a more accurate altitude.
pub const SEA_LEVEL_PRESSURE_HPA: f32 = 1013.25;

/// Delay between sensor / display init attempts during boot (ms).
pub const INIT_RETRY_MS: u64 = 500;

// Display

/// SSD1306 I²C address.
pub const DISPLAY_ADDR: u8 = 0x3C;

/// Panel width in pixels.
pub const SCREEN_WIDTH: i32 = 128;

/// Panel height in pixels.
pub const SCREEN_HEIGHT: i32 = 64;

/// Glyph advance of the 6x10 monospace font (px).
pub const FONT_WIDTH: i32 = 6;

// GPIO pin assignments (STM32F411 Black Pill defaults)
//
// These are logical names; the concrete `embassy_stm32::peripherals::*`
// are picked in `main.rs`.
//
//   Button (to GND, pull-up)  → PA0 / EXTI0
//   Status LED (active-low)   → PC13
//   I²C1 SCL                  → PB6
//   I²C1 SDA                  → PB7

/// The on-board PC13 LED lights when the pin is driven low.
pub const STATUS_LED_ACTIVE_LOW: bool = true;

/// I²C bus frequency (Hz).
pub const I2C_FREQUENCY_HZ: u32 = 400_000;

/// Runtime-adjustable durations consumed by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timings {
    pub poll_interval_ms: u64,
    pub render_interval_ms: u64,
    pub pulse_ms: u64,
    pub debounce_ms: u64,
    pub hold_ms: u64,
    pub suspend_grace_ms: u64,
}

impl Timings {
    /// Hold detection only makes sense if a press can settle before the
    /// hold threshold is reached.
    pub fn validate(&self) -> Result<(), Error> {
        if self.debounce_ms >= self.hold_ms {
            return Err(Error::InvalidTimings);
        }
        if self.poll_interval_ms == 0 || self.render_interval_ms == 0 {
            return Err(Error::InvalidTimings);
        }
        Ok(())
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            poll_interval_ms: SENSOR_POLL_INTERVAL_MS,
            render_interval_ms: DISPLAY_REFRESH_INTERVAL_MS,
            pulse_ms: LED_PULSE_MS,
            debounce_ms: BUTTON_DEBOUNCE_MS,
            hold_ms: BUTTON_HOLD_MS,
            suspend_grace_ms: SUSPEND_GRACE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings_are_valid() {
        assert!(Timings::default().validate().is_ok());
    }

    #[test]
    fn debounce_must_be_shorter_than_hold() {
        let t = Timings {
            debounce_ms: 1000,
            ..Timings::default()
        };
        assert!(matches!(t.validate(), Err(Error::InvalidTimings)));
    }

    #[test]
    fn zero_intervals_rejected() {
        let t = Timings {
            render_interval_ms: 0,
            ..Timings::default()
        };
        assert!(t.validate().is_err());
    }
}
