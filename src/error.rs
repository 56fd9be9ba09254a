//! Unified error type for the barometer firmware.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type used across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Sensor
    /// The sensor could not produce a valid sample.
    Sensor(SensorError),

    // UI / Display
    /// I²C transaction to the display failed.
    Display,

    // Configuration
    /// Debounce window not shorter than the hold threshold, or a zero interval.
    InvalidTimings,
}

/// Why a poll failed. The scheduler treats every variant the same way
/// (error flag + solid LED); the distinction only feeds the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (NACK, arbitration loss, timeout).
    Bus,
    /// The chip did not answer with the expected ID during init.
    NotFound,
    /// A measurement came back NaN or infinite.
    InvalidReading,
}

// Convenience conversions

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Error::Sensor(e)
    }
}
