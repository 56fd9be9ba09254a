//! Sensor collaborator interface and the in-memory reading cache.
//!
//! The scheduler only ever sees the [`Sensor`] trait; the BME280 driver
//! lives with the board support code in the firmware binary.

use crate::error::SensorError;

/// Standard atmosphere in hPa / mBar.
pub const STANDARD_ATMOSPHERE_HPA: f32 = 1013.25;

/// One raw measurement as returned by the driver.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    /// Temperature in °C.
    pub temperature_c: f32,
    /// Relative humidity in %.
    pub humidity_pct: f32,
    /// Pressure in Pascal.
    pub pressure_pa: f32,
}

impl Reading {
    /// All three channels hold real numbers and the pressure is positive.
    pub fn is_valid(&self) -> bool {
        self.temperature_c.is_finite()
            && self.humidity_pct.is_finite()
            && self.pressure_pa.is_finite()
            && self.pressure_pa > 0.0
    }
}

/// Synchronous sensor poll. Any `Err` counts as a failed poll.
pub trait Sensor {
    fn poll(&mut self) -> Result<Reading, SensorError>;
}

/// Barometric altitude estimate (m) for `pressure_hpa` relative to
/// `sea_level_hpa`, using the international barometric formula.
pub fn altitude_m(pressure_hpa: f32, sea_level_hpa: f32) -> f32 {
    44330.0 * (1.0 - libm::powf(pressure_hpa / sea_level_hpa, 0.1903))
}

/// Latest readings plus derived values. `None` means "unknown": nothing
/// valid has been read since boot.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSample {
    pub temperature_c: Option<f32>,
    pub humidity_pct: Option<f32>,
    pub pressure_mbar: Option<f32>,
    pub pressure_atm: Option<f32>,
    pub altitude_m: Option<f32>,
}

impl SensorSample {
    /// Every field unknown.
    pub const fn unknown() -> Self {
        Self {
            temperature_c: None,
            humidity_pct: None,
            pressure_mbar: None,
            pressure_atm: None,
            altitude_m: None,
        }
    }

    /// Derive all fields from one reading. Altitude comes from the same
    /// pressure sample, never from a second bus read.
    pub fn from_reading(reading: &Reading, sea_level_hpa: f32) -> Self {
        let mbar = reading.pressure_pa / 100.0;
        Self {
            temperature_c: Some(reading.temperature_c),
            humidity_pct: Some(reading.humidity_pct),
            pressure_mbar: Some(mbar),
            pressure_atm: Some(mbar / STANDARD_ATMOSPHERE_HPA),
            altitude_m: Some(altitude_m(mbar, sea_level_hpa)),
        }
    }

    /// Every known field is a finite number.
    pub fn is_finite(&self) -> bool {
        [
            self.temperature_c,
            self.humidity_pct,
            self.pressure_mbar,
            self.pressure_atm,
            self.altitude_m,
        ]
        .iter()
        .flatten()
        .all(|v| v.is_finite())
    }
}

/// Outcome of one poll as seen by the scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollOutcome {
    Updated,
    Failed(SensorError),
}

/// Sample cache and error flag. Written only by [`SensorCache::record`].
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorCache {
    sample: SensorSample,
    error: bool,
    sea_level_hpa: f32,
}

impl SensorCache {
    pub const fn new(sea_level_hpa: f32) -> Self {
        Self {
            sample: SensorSample::unknown(),
            error: false,
            sea_level_hpa,
        }
    }

    /// Store the result of a poll. On failure the previous sample stays
    /// in place and only the error flag is raised. A reading that is not
    /// valid, or whose derived values are not finite, is a failure.
    pub fn record(&mut self, result: Result<Reading, SensorError>) -> PollOutcome {
        let reading = match result {
            Ok(reading) if reading.is_valid() => reading,
            Ok(_) => return self.fail(SensorError::InvalidReading),
            Err(e) => return self.fail(e),
        };

        let sample = SensorSample::from_reading(&reading, self.sea_level_hpa);
        if !sample.is_finite() {
            return self.fail(SensorError::InvalidReading);
        }

        self.sample = sample;
        self.error = false;
        debug!(
            "poll: T={} C RH={} % P={} mBar alt={} m",
            reading.temperature_c,
            reading.humidity_pct,
            reading.pressure_pa / 100.0,
            self.sample.altitude_m.unwrap_or(0.0)
        );
        PollOutcome::Updated
    }

    fn fail(&mut self, e: SensorError) -> PollOutcome {
        warn!("poll failed: {}", e);
        self.error = true;
        PollOutcome::Failed(e)
    }

    pub fn sample(&self) -> &SensorSample {
        &self.sample
    }

    /// True exactly when the most recent poll failed.
    pub fn has_error(&self) -> bool {
        self.error
    }
}

impl Default for SensorCache {
    fn default() -> Self {
        Self::new(STANDARD_ATMOSPHERE_HPA)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(pressure_pa: f32) -> Reading {
        Reading {
            temperature_c: 21.5,
            humidity_pct: 40.0,
            pressure_pa,
        }
    }

    #[test]
    fn cache_starts_unknown_without_error() {
        let cache = SensorCache::default();
        assert_eq!(*cache.sample(), SensorSample::unknown());
        assert!(!cache.has_error());
    }

    #[test]
    fn successful_poll_fills_every_field() {
        let mut cache = SensorCache::default();
        assert_eq!(cache.record(Ok(reading(101_300.0))), PollOutcome::Updated);

        let s = cache.sample();
        assert_eq!(s.temperature_c, Some(21.5));
        assert_eq!(s.humidity_pct, Some(40.0));
        assert_eq!(s.pressure_mbar, Some(1013.0));
        let atm = s.pressure_atm.unwrap();
        assert!((atm - 0.999_753).abs() < 1e-5);
        assert!(s.altitude_m.is_some());
    }

    #[test]
    fn failure_keeps_last_sample_and_sets_flag() {
        let mut cache = SensorCache::default();
        cache.record(Ok(reading(100_000.0)));
        let before = *cache.sample();

        let outcome = cache.record(Err(SensorError::Bus));
        assert_eq!(outcome, PollOutcome::Failed(SensorError::Bus));
        assert!(cache.has_error());
        assert_eq!(*cache.sample(), before);

        cache.record(Ok(reading(100_000.0)));
        assert!(!cache.has_error());
    }

    #[test]
    fn nan_channel_is_a_failed_poll() {
        let mut cache = SensorCache::default();
        let bad = Reading {
            humidity_pct: f32::NAN,
            ..reading(101_325.0)
        };
        assert_eq!(
            cache.record(Ok(bad)),
            PollOutcome::Failed(SensorError::InvalidReading)
        );
        assert_eq!(*cache.sample(), SensorSample::unknown());
    }

    #[test]
    fn non_positive_pressure_is_a_failed_poll() {
        let mut cache = SensorCache::default();
        cache.record(Ok(reading(101_300.0)));
        let before = *cache.sample();

        for pressure_pa in [-5.0, 0.0] {
            assert_eq!(
                cache.record(Ok(reading(pressure_pa))),
                PollOutcome::Failed(SensorError::InvalidReading)
            );
            assert!(cache.has_error());
            assert_eq!(*cache.sample(), before);
        }
        assert!(cache.sample().altitude_m.is_some_and(f32::is_finite));
    }

    #[test]
    fn non_finite_altitude_is_a_failed_poll() {
        // Sea-level reference of zero divides pressure into infinity.
        let mut cache = SensorCache::new(0.0);
        assert_eq!(
            cache.record(Ok(reading(101_300.0))),
            PollOutcome::Failed(SensorError::InvalidReading)
        );
        assert_eq!(*cache.sample(), SensorSample::unknown());
    }

    #[test]
    fn altitude_is_zero_at_reference_pressure() {
        assert_eq!(altitude_m(1013.25, 1013.25), 0.0);
    }

    #[test]
    fn altitude_rises_as_pressure_drops() {
        let alt = altitude_m(899.0, 1013.25);
        assert!((alt - 1000.0).abs() < 10.0, "got {alt}");
        assert!(altitude_m(1020.0, 1013.25) < 0.0);
    }
}
