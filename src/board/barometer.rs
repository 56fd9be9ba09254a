//! BME280 adapter for the [`Sensor`] trait.

use baro_oled::error::SensorError;
use baro_oled::sensor::{Reading, Sensor};
use bme280::i2c::BME280;
use embassy_time::Delay;

pub struct Bme280Sensor<I2C> {
    dev: BME280<I2C>,
    delay: Delay,
}

fn classify<E>(e: bme280::Error<E>) -> SensorError {
    match e {
        bme280::Error::I2c(_) => SensorError::Bus,
        bme280::Error::UnsupportedChip => SensorError::NotFound,
        _ => SensorError::InvalidReading,
    }
}

impl<I2C> Bme280Sensor<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Sensor at the primary address (0x76, SDO low).
    pub fn new(i2c: I2C) -> Self {
        Self {
            dev: BME280::new_primary(i2c),
            delay: Delay,
        }
    }

    /// Check the chip ID, load calibration and start measuring.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.dev.init(&mut self.delay).map_err(classify)
    }
}

impl<I2C> Sensor for Bme280Sensor<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn poll(&mut self) -> Result<Reading, SensorError> {
        let m = self.dev.measure(&mut self.delay).map_err(classify)?;
        Ok(Reading {
            temperature_c: m.temperature,
            humidity_pct: m.humidity,
            pressure_pa: m.pressure,
        })
    }
}
