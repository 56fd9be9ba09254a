//! Black Pill glue: boot screens with retry and the uptime clock.

pub mod barometer;
pub mod oled;

use baro_oled::clock::EpochClock;
use baro_oled::config::{BME280_ADDR, INIT_RETRY_MS};
use baro_oled::indicator::StatusLed;
use baro_oled::ui::render;
use defmt::{info, warn};
use embassy_time::{Instant, Timer};
use embedded_hal::digital::OutputPin;

use self::barometer::Bme280Sensor;
use self::oled::Oled;

/// How long each boot screen stays up.
const SPLASH_MS: u64 = 1000;

/// Seconds since the time driver started. Good enough for uptime, which
/// only ever looks at differences.
pub struct UptimeClock;

impl EpochClock for UptimeClock {
    fn epoch_seconds(&self) -> u64 {
        Instant::now().as_secs()
    }
}

async fn blink<P: OutputPin>(led: &mut StatusLed<P>) {
    led.set(true);
    Timer::after_millis(INIT_RETRY_MS).await;
    led.set(false);
    Timer::after_millis(INIT_RETRY_MS).await;
}

/// Retry the panel init until it answers, blinking the LED between tries.
pub async fn init_display<I2C, P>(oled: &mut Oled<I2C>, led: &mut StatusLed<P>)
where
    I2C: embedded_hal::i2c::I2c,
    P: OutputPin,
{
    let mut attempts: u32 = 0;
    while let Err(e) = oled.init() {
        attempts += 1;
        warn!("display init failed ({}), attempt {}; check SCL=PB6 SDA=PB7", e, attempts);
        blink(led).await;
    }
    info!("display ok");
    let _ = render::render_display_ok(oled);
    Timer::after_millis(SPLASH_MS / 2).await;
}

/// Retry the BME280 init until it answers, telling the user what to check.
pub async fn init_sensor<S, I2C, P>(
    sensor: &mut Bme280Sensor<S>,
    oled: &mut Oled<I2C>,
    led: &mut StatusLed<P>,
) where
    S: embedded_hal::i2c::I2c,
    I2C: embedded_hal::i2c::I2c,
    P: OutputPin,
{
    let _ = render::render_finding_sensor(oled);
    while let Err(e) = sensor.init() {
        warn!("bme280 init failed: {}", e);
        let _ = render::render_sensor_missing(oled);
        blink(led).await;
    }
    info!("bme280 ok at {:#x}", BME280_ADDR);
    let _ = render::render_sensor_ok(oled, BME280_ADDR);
    Timer::after_millis(SPLASH_MS).await;
    let _ = render::render_ready(oled);
    Timer::after_millis(SPLASH_MS).await;
}
