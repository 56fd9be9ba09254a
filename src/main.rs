#![no_std]
#![no_main]

mod board;

use baro_oled::bus;
use baro_oled::config::{
    Timings, I2C_FREQUENCY_HZ, SEA_LEVEL_PRESSURE_HPA, STATUS_LED_ACTIVE_LOW, TICK_PERIOD_MS,
};
use baro_oled::indicator::StatusLed;
use baro_oled::{App, Step};
use core::cell::RefCell;
use defmt::{info, unwrap};
use embassy_executor::Spawner;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::{Level, Output, Pull, Speed};
use embassy_stm32::i2c::I2c;
use embassy_stm32::time::Hertz;
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_hal_bus::i2c::RefCellDevice;
use {defmt_rtt as _, panic_probe as _};

use board::barometer::Bme280Sensor;
use board::oled::Oled;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("baro-oled starting");
    let p = embassy_stm32::init(Default::default());

    // PC13 on the Black Pill sinks the LED: high = off.
    let mut led = StatusLed::new(
        Output::new(p.PC13, Level::High, Speed::Low),
        STATUS_LED_ACTIVE_LOW,
    );
    led.set(false);

    // Active-low push button to ground.
    let mut button = ExtiInput::new(p.PA0, p.EXTI0, Pull::Up);

    // Display and sensor share I2C1 (PB6 = SCL, PB7 = SDA).
    let i2c = I2c::new_blocking(
        p.I2C1,
        p.PB6,
        p.PB7,
        Hertz(I2C_FREQUENCY_HZ),
        Default::default(),
    );
    let i2c_bus = RefCell::new(i2c);

    let found: heapless::Vec<u8, 8> = bus::scan(&mut RefCellDevice::new(&i2c_bus));
    info!("i2c: {} device(s) found", found.len());

    let mut oled = Oled::new(RefCellDevice::new(&i2c_bus));
    board::init_display(&mut oled, &mut led).await;

    let mut sensor = Bme280Sensor::new(RefCellDevice::new(&i2c_bus));
    board::init_sensor(&mut sensor, &mut oled, &mut led).await;

    let mut app = unwrap!(App::new(
        sensor,
        oled,
        led,
        board::UptimeClock,
        SEA_LEVEL_PRESSURE_HPA,
        Timings::default(),
    ));
    info!("entering main loop");

    let mut ticker = Ticker::every(Duration::from_millis(TICK_PERIOD_MS));
    loop {
        match app.tick(Instant::now().as_millis(), button.is_low()) {
            Step::Continue => ticker.next().await,
            Step::Suspend => {
                app.sleep_until_wake(&mut button, &mut Delay, || Instant::now().as_millis())
                    .await;
                ticker.reset();
            }
        }
    }
}
