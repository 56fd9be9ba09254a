//! SSD1306 OLED display wrapper.

use baro_oled::error::Error;
use baro_oled::ui::render::Canvas;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

/// Type alias for the concrete display driver.
///
/// Generic over the I²C implementation so the panel can sit behind a
/// shared-bus device.
pub type Display<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// Buffered 128×64 panel exposed as a [`Canvas`].
pub struct Oled<I2C> {
    display: Display<I2C>,
}

fn text_style() -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(BinaryColor::On)
        .build()
}

impl<I2C> Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        Self { display }
    }

    /// Send the init sequence and clear the screen. Safe to retry.
    pub fn init(&mut self) -> Result<(), Error> {
        self.display.init().map_err(|_| Error::Display)?;
        self.display.clear_buffer();
        self.display.flush().map_err(|_| Error::Display)
    }
}

impl<I2C> Canvas for Oled<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    fn clear(&mut self) {
        self.display.clear_buffer();
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32) {
        let _ = Text::with_baseline(text, Point::new(x, y), text_style(), Baseline::Top)
            .draw(&mut self.display);
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.display.flush().map_err(|_| Error::Display)
    }

    fn set_sleep(&mut self, asleep: bool) -> Result<(), Error> {
        self.display
            .set_display_on(!asleep)
            .map_err(|_| Error::Display)
    }
}
