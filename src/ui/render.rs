//! Frame rendering.
//!
//! Every function here is a full redraw: clear, draw, commit. Nothing
//! keeps pixels from a previous frame, so there are no stale artifacts
//! when a line gets shorter.

use core::fmt::Write;

use heapless::String;

use crate::config::{FONT_WIDTH, SCREEN_WIDTH};
use crate::error::Error;
use crate::sensor::SensorCache;
use crate::ui::DisplayMode;

/// Longest line the 128 px panel can show with the 6 px font is 21
/// glyphs; leave headroom for formatting.
pub type Line = String<32>;

/// Display collaborator: a text-capable frame buffer.
pub trait Canvas {
    /// Blank the frame buffer.
    fn clear(&mut self);

    /// Draw `text` with its top-left corner at (`x`, `y`).
    fn draw_text(&mut self, text: &str, x: i32, y: i32);

    /// Push the frame buffer to the panel.
    fn commit(&mut self) -> Result<(), Error>;

    /// Power the panel down or back up. Buffer contents survive.
    fn set_sleep(&mut self, _asleep: bool) -> Result<(), Error> {
        Ok(())
    }
}

/// X position that centres `text` on the panel.
pub fn centered_x(text: &str) -> i32 {
    let width = text.chars().count() as i32 * FONT_WIDTH;
    ((SCREEN_WIDTH - width) / 2).max(0)
}

fn draw_centered<C: Canvas>(canvas: &mut C, text: &str, y: i32) {
    canvas.draw_text(text, centered_x(text), y);
}

/// Format into a fixed-capacity line. `None` if the text does not fit.
fn line(args: core::fmt::Arguments) -> Option<Line> {
    let mut s = Line::new();
    s.write_fmt(args).ok()?;
    Some(s)
}

/// Formatted `value`, or `placeholder` when it is unknown or too wide.
fn field(value: Option<f32>, format: impl Fn(f32) -> Option<Line>, placeholder: &str) -> Line {
    value
        .and_then(format)
        .or_else(|| line(format_args!("{}", placeholder)))
        .unwrap_or_default()
}

/// `"{days} d HH:MM:SS"`.
pub fn format_uptime(total_secs: u64) -> Line {
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = (total_secs / 3600) % 24;
    let days = total_secs / 86_400;
    // u64::MAX seconds is 15 digits of days; always fits.
    line(format_args!("{} d {:02}:{:02}:{:02}", days, hours, mins, secs)).unwrap_or_default()
}

/// Full-screen message: each `(text, y)` centred.
pub fn render_message<C: Canvas>(canvas: &mut C, lines: &[(&str, i32)]) -> Result<(), Error> {
    canvas.clear();
    for (text, y) in lines {
        draw_centered(canvas, text, *y);
    }
    canvas.commit()
}

/// Empty frame.
pub fn render_blank<C: Canvas>(canvas: &mut C) -> Result<(), Error> {
    canvas.clear();
    canvas.commit()
}

/// Draw the main screen for `mode`.
///
/// - A failed last poll replaces every mode except `Uptime` with the
///   error screen.
/// - Unknown single-value fields show "Reading..." centred.
/// - `Combined` substitutes "---" per unknown field and omits
///   temperature/humidity.
pub fn render_readings<C: Canvas>(
    canvas: &mut C,
    cache: &SensorCache,
    mode: DisplayMode,
    uptime_secs: u64,
) -> Result<(), Error> {
    canvas.clear();

    if cache.has_error() && mode != DisplayMode::Uptime {
        draw_centered(canvas, "BME Sensor Error!", 20);
        draw_centered(canvas, "Check Connection", 35);
        return canvas.commit();
    }

    let sample = cache.sample();
    match mode {
        DisplayMode::PressureMbar => draw_value(
            canvas,
            sample.pressure_mbar,
            |v| line(format_args!("Press: {:.2} mBar", v)),
            "Press: --- mBar",
        ),
        DisplayMode::PressureAtm => draw_value(
            canvas,
            sample.pressure_atm,
            |v| line(format_args!("Press: {:.4} atm", v)),
            "Press: --- atm",
        ),
        DisplayMode::Altitude => draw_value(
            canvas,
            sample.altitude_m,
            |v| line(format_args!("Alt: {:.1} m", v)),
            "Alt: --- m",
        ),
        DisplayMode::Combined => {
            let mbar = field(
                sample.pressure_mbar,
                |v| line(format_args!("P: {:.2} mBar", v)),
                "P: --- mBar",
            );
            let atm = field(
                sample.pressure_atm,
                |v| line(format_args!("P: {:.4} atm", v)),
                "P: --- atm",
            );
            let alt = field(
                sample.altitude_m,
                |v| line(format_args!("Alt: {:.1} m", v)),
                "Alt: --- m",
            );
            canvas.draw_text(&mbar, 10, 10);
            canvas.draw_text(&atm, 10, 30);
            canvas.draw_text(&alt, 10, 50);
        }
        DisplayMode::Uptime => {
            draw_centered(canvas, "Device Uptime", 15);
            draw_centered(canvas, &format_uptime(uptime_secs), 35);
        }
    }

    if matches!(
        mode,
        DisplayMode::PressureMbar | DisplayMode::PressureAtm | DisplayMode::Altitude
    ) {
        let temp = field(
            sample.temperature_c,
            |v| line(format_args!("Temp: {:.1} C", v)),
            "Temp: --- C",
        );
        let hum = field(
            sample.humidity_pct,
            |v| line(format_args!("Hum: {:.1} %", v)),
            "Hum:  --- %",
        );
        canvas.draw_text(&temp, 10, 30);
        canvas.draw_text(&hum, 10, 50);
    }

    canvas.commit()
}

/// Headline value at the top-left. Unknown shows a centred "Reading...";
/// a value too wide for the line falls back to `placeholder`.
fn draw_value<C: Canvas>(
    canvas: &mut C,
    value: Option<f32>,
    format: impl Fn(f32) -> Option<Line>,
    placeholder: &str,
) {
    match value {
        Some(_) => canvas.draw_text(&field(value, format, placeholder), 10, 10),
        None => draw_centered(canvas, "Reading...", 28),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Boot screens
// ═══════════════════════════════════════════════════════════════════════════

pub fn render_display_ok<C: Canvas>(canvas: &mut C) -> Result<(), Error> {
    render_message(canvas, &[("Display OK", 28)])
}

pub fn render_finding_sensor<C: Canvas>(canvas: &mut C) -> Result<(), Error> {
    render_message(canvas, &[("Finding BME280...", 28)])
}

/// Wiring hint shown while the sensor init keeps failing.
pub fn render_sensor_missing<C: Canvas>(canvas: &mut C) -> Result<(), Error> {
    render_message(
        canvas,
        &[
            ("BME280 Not Found!", 5),
            ("Check Wiring:", 20),
            ("SDA=PB7, SCL=PB6", 35),
            ("Retrying...", 50),
        ],
    )
}

pub fn render_sensor_ok<C: Canvas>(canvas: &mut C, addr: u8) -> Result<(), Error> {
    let msg = line(format_args!("BME280 OK (0x{:X})", addr)).unwrap_or_default();
    render_message(canvas, &[(msg.as_str(), 28)])
}

pub fn render_ready<C: Canvas>(canvas: &mut C) -> Result<(), Error> {
    render_message(canvas, &[("Ready!", 28)])
}

pub fn render_goodbye<C: Canvas>(canvas: &mut C) -> Result<(), Error> {
    render_message(canvas, &[("Bye ;)", 28)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SensorError;
    use crate::sensor::{Reading, SensorSample};
    use std::string::{String as StdString, ToString};
    use std::vec::Vec;

    /// Records draw calls of the last committed frame.
    #[derive(Default)]
    struct Recorder {
        pending: Vec<(StdString, i32, i32)>,
        frame: Vec<(StdString, i32, i32)>,
        clears: usize,
        commits: usize,
    }

    impl Recorder {
        fn texts(&self) -> Vec<&str> {
            self.frame.iter().map(|(t, _, _)| t.as_str()).collect()
        }
    }

    impl Canvas for Recorder {
        fn clear(&mut self) {
            self.pending.clear();
            self.clears += 1;
        }

        fn draw_text(&mut self, text: &str, x: i32, y: i32) {
            self.pending.push((text.to_string(), x, y));
        }

        fn commit(&mut self) -> Result<(), Error> {
            self.frame = self.pending.clone();
            self.commits += 1;
            Ok(())
        }
    }

    fn cache_with(pressure_pa: f32) -> SensorCache {
        let mut cache = SensorCache::default();
        cache.record(Ok(Reading {
            temperature_c: 22.3,
            humidity_pct: 48.0,
            pressure_pa,
        }));
        cache
    }

    #[test]
    fn uptime_format_rolls_over_days() {
        assert_eq!(format_uptime(0).as_str(), "0 d 00:00:00");
        assert_eq!(format_uptime(59).as_str(), "0 d 00:00:59");
        assert_eq!(format_uptime(3_661).as_str(), "0 d 01:01:01");
        assert_eq!(format_uptime(2 * 86_400 + 23 * 3600 + 59 * 60 + 58).as_str(), "2 d 23:59:58");
    }

    #[test]
    fn centering_uses_glyph_width() {
        // 10 glyphs * 6 px = 60 px -> (128 - 60) / 2
        assert_eq!(centered_x("Reading..."), 34);
        assert_eq!(centered_x("this line is far too long for the panel"), 0);
    }

    #[test]
    fn every_render_is_clear_draw_commit() {
        let mut canvas = Recorder::default();
        let cache = SensorCache::default();
        for mode in DisplayMode::ALL {
            render_readings(&mut canvas, &cache, mode, 0).unwrap();
        }
        assert_eq!(canvas.clears, DisplayMode::COUNT);
        assert_eq!(canvas.commits, DisplayMode::COUNT);
    }

    #[test]
    fn unknown_fields_show_placeholders() {
        let mut canvas = Recorder::default();
        let cache = SensorCache::default();

        render_readings(&mut canvas, &cache, DisplayMode::PressureMbar, 0).unwrap();
        assert_eq!(canvas.texts(), ["Reading...", "Temp: --- C", "Hum:  --- %"]);

        render_readings(&mut canvas, &cache, DisplayMode::Altitude, 0).unwrap();
        assert_eq!(canvas.texts()[0], "Reading...");

        render_readings(&mut canvas, &cache, DisplayMode::Combined, 0).unwrap();
        assert_eq!(canvas.texts(), ["P: --- mBar", "P: --- atm", "Alt: --- m"]);

        for (text, _, _) in &canvas.frame {
            assert!(!text.contains("NaN") && !text.contains("inf"));
        }
    }

    #[test]
    fn pressure_modes_use_unit_precision() {
        let mut canvas = Recorder::default();
        let cache = cache_with(101_300.0);

        render_readings(&mut canvas, &cache, DisplayMode::PressureMbar, 0).unwrap();
        assert_eq!(canvas.frame[0], ("Press: 1013.00 mBar".to_string(), 10, 10));
        assert_eq!(canvas.texts()[1..], ["Temp: 22.3 C", "Hum: 48.0 %"]);

        render_readings(&mut canvas, &cache, DisplayMode::PressureAtm, 0).unwrap();
        assert_eq!(canvas.texts()[0], "Press: 0.9998 atm");
    }

    #[test]
    fn altitude_at_reference_pressure() {
        let mut canvas = Recorder::default();
        let cache = cache_with(101_325.0);
        render_readings(&mut canvas, &cache, DisplayMode::Altitude, 0).unwrap();
        assert_eq!(canvas.texts()[0], "Alt: 0.0 m");
    }

    #[test]
    fn combined_omits_temperature_and_humidity() {
        let mut canvas = Recorder::default();
        let cache = cache_with(101_325.0);
        render_readings(&mut canvas, &cache, DisplayMode::Combined, 0).unwrap();
        assert_eq!(
            canvas.texts(),
            ["P: 1013.25 mBar", "P: 1.0000 atm", "Alt: 0.0 m"]
        );
    }

    #[test]
    fn error_replaces_all_but_uptime() {
        let mut canvas = Recorder::default();
        let mut cache = cache_with(101_325.0);
        cache.record(Err(SensorError::Bus));

        for mode in DisplayMode::ALL {
            render_readings(&mut canvas, &cache, mode, 90).unwrap();
            if mode == DisplayMode::Uptime {
                assert_eq!(canvas.texts(), ["Device Uptime", "0 d 00:01:30"]);
            } else {
                assert_eq!(canvas.texts(), ["BME Sensor Error!", "Check Connection"]);
            }
        }
    }

    #[test]
    fn oversized_values_fall_back_to_placeholders() {
        let mut canvas = Recorder::default();
        let cache = cache_with(1.0e30);

        render_readings(&mut canvas, &cache, DisplayMode::PressureMbar, 0).unwrap();
        assert_eq!(canvas.texts(), ["Press: --- mBar", "Temp: 22.3 C", "Hum: 48.0 %"]);

        render_readings(&mut canvas, &cache, DisplayMode::Combined, 0).unwrap();
        assert_eq!(canvas.texts()[0], "P: --- mBar");
    }

    #[test]
    fn oversized_temperature_uses_placeholder() {
        let mut sample = SensorSample::unknown();
        sample.temperature_c = Some(-3.0e30);
        let temp = field(
            sample.temperature_c,
            |v| line(format_args!("Temp: {:.1} C", v)),
            "Temp: --- C",
        );
        assert_eq!(temp.as_str(), "Temp: --- C");
    }

    #[test]
    fn sensor_missing_screen_has_four_lines() {
        let mut canvas = Recorder::default();
        render_sensor_missing(&mut canvas).unwrap();
        let ys: Vec<i32> = canvas.frame.iter().map(|(_, _, y)| *y).collect();
        assert_eq!(ys, [5, 20, 35, 50]);
    }

    #[test]
    fn sensor_ok_shows_hex_address() {
        let mut canvas = Recorder::default();
        render_sensor_ok(&mut canvas, 0x76).unwrap();
        assert_eq!(canvas.texts(), ["BME280 OK (0x76)"]);
    }
}
