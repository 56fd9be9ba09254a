//! User interface subsystem - OLED screens + the single push-button.
//!
//! ## Components
//!
//! - **Button**: one tactile switch, debounced, with short-press and hold
//! - **Modes**: fixed ring of screens advanced by short-press
//! - **Render**: pure drawing of the sensor cache onto a [`render::Canvas`]

pub mod buttons;
pub mod render;

/// Screens the user can cycle through, in cycling order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// Pressure in millibars + temperature/humidity.
    PressureMbar,
    /// Pressure in standard atmospheres + temperature/humidity.
    PressureAtm,
    /// Barometric altitude + temperature/humidity.
    Altitude,
    /// mBar, atm and altitude together.
    Combined,
    /// Time since boot.
    Uptime,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 5] = [
        DisplayMode::PressureMbar,
        DisplayMode::PressureAtm,
        DisplayMode::Altitude,
        DisplayMode::Combined,
        DisplayMode::Uptime,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Successor in the cycle, wrapping after the last mode.
    pub const fn next(self) -> Self {
        match self {
            DisplayMode::PressureMbar => DisplayMode::PressureAtm,
            DisplayMode::PressureAtm => DisplayMode::Altitude,
            DisplayMode::Altitude => DisplayMode::Combined,
            DisplayMode::Combined => DisplayMode::Uptime,
            DisplayMode::Uptime => DisplayMode::PressureMbar,
        }
    }
}

/// Physical button events (after debouncing).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Released before the hold threshold: next screen.
    ShortPress,
    /// Held past the hold threshold: suspend.
    Hold,
}

/// Cursor over [`DisplayMode::ALL`]. Only [`ModeSelector::advance`] moves it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeSelector {
    mode: DisplayMode,
}

impl ModeSelector {
    pub const fn new() -> Self {
        Self {
            mode: DisplayMode::PressureMbar,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn advance(&mut self) -> DisplayMode {
        self.mode = self.mode.next();
        info!("mode: {}", self.mode);
        self.mode
    }
}

impl Default for ModeSelector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_first_mode() {
        assert_eq!(ModeSelector::new().mode(), DisplayMode::ALL[0]);
    }

    #[test]
    fn advance_follows_table_order() {
        let mut sel = ModeSelector::new();
        for expected in DisplayMode::ALL.iter().skip(1) {
            assert_eq!(sel.advance(), *expected);
        }
        assert_eq!(sel.advance(), DisplayMode::PressureMbar);
    }

    #[test]
    fn count_advances_is_identity_from_every_mode() {
        for start in DisplayMode::ALL {
            let mut sel = ModeSelector { mode: start };
            for _ in 0..DisplayMode::COUNT {
                sel.advance();
            }
            assert_eq!(sel.mode(), start);
        }
    }
}
