//! Push-button debouncing and short-press / hold classification.
//!
//! The button is sampled once per scheduler pass; all timing is a plain
//! comparison against the pass's `now`, so the machine can be driven by a
//! simulated clock.

use crate::ui::ButtonEvent;

/// Debounced button with hold detection.
#[derive(Clone, Copy, Debug)]
pub struct Button {
    debounce_ms: u64,
    hold_ms: u64,
    /// Last raw sample.
    raw: bool,
    /// Debounced level.
    pressed: bool,
    /// When `raw` last changed.
    last_change: u64,
    /// When the debounced press began. Only meaningful while `pressed`.
    press_started: u64,
    /// Hold already reported for this press episode.
    hold_fired: bool,
}

impl Button {
    /// Released, nothing pending.
    pub const fn new(debounce_ms: u64, hold_ms: u64) -> Self {
        Self {
            debounce_ms,
            hold_ms,
            raw: false,
            pressed: false,
            last_change: 0,
            press_started: 0,
            hold_fired: false,
        }
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Feed one raw sample (`true` = pressed). Returns at most one event.
    pub fn update(&mut self, raw_pressed: bool, now: u64) -> Option<ButtonEvent> {
        if raw_pressed != self.raw {
            self.raw = raw_pressed;
            self.last_change = now;
        }

        let settled = now.saturating_sub(self.last_change) > self.debounce_ms;
        if settled && self.raw != self.pressed {
            self.pressed = self.raw;
            if self.pressed {
                self.press_started = now;
                self.hold_fired = false;
                trace!("button: down at {}", now);
                return None;
            }

            let held = now.saturating_sub(self.press_started);
            trace!("button: up after {} ms", held);
            if !self.hold_fired && held < self.hold_ms {
                return Some(ButtonEvent::ShortPress);
            }
            return None;
        }

        if self.pressed
            && !self.hold_fired
            && now.saturating_sub(self.press_started) >= self.hold_ms
        {
            self.hold_fired = true;
            return Some(ButtonEvent::Hold);
        }

        None
    }

    /// Adopt the current raw level without emitting anything. Called on
    /// wake so the edge that woke us is not replayed as a press. A button
    /// that is still down counts as an already consumed press.
    pub fn resync(&mut self, raw_pressed: bool, now: u64) {
        self.raw = raw_pressed;
        self.pressed = raw_pressed;
        self.last_change = now;
        self.press_started = now;
        self.hold_fired = raw_pressed;
    }
}
