//! Status LED controller.
//!
//! | State       | LED | Leaves on                              |
//! |-------------|-----|----------------------------------------|
//! | `Idle`      | off | poll result                            |
//! | `Pulse`     | on  | `since + pulse` elapsed, poll, suspend |
//! | `ErrorHold` | on  | next successful poll, suspend          |
//!
//! Every transition is a pin write plus timestamp bookkeeping; nothing
//! here waits.

use embedded_hal::digital::OutputPin;

/// Indicator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndicatorState {
    Idle,
    /// Lit since `since` (ms); turns off after the pulse duration.
    Pulse { since: u64 },
    /// Lit until a poll succeeds.
    ErrorHold,
}

impl IndicatorState {
    pub fn is_lit(&self) -> bool {
        !matches!(self, IndicatorState::Idle)
    }
}

/// LED output with polarity.
pub struct StatusLed<P> {
    pin: P,
    active_low: bool,
}

impl<P: OutputPin> StatusLed<P> {
    pub fn new(pin: P, active_low: bool) -> Self {
        Self { pin, active_low }
    }

    /// Drive the LED. A failed pin write is logged; the caller's state
    /// still advances so the next write retries the intended level.
    pub fn set(&mut self, lit: bool) {
        let result = if lit != self.active_low {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            warn!("led: pin write failed (lit={})", lit);
        }
    }
}

/// Drives a [`StatusLed`] through the pulse / error-hold state machine.
pub struct Indicator<P> {
    led: StatusLed<P>,
    state: IndicatorState,
    pulse_ms: u64,
}

impl<P: OutputPin> Indicator<P> {
    /// Starts `Idle` with the LED driven off.
    pub fn new(mut led: StatusLed<P>, pulse_ms: u64) -> Self {
        led.set(false);
        Self {
            led,
            state: IndicatorState::Idle,
            pulse_ms,
        }
    }

    pub fn state(&self) -> IndicatorState {
        self.state
    }

    /// Successful poll. Overrides a pending error hold.
    pub fn pulse(&mut self, now: u64) {
        self.enter(IndicatorState::Pulse { since: now });
    }

    /// Failed poll. Cancels any pending pulse turn-off.
    pub fn error_hold(&mut self) {
        self.enter(IndicatorState::ErrorHold);
    }

    /// Expire a pulse whose duration has elapsed.
    pub fn update(&mut self, now: u64) {
        if let IndicatorState::Pulse { since } = self.state {
            if now.saturating_sub(since) >= self.pulse_ms {
                self.enter(IndicatorState::Idle);
            }
        }
    }

    /// Unconditionally dark, used before suspending.
    pub fn force_off(&mut self) {
        self.enter(IndicatorState::Idle);
    }

    fn enter(&mut self, next: IndicatorState) {
        if next != self.state {
            trace!("led: {} -> {}", self.state, next);
        }
        self.state = next;
        self.led.set(next.is_lit());
    }
}
