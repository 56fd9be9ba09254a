//! Power mode - ACTIVE while the loop runs, SUSPENDED while parked on
//! the wake edge.
//!
//! The core never sleeps by itself. A hold moves the controller to
//! `Suspended` and the scheduler hands control back to the runner, which
//! performs the blocking part (grace delay, wait for the button edge)
//! and re-enters through [`PowerController::wake`].

/// Power state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Polling, rendering and LED pulses run.
    Active,
    /// Nothing runs until the wake source fires.
    Suspended,
}

/// Tracks the current power mode and counts completed suspend cycles.
#[derive(Clone, Copy, Debug)]
pub struct PowerController {
    mode: PowerMode,
    suspend_count: u32,
}

impl PowerController {
    pub const fn new() -> Self {
        Self {
            mode: PowerMode::Active,
            suspend_count: 0,
        }
    }

    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode == PowerMode::Active
    }

    /// Number of times the device has gone to sleep since boot.
    pub fn suspend_count(&self) -> u32 {
        self.suspend_count
    }

    /// ACTIVE → SUSPENDED. Returns `false` if already suspended.
    pub fn suspend(&mut self) -> bool {
        if self.mode == PowerMode::Suspended {
            return false;
        }
        self.mode = PowerMode::Suspended;
        self.suspend_count = self.suspend_count.wrapping_add(1);
        info!("power: Active -> Suspended (#{})", self.suspend_count);
        true
    }

    /// SUSPENDED → ACTIVE. Returns `false` if already active.
    pub fn wake(&mut self) -> bool {
        if self.mode == PowerMode::Active {
            return false;
        }
        self.mode = PowerMode::Active;
        info!("power: Suspended -> Active");
        true
    }
}

impl Default for PowerController {
    fn default() -> Self {
        Self::new()
    }
}
