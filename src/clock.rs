//! Time sources.
//!
//! The scheduler takes its monotonic `now` (ms) as an argument on every
//! pass; only the uptime screen needs a second, wall-clock style source.

/// Seconds counter used for the uptime readout.
pub trait EpochClock {
    fn epoch_seconds(&self) -> u64;
}

/// Uptime since a start instant recorded once at boot.
#[derive(Clone, Copy, Debug)]
pub struct Uptime {
    start_epoch: u64,
}

impl Uptime {
    pub fn start<E: EpochClock>(clock: &E) -> Self {
        Self {
            start_epoch: clock.epoch_seconds(),
        }
    }

    /// Elapsed seconds. A clock that reads earlier than the start (RTC
    /// still settling) reports zero.
    pub fn elapsed_secs<E: EpochClock>(&self, clock: &E) -> u64 {
        clock.epoch_seconds().saturating_sub(self.start_epoch)
    }
}
