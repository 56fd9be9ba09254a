//! Barometer firmware core.
//!
//! This crate holds the hardware-independent parts of the firmware: the
//! cooperative scheduler, button state machine, LED controller, sensor
//! cache and screen rendering. Everything is driven through small traits
//! (`Sensor`, `Canvas`, `EpochClock`, `OutputPin`) so the logic can be
//! tested on the host with a simulated clock.
//!
//! Usage: `cargo test` (host) or `cargo run --release --features embedded
//! --target thumbv7em-none-eabihf` (board).
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and adds the STM32 / BME280 / SSD1306 adapters under `src/board/`.

#![cfg_attr(not(test), no_std)]

// Must come first so the logging macros are visible to every module.
mod fmt;

// ═══════════════════════════════════════════════════════════════════════════
// Configuration & errors
// ═══════════════════════════════════════════════════════════════════════════

pub mod config;
pub mod error;

// ═══════════════════════════════════════════════════════════════════════════
// Collaborator-facing modules
// ═══════════════════════════════════════════════════════════════════════════

pub mod bus;
pub mod clock;
pub mod sensor;

// ═══════════════════════════════════════════════════════════════════════════
// Runtime state machines
// ═══════════════════════════════════════════════════════════════════════════

pub mod app;
pub mod indicator;
pub mod power;
pub mod ui;

pub use app::{App, AppState, Step};
pub use error::{Error, SensorError};
