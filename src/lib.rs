//! WakeAssist firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod health;
pub mod pins;

// Peripheral construction inside these is cfg-gated; the embedded-hal
// generic parts build everywhere.
pub mod adapters;
pub mod drivers;
