//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AlarmController / AlarmService (domain)
//! ```
//!
//! Driven adapters (buzzers, indicators, buttons, loop-back probes,
//! notification transports) implement these traits. The domain consumes
//! them via generics, so the state machine never touches hardware
//! directly and every test can substitute a recording mock.
//!
//! Port methods do not return errors. Adapters log driver failures and
//! surface persistent ones through [`HealthPort`].

use crate::drivers::button::{ButtonEvents, ButtonSnapshot};
use crate::drivers::indicator::Indicator;
use crate::drivers::output::Actuator;
use crate::health::HealthReport;

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: buzzers, warning pulse and indicators.
pub trait ActuatorPort {
    /// Set a buzzer to an intensity (0 = off, 255 = full).
    fn set_level(&mut self, actuator: Actuator, level: u8);

    /// Silence both buzzers and cancel the pulse. Must be idempotent.
    fn stop_all(&mut self);

    /// Start or continue the quiet-buzzer pulse pattern.
    /// Returns `true` on the call where the fixed-length pattern completes.
    fn pulse_quiet(&mut self, now_ms: u32) -> bool;

    /// Hold an indicator at a fixed level (cancels blinking).
    fn set_indicator(&mut self, which: Indicator, on: bool);

    /// Blink an indicator with the given half-period.
    fn blink_indicator(&mut self, which: Indicator, period_ms: u32, now_ms: u32);

    /// Every indicator off, blinking cancelled.
    fn indicators_off(&mut self) {
        for which in [Indicator::Wifi, Indicator::Alarm, Indicator::Status] {
            self.set_indicator(which, false);
        }
    }

    /// Advance indicator blink timing. Called once per outer tick.
    fn update_outputs(&mut self, now_ms: u32);

    /// Blocking wait. Only the self-test script uses this.
    fn pause_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Health port (hardware → domain)
// ───────────────────────────────────────────────────────────────

pub trait HealthPort {
    /// Last known health of both circuits. Never probes the hardware.
    fn health(&self) -> HealthReport;

    /// Run the loop-back check on both circuits.
    /// Returns `true` when every enabled circuit is OK.
    fn check_circuits(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Input port (buttons → domain)
// ───────────────────────────────────────────────────────────────

pub trait InputPort {
    /// Poll and debounce every button; returns this tick's events.
    fn update_inputs(&mut self, now_ms: u32) -> ButtonEvents;

    /// Debounced button states as of the last update.
    fn buttons(&self) -> ButtonSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Notification sink (domain → messaging collaborator)
// ───────────────────────────────────────────────────────────────

/// Outbound text notifications.
///
/// Best-effort and non-blocking: implementations may drop a message
/// (offline, queue full) without telling the caller. The domain never
/// retries.
pub trait NotificationSink {
    fn notify(&mut self, text: &str);
}
