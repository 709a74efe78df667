//! Polled, debounced button driver with long-hold detection.
//!
//! ## Hardware
//!
//! Active-low momentary switches with internal pull-ups. The main loop
//! polls every button once per tick (`poll(now_ms)`); no interrupts.
//!
//! ## Debounce
//!
//! A raw change is accepted only once the reading has held still for the
//! settle window. Every raw flip restarts the window, so chatter shorter
//! than the window never reaches the stable state.
//!
//! | Button  | Reported on                 | Event            |
//! |---------|-----------------------------|------------------|
//! | TEST    | stable press edge           | `TestPressed`    |
//! | SILENCE | stable press edge           | `SilencePressed` |
//! | RESET   | unbroken stable hold >= 10s | `ResetHeld`      |

use embedded_hal::digital::InputPin;
use heapless::Vec;
use log::{debug, warn};
use serde::Serialize;

/// Stable-state transition reported by [`Debouncer::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
}

/// Button events emitted to the outer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    TestPressed,
    SilencePressed,
    ResetHeld,
}

/// At most one event per button per tick.
pub type ButtonEvents = Vec<ButtonEvent, 3>;

/// Debounced state of all three buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ButtonSnapshot {
    pub test: bool,
    pub silence: bool,
    pub reset: bool,
    /// How long RESET has been stably held (0 when released).
    pub reset_held_ms: u32,
}

// ---------------------------------------------------------------------------
// Debouncer
// ---------------------------------------------------------------------------

/// Pin-independent debounce filter.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    settle_ms: u32,
    last_reading: bool,
    stable: bool,
    last_change_ms: u32,
    /// When the stable state became pressed. `None` while released.
    pressed_since_ms: Option<u32>,
}

impl Debouncer {
    pub const fn new(settle_ms: u32) -> Self {
        Self {
            settle_ms,
            last_reading: false,
            stable: false,
            last_change_ms: 0,
            pressed_since_ms: None,
        }
    }

    /// Feed one raw sample. Returns the stable edge, if one was accepted.
    pub fn update(&mut self, raw_pressed: bool, now_ms: u32) -> Option<Edge> {
        if raw_pressed != self.last_reading {
            self.last_reading = raw_pressed;
            self.last_change_ms = now_ms;
        }

        if raw_pressed == self.stable || now_ms.wrapping_sub(self.last_change_ms) < self.settle_ms {
            return None;
        }

        self.stable = raw_pressed;
        if raw_pressed {
            self.pressed_since_ms = Some(now_ms);
            Some(Edge::Pressed)
        } else {
            self.pressed_since_ms = None;
            Some(Edge::Released)
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.stable
    }

    /// Time the button has been stably pressed; 0 when released.
    pub fn held_for_ms(&self, now_ms: u32) -> u32 {
        self.pressed_since_ms
            .map_or(0, |since| now_ms.wrapping_sub(since))
    }
}

// ---------------------------------------------------------------------------
// Pin-backed buttons
// ---------------------------------------------------------------------------

pub struct DebouncedButton<P> {
    pin: P,
    name: &'static str,
    filter: Debouncer,
}

impl<P: InputPin> DebouncedButton<P> {
    pub fn new(pin: P, name: &'static str, settle_ms: u32) -> Self {
        Self {
            pin,
            name,
            filter: Debouncer::new(settle_ms),
        }
    }

    /// Sample the pin and run the filter.
    pub fn poll(&mut self, now_ms: u32) -> Option<Edge> {
        let raw = match self.pin.is_low() {
            Ok(low) => low,
            Err(_) => {
                warn!("button {}: read failed, treating as released", self.name);
                false
            }
        };
        let edge = self.filter.update(raw, now_ms);
        if let Some(e) = edge {
            debug!("button {}: {:?}", self.name, e);
        }
        edge
    }

    pub fn is_pressed(&self) -> bool {
        self.filter.is_pressed()
    }

    pub fn held_for_ms(&self, now_ms: u32) -> u32 {
        self.filter.held_for_ms(now_ms)
    }
}

/// Button that reports once per unbroken hold of at least `hold_ms`.
pub struct HoldButton<P> {
    button: DebouncedButton<P>,
    hold_ms: u32,
    reported: bool,
}

impl<P: InputPin> HoldButton<P> {
    pub fn new(pin: P, name: &'static str, settle_ms: u32, hold_ms: u32) -> Self {
        Self {
            button: DebouncedButton::new(pin, name, settle_ms),
            hold_ms,
            reported: false,
        }
    }

    /// Returns `true` exactly once when the current press reaches `hold_ms`.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        if self.button.poll(now_ms) == Some(Edge::Released) {
            self.reported = false;
        }
        if !self.reported && self.button.is_pressed() && self.button.held_for_ms(now_ms) >= self.hold_ms {
            self.reported = true;
            return true;
        }
        false
    }

    pub fn is_pressed(&self) -> bool {
        self.button.is_pressed()
    }

    pub fn held_for_ms(&self, now_ms: u32) -> u32 {
        self.button.held_for_ms(now_ms)
    }
}

/// The device's three front-panel buttons.
pub struct ButtonBank<P> {
    test: DebouncedButton<P>,
    silence: DebouncedButton<P>,
    reset: HoldButton<P>,
    last_poll_ms: u32,
}

impl<P: InputPin> ButtonBank<P> {
    pub fn new(test: P, silence: P, reset: P, settle_ms: u32, hold_ms: u32) -> Self {
        Self {
            test: DebouncedButton::new(test, "TEST", settle_ms),
            silence: DebouncedButton::new(silence, "SILENCE", settle_ms),
            reset: HoldButton::new(reset, "RESET", settle_ms, hold_ms),
            last_poll_ms: 0,
        }
    }

    /// Poll every button; call once per outer tick.
    pub fn poll(&mut self, now_ms: u32) -> ButtonEvents {
        self.last_poll_ms = now_ms;
        let mut events = ButtonEvents::new();

        // Capacity equals the button count, pushes cannot fail.
        if self.test.poll(now_ms) == Some(Edge::Pressed) {
            let _ = events.push(ButtonEvent::TestPressed);
        }
        if self.silence.poll(now_ms) == Some(Edge::Pressed) {
            let _ = events.push(ButtonEvent::SilencePressed);
        }
        if self.reset.poll(now_ms) {
            warn!("button RESET: held for factory reset");
            let _ = events.push(ButtonEvent::ResetHeld);
        }
        events
    }

    /// Debounced view as of the last poll.
    pub fn snapshot(&self) -> ButtonSnapshot {
        ButtonSnapshot {
            test: self.test.is_pressed(),
            silence: self.silence.is_pressed(),
            reset: self.reset.is_pressed(),
            reset_held_ms: self.reset.held_for_ms(self.last_poll_ms),
        }
    }
}
