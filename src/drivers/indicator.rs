//! Indicator LEDs with solid and blinking modes.
//!
//! A blinking output toggles at most once per `update` call, however many
//! periods have passed since the last one. Missed periods are not caught
//! up. Stopping a blink leaves the LED at whatever phase it was in; a
//! direct `set` overrides both.

use embedded_hal::digital::OutputPin;
use log::warn;
use serde::Serialize;

use crate::error::ActuatorError;

/// The three front-panel indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Indicator {
    /// Network link. Reserved for the messaging client; the reset blink
    /// also drives it.
    Wifi,
    /// Alarm stage (driven by the state machine).
    Alarm,
    /// Boot result: solid when the circuits checked OK, fast blink otherwise.
    Status,
}

pub struct BlinkingOutput<P> {
    pin: P,
    blinking: bool,
    on: bool,
    period_ms: u32,
    last_toggle_ms: u32,
}

impl<P: OutputPin> BlinkingOutput<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            blinking: false,
            on: false,
            period_ms: 0,
            last_toggle_ms: 0,
        }
    }

    /// Hold a fixed level. Cancels blinking.
    pub fn set(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.blinking = false;
        self.write(on)
    }

    /// Start blinking with the given half-period, overriding any fixed level.
    pub fn blink(&mut self, period_ms: u32, now_ms: u32) {
        self.blinking = true;
        self.period_ms = period_ms;
        self.last_toggle_ms = now_ms;
    }

    /// Stop blinking without touching the current level.
    pub fn stop_blink(&mut self) {
        self.blinking = false;
    }

    pub fn update(&mut self, now_ms: u32) -> Result<(), ActuatorError> {
        if !self.blinking || now_ms.wrapping_sub(self.last_toggle_ms) < self.period_ms {
            return Ok(());
        }
        // A failed write leaves the timer alone so the next tick retries.
        self.write(!self.on)?;
        self.last_toggle_ms = now_ms;
        Ok(())
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    fn write(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.on = on;
        Ok(())
    }
}

pub struct IndicatorBank<P> {
    wifi: BlinkingOutput<P>,
    alarm: BlinkingOutput<P>,
    status: BlinkingOutput<P>,
}

impl<P: OutputPin> IndicatorBank<P> {
    pub fn new(wifi: P, alarm: P, status: P) -> Self {
        Self {
            wifi: BlinkingOutput::new(wifi),
            alarm: BlinkingOutput::new(alarm),
            status: BlinkingOutput::new(status),
        }
    }

    pub fn get_mut(&mut self, which: Indicator) -> &mut BlinkingOutput<P> {
        match which {
            Indicator::Wifi => &mut self.wifi,
            Indicator::Alarm => &mut self.alarm,
            Indicator::Status => &mut self.status,
        }
    }

    /// Advance every blinking indicator. Write failures are logged.
    pub fn update(&mut self, now_ms: u32) {
        for (which, led) in [
            (Indicator::Wifi, &mut self.wifi),
            (Indicator::Alarm, &mut self.alarm),
            (Indicator::Status, &mut self.status),
        ] {
            if let Err(e) = led.update(now_ms) {
                warn!("indicator {:?}: {}", which, e);
            }
        }
    }

    /// All indicators off, blinking cancelled.
    pub fn all_off(&mut self) {
        for (which, led) in [
            (Indicator::Wifi, &mut self.wifi),
            (Indicator::Alarm, &mut self.alarm),
            (Indicator::Status, &mut self.status),
        ] {
            if let Err(e) = led.set(false) {
                warn!("indicator {:?}: {}", which, e);
            }
        }
    }
}
