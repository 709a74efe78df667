//! Timed output driver for the two buzzers.
//!
//! Owns both [`Buzzer`]s and the self-timed warning pulse. The pulse keeps
//! its own clock: it starts on the first `pulse_quiet` call and reports
//! completion once the configured pattern length has elapsed. Completion
//! is advisory; the state machine escalates on its own stage timer.
//!
//! ```text
//!  on_ms   off_ms  on_ms   off_ms
//! ┌─────┐         ┌─────┐
//! │     │         │     │          ... until duration_ms
//! ┘     └─────────┘     └────────
//! ```

use embedded_hal::pwm::SetDutyCycle;
use log::{debug, error};
use serde::Serialize;

use crate::config::{AlarmConfig, BUZZER_OFF};
use crate::drivers::buzzer::Buzzer;
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Actuator {
    /// Small buzzer: Warning and Alert.
    Quiet,
    /// Large buzzer: Emergency.
    Loud,
}

#[derive(Debug, Clone, Copy)]
pub struct PulsePattern {
    pub on_ms: u32,
    pub off_ms: u32,
    pub duration_ms: u32,
    pub level: u8,
}

impl PulsePattern {
    pub fn from_config(cfg: &AlarmConfig) -> Self {
        Self {
            on_ms: cfg.pulse_on_ms,
            off_ms: cfg.pulse_off_ms,
            duration_ms: cfg.warning_duration_ms,
            level: cfg.buzzer_on_level,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct PulseState {
    active: bool,
    on: bool,
    started_ms: u32,
    last_toggle_ms: u32,
}

pub struct OutputDriver<Q, L> {
    quiet: Buzzer<Q>,
    loud: Buzzer<L>,
    pattern: PulsePattern,
    pulse: PulseState,
}

impl<Q: SetDutyCycle, L: SetDutyCycle> OutputDriver<Q, L> {
    pub fn new(quiet: Q, loud: L, pattern: PulsePattern) -> Self {
        Self {
            quiet: Buzzer::new(quiet, "small"),
            loud: Buzzer::new(loud, "large"),
            pattern,
            pulse: PulseState::default(),
        }
    }

    pub fn set_level(&mut self, actuator: Actuator, level: u8) -> Result<(), ActuatorError> {
        match actuator {
            Actuator::Quiet => self.quiet.set_level(level),
            Actuator::Loud => self.loud.set_level(level),
        }
    }

    pub fn level(&self, actuator: Actuator) -> u8 {
        match actuator {
            Actuator::Quiet => self.quiet.level(),
            Actuator::Loud => self.loud.level(),
        }
    }

    /// Silence both buzzers and cancel any running pulse. Idempotent.
    ///
    /// Both channels are always attempted; the first failure is returned.
    pub fn stop_all(&mut self) -> Result<(), ActuatorError> {
        self.pulse = PulseState::default();
        let quiet = self.quiet.off();
        let loud = self.loud.off();
        if let Err(e) = quiet.and(loud) {
            error!("output: stop_all failed: {}", e);
            return Err(e);
        }
        Ok(())
    }

    /// Start or continue the quiet-buzzer pulse.
    ///
    /// Returns `true` once, on the call where the pattern completes; the
    /// buzzer is then off and the next call starts a fresh pattern.
    pub fn pulse_quiet(&mut self, now_ms: u32) -> bool {
        let p = self.pattern;

        if !self.pulse.active {
            self.pulse = PulseState {
                active: true,
                on: true,
                started_ms: now_ms,
                last_toggle_ms: now_ms,
            };
            self.write_quiet(p.level);
            return false;
        }

        if now_ms.wrapping_sub(self.pulse.started_ms) >= p.duration_ms {
            debug!("output: pulse pattern complete");
            self.pulse = PulseState::default();
            self.write_quiet(BUZZER_OFF);
            return true;
        }

        let since = now_ms.wrapping_sub(self.pulse.last_toggle_ms);
        let phase_ms = if self.pulse.on { p.on_ms } else { p.off_ms };
        if since >= phase_ms {
            self.pulse.on = !self.pulse.on;
            self.pulse.last_toggle_ms = now_ms;
            self.write_quiet(if self.pulse.on { p.level } else { BUZZER_OFF });
        }
        false
    }

    pub fn is_pulsing(&self) -> bool {
        self.pulse.active
    }

    fn write_quiet(&mut self, level: u8) {
        // Failure is already logged by the buzzer; the health check owns detection.
        let _ = self.quiet.set_level(level);
    }
}
