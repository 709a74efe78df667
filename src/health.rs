//! Buzzer circuit health monitor.
//!
//! Each buzzer gate has a loop-back sense line. A check drives the line
//! high, waits a few microseconds, reads it back and restores it low. A
//! reading that does not follow the drive means an open or shorted
//! circuit.
//!
//! The check only sees gross electrical faults. A buzzer that is wired
//! correctly but silent passes; the periodic manual self-test covers that.
//!
//! Health is only ever changed by an explicit check (or by disabling a
//! circuit). Reading the report never touches the pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::{error, info};
use serde::Serialize;

use crate::drivers::output::Actuator;
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum HardwareHealth {
    /// No check has run yet.
    #[default]
    Unknown,
    Ok,
    Failed,
    /// Excluded from checks by the operator.
    Disabled,
}

impl HardwareHealth {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Ok => "OK",
            Self::Failed => "FAILED",
            Self::Disabled => "Disabled",
        }
    }
}

/// Aggregate status for both circuits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub quiet: HardwareHealth,
    pub loud: HardwareHealth,
}

impl HealthReport {
    pub fn get(&self, actuator: Actuator) -> HardwareHealth {
        match actuator {
            Actuator::Quiet => self.quiet,
            Actuator::Loud => self.loud,
        }
    }

    pub fn is_failed(&self, actuator: Actuator) -> bool {
        self.get(actuator) == HardwareHealth::Failed
    }

    pub fn both_failed(&self) -> bool {
        self.quiet == HardwareHealth::Failed && self.loud == HardwareHealth::Failed
    }

    /// `true` once at least one check has run on every enabled circuit.
    pub fn is_initialised(&self) -> bool {
        self.quiet != HardwareHealth::Unknown && self.loud != HardwareHealth::Unknown
    }

    pub fn all_ok(&self) -> bool {
        let usable = |h: HardwareHealth| matches!(h, HardwareHealth::Ok | HardwareHealth::Disabled);
        usable(self.quiet) && usable(self.loud)
    }

    fn slot(&mut self, actuator: Actuator) -> &mut HardwareHealth {
        match actuator {
            Actuator::Quiet => &mut self.quiet,
            Actuator::Loud => &mut self.loud,
        }
    }
}

pub struct HealthMonitor<P> {
    quiet_probe: P,
    loud_probe: P,
    settle_us: u32,
    report: HealthReport,
}

impl<P: OutputPin + InputPin> HealthMonitor<P> {
    pub fn new(quiet_probe: P, loud_probe: P, settle_us: u32) -> Self {
        Self {
            quiet_probe,
            loud_probe,
            settle_us,
            report: HealthReport::default(),
        }
    }

    /// Loop-back check of one circuit. Disabled circuits are skipped.
    pub fn check(&mut self, actuator: Actuator, delay: &mut impl DelayNs) -> HardwareHealth {
        if self.report.get(actuator) == HardwareHealth::Disabled {
            return HardwareHealth::Disabled;
        }

        let settle_us = self.settle_us;
        let probe = match actuator {
            Actuator::Quiet => &mut self.quiet_probe,
            Actuator::Loud => &mut self.loud_probe,
        };
        let health = match loopback(probe, settle_us, delay) {
            Ok(true) => HardwareHealth::Ok,
            Ok(false) => HardwareHealth::Failed,
            Err(e) => {
                error!("health: {:?} probe: {}", actuator, e);
                HardwareHealth::Failed
            }
        };

        if health == HardwareHealth::Failed {
            error!("health: {:?} buzzer circuit FAILED", actuator);
        }
        *self.report.slot(actuator) = health;
        health
    }

    /// Check both circuits. Returns `true` when every enabled circuit is OK.
    pub fn check_all(&mut self, delay: &mut impl DelayNs) -> bool {
        self.check(Actuator::Quiet, delay);
        self.check(Actuator::Loud, delay);
        let ok = self.report.all_ok();
        info!(
            "health: small={} large={}",
            self.report.quiet.label(),
            self.report.loud.label()
        );
        ok
    }

    pub fn report(&self) -> HealthReport {
        self.report
    }

    /// Exclude a circuit from checks and fault evaluation.
    pub fn disable(&mut self, actuator: Actuator) {
        info!("health: {:?} circuit disabled", actuator);
        *self.report.slot(actuator) = HardwareHealth::Disabled;
    }
}

fn loopback<P: OutputPin + InputPin>(
    probe: &mut P,
    settle_us: u32,
    delay: &mut impl DelayNs,
) -> Result<bool, ActuatorError> {
    probe.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
    delay.delay_us(settle_us);
    let read = probe.is_high().map_err(|_| ActuatorError::GpioReadFailed);
    // Restore low even when the read failed.
    probe.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
    read
}
