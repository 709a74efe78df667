//! Buzzer driver (12 V active buzzer behind a MOSFET gate).
//!
//! Intensity is an 8-bit level mapped onto whatever duty resolution the
//! PWM channel exposes. The driver is a dumb actuator: timing patterns
//! live in [`super::output`].

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::error::ActuatorError;

pub struct Buzzer<P> {
    channel: P,
    name: &'static str,
    level: u8,
}

impl<P: SetDutyCycle> Buzzer<P> {
    pub fn new(channel: P, name: &'static str) -> Self {
        Self {
            channel,
            name,
            level: 0,
        }
    }

    pub fn set_level(&mut self, level: u8) -> Result<(), ActuatorError> {
        self.channel
            .set_duty_cycle_fraction(u16::from(level), u16::from(u8::MAX))
            .map_err(|_| {
                warn!("buzzer {}: PWM write failed (level {})", self.name, level);
                ActuatorError::PwmWriteFailed
            })?;
        self.level = level;
        Ok(())
    }

    pub fn off(&mut self) -> Result<(), ActuatorError> {
        self.set_level(0)
    }

    /// Last level successfully written.
    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_on(&self) -> bool {
        self.level > 0
    }
}
