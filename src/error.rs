//! Unified error types for the WakeAssist firmware.
//!
//! `Error` covers start-up failures the outer loop has to act on. Runtime
//! driver failures stay as [`ActuatorError`] inside the adapters, and
//! buzzer faults are recorded as [`HardwareFault`] by the state machine.
//! Everything is `Copy`, so nothing here allocates.
//!
//! Invalid calls (`start` while active, `stop` while idle, ...) are *not*
//! errors: they are reported through boolean returns and change nothing.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Start-up error returned by `begin` and `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral or controller initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Hardware faults
// ---------------------------------------------------------------------------

/// Buzzer circuit failure detected by the health monitor.
///
/// The `Display` text is the operator-facing error string kept by the
/// controller as its last hardware error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum HardwareFault {
    /// Quiet (small) buzzer circuit failed during Warning/Alert.
    QuietActuator,
    /// Loud (large) buzzer circuit failed during Emergency.
    LoudActuator,
    /// Neither circuit responds.
    BothActuators,
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuietActuator => write!(f, "Small buzzer circuit failure"),
            Self::LoudActuator => write!(f, "Large buzzer circuit failure"),
            Self::BothActuators => write!(f, "Both buzzer circuits failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
    /// GPIO read-back failed.
    GpioReadFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
            Self::GpioReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
