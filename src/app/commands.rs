//! Inbound commands to the alarm service.
//!
//! The messaging collaborator parses chat commands and pushes these onto
//! [`COMMAND_CHANNEL`](super::channels::COMMAND_CHANNEL); the control loop
//! drains the channel and hands each one to
//! [`AlarmService::handle_command`](super::service::AlarmService::handle_command).

use log::info;

/// Commands that external adapters can send into the alarm core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmCommand {
    /// Start an alarm run (rate-limited).
    Wake,
    /// Stop the active run.
    Stop,
    /// Run the buzzer self-test.
    Test,
    /// Reply with a status report.
    Status,
}

/// Rate limiter for remote wake requests.
///
/// The first request is always allowed; afterwards one request per
/// cooldown window.
#[derive(Debug, Clone, Copy)]
pub struct WakeGate {
    cooldown_ms: u32,
    last_accepted_ms: Option<u32>,
}

impl WakeGate {
    pub const fn new(cooldown_ms: u32) -> Self {
        Self {
            cooldown_ms,
            last_accepted_ms: None,
        }
    }

    /// Try to pass the gate. `Err` carries the seconds left to wait.
    pub fn try_acquire(&mut self, now_ms: u32) -> Result<(), u32> {
        let remaining = self.remaining_ms(now_ms);
        if remaining > 0 {
            info!("wake: rate-limited, {} ms left", remaining);
            return Err(remaining.div_ceil(1000));
        }
        self.last_accepted_ms = Some(now_ms);
        Ok(())
    }

    /// A gap of a whole clock wrap (~49.7 days) aliases back into the window.
    pub fn remaining_ms(&self, now_ms: u32) -> u32 {
        self.last_accepted_ms.map_or(0, |last| {
            self.cooldown_ms.saturating_sub(now_ms.wrapping_sub(last))
        })
    }

    /// Forget the last accepted request (factory reset).
    pub fn clear(&mut self) {
        self.last_accepted_ms = None;
    }
}
