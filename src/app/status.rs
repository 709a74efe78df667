//! Device status snapshot for the messaging collaborator and the serial log.

use core::fmt::Write;

use serde::Serialize;

use crate::drivers::button::ButtonSnapshot;
use crate::error::HardwareFault;
use crate::fsm::{AlarmSession, AlarmState, StateDescription, StopReason};
use crate::health::HealthReport;

use super::notify::NoticeText;

/// A point-in-time status snapshot suitable for logging or transmission.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub state: AlarmState,
    pub description: StateDescription,
    pub uptime_secs: u32,
    /// Outer loop iterations since boot.
    pub ticks: u64,
    /// Seconds into the current run; 0 while idle.
    pub elapsed_secs: u32,
    pub health: HealthReport,
    pub buttons: ButtonSnapshot,
    pub last_session: AlarmSession,
    pub last_hardware_error: Option<HardwareFault>,
    pub notifications_enabled: bool,
    pub hardware_checks_enabled: bool,
}

impl StatusReport {
    /// Multi-line, chat-friendly rendering.
    pub fn render(&self) -> NoticeText {
        let mut s = NoticeText::new();
        // Capacity covers the full block; a failed write only truncates.
        let _ = self.write_block(&mut s);
        s
    }

    fn write_block(&self, s: &mut NoticeText) -> core::fmt::Result {
        let pressed = |b: bool| if b { "pressed" } else { "released" };

        writeln!(s, "📊 WakeAssist Status")?;
        writeln!(s, "Alarm: {}", self.description)?;
        writeln!(
            s,
            "Uptime: {}h {}m",
            self.uptime_secs / 3_600,
            (self.uptime_secs / 60) % 60
        )?;
        writeln!(
            s,
            "Small buzzer: {} | Large buzzer: {}",
            self.health.quiet.label(),
            self.health.loud.label()
        )?;
        writeln!(
            s,
            "Buttons: TEST {} | SILENCE {} | RESET {}",
            pressed(self.buttons.test),
            pressed(self.buttons.silence),
            pressed(self.buttons.reset)
        )?;
        if self.last_session.stop_reason == StopReason::None {
            writeln!(s, "Last alarm: none")?;
        } else {
            writeln!(
                s,
                "Last alarm: {}s, reached {}, source {}",
                self.last_session.duration_secs,
                self.last_session.highest_stage.name(),
                self.last_session.stop_reason.label()
            )?;
        }
        match self.last_hardware_error {
            Some(fault) => write!(s, "Last error: {}", fault),
            None => write!(s, "Last error: none"),
        }
    }

    /// JSON rendering for machine consumers.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
