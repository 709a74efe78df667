//! Operator-facing notifications.
//!
//! Every message the core can send is a [`Notice`]; rendering into a
//! fixed-capacity string happens at the edge, just before the sink.

use core::fmt::Write;

use heapless::String;

use crate::error::HardwareFault;
use crate::fsm::StopReason;

use super::ports::NotificationSink;

pub const NOTICE_CAPACITY: usize = 384;

/// Rendered notification text. Long enough for every [`Notice`] and the
/// status block.
pub type NoticeText = String<NOTICE_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// Alarm accepted; audible stages begin after the trigger delay.
    WakeReceived { delay_secs: u32 },
    WarningStarted,
    AlertStarted,
    EmergencyStarted,
    /// Terminal message for a caller-initiated stop.
    Stopped { duration_secs: u32, reason: StopReason },
    SafetyTimeout { minutes: u32 },
    Fault(HardwareFault),

    TestStarting,
    TestQuiet,
    TestLoud,
    TestComplete { healthy: bool },

    // Command replies
    RateLimited { wait_secs: u32 },
    AlreadyActive,
    NothingToStop,
    CannotTestWhileActive,
    FactoryReset,
}

impl Notice {
    pub fn render(&self) -> NoticeText {
        let mut s = NoticeText::new();
        // Capacity covers the longest message; a failed write only truncates.
        let _ = match *self {
            Self::WakeReceived { delay_secs } => {
                write!(s, "✅ Command received. Starting alarm in {}s...", delay_secs)
            }
            Self::WarningStarted => s.write_str("⏰ WARNING stage started - small buzzer pulsing"),
            Self::AlertStarted => s.write_str("🔔 ALERT stage - small buzzer continuous"),
            Self::EmergencyStarted => s.write_str("🚨 EMERGENCY - LARGE BUZZER ACTIVATED!"),
            Self::Stopped { duration_secs, reason } => write!(
                s,
                "✅ Alarm stopped. Duration: {}s. Source: {}",
                duration_secs,
                reason.label()
            ),
            Self::SafetyTimeout { minutes } => {
                write!(s, "⏰ Alarm auto-stopped after {} minutes (safety)", minutes)
            }
            Self::Fault(HardwareFault::QuietActuator) => {
                s.write_str("⚠️ Small buzzer circuit issue - alarm stopped, check device")
            }
            Self::Fault(HardwareFault::LoudActuator) => {
                s.write_str("❌ CRITICAL: Large buzzer not responding! Check device")
            }
            Self::Fault(HardwareFault::BothActuators) => {
                s.write_str("❌ CRITICAL: No buzzers responding! Device may not work!")
            }
            Self::TestStarting => s.write_str("🧪 Testing buzzers..."),
            Self::TestQuiet => s.write_str("Small buzzer test in 3... 2... 1..."),
            Self::TestLoud => s.write_str("Large buzzer test (LOUD!) in 3... 2... 1..."),
            Self::TestComplete { healthy: true } => {
                s.write_str("✅ Test complete! Both buzzers working.")
            }
            Self::TestComplete { healthy: false } => {
                s.write_str("⚠️ Test complete, but a buzzer circuit check failed. Check device")
            }
            Self::RateLimited { wait_secs } => {
                write!(s, "⏰ Please wait {} more seconds before next /wake", wait_secs)
            }
            Self::AlreadyActive => s.write_str("⚠️ Alarm already active!"),
            Self::NothingToStop => s.write_str("ℹ️ No active alarm to stop"),
            Self::CannotTestWhileActive => s.write_str("⚠️ Cannot test while alarm is active"),
            Self::FactoryReset => s.write_str("🔄 Factory reset requested, restarting..."),
        };
        s
    }
}

/// Render and forward a notice.
pub fn send(sink: &mut impl NotificationSink, notice: Notice) {
    sink.notify(&notice.render());
}
