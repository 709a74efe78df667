//! Per-run alarm statistics.

use serde::Serialize;

use super::{AlarmState, StopReason};

/// Summary of the last completed alarm run. Zeroed before the first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AlarmSession {
    pub started_ms: u32,
    pub stopped_ms: u32,
    /// Whole seconds between start and stop.
    pub duration_secs: u32,
    pub stop_reason: StopReason,
    /// Stage the alarm was in when it stopped.
    pub highest_stage: AlarmState,
    pub hardware_issue_detected: bool,
}

impl AlarmSession {
    /// Close a run that started at `started_ms` and is stopping now.
    pub fn close(started_ms: u32, stopped_ms: u32, reason: StopReason, stage: AlarmState) -> Self {
        Self {
            started_ms,
            stopped_ms,
            duration_secs: stopped_ms.wrapping_sub(started_ms) / 1000,
            stop_reason: reason,
            highest_stage: stage,
            hardware_issue_detected: reason == StopReason::HardwareFailure,
        }
    }
}
