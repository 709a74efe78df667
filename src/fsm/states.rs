//! Per-state entry actions and stage handlers.
//!
//! Entry actions run exactly once, when a transition lands on a state.
//! Stage handlers run every tick while the state is current and return
//! `Some(next)` to escalate.
//!
//! | State     | Entry                              | Per tick                       |
//! |-----------|------------------------------------|--------------------------------|
//! | Idle      | buzzers off, alarm LED off         | nothing                        |
//! | Triggered | alarm LED solid                    | escalate after trigger delay   |
//! | Warning   | notify, LED slow blink             | pulse small buzzer             |
//! | Alert     | notify, LED medium blink           | small buzzer continuous        |
//! | Emergency | notify, LED fast blink             | large buzzer continuous        |
//! | Stopped*  | log only                           | nothing (never current a tick) |

use log::{debug, info};

use super::{AlarmController, AlarmState};
use crate::app::notify::Notice;
use crate::app::ports::{ActuatorPort, NotificationSink};
use crate::drivers::indicator::Indicator;
use crate::drivers::output::Actuator;
use crate::error::HardwareFault;
use crate::health::HealthReport;

impl AlarmController {
    pub(super) fn enter(
        &mut self,
        state: AlarmState,
        hw: &mut impl ActuatorPort,
        sink: &mut impl NotificationSink,
        now_ms: u32,
    ) {
        match state {
            AlarmState::Idle => silence(hw),
            AlarmState::Triggered => hw.set_indicator(Indicator::Alarm, true),
            AlarmState::Warning => {
                self.notify(sink, Notice::WarningStarted);
                hw.blink_indicator(Indicator::Alarm, self.config.blink_slow_ms, now_ms);
            }
            AlarmState::Alert => {
                self.notify(sink, Notice::AlertStarted);
                hw.blink_indicator(Indicator::Alarm, self.config.blink_medium_ms, now_ms);
            }
            AlarmState::Emergency => {
                self.notify(sink, Notice::EmergencyStarted);
                hw.blink_indicator(Indicator::Alarm, self.config.blink_fast_ms, now_ms);
            }
            AlarmState::StoppedByUser | AlarmState::StoppedByTimeout | AlarmState::StoppedByError => {
                debug!("alarm: passing through {}", state.name());
            }
        }
    }

    /// Run the current stage's handler.
    pub(super) fn run_stage(
        &mut self,
        hw: &mut impl ActuatorPort,
        now_ms: u32,
    ) -> Option<AlarmState> {
        let elapsed = now_ms.wrapping_sub(self.stage_started_ms);
        let on = self.config.buzzer_on_level;

        match self.state {
            AlarmState::Idle => None,

            AlarmState::Triggered => {
                (elapsed >= self.config.trigger_delay_ms).then_some(AlarmState::Warning)
            }

            AlarmState::Warning => {
                if elapsed >= self.config.warning_duration_ms {
                    return Some(AlarmState::Alert);
                }
                // Completion is advisory; the stage timer decides escalation.
                if hw.pulse_quiet(now_ms) {
                    info!("alarm: warning pulse pattern finished");
                }
                None
            }

            AlarmState::Alert => {
                if elapsed >= self.config.alert_duration_ms {
                    return Some(AlarmState::Emergency);
                }
                hw.set_level(Actuator::Quiet, on);
                None
            }

            // No automatic exit; only stop() or the safety timeout.
            AlarmState::Emergency => {
                hw.set_level(Actuator::Loud, on);
                None
            }

            AlarmState::StoppedByUser | AlarmState::StoppedByTimeout | AlarmState::StoppedByError => {
                None
            }
        }
    }
}

/// Buzzers off, alarm LED off.
pub(super) fn silence(hw: &mut impl ActuatorPort) {
    hw.stop_all();
    hw.set_indicator(Indicator::Alarm, false);
}

/// Fault that should end the run, given the stage and stored circuit health.
///
/// Only the buzzer the stage relies on is considered, except that two
/// failed circuits are fatal in any stage.
pub fn evaluate_health(state: AlarmState, report: &HealthReport) -> Option<HardwareFault> {
    match state {
        AlarmState::Warning | AlarmState::Alert if report.is_failed(Actuator::Quiet) => {
            return Some(HardwareFault::QuietActuator);
        }
        AlarmState::Emergency if report.is_failed(Actuator::Loud) => {
            return Some(HardwareFault::LoudActuator);
        }
        _ => {}
    }
    report.both_failed().then_some(HardwareFault::BothActuators)
}
