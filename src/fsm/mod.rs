//! Alarm escalation state machine.
//!
//! ```text
//!            start()
//!  IDLE ───────────────▶ TRIGGERED ──[3 s]──▶ WARNING ──[30 s]──▶ ALERT
//!   ▲                                                               │
//!   │                                                            [30 s]
//!   │                                                               ▼
//!   └── STOPPED_* ◀──[stop(reason) / safety timeout / fault]── EMERGENCY
//! ```
//!
//! Transitions are only evaluated inside [`AlarmController::update`],
//! except `start`/`stop` which act immediately. `stop` silences both
//! buzzers before doing anything else and passes through the matching
//! `Stopped*` state to `Idle` within the same call, so the controller can
//! be restarted the moment `stop` returns.
//!
//! All elapsed times use wrapping `u32` millisecond arithmetic and stay
//! correct across the ~49-day clock rollover.
//!
//! Dispatch is an exhaustive `match` on [`AlarmState`]; the per-state
//! entry actions and stage handlers live in [`states`].

pub mod session;
pub mod states;

use heapless::String;
use log::{info, warn};
use serde::Serialize;

use crate::app::notify::{self, Notice};
use crate::app::ports::{ActuatorPort, HealthPort, NotificationSink};
use crate::config::{AlarmConfig, BUZZER_OFF, TEST_ANNOUNCE_MS, TEST_GAP_MS, TEST_SETTLE_MS};
use crate::drivers::output::Actuator;
use crate::error::{Error, HardwareFault, Result};

pub use session::AlarmSession;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum AlarmState {
    #[default]
    Idle = 0,
    Triggered = 1,
    Warning = 2,
    Alert = 3,
    Emergency = 4,
    StoppedByUser = 5,
    StoppedByTimeout = 6,
    StoppedByError = 7,
}

impl AlarmState {
    /// Any of the four escalation stages.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Triggered | Self::Warning | Self::Alert | Self::Emergency
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Triggered => "Triggered",
            Self::Warning => "Warning",
            Self::Alert => "Alert",
            Self::Emergency => "Emergency",
            Self::StoppedByUser => "StoppedByUser",
            Self::StoppedByTimeout => "StoppedByTimeout",
            Self::StoppedByError => "StoppedByError",
        }
    }
}

/// Why an alarm run ended. Supplied by the caller of `stop`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum StopReason {
    #[default]
    None,
    RemoteCommand,
    PhysicalButton,
    SafetyTimeout,
    HardwareFailure,
    Completed,
}

impl StopReason {
    /// Short source label used in notifications.
    pub fn label(self) -> &'static str {
        match self {
            Self::None => "Unknown",
            Self::RemoteCommand => "Remote",
            Self::PhysicalButton => "Button",
            Self::SafetyTimeout => "Timeout",
            Self::HardwareFailure => "Error",
            Self::Completed => "Completed",
        }
    }

    /// `Stopped*` waypoint for this reason.
    fn terminal_state(self) -> AlarmState {
        match self {
            Self::SafetyTimeout => AlarmState::StoppedByTimeout,
            Self::HardwareFailure => AlarmState::StoppedByError,
            Self::None | Self::RemoteCommand | Self::PhysicalButton | Self::Completed => {
                AlarmState::StoppedByUser
            }
        }
    }
}

/// Human-readable state line, e.g. `WARNING (27s remaining)`.
pub type StateDescription = String<48>;

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

pub struct AlarmController {
    config: AlarmConfig,
    state: AlarmState,
    previous: AlarmState,
    /// When the current stage was entered.
    stage_started_ms: u32,
    /// When the current run started. Meaningful only while active.
    alarm_started_ms: u32,
    /// Last periodic health evaluation. `None` makes the next one due at once.
    last_health_check_ms: Option<u32>,
    session: AlarmSession,
    last_fault: Option<HardwareFault>,
    notifications_enabled: bool,
    hardware_checks_enabled: bool,
    test_running: bool,
}

impl AlarmController {
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            notifications_enabled: config.notifications_enabled,
            hardware_checks_enabled: config.hardware_checks_enabled,
            config,
            state: AlarmState::Idle,
            previous: AlarmState::Idle,
            stage_started_ms: 0,
            alarm_started_ms: 0,
            last_health_check_ms: None,
            session: AlarmSession::default(),
            last_fault: None,
            test_running: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Settle in `Idle` with both buzzers silent.
    ///
    /// Refuses while buzzer health is still `Unknown`, i.e. the hardware
    /// layer has not run its first circuit check.
    pub fn begin(&mut self, hw: &mut (impl ActuatorPort + HealthPort), now_ms: u32) -> Result<()> {
        if !hw.health().is_initialised() {
            warn!("alarm: begin refused, hardware not initialised");
            return Err(Error::Init("buzzer health unknown"));
        }
        self.state = AlarmState::Idle;
        self.stage_started_ms = now_ms;
        states::silence(hw);
        info!("alarm: controller ready");
        Ok(())
    }

    /// Silence everything and forget the current run, statistics and faults.
    pub fn reset(&mut self, hw: &mut impl ActuatorPort) {
        hw.stop_all();
        self.state = AlarmState::Idle;
        self.previous = AlarmState::Idle;
        self.stage_started_ms = 0;
        self.alarm_started_ms = 0;
        self.last_health_check_ms = None;
        self.session = AlarmSession::default();
        self.last_fault = None;
        self.test_running = false;
        info!("alarm: reset");
    }

    // ── Control ───────────────────────────────────────────────

    /// Begin a run. Returns `false` (and changes nothing) unless idle.
    pub fn start(
        &mut self,
        hw: &mut impl ActuatorPort,
        sink: &mut impl NotificationSink,
        now_ms: u32,
    ) -> bool {
        if self.state != AlarmState::Idle || self.test_running {
            warn!("alarm: start ignored in {}", self.state.name());
            return false;
        }

        info!("alarm: START");
        self.alarm_started_ms = now_ms;
        self.transition(AlarmState::Triggered, hw, sink, now_ms);
        self.notify(
            sink,
            Notice::WakeReceived {
                delay_secs: self.config.trigger_delay_ms / 1000,
            },
        );
        true
    }

    /// End the current run. Returns `false` (and changes nothing) unless active.
    pub fn stop(
        &mut self,
        reason: StopReason,
        hw: &mut impl ActuatorPort,
        sink: &mut impl NotificationSink,
        now_ms: u32,
    ) -> bool {
        if !self.is_active() {
            return false;
        }

        // Silence first; nothing below may delay this.
        hw.stop_all();

        self.session = AlarmSession::close(self.alarm_started_ms, now_ms, reason, self.state);
        info!(
            "alarm: STOP reason={:?} stage={} duration={}s",
            reason,
            self.state.name(),
            self.session.duration_secs
        );

        match reason {
            // The fault notice already went out when the fault was detected.
            StopReason::HardwareFailure => {}
            StopReason::SafetyTimeout => self.notify(
                sink,
                Notice::SafetyTimeout {
                    minutes: self.config.safety_timeout_ms / 60_000,
                },
            ),
            _ => self.notify(
                sink,
                Notice::Stopped {
                    duration_secs: self.session.duration_secs,
                    reason,
                },
            ),
        }

        self.transition(reason.terminal_state(), hw, sink, now_ms);
        self.transition(AlarmState::Idle, hw, sink, now_ms);
        true
    }

    /// Advance the machine. Call every outer tick; returns promptly.
    pub fn update<H: ActuatorPort + HealthPort>(
        &mut self,
        hw: &mut H,
        sink: &mut impl NotificationSink,
        now_ms: u32,
    ) {
        if let Some(next) = self.run_stage(hw, now_ms) {
            self.transition(next, hw, sink, now_ms);
        }

        if self.is_active()
            && now_ms.wrapping_sub(self.alarm_started_ms) >= self.config.safety_timeout_ms
        {
            warn!("alarm: safety timeout reached");
            self.stop(StopReason::SafetyTimeout, hw, sink, now_ms);
        }

        if self.is_active() && self.hardware_checks_enabled && self.health_check_due(now_ms) {
            self.last_health_check_ms = Some(now_ms);
            if let Some(fault) = states::evaluate_health(self.state, &hw.health()) {
                warn!("alarm: hardware check failed: {}", fault);
                self.last_fault = Some(fault);
                self.notify(sink, Notice::Fault(fault));
                self.stop(StopReason::HardwareFailure, hw, sink, now_ms);
            }
        }
    }

    /// Blocking buzzer self-test. Only allowed while idle.
    ///
    /// Re-runs the circuit check first so a repaired circuit reads OK
    /// again, then plays a short burst on each buzzer. Does not touch the
    /// escalation state.
    pub fn test_alarm<H: ActuatorPort + HealthPort>(
        &mut self,
        hw: &mut H,
        sink: &mut impl NotificationSink,
    ) -> bool {
        if self.state != AlarmState::Idle || self.test_running {
            warn!("alarm: self-test refused in {}", self.state.name());
            return false;
        }

        self.test_running = true;
        info!("alarm: self-test starting");
        self.notify(sink, Notice::TestStarting);

        let healthy = hw.check_circuits();
        if healthy {
            self.last_fault = None;
        }

        let on = self.config.buzzer_on_level;
        hw.pause_ms(TEST_SETTLE_MS);
        self.notify(sink, Notice::TestQuiet);
        hw.pause_ms(TEST_ANNOUNCE_MS);
        hw.set_level(Actuator::Quiet, on);
        hw.pause_ms(self.config.test_quiet_ms);
        hw.set_level(Actuator::Quiet, BUZZER_OFF);

        hw.pause_ms(TEST_GAP_MS);
        self.notify(sink, Notice::TestLoud);
        hw.pause_ms(TEST_ANNOUNCE_MS);
        hw.set_level(Actuator::Loud, on);
        hw.pause_ms(self.config.test_loud_ms);
        hw.set_level(Actuator::Loud, BUZZER_OFF);

        hw.pause_ms(TEST_SETTLE_MS);
        self.notify(sink, Notice::TestComplete { healthy });
        self.test_running = false;
        info!("alarm: self-test complete (circuits {})", if healthy { "OK" } else { "FAILED" });
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> AlarmState {
        self.state
    }

    pub fn previous_state(&self) -> AlarmState {
        self.previous
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_test_running(&self) -> bool {
        self.test_running
    }

    /// Last completed run.
    pub fn statistics(&self) -> AlarmSession {
        self.session
    }

    pub fn last_hardware_error(&self) -> Option<HardwareFault> {
        self.last_fault
    }

    /// Seconds left in a timed stage; 0 in untimed states.
    pub fn time_remaining_in_stage_secs(&self, now_ms: u32) -> u32 {
        let duration = match self.state {
            AlarmState::Triggered => self.config.trigger_delay_ms,
            AlarmState::Warning => self.config.warning_duration_ms,
            AlarmState::Alert => self.config.alert_duration_ms,
            _ => return 0,
        };
        let elapsed_ms = now_ms.wrapping_sub(self.stage_started_ms);
        (duration / 1000).saturating_sub(elapsed_ms / 1000)
    }

    /// Seconds since the current run started; 0 while idle.
    pub fn elapsed_secs(&self, now_ms: u32) -> u32 {
        if self.is_active() {
            now_ms.wrapping_sub(self.alarm_started_ms) / 1000
        } else {
            0
        }
    }

    pub fn state_description(&self, now_ms: u32) -> StateDescription {
        use core::fmt::Write;

        let remaining = self.time_remaining_in_stage_secs(now_ms);
        let mut s = StateDescription::new();
        let _ = match self.state {
            AlarmState::Idle => s.write_str("Idle"),
            AlarmState::Triggered => write!(s, "Triggered (starting in {}s)", remaining),
            AlarmState::Warning => write!(s, "WARNING ({}s remaining)", remaining),
            AlarmState::Alert => write!(s, "ALERT ({}s remaining)", remaining),
            AlarmState::Emergency => s.write_str("EMERGENCY (stop to silence)"),
            AlarmState::StoppedByUser => s.write_str("Stopped by user"),
            AlarmState::StoppedByTimeout => s.write_str("Stopped by timeout"),
            AlarmState::StoppedByError => s.write_str("Stopped due to error"),
        };
        s
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }

    // ── Toggles ───────────────────────────────────────────────

    pub fn set_notifications_enabled(&mut self, enabled: bool) {
        info!("alarm: notifications {}", if enabled { "enabled" } else { "disabled" });
        self.notifications_enabled = enabled;
    }

    pub fn notifications_enabled(&self) -> bool {
        self.notifications_enabled
    }

    pub fn set_hardware_checks_enabled(&mut self, enabled: bool) {
        info!("alarm: hardware checks {}", if enabled { "enabled" } else { "disabled" });
        self.hardware_checks_enabled = enabled;
    }

    pub fn hardware_checks_enabled(&self) -> bool {
        self.hardware_checks_enabled
    }

    // ── Internal ──────────────────────────────────────────────

    fn transition(
        &mut self,
        next: AlarmState,
        hw: &mut impl ActuatorPort,
        sink: &mut impl NotificationSink,
        now_ms: u32,
    ) {
        info!("alarm: {} -> {}", self.state.name(), next.name());
        self.previous = self.state;
        self.state = next;
        self.stage_started_ms = now_ms;
        self.enter(next, hw, sink, now_ms);
    }

    fn health_check_due(&self, now_ms: u32) -> bool {
        self.last_health_check_ms
            .is_none_or(|last| now_ms.wrapping_sub(last) >= self.config.health_check_interval_ms)
    }

    fn notify(&self, sink: &mut impl NotificationSink, notice: Notice) {
        if self.notifications_enabled {
            notify::send(sink, notice);
        }
    }
}
