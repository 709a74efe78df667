//! Application service, the hexagonal core.
//!
//! [`AlarmService`] owns the alarm controller and the remote-wake rate
//! limiter. It runs one outer tick in the fixed order
//! input → output → state machine → button actions, and interprets remote
//! commands. All I/O flows through port traits injected at call sites.
//!
//! ```text
//!   InputPort ──▶ ┌────────────────────────┐ ──▶ NotificationSink
//!  HealthPort ──▶ │      AlarmService      │
//! ActuatorPort ◀──│  AlarmController · gate │
//!                 └────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::{AlarmConfig, RESET_BLINK_STEPS};
use crate::drivers::button::ButtonEvent;
use crate::drivers::indicator::Indicator;
use crate::error::Result;
use crate::fsm::{AlarmController, AlarmState, StopReason};

use super::commands::{AlarmCommand, WakeGate};
use super::notify::{self, Notice};
use super::ports::{ActuatorPort, HealthPort, InputPort, NotificationSink};
use super::status::StatusReport;

/// Requests the service hands back to the outer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    /// RESET was held: erase persisted settings and restart.
    FactoryReset,
}

pub struct AlarmService {
    controller: AlarmController,
    wake_gate: WakeGate,
    boot_ms: u32,
    tick_count: u64,
}

impl AlarmService {
    pub fn new(config: AlarmConfig, boot_ms: u32) -> Self {
        let wake_gate = WakeGate::new(config.wake_cooldown_ms);
        Self {
            controller: AlarmController::new(config),
            wake_gate,
            boot_ms,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the controller and show the boot circuit check on the status
    /// indicator: solid when every circuit is usable, fast blink otherwise.
    pub fn begin(&mut self, hw: &mut (impl ActuatorPort + HealthPort), now_ms: u32) -> Result<()> {
        self.controller.begin(hw, now_ms)?;
        if hw.health().all_ok() {
            hw.set_indicator(Indicator::Status, true);
        } else {
            warn!("AlarmService: degraded circuits at boot");
            hw.blink_indicator(Indicator::Status, self.controller.config().blink_fast_ms, now_ms);
        }
        info!("AlarmService started in {:?}", self.controller.state());
        Ok(())
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one outer tick.
    ///
    /// The `hw` parameter satisfies every port at once, which avoids a
    /// double mutable borrow while keeping the port boundary explicit.
    pub fn tick<H>(
        &mut self,
        hw: &mut H,
        sink: &mut impl NotificationSink,
        now_ms: u32,
    ) -> Option<ServiceAction>
    where
        H: ActuatorPort + HealthPort + InputPort,
    {
        self.tick_count += 1;

        // 1. Inputs
        let events = hw.update_inputs(now_ms);
        // 2. Outputs (blink timing)
        hw.update_outputs(now_ms);
        // 3. State machine
        self.controller.update(hw, sink, now_ms);

        // 4. Button actions
        let mut action = None;
        for event in events {
            match event {
                ButtonEvent::TestPressed => {
                    if self.controller.is_active() {
                        debug!("button: TEST ignored while alarm active");
                    } else {
                        self.controller.test_alarm(hw, sink);
                    }
                }
                ButtonEvent::SilencePressed => {
                    if self.controller.stop(StopReason::PhysicalButton, hw, sink, now_ms) {
                        info!("button: alarm silenced");
                    }
                }
                ButtonEvent::ResetHeld => {
                    warn!("button: factory reset requested");
                    self.controller.stop(StopReason::PhysicalButton, hw, sink, now_ms);
                    notify::send(sink, Notice::FactoryReset);
                    action = Some(ServiceAction::FactoryReset);
                }
            }
        }
        action
    }

    // ── Command handling ──────────────────────────────────────

    /// Process a remote command. Every rejected command gets a reply.
    pub fn handle_command<H>(
        &mut self,
        cmd: AlarmCommand,
        hw: &mut H,
        sink: &mut impl NotificationSink,
        now_ms: u32,
    ) where
        H: ActuatorPort + HealthPort + InputPort,
    {
        info!("command: {:?}", cmd);
        match cmd {
            AlarmCommand::Wake => {
                if self.controller.is_active() {
                    notify::send(sink, Notice::AlreadyActive);
                    return;
                }
                if let Err(wait_secs) = self.wake_gate.try_acquire(now_ms) {
                    notify::send(sink, Notice::RateLimited { wait_secs });
                    return;
                }
                self.controller.start(hw, sink, now_ms);
            }
            AlarmCommand::Stop => {
                if !self.controller.stop(StopReason::RemoteCommand, hw, sink, now_ms) {
                    notify::send(sink, Notice::NothingToStop);
                }
            }
            AlarmCommand::Test => {
                if !self.controller.test_alarm(hw, sink) {
                    notify::send(sink, Notice::CannotTestWhileActive);
                }
            }
            AlarmCommand::Status => {
                let report = self.status_report(&*hw, now_ms);
                sink.notify(&report.render());
            }
        }
    }

    /// Forget the wake cooldown and every controller statistic, then flash
    /// all indicators together so the operator sees the reset before the
    /// reboot. Blocks for [`AlarmConfig::reset_blink_blocking_ms`].
    pub fn factory_reset(&mut self, hw: &mut impl ActuatorPort) {
        self.controller.reset(hw);
        self.wake_gate.clear();

        let step_ms = self.controller.config().blink_medium_ms;
        for step in 0..RESET_BLINK_STEPS {
            if step % 2 == 0 {
                for which in [Indicator::Wifi, Indicator::Alarm, Indicator::Status] {
                    hw.set_indicator(which, true);
                }
            } else {
                hw.indicators_off();
            }
            hw.pause_ms(step_ms);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status_report(&self, hw: &(impl HealthPort + InputPort), now_ms: u32) -> StatusReport {
        let c = &self.controller;
        StatusReport {
            state: c.state(),
            description: c.state_description(now_ms),
            uptime_secs: now_ms.wrapping_sub(self.boot_ms) / 1000,
            ticks: self.tick_count,
            elapsed_secs: c.elapsed_secs(now_ms),
            health: hw.health(),
            buttons: hw.buttons(),
            last_session: c.statistics(),
            last_hardware_error: c.last_hardware_error(),
            notifications_enabled: c.notifications_enabled(),
            hardware_checks_enabled: c.hardware_checks_enabled(),
        }
    }

    pub fn state(&self) -> AlarmState {
        self.controller.state()
    }

    pub fn controller(&self) -> &AlarmController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AlarmController {
        &mut self.controller
    }
}
