//! Fuzz target: `AlarmController` under arbitrary call sequences
//!
//! Each input byte selects one operation (start, stop, time advance,
//! health change, self-test, toggles). After every operation:
//! - No panics, including across the u32 clock wrap
//! - Never resting in a `Stopped*` state
//! - Both buzzers silent whenever the controller is idle
//! - The large buzzer is never on before Alert
//! - No run outlives the safety timeout
//!
//! cargo fuzz run fuzz_alarm_controller

#![no_main]

use libfuzzer_sys::fuzz_target;
use wakeassist::app::ports::{ActuatorPort, HealthPort, NotificationSink};
use wakeassist::config::AlarmConfig;
use wakeassist::drivers::indicator::Indicator;
use wakeassist::drivers::output::Actuator;
use wakeassist::fsm::{AlarmController, AlarmState, StopReason};
use wakeassist::health::{HardwareHealth, HealthReport};

struct Board {
    quiet: u8,
    loud: u8,
    health: HealthReport,
}

impl ActuatorPort for Board {
    fn set_level(&mut self, actuator: Actuator, level: u8) {
        match actuator {
            Actuator::Quiet => self.quiet = level,
            Actuator::Loud => self.loud = level,
        }
    }
    fn stop_all(&mut self) {
        self.quiet = 0;
        self.loud = 0;
    }
    fn pulse_quiet(&mut self, _now_ms: u32) -> bool {
        false
    }
    fn set_indicator(&mut self, _which: Indicator, _on: bool) {}
    fn blink_indicator(&mut self, _which: Indicator, _period_ms: u32, _now_ms: u32) {}
    fn update_outputs(&mut self, _now_ms: u32) {}
    fn pause_ms(&mut self, _ms: u32) {}
}

impl HealthPort for Board {
    fn health(&self) -> HealthReport {
        self.health
    }
    fn check_circuits(&mut self) -> bool {
        self.health.all_ok()
    }
}

struct Sink;

impl NotificationSink for Sink {
    fn notify(&mut self, text: &str) {
        assert!(!text.is_empty(), "empty notification");
    }
}

fn health_from(bits: u8) -> HardwareHealth {
    match bits & 0b11 {
        0 => HardwareHealth::Ok,
        1 => HardwareHealth::Failed,
        _ => HardwareHealth::Disabled,
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let (seed, ops) = data.split_at(4);
    let mut now = u32::from_le_bytes([seed[0], seed[1], seed[2], seed[3]]);

    let config = AlarmConfig::default();
    let timeout_secs = config.safety_timeout_ms / 1000;
    let mut ctrl = AlarmController::new(config);
    let mut hw = Board {
        quiet: 0,
        loud: 0,
        health: HealthReport {
            quiet: HardwareHealth::Ok,
            loud: HardwareHealth::Ok,
        },
    };
    let mut sink = Sink;
    if ctrl.begin(&mut hw, now).is_err() {
        return;
    }

    for &op in ops {
        match op >> 5 {
            0 => {
                ctrl.start(&mut hw, &mut sink, now);
            }
            1 => {
                ctrl.stop(StopReason::RemoteCommand, &mut hw, &mut sink, now);
            }
            2 | 3 => {
                // 0..=31 s in 1 s steps, then one update
                now = now.wrapping_add(u32::from(op & 0x1f) * 1_000);
                ctrl.update(&mut hw, &mut sink, now);
            }
            4 => {
                hw.health = HealthReport {
                    quiet: health_from(op),
                    loud: health_from(op >> 2),
                };
            }
            5 => {
                ctrl.test_alarm(&mut hw, &mut sink);
            }
            6 => ctrl.set_notifications_enabled(op & 1 == 0),
            _ => ctrl.set_hardware_checks_enabled(op & 1 == 0),
        }

        let state = ctrl.state();
        assert!(!matches!(
            state,
            AlarmState::StoppedByUser | AlarmState::StoppedByTimeout | AlarmState::StoppedByError
        ));
        if state == AlarmState::Idle {
            assert_eq!((hw.quiet, hw.loud), (0, 0), "idle with a buzzer on");
        }
        if matches!(state, AlarmState::Triggered | AlarmState::Warning) {
            assert_eq!(hw.loud, 0, "large buzzer on before Alert");
        }
        assert!(ctrl.elapsed_secs(now) <= timeout_secs);
        assert!(!ctrl.is_test_running());
    }
});
