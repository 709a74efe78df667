//! Integration tests for the alarm controller against the mock ports.
//!
//! Time is driven explicitly: every `update` call receives the simulated
//! millisecond clock, so a five-minute escalation runs instantly.

use super::mock_hw::{ActuatorCall, MockHardware, RecordingSink};

use wakeassist::config::{AlarmConfig, BUZZER_ON};
use wakeassist::drivers::indicator::Indicator;
use wakeassist::drivers::output::Actuator;
use wakeassist::error::{Error, HardwareFault};
use wakeassist::fsm::{AlarmController, AlarmState, StopReason};
use wakeassist::health::HardwareHealth;

const T0: u32 = 1_000;

fn ready() -> (AlarmController, MockHardware, RecordingSink) {
    let mut ctrl = AlarmController::new(AlarmConfig::default());
    let mut hw = MockHardware::new();
    ctrl.begin(&mut hw, 0).expect("begin with checked hardware");
    (ctrl, hw, RecordingSink::new())
}

fn started() -> (AlarmController, MockHardware, RecordingSink) {
    let (mut ctrl, mut hw, mut sink) = ready();
    assert!(ctrl.start(&mut hw, &mut sink, T0));
    (ctrl, hw, sink)
}

/// Tick every 100 ms from `from` to `to` inclusive.
fn run(ctrl: &mut AlarmController, hw: &mut MockHardware, sink: &mut RecordingSink, from: u32, to: u32) {
    let mut now = from;
    while now <= to {
        ctrl.update(hw, sink, now);
        now += 100;
    }
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn begin_refused_until_circuits_checked() {
    let mut ctrl = AlarmController::new(AlarmConfig::default());
    let mut hw = MockHardware::unchecked();
    assert!(matches!(ctrl.begin(&mut hw, 0), Err(Error::Init(_))));
    assert!(hw.calls.is_empty(), "refused begin must not drive outputs");
}

#[test]
fn begin_silences_everything() {
    let (ctrl, hw, _) = ready();
    assert_eq!(ctrl.state(), AlarmState::Idle);
    assert_eq!(hw.calls[0], ActuatorCall::StopAll);
    assert!(hw.calls.contains(&ActuatorCall::SetIndicator {
        which: Indicator::Alarm,
        on: false
    }));
}

// ── Escalation ────────────────────────────────────────────────

#[test]
fn full_escalation_timeline() {
    let (mut ctrl, mut hw, mut sink) = started();
    assert_eq!(ctrl.state(), AlarmState::Triggered);

    let mut seen = vec![(T0, ctrl.state())];
    let mut now = T0;
    while now <= T0 + 310_000 {
        ctrl.update(&mut hw, &mut sink, now);
        if ctrl.state() != seen.last().map(|s| s.1).unwrap_or_default() {
            seen.push((now, ctrl.state()));
        }
        now += 100;
    }

    assert_eq!(
        seen,
        vec![
            (T0, AlarmState::Triggered),
            (T0 + 3_000, AlarmState::Warning),
            (T0 + 33_000, AlarmState::Alert),
            (T0 + 63_000, AlarmState::Emergency),
            (T0 + 300_000, AlarmState::Idle),
        ]
    );

    let stats = ctrl.statistics();
    assert_eq!(stats.stop_reason, StopReason::SafetyTimeout);
    assert_eq!(stats.highest_stage, AlarmState::Emergency);
    assert_eq!(stats.duration_secs, 300);
    assert_eq!(ctrl.previous_state(), AlarmState::StoppedByTimeout);
    assert!(sink.contains("auto-stopped after 5 minutes"));
    assert!(!sink.contains("Alarm stopped."));
}

#[test]
fn stage_notifications_in_order() {
    let (mut ctrl, mut hw, mut sink) = started();
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 63_000);

    let expected = [
        "Starting alarm in 3s",
        "WARNING stage started",
        "ALERT stage",
        "EMERGENCY",
    ];
    assert_eq!(sink.messages.len(), expected.len());
    for (msg, needle) in sink.messages.iter().zip(expected) {
        assert!(msg.contains(needle), "{msg:?} should contain {needle:?}");
    }
}

#[test]
fn each_stage_drives_its_buzzer_and_blink_rate() {
    let (mut ctrl, mut hw, mut sink) = started();

    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 3_100);
    assert_eq!(ctrl.state(), AlarmState::Warning);
    assert!(hw.calls.contains(&ActuatorCall::PulseQuiet));
    assert_eq!(hw.last_blink(Indicator::Alarm), Some(1_000));

    run(&mut ctrl, &mut hw, &mut sink, T0 + 3_200, T0 + 33_100);
    assert_eq!(ctrl.state(), AlarmState::Alert);
    assert_eq!(hw.level(Actuator::Quiet), BUZZER_ON);
    assert_eq!(hw.level(Actuator::Loud), 0);
    assert_eq!(hw.last_blink(Indicator::Alarm), Some(500));

    run(&mut ctrl, &mut hw, &mut sink, T0 + 33_200, T0 + 63_100);
    assert_eq!(ctrl.state(), AlarmState::Emergency);
    assert_eq!(hw.level(Actuator::Loud), BUZZER_ON);
    // small buzzer keeps sounding alongside the large one
    assert_eq!(hw.level(Actuator::Quiet), BUZZER_ON);
    assert_eq!(hw.last_blink(Indicator::Alarm), Some(200));
}

#[test]
fn triggered_stage_is_silent() {
    let (mut ctrl, mut hw, mut sink) = started();
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 2_900);
    assert_eq!(ctrl.state(), AlarmState::Triggered);
    assert!(!hw.calls.iter().any(|c| matches!(
        c,
        ActuatorCall::SetLevel { .. } | ActuatorCall::PulseQuiet
    )));
}

#[test]
fn escalation_survives_clock_wrap() {
    let (mut ctrl, mut hw, mut sink) = ready();
    let start = u32::MAX - 1_000;
    assert!(ctrl.start(&mut hw, &mut sink, start));

    ctrl.update(&mut hw, &mut sink, start.wrapping_add(2_999));
    assert_eq!(ctrl.state(), AlarmState::Triggered);
    ctrl.update(&mut hw, &mut sink, start.wrapping_add(3_000));
    assert_eq!(ctrl.state(), AlarmState::Warning);
    assert_eq!(ctrl.elapsed_secs(start.wrapping_add(3_000)), 3);
}

// ── start / stop ──────────────────────────────────────────────

#[test]
fn start_only_from_idle() {
    let (mut ctrl, mut hw, mut sink) = started();
    hw.clear();
    assert!(!ctrl.start(&mut hw, &mut sink, T0 + 500));
    assert_eq!(ctrl.state(), AlarmState::Triggered);
    assert!(hw.calls.is_empty());
}

#[test]
fn stop_silences_first_and_returns_to_idle() {
    let (mut ctrl, mut hw, mut sink) = started();
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 40_000);
    assert_eq!(ctrl.state(), AlarmState::Alert);

    hw.clear();
    assert!(ctrl.stop(StopReason::RemoteCommand, &mut hw, &mut sink, T0 + 40_500));
    assert_eq!(hw.calls[0], ActuatorCall::StopAll);
    assert_eq!(ctrl.state(), AlarmState::Idle);
    assert_eq!(ctrl.previous_state(), AlarmState::StoppedByUser);
    assert_eq!(hw.level(Actuator::Quiet), 0);

    let stats = ctrl.statistics();
    assert_eq!(stats.duration_secs, 40);
    assert_eq!(stats.highest_stage, AlarmState::Alert);
    assert!(!stats.hardware_issue_detected);
    assert_eq!(
        sink.last(),
        Some("✅ Alarm stopped. Duration: 40s. Source: Remote")
    );
}

#[test]
fn stop_while_idle_changes_nothing() {
    let (mut ctrl, mut hw, mut sink) = ready();
    hw.clear();
    assert!(!ctrl.stop(StopReason::PhysicalButton, &mut hw, &mut sink, 5_000));
    assert!(hw.calls.is_empty());
    assert!(sink.messages.is_empty());
    assert_eq!(ctrl.statistics().stop_reason, StopReason::None);
}

#[test]
fn restart_immediately_after_stop() {
    let (mut ctrl, mut hw, mut sink) = started();
    assert!(ctrl.stop(StopReason::PhysicalButton, &mut hw, &mut sink, T0 + 1_000));
    assert!(ctrl.start(&mut hw, &mut sink, T0 + 1_000));
    assert_eq!(ctrl.state(), AlarmState::Triggered);
    assert_eq!(ctrl.elapsed_secs(T0 + 4_000), 3);
}

// ── Health ────────────────────────────────────────────────────

#[test]
fn quiet_failure_during_warning_stops_with_error() {
    let (mut ctrl, mut hw, mut sink) = started();
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 5_000);
    assert_eq!(ctrl.state(), AlarmState::Warning);

    hw.set_health(HardwareHealth::Failed, HardwareHealth::Ok);
    // next evaluation is due 10 s after the first one at T0
    ctrl.update(&mut hw, &mut sink, T0 + 9_900);
    assert_eq!(ctrl.state(), AlarmState::Warning);
    ctrl.update(&mut hw, &mut sink, T0 + 10_000);

    assert_eq!(ctrl.state(), AlarmState::Idle);
    assert_eq!(ctrl.previous_state(), AlarmState::StoppedByError);
    assert_eq!(ctrl.last_hardware_error(), Some(HardwareFault::QuietActuator));
    let stats = ctrl.statistics();
    assert!(stats.hardware_issue_detected);
    assert_eq!(stats.stop_reason, StopReason::HardwareFailure);
    assert!(sink.contains("Small buzzer circuit issue"));
    assert!(!sink.contains("Alarm stopped."));
}

#[test]
fn loud_failure_tolerated_before_emergency() {
    let (mut ctrl, mut hw, mut sink) = started();
    hw.set_health(HardwareHealth::Ok, HardwareHealth::Failed);
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 63_000);
    assert_eq!(ctrl.state(), AlarmState::Emergency);

    run(&mut ctrl, &mut hw, &mut sink, T0 + 63_100, T0 + 80_000);
    assert_eq!(ctrl.state(), AlarmState::Idle);
    assert_eq!(ctrl.last_hardware_error(), Some(HardwareFault::LoudActuator));
    assert!(sink.contains("Large buzzer not responding"));
}

#[test]
fn both_failed_stops_on_first_update() {
    let (mut ctrl, mut hw, mut sink) = started();
    hw.set_health(HardwareHealth::Failed, HardwareHealth::Failed);
    ctrl.update(&mut hw, &mut sink, T0);
    assert_eq!(ctrl.state(), AlarmState::Idle);
    assert_eq!(ctrl.last_hardware_error(), Some(HardwareFault::BothActuators));
}

#[test]
fn disabled_checks_ignore_failures() {
    let (mut ctrl, mut hw, mut sink) = started();
    ctrl.set_hardware_checks_enabled(false);
    hw.set_health(HardwareHealth::Failed, HardwareHealth::Failed);
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 40_000);
    assert_eq!(ctrl.state(), AlarmState::Alert);
    assert_eq!(ctrl.last_hardware_error(), None);
}

// ── Notifications toggle ──────────────────────────────────────

#[test]
fn muted_controller_sends_nothing() {
    let (mut ctrl, mut hw, mut sink) = ready();
    ctrl.set_notifications_enabled(false);
    assert!(ctrl.start(&mut hw, &mut sink, T0));
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 70_000);
    assert!(ctrl.stop(StopReason::RemoteCommand, &mut hw, &mut sink, T0 + 70_100));
    assert!(sink.messages.is_empty());
    assert_eq!(ctrl.statistics().duration_secs, 70);
}

// ── Self-test ─────────────────────────────────────────────────

#[test]
fn self_test_script() {
    let (mut ctrl, mut hw, mut sink) = ready();
    hw.clear();
    assert!(ctrl.test_alarm(&mut hw, &mut sink));

    assert_eq!(hw.calls[0], ActuatorCall::CheckCircuits);
    assert_eq!(hw.paused_ms, 1_000 + 3_000 + 1_000 + 2_000 + 3_000 + 500 + 1_000);
    assert_eq!(hw.paused_ms, u64::from(ctrl.config().self_test_blocking_ms()));
    let levels: Vec<_> = hw
        .calls
        .iter()
        .filter(|c| matches!(c, ActuatorCall::SetLevel { .. }))
        .cloned()
        .collect();
    assert_eq!(
        levels,
        vec![
            ActuatorCall::SetLevel { actuator: Actuator::Quiet, level: BUZZER_ON },
            ActuatorCall::SetLevel { actuator: Actuator::Quiet, level: 0 },
            ActuatorCall::SetLevel { actuator: Actuator::Loud, level: BUZZER_ON },
            ActuatorCall::SetLevel { actuator: Actuator::Loud, level: 0 },
        ]
    );

    assert_eq!(sink.messages.len(), 4);
    assert!(sink.messages[0].contains("Testing buzzers"));
    assert!(sink.messages[1].contains("Small buzzer test"));
    assert!(sink.messages[2].contains("Large buzzer test"));
    assert!(sink.messages[3].contains("Both buzzers working"));
    assert_eq!(ctrl.state(), AlarmState::Idle);
    assert!(!ctrl.is_test_running());
}

#[test]
fn self_test_reports_failed_check() {
    let (mut ctrl, mut hw, mut sink) = ready();
    hw.check_result.loud = HardwareHealth::Failed;
    assert!(ctrl.test_alarm(&mut hw, &mut sink));
    assert!(sink.last().is_some_and(|m| m.contains("circuit check failed")));
    assert_eq!(hw.health.loud, HardwareHealth::Failed);
}

#[test]
fn passing_self_test_clears_last_fault() {
    let (mut ctrl, mut hw, mut sink) = started();
    hw.set_health(HardwareHealth::Failed, HardwareHealth::Ok);
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 4_000);
    // first evaluation ran in Triggered; quiet fault caught at the next one
    run(&mut ctrl, &mut hw, &mut sink, T0 + 4_100, T0 + 10_000);
    assert_eq!(ctrl.last_hardware_error(), Some(HardwareFault::QuietActuator));

    assert!(ctrl.test_alarm(&mut hw, &mut sink));
    assert_eq!(ctrl.last_hardware_error(), None);
}

#[test]
fn self_test_refused_while_active() {
    let (mut ctrl, mut hw, mut sink) = started();
    hw.clear();
    assert!(!ctrl.test_alarm(&mut hw, &mut sink));
    assert!(hw.calls.is_empty());
    assert_eq!(ctrl.state(), AlarmState::Triggered);
}

// ── Queries ───────────────────────────────────────────────────

#[test]
fn description_counts_down() {
    let (mut ctrl, mut hw, mut sink) = started();
    assert_eq!(ctrl.state_description(T0 + 1).as_str(), "Triggered (starting in 3s)");
    assert_eq!(ctrl.state_description(T0 + 1_000).as_str(), "Triggered (starting in 2s)");
    assert_eq!(ctrl.state_description(T0 + 1_500).as_str(), "Triggered (starting in 2s)");
    run(&mut ctrl, &mut hw, &mut sink, T0, T0 + 3_000);
    assert_eq!(ctrl.time_remaining_in_stage_secs(T0 + 6_000), 27);
    assert_eq!(ctrl.state_description(T0 + 6_000).as_str(), "WARNING (27s remaining)");
    assert_eq!(ctrl.time_remaining_in_stage_secs(T0 + 6_500), 27);
}

#[test]
fn reset_forgets_statistics() {
    let (mut ctrl, mut hw, mut sink) = started();
    ctrl.stop(StopReason::RemoteCommand, &mut hw, &mut sink, T0 + 2_000);
    assert_ne!(ctrl.statistics().stop_reason, StopReason::None);
    ctrl.reset(&mut hw);
    assert_eq!(ctrl.statistics().stop_reason, StopReason::None);
    assert_eq!(ctrl.state(), AlarmState::Idle);
}
