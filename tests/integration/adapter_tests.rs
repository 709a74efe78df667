//! HardwareAdapter wired to in-memory embedded-hal peripherals.
//!
//! Exercises the real drivers (buzzers, pulse, indicators, debounced
//! buttons, loop-back probes) behind the port traits, then runs the
//! controller on top of them.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use embedded_hal::pwm::{self, SetDutyCycle};

use super::mock_hw::RecordingSink;

use wakeassist::adapters::hardware::HardwareAdapter;
use wakeassist::app::ports::{ActuatorPort, HealthPort, InputPort};
use wakeassist::app::service::AlarmService;
use wakeassist::config::{AlarmConfig, BUZZER_ON};
use wakeassist::drivers::button::{ButtonBank, ButtonEvent};
use wakeassist::drivers::indicator::{Indicator, IndicatorBank};
use wakeassist::drivers::output::{Actuator, OutputDriver, PulsePattern};
use wakeassist::fsm::{AlarmController, AlarmState};
use wakeassist::health::{HardwareHealth, HealthMonitor};

// ── Test peripherals ──────────────────────────────────────────

#[derive(Clone, Default)]
struct Line {
    level: Rc<Cell<bool>>,
    open: Rc<Cell<bool>>,
}

impl Line {
    fn high() -> Self {
        let l = Self::default();
        l.level.set(true);
        l
    }

    fn is_high_now(&self) -> bool {
        self.level.get()
    }

    fn set(&self, high: bool) {
        self.level.set(high);
    }

    /// Break the circuit: driving high no longer reads back.
    fn open_circuit(&self) {
        self.open.set(true);
    }
}

impl digital::ErrorType for Line {
    type Error = Infallible;
}

impl OutputPin for Line {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.level.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.level.set(!self.open.get());
        Ok(())
    }
}

impl InputPin for Line {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.level.get())
    }
}

#[derive(Clone, Default)]
struct Pwm {
    duty: Rc<Cell<u16>>,
}

impl pwm::ErrorType for Pwm {
    type Error = Infallible;
}

impl SetDutyCycle for Pwm {
    fn max_duty_cycle(&self) -> u16 {
        255
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duty.set(duty);
        Ok(())
    }
}

#[derive(Default)]
struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

struct Rig {
    hw: HardwareAdapter<Pwm, Pwm, Line, Line, Line, NoDelay>,
    quiet: Pwm,
    loud: Pwm,
    wifi_led: Line,
    alarm_led: Line,
    status_led: Line,
    test_btn: Line,
    reset_btn: Line,
    quiet_probe: Line,
}

fn rig(cfg: &AlarmConfig) -> Rig {
    let quiet = Pwm::default();
    let loud = Pwm::default();
    let wifi_led = Line::default();
    let alarm_led = Line::default();
    let status_led = Line::default();
    // active-low buttons idle high
    let test_btn = Line::high();
    let silence_btn = Line::high();
    let reset_btn = Line::high();
    let quiet_probe = Line::default();
    let loud_probe = Line::default();

    let hw = HardwareAdapter::new(
        OutputDriver::new(quiet.clone(), loud.clone(), PulsePattern::from_config(cfg)),
        IndicatorBank::new(wifi_led.clone(), alarm_led.clone(), status_led.clone()),
        ButtonBank::new(
            test_btn.clone(),
            silence_btn,
            reset_btn.clone(),
            cfg.debounce_ms,
            cfg.reset_hold_ms,
        ),
        HealthMonitor::new(quiet_probe.clone(), loud_probe, cfg.circuit_settle_us),
        NoDelay,
    );
    Rig {
        hw,
        quiet,
        loud,
        wifi_led,
        alarm_led,
        status_led,
        test_btn,
        reset_btn,
        quiet_probe,
    }
}

// ── Health ────────────────────────────────────────────────────

#[test]
fn circuit_check_reads_back_probes() {
    let mut r = rig(&AlarmConfig::default());
    assert!(!r.hw.health().is_initialised());
    assert!(r.hw.check_circuits());
    assert_eq!(r.hw.health().quiet, HardwareHealth::Ok);
    assert_eq!(r.hw.health().loud, HardwareHealth::Ok);
    assert!(!r.quiet_probe.is_high_now(), "probe restored low");
}

#[test]
fn open_circuit_fails_check() {
    let mut r = rig(&AlarmConfig::default());
    r.quiet_probe.open_circuit();
    assert!(!r.hw.check_circuits());
    assert_eq!(r.hw.health().quiet, HardwareHealth::Failed);
    assert_eq!(r.hw.health().loud, HardwareHealth::Ok);
}

#[test]
fn disabled_circuit_skipped() {
    let mut r = rig(&AlarmConfig::default());
    r.quiet_probe.open_circuit();
    r.hw.health_monitor_mut().disable(Actuator::Quiet);
    assert!(r.hw.check_circuits());
    assert_eq!(r.hw.health().quiet, HardwareHealth::Disabled);
}

// ── Outputs ───────────────────────────────────────────────────

#[test]
fn levels_reach_pwm_channels() {
    let mut r = rig(&AlarmConfig::default());
    r.hw.set_level(Actuator::Loud, 128);
    assert_eq!(r.loud.duty.get(), 128);
    r.hw.stop_all();
    assert_eq!(r.loud.duty.get(), 0);
    assert_eq!(r.quiet.duty.get(), 0);
}

#[test]
fn pulse_toggles_quiet_buzzer() {
    let mut r = rig(&AlarmConfig::default());
    assert!(!r.hw.pulse_quiet(0));
    assert_eq!(r.quiet.duty.get(), u16::from(BUZZER_ON));
    assert!(!r.hw.pulse_quiet(500));
    assert_eq!(r.quiet.duty.get(), 0);
    assert!(!r.hw.pulse_quiet(1_000));
    assert_eq!(r.quiet.duty.get(), u16::from(BUZZER_ON));
    r.hw.stop_all();
    assert!(!r.hw.output().is_pulsing());
}

#[test]
fn indicator_blinks_on_update() {
    let mut r = rig(&AlarmConfig::default());
    r.hw.blink_indicator(Indicator::Alarm, 200, 0);
    r.hw.update_outputs(199);
    assert!(!r.alarm_led.is_high_now());
    r.hw.update_outputs(200);
    assert!(r.alarm_led.is_high_now());
    r.hw.set_indicator(Indicator::Alarm, false);
    r.hw.update_outputs(400);
    assert!(!r.alarm_led.is_high_now());
}

#[test]
fn boot_status_follows_circuit_check() {
    let cfg = AlarmConfig::default();
    let mut r = rig(&cfg);
    assert!(r.hw.check_circuits());
    let mut svc = AlarmService::new(cfg.clone(), 0);
    svc.begin(&mut r.hw, 0).expect("begin");
    assert!(r.status_led.is_high_now());

    let mut r = rig(&cfg);
    r.quiet_probe.open_circuit();
    assert!(!r.hw.check_circuits());
    let mut svc = AlarmService::new(cfg.clone(), 0);
    svc.begin(&mut r.hw, 0).expect("begin");
    assert!(!r.status_led.is_high_now());
    r.hw.update_outputs(cfg.blink_fast_ms);
    assert!(r.status_led.is_high_now());
    r.hw.update_outputs(2 * cfg.blink_fast_ms);
    assert!(!r.status_led.is_high_now());
}

#[test]
fn factory_reset_leaves_indicators_dark() {
    let cfg = AlarmConfig::default();
    let mut r = rig(&cfg);
    r.hw.check_circuits();
    let mut svc = AlarmService::new(cfg, 0);
    svc.begin(&mut r.hw, 0).expect("begin");
    r.hw.blink_indicator(Indicator::Alarm, 200, 0);
    r.hw.update_outputs(200);
    assert!(r.alarm_led.is_high_now());

    svc.factory_reset(&mut r.hw);
    for led in [&r.wifi_led, &r.alarm_led, &r.status_led] {
        assert!(!led.is_high_now());
    }
    // the flash cancelled the blink
    r.hw.update_outputs(10_000);
    assert!(!r.alarm_led.is_high_now());
}

// ── Inputs ────────────────────────────────────────────────────

#[test]
fn button_press_debounced() {
    let mut r = rig(&AlarmConfig::default());
    assert!(r.hw.update_inputs(0).is_empty());

    r.test_btn.set(false);
    assert!(r.hw.update_inputs(100).is_empty());
    assert!(r.hw.update_inputs(149).is_empty());
    let events = r.hw.update_inputs(150);
    assert_eq!(events.as_slice(), &[ButtonEvent::TestPressed]);
    assert!(r.hw.buttons().test);
}

#[test]
fn reset_hold_reported_once() {
    let cfg = AlarmConfig::default();
    let mut r = rig(&cfg);
    r.reset_btn.set(false);

    let mut held = 0;
    let mut now = 0;
    while now <= 15_000 {
        held += r
            .hw
            .update_inputs(now)
            .iter()
            .filter(|e| **e == ButtonEvent::ResetHeld)
            .count();
        now += 10;
    }
    assert_eq!(held, 1);
    assert!(r.hw.buttons().reset_held_ms >= cfg.reset_hold_ms);
}

// ── Controller on real drivers ────────────────────────────────

#[test]
fn controller_drives_real_outputs() {
    let cfg = AlarmConfig::default();
    let mut r = rig(&cfg);
    let mut sink = RecordingSink::new();
    let mut ctrl = AlarmController::new(cfg);

    assert!(ctrl.begin(&mut r.hw, 0).is_err());
    assert!(r.hw.check_circuits());
    ctrl.begin(&mut r.hw, 0).expect("begin after check");

    assert!(ctrl.start(&mut r.hw, &mut sink, 0));
    assert!(r.alarm_led.is_high_now());

    let mut now = 0;
    while now <= 40_000 {
        r.hw.update_outputs(now);
        ctrl.update(&mut r.hw, &mut sink, now);
        now += 10;
    }
    assert_eq!(ctrl.state(), AlarmState::Alert);
    assert_eq!(r.quiet.duty.get(), u16::from(BUZZER_ON));
    assert_eq!(r.loud.duty.get(), 0);

    ctrl.stop(wakeassist::fsm::StopReason::PhysicalButton, &mut r.hw, &mut sink, now);
    assert_eq!(r.quiet.duty.get(), 0);
    assert!(!r.alarm_led.is_high_now());
}
