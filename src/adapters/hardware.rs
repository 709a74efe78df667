//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the output driver, indicator LEDs, buttons, loop-back probes and
//! a blocking delay, exposing them through [`ActuatorPort`],
//! [`HealthPort`] and [`InputPort`]. This is the only module in the
//! system that touches actual hardware. It is generic over the
//! embedded-hal traits, so host tests drive it with mock pins.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{ActuatorPort, HealthPort, InputPort};
use crate::drivers::button::{ButtonBank, ButtonEvents, ButtonSnapshot};
use crate::drivers::indicator::{Indicator, IndicatorBank};
use crate::drivers::output::{Actuator, OutputDriver};
use crate::health::{HealthMonitor, HealthReport};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<Q, L, Led, Btn, Probe, D> {
    output: OutputDriver<Q, L>,
    indicators: IndicatorBank<Led>,
    buttons: ButtonBank<Btn>,
    health: HealthMonitor<Probe>,
    delay: D,
}

impl<Q, L, Led, Btn, Probe, D> HardwareAdapter<Q, L, Led, Btn, Probe, D>
where
    Q: SetDutyCycle,
    L: SetDutyCycle,
    Led: OutputPin,
    Btn: InputPin,
    Probe: OutputPin + InputPin,
    D: DelayNs,
{
    pub fn new(
        output: OutputDriver<Q, L>,
        indicators: IndicatorBank<Led>,
        buttons: ButtonBank<Btn>,
        health: HealthMonitor<Probe>,
        delay: D,
    ) -> Self {
        Self {
            output,
            indicators,
            buttons,
            health,
            delay,
        }
    }

    pub fn output(&self) -> &OutputDriver<Q, L> {
        &self.output
    }

    pub fn health_monitor_mut(&mut self) -> &mut HealthMonitor<Probe> {
        &mut self.health
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<Q, L, Led, Btn, Probe, D> ActuatorPort for HardwareAdapter<Q, L, Led, Btn, Probe, D>
where
    Q: SetDutyCycle,
    L: SetDutyCycle,
    Led: OutputPin,
    Btn: InputPin,
    Probe: OutputPin + InputPin,
    D: DelayNs,
{
    fn set_level(&mut self, actuator: Actuator, level: u8) {
        // The buzzer driver logs the failure; the health check owns detection.
        let _ = self.output.set_level(actuator, level);
    }

    fn stop_all(&mut self) {
        let _ = self.output.stop_all();
    }

    fn pulse_quiet(&mut self, now_ms: u32) -> bool {
        self.output.pulse_quiet(now_ms)
    }

    fn set_indicator(&mut self, which: Indicator, on: bool) {
        if let Err(e) = self.indicators.get_mut(which).set(on) {
            warn!("indicator {:?}: {}", which, e);
        }
    }

    fn blink_indicator(&mut self, which: Indicator, period_ms: u32, now_ms: u32) {
        self.indicators.get_mut(which).blink(period_ms, now_ms);
    }

    fn indicators_off(&mut self) {
        self.indicators.all_off();
    }

    fn update_outputs(&mut self, now_ms: u32) {
        self.indicators.update(now_ms);
    }

    fn pause_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

// ── HealthPort implementation ─────────────────────────────────

impl<Q, L, Led, Btn, Probe, D> HealthPort for HardwareAdapter<Q, L, Led, Btn, Probe, D>
where
    Q: SetDutyCycle,
    L: SetDutyCycle,
    Led: OutputPin,
    Btn: InputPin,
    Probe: OutputPin + InputPin,
    D: DelayNs,
{
    fn health(&self) -> HealthReport {
        self.health.report()
    }

    fn check_circuits(&mut self) -> bool {
        self.health.check_all(&mut self.delay)
    }
}

// ── InputPort implementation ──────────────────────────────────

impl<Q, L, Led, Btn, Probe, D> InputPort for HardwareAdapter<Q, L, Led, Btn, Probe, D>
where
    Q: SetDutyCycle,
    L: SetDutyCycle,
    Led: OutputPin,
    Btn: InputPin,
    Probe: OutputPin + InputPin,
    D: DelayNs,
{
    fn update_inputs(&mut self, now_ms: u32) -> ButtonEvents {
        self.buttons.poll(now_ms)
    }

    fn buttons(&self) -> ButtonSnapshot {
        self.buttons.snapshot()
    }
}
