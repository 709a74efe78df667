//! One-shot hardware peripheral initialization.
//!
//! Builds the LEDC buzzer channels, indicator outputs, button inputs and
//! loop-back probes with `esp-idf-hal`, and assembles them into the
//! [`HardwareAdapter`](crate::adapters::hardware::HardwareAdapter).
//! Called once from `main()` before the control loop starts.
//!
//! GPIO numbers are documented in [`crate::pins`]; the typed peripheral
//! fields below must match them.

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    PeripheralsTaken,
    LedcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::PeripheralsTaken     => write!(f, "peripherals already taken"),
            Self::LedcInitFailed(rc)   => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub use board::{build_board, Board};

#[cfg(target_os = "espidf")]
mod board {
    use esp_idf_hal::delay::Delay;
    use esp_idf_hal::gpio::{AnyIOPin, AnyInputPin, AnyOutputPin, Input, InputOutput, Output, PinDriver, Pull};
    use esp_idf_hal::ledc::config::TimerConfig;
    use esp_idf_hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_hal::peripherals::Peripherals;
    use esp_idf_hal::units::Hertz;
    use log::info;

    use super::HwInitError;
    use crate::adapters::hardware::HardwareAdapter;
    use crate::config::AlarmConfig;
    use crate::drivers::button::ButtonBank;
    use crate::drivers::indicator::IndicatorBank;
    use crate::drivers::output::{OutputDriver, PulsePattern};
    use crate::health::HealthMonitor;
    use crate::pins;

    pub type Board = HardwareAdapter<
        LedcDriver<'static>,
        LedcDriver<'static>,
        PinDriver<'static, AnyOutputPin, Output>,
        PinDriver<'static, AnyInputPin, Input>,
        PinDriver<'static, AnyIOPin, InputOutput>,
        Delay,
    >;

    fn gpio_err(e: esp_idf_hal::sys::EspError) -> HwInitError {
        HwInitError::GpioConfigFailed(e.code())
    }

    fn ledc_err(e: esp_idf_hal::sys::EspError) -> HwInitError {
        HwInitError::LedcInitFailed(e.code())
    }

    fn button(pin: AnyInputPin) -> Result<PinDriver<'static, AnyInputPin, Input>, HwInitError> {
        let mut drv = PinDriver::input(pin).map_err(gpio_err)?;
        drv.set_pull(Pull::Up).map_err(gpio_err)?;
        Ok(drv)
    }

    pub fn build_board(cfg: &AlarmConfig) -> Result<Board, HwInitError> {
        let p = Peripherals::take().map_err(|_| HwInitError::PeripheralsTaken)?;

        // ── Buzzers: LEDC timer 0, channels 0/1 ──────────────
        let timer = LedcTimerDriver::new(
            p.ledc.timer0,
            &TimerConfig::default()
                .frequency(Hertz(pins::BUZZER_PWM_FREQ_HZ))
                .resolution(Resolution::Bits8),
        )
        .map_err(ledc_err)?;
        // Both channels borrow the timer for the life of the firmware.
        let timer: &'static LedcTimerDriver<'static, _> = Box::leak(Box::new(timer));

        let small = LedcDriver::new(p.ledc.channel0, timer, p.pins.gpio25).map_err(ledc_err)?;
        let large = LedcDriver::new(p.ledc.channel1, timer, p.pins.gpio26).map_err(ledc_err)?;
        info!(
            "hw_init: buzzers on GPIO{} / GPIO{} ({} Hz, {}-bit)",
            pins::SMALL_BUZZER_GPIO,
            pins::LARGE_BUZZER_GPIO,
            pins::BUZZER_PWM_FREQ_HZ,
            pins::PWM_RESOLUTION_BITS
        );

        // ── Indicators ────────────────────────────────────────
        let led = |pin: AnyOutputPin| PinDriver::output(pin).map_err(gpio_err);
        let indicators = IndicatorBank::new(
            led(p.pins.gpio16.into())?,
            led(p.pins.gpio17.into())?,
            led(p.pins.gpio18.into())?,
        );
        info!(
            "hw_init: LEDs wifi=GPIO{} alarm=GPIO{} status=GPIO{}",
            pins::LED_WIFI_GPIO,
            pins::LED_ALARM_GPIO,
            pins::LED_STATUS_GPIO
        );

        // ── Buttons (active-low, pull-up) ─────────────────────
        let buttons = ButtonBank::new(
            button(p.pins.gpio21.into())?,
            button(p.pins.gpio22.into())?,
            button(p.pins.gpio23.into())?,
            cfg.debounce_ms,
            cfg.reset_hold_ms,
        );
        info!(
            "hw_init: buttons test=GPIO{} silence=GPIO{} reset=GPIO{}",
            pins::BUTTON_TEST_GPIO,
            pins::BUTTON_SILENCE_GPIO,
            pins::BUTTON_RESET_GPIO
        );

        // ── Loop-back probes ──────────────────────────────────
        let probe = |pin: AnyIOPin| PinDriver::input_output(pin).map_err(gpio_err);
        let health = HealthMonitor::new(
            probe(p.pins.gpio32.into())?,
            probe(p.pins.gpio33.into())?,
            cfg.circuit_settle_us,
        );
        info!(
            "hw_init: sense lines GPIO{} / GPIO{}",
            pins::SMALL_BUZZER_SENSE_GPIO,
            pins::LARGE_BUZZER_SENSE_GPIO
        );

        let output = OutputDriver::new(small, large, PulsePattern::from_config(cfg));
        info!("hw_init: all peripherals configured");
        Ok(HardwareAdapter::new(output, indicators, buttons, health, Delay::new_default()))
    }
}
