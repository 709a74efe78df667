//! System configuration parameters
//!
//! All tunable timing and behaviour parameters for the WakeAssist alarm.
//! Defaults match the shipped hardware revision; tests shorten or toggle
//! individual fields.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Duty level that drives a buzzer fully on (8-bit PWM resolution).
pub const BUZZER_ON: u8 = 255;
/// Duty level that silences a buzzer.
pub const BUZZER_OFF: u8 = 0;

/// Self-test script pauses (milliseconds). Before the first notice and
/// after the last burst.
pub const TEST_SETTLE_MS: u32 = 1_000;
/// Lead time between a "buzzer next" notice and its burst.
pub const TEST_ANNOUNCE_MS: u32 = 3_000;
/// Quiet gap between the two bursts.
pub const TEST_GAP_MS: u32 = 2_000;

/// Indicator on/off steps played before a factory-reset reboot.
pub const RESET_BLINK_STEPS: u32 = 6;

/// Core alarm configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    // --- Escalation ---
    /// Pause between `start()` and the first audible stage (milliseconds)
    pub trigger_delay_ms: u32,
    /// Warning stage length: quiet buzzer pulsing (milliseconds)
    pub warning_duration_ms: u32,
    /// Alert stage length: quiet buzzer continuous (milliseconds)
    pub alert_duration_ms: u32,
    /// Hard ceiling on total active time, regardless of stage (milliseconds)
    pub safety_timeout_ms: u32,

    // --- Health ---
    /// Minimum spacing between health evaluations while active (milliseconds)
    pub health_check_interval_ms: u32,
    /// Settle time between driving a circuit high and reading it back (microseconds)
    pub circuit_settle_us: u32,
    /// Evaluate buzzer health while an alarm runs
    pub hardware_checks_enabled: bool,

    // --- Buzzers ---
    /// Duty level used for "full output" (0-255)
    pub buzzer_on_level: u8,
    /// Warning pulse on-phase (milliseconds)
    pub pulse_on_ms: u32,
    /// Warning pulse off-phase (milliseconds)
    pub pulse_off_ms: u32,
    /// Self-test quiet buzzer burst (milliseconds)
    pub test_quiet_ms: u32,
    /// Self-test loud buzzer burst (milliseconds)
    pub test_loud_ms: u32,

    // --- Indicators ---
    pub blink_slow_ms: u32,
    pub blink_medium_ms: u32,
    pub blink_fast_ms: u32,

    // --- Inputs ---
    /// Raw reading must hold this long before it is accepted (milliseconds)
    pub debounce_ms: u32,
    /// RESET button hold time that requests a factory reset (milliseconds)
    pub reset_hold_ms: u32,

    // --- Collaborators ---
    /// Forward state-change notifications to the sink
    pub notifications_enabled: bool,
    /// Minimum spacing between remote wake commands (milliseconds)
    pub wake_cooldown_ms: u32,
    /// Status report cadence for the serial log (milliseconds)
    pub status_report_interval_ms: u32,
    /// Outer loop period (milliseconds)
    pub loop_interval_ms: u32,
    /// Task watchdog timeout. Must outlast the longest blocking call the
    /// loop makes, which is the self-test script (milliseconds)
    pub watchdog_timeout_ms: u32,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            // Escalation
            trigger_delay_ms: 3_000,
            warning_duration_ms: 30_000,
            alert_duration_ms: 30_000,
            safety_timeout_ms: 300_000, // 5 min

            // Health
            health_check_interval_ms: 10_000,
            circuit_settle_us: 10,
            hardware_checks_enabled: true,

            // Buzzers
            buzzer_on_level: BUZZER_ON,
            pulse_on_ms: 500,
            pulse_off_ms: 500,
            test_quiet_ms: 1_000,
            test_loud_ms: 500, // shorter, the large buzzer is loud

            // Indicators
            blink_slow_ms: 1_000,
            blink_medium_ms: 500,
            blink_fast_ms: 200,

            // Inputs
            debounce_ms: 50,
            reset_hold_ms: 10_000,

            // Collaborators
            notifications_enabled: true,
            wake_cooldown_ms: 300_000,
            status_report_interval_ms: 60_000,
            loop_interval_ms: 10,
            watchdog_timeout_ms: 60_000,
        }
    }
}

impl AlarmConfig {
    /// Wall time `test_alarm` blocks the loop for.
    pub fn self_test_blocking_ms(&self) -> u32 {
        2 * TEST_SETTLE_MS
            + 2 * TEST_ANNOUNCE_MS
            + TEST_GAP_MS
            + self.test_quiet_ms
            + self.test_loud_ms
    }

    /// Wall time the factory-reset indicator blink blocks the loop for.
    pub fn reset_blink_blocking_ms(&self) -> u32 {
        RESET_BLINK_STEPS * self.blink_medium_ms
    }

    /// Reject combinations that would break the escalation timeline.
    pub fn validate(&self) -> Result<()> {
        if self.trigger_delay_ms == 0 {
            return Err(Error::Config("trigger delay must be non-zero"));
        }
        if self.warning_duration_ms == 0 || self.alert_duration_ms == 0 {
            return Err(Error::Config("stage durations must be non-zero"));
        }
        let escalation = self
            .trigger_delay_ms
            .saturating_add(self.warning_duration_ms)
            .saturating_add(self.alert_duration_ms);
        if self.safety_timeout_ms <= escalation {
            return Err(Error::Config("safety timeout must exceed the escalation sequence"));
        }
        if self.pulse_on_ms == 0 || self.pulse_off_ms == 0 {
            return Err(Error::Config("pulse phases must be non-zero"));
        }
        if self.buzzer_on_level == 0 {
            return Err(Error::Config("buzzer on level must be non-zero"));
        }
        if self.blink_fast_ms == 0
            || self.blink_fast_ms >= self.blink_medium_ms
            || self.blink_medium_ms >= self.blink_slow_ms
        {
            return Err(Error::Config("blink periods must satisfy fast < medium < slow"));
        }
        if self.debounce_ms >= self.reset_hold_ms {
            return Err(Error::Config("reset hold must be longer than debounce"));
        }
        if self.health_check_interval_ms == 0 {
            return Err(Error::Config("health check interval must be non-zero"));
        }
        let longest_block = self
            .self_test_blocking_ms()
            .max(self.reset_blink_blocking_ms())
            .saturating_add(self.loop_interval_ms);
        if self.watchdog_timeout_ms <= longest_block {
            return Err(Error::Config("watchdog timeout must outlast the self-test"));
        }
        Ok(())
    }
}
