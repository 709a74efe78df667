//! Task watchdog for the control loop.
//!
//! The loop feeds the watchdog once per iteration. Its longest legitimate
//! stall is a blocking call into the self-test script or the factory-reset
//! blink, so the timeout comes from [`AlarmConfig::watchdog_timeout_ms`],
//! which `validate` keeps above both. A panic on expiry restarts the
//! device with every buzzer off.

use log::{info, warn};

use crate::config::AlarmConfig;

pub struct Watchdog {
    armed: bool,
}

impl Watchdog {
    /// Subscribe the calling task. A failure leaves the loop unguarded
    /// rather than stopping boot.
    pub fn arm(config: &AlarmConfig) -> Self {
        let timeout_ms = config.watchdog_timeout_ms;
        let headroom_ms = timeout_ms.saturating_sub(config.self_test_blocking_ms());
        match subscribe(timeout_ms) {
            Ok(()) => {
                info!(
                    "watchdog: armed, {} ms timeout ({} ms over the self-test)",
                    timeout_ms, headroom_ms
                );
                Self { armed: true }
            }
            Err(code) => {
                warn!("watchdog: not armed ({}), loop stalls will go unnoticed", code);
                Self { armed: false }
            }
        }
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn feed(&self) {
        if self.armed {
            reset();
        }
    }
}

#[cfg(target_os = "espidf")]
fn subscribe(timeout_ms: u32) -> Result<(), i32> {
    use esp_idf_svc::sys::{esp_task_wdt_add, esp_task_wdt_config_t, esp_task_wdt_reconfigure, ESP_OK};

    let cfg = esp_task_wdt_config_t {
        timeout_ms,
        idle_core_mask: 0,
        trigger_panic: true,
    };
    // SAFETY: plain FFI calls; a null handle subscribes the current task.
    unsafe {
        // The bootloader may have configured the TWDT already; only the
        // subscription below decides whether the loop is guarded.
        let ret = esp_task_wdt_reconfigure(&cfg);
        if ret != ESP_OK {
            warn!("watchdog: reconfigure returned {}", ret);
        }
        match esp_task_wdt_add(core::ptr::null_mut()) {
            ESP_OK => Ok(()),
            err => Err(err),
        }
    }
}

#[cfg(target_os = "espidf")]
fn reset() {
    // SAFETY: only called after a successful subscribe on this task.
    unsafe {
        esp_idf_svc::sys::esp_task_wdt_reset();
    }
}

// Host builds have no TWDT; arming always succeeds and feeding is a no-op.
#[cfg(not(target_os = "espidf"))]
fn subscribe(_timeout_ms: u32) -> Result<(), i32> {
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn reset() {}
