//! WakeAssist firmware main entry point.
//!
//! Hexagonal architecture with a fixed-period polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter            ChannelNotificationSink            │
//! │  (Actuator+Health+Input)    (NotificationSink)                 │
//! │  MonotonicClock             LogNotificationSink                │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AlarmService (pure logic)                 │    │
//! │  │  AlarmController · WakeGate                            │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  COMMAND_CHANNEL ──▶ loop ──▶ NOTIFY_CHANNEL · Watchdog        │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::Result;
use log::{error, info, warn};

use wakeassist::adapters::log_sink::LogNotificationSink;
use wakeassist::adapters::notify_sink::ChannelNotificationSink;
use wakeassist::adapters::time::MonotonicClock;
use wakeassist::app::channels::{COMMAND_CHANNEL, NOTIFY_CHANNEL};
use wakeassist::app::ports::{HealthPort, NotificationSink};
use wakeassist::app::service::{AlarmService, ServiceAction};
use wakeassist::config::AlarmConfig;
use wakeassist::drivers::hw_init;
use wakeassist::drivers::watchdog::Watchdog;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WakeAssist v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let clock = MonotonicClock::new();
    let config = AlarmConfig::default();
    config.validate()?;

    // ── 2. Peripherals ────────────────────────────────────────
    let mut hw = match hw_init::build_board(&config) {
        Ok(board) => board,
        Err(e) => {
            // The watchdog is not armed yet, so restart explicitly.
            error!("HAL init failed: {}, restarting", e);
            std::thread::sleep(Duration::from_secs(5));
            restart();
        }
    };

    // ── 3. Boot circuit check ─────────────────────────────────
    let healthy = hw.check_circuits();
    let report = hw.health();
    info!(
        "Circuit check: quiet={} loud={}",
        report.quiet.label(),
        report.loud.label()
    );
    if !healthy {
        warn!("Circuit check failed; alarms will stop on the first health evaluation");
    }

    // ── 4. Service ────────────────────────────────────────────
    // `begin` also shows the circuit check on the status indicator.
    let boot_ms = clock.now_ms();
    let mut service = AlarmService::new(config.clone(), boot_ms);
    service.begin(&mut hw, boot_ms)?;

    let mut sink = ChannelNotificationSink::global();
    let mut console = LogNotificationSink::new();
    let watchdog = Watchdog::arm(&config);
    let mut last_report_ms = boot_ms;

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.now_ms();

        while let Ok(cmd) = COMMAND_CHANNEL.try_receive() {
            service.handle_command(cmd, &mut hw, &mut sink, now_ms);
        }

        if let Some(ServiceAction::FactoryReset) = service.tick(&mut hw, &mut sink, now_ms) {
            // Blocks for the indicator flash, well inside the watchdog timeout.
            service.factory_reset(&mut hw);
            flush_notifications(&mut console);
            info!("Factory reset complete, restarting");
            restart();
        }

        // No messaging client yet: surface queued notifications on the console.
        flush_notifications(&mut console);

        if now_ms.wrapping_sub(last_report_ms) >= config.status_report_interval_ms {
            last_report_ms = now_ms;
            let status = service.status_report(&hw, now_ms);
            match status.to_json() {
                Ok(json) => info!("status: {}", json),
                Err(e) => warn!("status: serialisation failed: {}", e),
            }
        }

        watchdog.feed();
        std::thread::sleep(Duration::from_millis(config.loop_interval_ms as u64));
    }
}

fn restart() -> ! {
    unsafe { esp_idf_svc::sys::esp_restart() }
}

fn flush_notifications(console: &mut LogNotificationSink) {
    while let Ok(text) = NOTIFY_CHANNEL.try_receive() {
        console.notify(&text);
    }
}
