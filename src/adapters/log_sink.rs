//! Log-based notification sink adapter.
//!
//! Implements [`NotificationSink`] by writing every notification to the
//! ESP-IDF logger (UART / USB-CDC in production). Used when no messaging
//! client is connected, and in simulation.

use log::info;

use crate::app::ports::NotificationSink;

/// Adapter that logs every notification to the serial console.
#[derive(Default)]
pub struct LogNotificationSink;

impl LogNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for LogNotificationSink {
    fn notify(&mut self, text: &str) {
        for line in text.lines() {
            info!("NOTIFY | {}", line);
        }
    }
}
