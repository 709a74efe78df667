//! Channel-backed notification sink.
//!
//! Queues rendered notifications on an `embassy-sync` channel for the
//! messaging task. Sending never blocks: when the queue is full the
//! message is dropped and counted, which is the sink's documented
//! best-effort contract.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, warn};

use crate::app::channels::{NOTIFY_CHANNEL, NOTIFY_DEPTH};
use crate::app::notify::{NOTICE_CAPACITY, NoticeText};
use crate::app::ports::NotificationSink;

pub struct ChannelNotificationSink<'a, const N: usize> {
    channel: &'a Channel<CriticalSectionRawMutex, NoticeText, N>,
    dropped: u32,
}

impl ChannelNotificationSink<'static, NOTIFY_DEPTH> {
    /// Sink bound to the firmware-wide [`NOTIFY_CHANNEL`].
    pub fn global() -> Self {
        Self::new(&NOTIFY_CHANNEL)
    }
}

impl<'a, const N: usize> ChannelNotificationSink<'a, N> {
    pub fn new(channel: &'a Channel<CriticalSectionRawMutex, NoticeText, N>) -> Self {
        Self { channel, dropped: 0 }
    }

    /// Messages lost to a full queue since construction.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const N: usize> NotificationSink for ChannelNotificationSink<'_, N> {
    fn notify(&mut self, text: &str) {
        match self.channel.try_send(truncate(text)) {
            Ok(()) => debug!("notify: queued ({} bytes)", text.len()),
            Err(_) => {
                self.dropped = self.dropped.wrapping_add(1);
                warn!("notify: queue full, dropped message #{}", self.dropped);
            }
        }
    }
}

/// Copy `text` into a fixed-capacity buffer, cutting at a char boundary.
fn truncate(text: &str) -> NoticeText {
    let mut end = text.len().min(NOTICE_CAPACITY);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = NoticeText::new();
    // `end` never exceeds capacity.
    let _ = out.push_str(&text[..end]);
    out
}
