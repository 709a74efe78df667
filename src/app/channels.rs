//! Inter-task channels between the messaging collaborator and the control loop.
//!
//! Uses `embassy-sync` bounded MPMC channels. Both sides share these
//! static channels without heap allocation.
//!
//! ```text
//! ┌──────────────┐  AlarmCommand  ┌──────────────┐
//! │  Messaging   │──────────────▶│ Control Loop │
//! │  task        │◀──────────────│ (sync)       │
//! └──────────────┘  NoticeText    └──────────────┘
//! ```
//!
//! The control loop only ever uses the non-blocking `try_send` /
//! `try_receive` halves, so a stalled collaborator can never hold up a
//! tick.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::commands::AlarmCommand;
use super::notify::NoticeText;

pub const COMMAND_DEPTH: usize = 8;
pub const NOTIFY_DEPTH: usize = 8;

/// Inbound commands: messaging task → control loop.
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, AlarmCommand, COMMAND_DEPTH> =
    Channel::new();

/// Outbound notifications: control loop → messaging task.
pub static NOTIFY_CHANNEL: Channel<CriticalSectionRawMutex, NoticeText, NOTIFY_DEPTH> =
    Channel::new();
