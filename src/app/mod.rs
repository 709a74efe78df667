//! Application core: pure domain logic, zero I/O.
//!
//! Port traits, notification rendering, remote commands, status
//! reporting and the [`service::AlarmService`] that ties them to the
//! escalation state machine. All interaction with hardware happens
//! through the traits in [`ports`].

pub mod channels;
pub mod commands;
pub mod notify;
pub mod ports;
pub mod service;
pub mod status;
