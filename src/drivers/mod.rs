//! Actuator and input drivers, hardware initialisation, and the watchdog.

pub mod button;
pub mod buzzer;
pub mod hw_init;
pub mod indicator;
pub mod output;
pub mod watchdog;
