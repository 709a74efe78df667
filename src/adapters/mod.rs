//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements        | Connects to                  |
//! |---------------|-------------------|------------------------------|
//! | `hardware`    | ActuatorPort      | LEDC PWM buzzers, LED GPIOs  |
//! |               | HealthPort        | Loop-back sense GPIOs        |
//! |               | InputPort         | Button GPIOs                 |
//! | `log_sink`    | NotificationSink  | Serial log output            |
//! | `notify_sink` | NotificationSink  | Outbound embassy channel     |
//! | `time`        | (clock)           | ESP32 high-resolution timer  |

pub mod hardware;
pub mod log_sink;
pub mod notify_sink;
pub mod time;
