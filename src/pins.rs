//! GPIO / peripheral pin assignments for the WakeAssist main board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers. Numbers are GPIO numbers, not package pins.
//! GPIO 6-11 (flash) and 34-39 (input only) are never used for outputs.

// ---------------------------------------------------------------------------
// Buzzers (12 V, switched by logic-level MOSFETs)
// ---------------------------------------------------------------------------

/// Small buzzer gate, Warning/Alert stages. LEDC channel 0.
pub const SMALL_BUZZER_GPIO: i32 = 25;
/// Large buzzer gate, Emergency stage. LEDC channel 1.
pub const LARGE_BUZZER_GPIO: i32 = 26;

/// Loop-back sense line tied to the small buzzer gate.
pub const SMALL_BUZZER_SENSE_GPIO: i32 = 32;
/// Loop-back sense line tied to the large buzzer gate.
pub const LARGE_BUZZER_SENSE_GPIO: i32 = 33;

// ---------------------------------------------------------------------------
// Indicator LEDs
// ---------------------------------------------------------------------------

pub const LED_WIFI_GPIO: i32 = 16;
pub const LED_ALARM_GPIO: i32 = 17;
pub const LED_STATUS_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Buttons (active-low, internal pull-up)
// ---------------------------------------------------------------------------

/// TEST: run the buzzer self-test.
pub const BUTTON_TEST_GPIO: i32 = 21;
/// SILENCE: stop an active alarm.
pub const BUTTON_SILENCE_GPIO: i32 = 22;
/// RESET: hold for a factory reset.
pub const BUTTON_RESET_GPIO: i32 = 23;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits). 8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// LEDC base frequency for the buzzers (1 kHz, active buzzers ignore tone).
pub const BUZZER_PWM_FREQ_HZ: u32 = 1_000;
