//! Fuzz target: `Debouncer::update`
//!
//! Feeds arbitrary (raw level, time step) samples and checks that every
//! accepted edge is a genuine state change backed by a reading that held
//! for the full settle window.
//!
//! cargo fuzz run fuzz_debouncer

#![no_main]

use libfuzzer_sys::fuzz_target;
use wakeassist::drivers::button::{Debouncer, Edge};

const SETTLE_MS: u32 = 50;

fuzz_target!(|data: &[u8]| {
    let mut d = Debouncer::new(SETTLE_MS);
    let mut now: u32 = 0;
    let mut stable = false;
    let mut last_raw = false;
    let mut raw_since: u32 = 0;

    for &b in data {
        let raw = b & 0x80 != 0;
        now = now.wrapping_add(u32::from(b & 0x7f));
        if raw != last_raw {
            last_raw = raw;
            raw_since = now;
        }

        match d.update(raw, now) {
            Some(edge) => {
                assert_eq!(edge == Edge::Pressed, raw, "edge disagrees with reading");
                assert_ne!(raw, stable, "edge without a state change");
                assert!(now.wrapping_sub(raw_since) >= SETTLE_MS, "accepted before settling");
                stable = raw;
            }
            None => {}
        }
        assert_eq!(d.is_pressed(), stable);
        if !stable {
            assert_eq!(d.held_for_ms(now), 0);
        }
    }
});
