//! Property tests for the timing arithmetic and decode paths.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets.  On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use hydrobed::clock::Ticks;
use hydrobed::drivers::actuator::ActuatorController;
use hydrobed::sensors::aht21::{decode_humidity, decode_temperature};
use proptest::prelude::*;

proptest! {
    /// For any epoch and any offset within the half range, the deadline
    /// `t + d` reads as elapsed exactly when simulated time has advanced
    /// at least `d` — including when the counter wraps in between.
    #[test]
    fn deadline_elapses_exactly_at_offset(
        t in any::<u32>(),
        d in 0u32..(1 << 30),
        advance in 0u32..(1 << 30),
    ) {
        let start = Ticks::from_millis(t);
        let deadline = start.wrapping_add_ms(d);
        let later = start.wrapping_add_ms(advance);

        prop_assert_eq!(later.is_at_or_after(deadline), advance >= d);
    }

    /// The signed difference inverts cleanly for half-range pairs.
    #[test]
    fn millis_since_antisymmetric(
        t in any::<u32>(),
        d in 0u32..(1 << 30),
    ) {
        let a = Ticks::from_millis(t);
        let b = a.wrapping_add_ms(d);
        prop_assert_eq!(b.millis_since(a), d as i32);
        prop_assert_eq!(a.millis_since(b), -(d as i32));
    }

    /// An armed runtime expires exactly at its duration, never before,
    /// for any epoch — the controller inherits the wrap-safety of Ticks.
    #[test]
    fn runtime_expiry_tracks_duration(
        epoch in any::<u32>(),
        run_ms in 1u32..86_400_000, // up to a day, well inside half range
    ) {
        let now = Ticks::from_millis(epoch);
        let mut pump = ActuatorController::new("pump", 4);
        pump.turn_on(now);
        pump.set_runtime(now, run_ms);

        prop_assert!(!pump.runtime_expired(now.wrapping_add_ms(run_ms - 1)));
        prop_assert!(pump.runtime_expired(now.wrapping_add_ms(run_ms)));
    }

    /// Decoded values stay inside the physical ranges for every possible
    /// payload — garbage on the wire can produce a wrong number but never
    /// an out-of-range one.
    #[test]
    fn decode_is_always_in_range(payload in any::<[u8; 6]>()) {
        let h = decode_humidity(&payload);
        prop_assert!((0.0..=100.0).contains(&h));
        let t = decode_temperature(&payload);
        prop_assert!((-50.0..=150.0).contains(&t));
    }
}
