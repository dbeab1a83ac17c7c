//! Monotonic clock adapters.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic),
//!   truncated to the wrapping millisecond counter.
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side runs, plus a manually driven [`ManualClock`] for tests.

use crate::clock::{Clock, Ticks};

/// Hardware clock for the ESP32 platform.
pub struct Esp32Clock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32Clock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for Esp32Clock {
    #[cfg(target_os = "espidf")]
    fn now(&self) -> Ticks {
        // Microseconds since boot; the ms truncation wraps as Ticks expects.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() } as u64;
        Ticks::from_millis((us / 1_000) as u32)
    }

    #[cfg(not(target_os = "espidf"))]
    fn now(&self) -> Ticks {
        Ticks::from_millis(self.start.elapsed().as_millis() as u32)
    }
}

/// Test clock advanced by hand.  Clones share the same underlying counter,
/// so a test can hold one handle while the control loop owns another.
#[cfg(not(target_os = "espidf"))]
#[derive(Clone, Default)]
pub struct ManualClock {
    millis: std::sync::Arc<core::sync::atomic::AtomicU32>,
}

#[cfg(not(target_os = "espidf"))]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_millis(&self, ms: u32) {
        self.millis.store(ms, core::sync::atomic::Ordering::Relaxed);
    }

    pub fn advance_ms(&self, ms: u32) {
        let now = self.millis.load(core::sync::atomic::Ordering::Relaxed);
        self.millis
            .store(now.wrapping_add(ms), core::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
impl Clock for ManualClock {
    fn now(&self) -> Ticks {
        Ticks::from_millis(self.millis.load(core::sync::atomic::Ordering::Relaxed))
    }
}
