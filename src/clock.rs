//! Wraparound-safe millisecond timestamps.
//!
//! The controller keeps every deadline as a [`Ticks`] value — a `u32`
//! millisecond counter from an arbitrary epoch that wraps roughly every
//! 49.7 days.  Comparisons use the signed half-range difference, so a
//! deadline armed shortly before the wrap still reads as "elapsed" shortly
//! after it.  No deadline in this system is longer than a day, far inside
//! the ±24.8-day half range where the comparison is unambiguous.

/// Millisecond tick count from an arbitrary epoch.  Wraps at `u32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ticks(u32);

impl Ticks {
    /// Construct from a raw millisecond count.
    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Raw millisecond count (for telemetry and logging).
    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// A timestamp `ms` milliseconds after `self`, modulo the counter width.
    pub const fn wrapping_add_ms(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }

    /// Signed difference `self − earlier` in milliseconds.
    ///
    /// Valid for any pair of timestamps less than half the counter range
    /// apart, including pairs straddling the wrap boundary.
    pub const fn millis_since(self, earlier: Ticks) -> i32 {
        self.0.wrapping_sub(earlier.0) as i32
    }

    /// True iff `self` is at or after `deadline`, wraparound-correct.
    pub const fn is_at_or_after(self, deadline: Ticks) -> bool {
        self.millis_since(deadline) >= 0
    }
}

/// Monotonic millisecond time source.
///
/// `now()` never decreases except at the defined `u32` wraparound and has
/// no side effects beyond reading the underlying timer.
pub trait Clock {
    fn now(&self) -> Ticks;

    /// True iff the current time is at or after `deadline`.
    fn has_elapsed(&self, deadline: Ticks) -> bool {
        self.now().is_at_or_after(deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_elapsed() {
        let t = Ticks::from_millis(1_000);
        let deadline = t.wrapping_add_ms(500);
        assert!(!t.is_at_or_after(deadline));
        assert!(!t.wrapping_add_ms(499).is_at_or_after(deadline));
        assert!(t.wrapping_add_ms(500).is_at_or_after(deadline));
        assert!(t.wrapping_add_ms(501).is_at_or_after(deadline));
    }

    #[test]
    fn elapsed_across_wraparound() {
        // Deadline lands 400ms past the wrap boundary.
        let t = Ticks::from_millis(u32::MAX - 99);
        let deadline = t.wrapping_add_ms(500);
        assert_eq!(deadline.as_millis(), 400);
        assert!(!t.is_at_or_after(deadline));
        assert!(!t.wrapping_add_ms(499).is_at_or_after(deadline));
        assert!(t.wrapping_add_ms(500).is_at_or_after(deadline));
    }

    #[test]
    fn millis_since_is_signed() {
        let a = Ticks::from_millis(100);
        let b = a.wrapping_add_ms(250);
        assert_eq!(b.millis_since(a), 250);
        assert_eq!(a.millis_since(b), -250);

        let near_wrap = Ticks::from_millis(u32::MAX - 10);
        let past_wrap = near_wrap.wrapping_add_ms(20);
        assert_eq!(past_wrap.millis_since(near_wrap), 20);
    }

    #[test]
    fn timestamp_is_its_own_deadline() {
        let t = Ticks::from_millis(42);
        assert!(t.is_at_or_after(t));
    }
}
