//! Relay-driven actuator controller (pumps, grow light).
//!
//! Tracks on/off state plus two stored deadlines: an optional *alarm*
//! (earliest time the actuator may next activate) and an optional
//! *runtime expiry* (time at which a running actuator must stop).  No
//! internal timer ever fires — every check is pull-based, evaluated by
//! the control loop each tick, which keeps the controller free of
//! interrupt or timer-thread infrastructure.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real relay GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::clock::Ticks;
use crate::drivers::hw_init;

/// One GPIO-driven on/off device.  Created once at startup bound to a
/// fixed pin; mutated only by the control loop; never destroyed.
pub struct ActuatorController {
    label: &'static str,
    gpio: i32,
    on: bool,
    alarm: Option<Ticks>,
    runtime_expiry: Option<Ticks>,
}

impl ActuatorController {
    pub fn new(label: &'static str, gpio: i32) -> Self {
        Self {
            label,
            gpio,
            on: false,
            alarm: None,
            runtime_expiry: None,
        }
    }

    /// Set the pin high and record the state.  Idempotent: calling while
    /// already on neither toggles the pin nor touches the runtime expiry
    /// (re-arming requires an explicit [`set_runtime`](Self::set_runtime)).
    pub fn turn_on(&mut self, _now: Ticks) {
        if self.on {
            return;
        }
        hw_init::gpio_write(self.gpio, true);
        self.on = true;
    }

    /// Set the pin low.  A no-op when already off.
    pub fn turn_off(&mut self) {
        if !self.on {
            return;
        }
        hw_init::gpio_write(self.gpio, false);
        self.on = false;
        self.runtime_expiry = None;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Arm the runtime expiry `duration_ms` from `now`.
    pub fn set_runtime(&mut self, now: Ticks, duration_ms: u32) {
        self.runtime_expiry = Some(now.wrapping_add_ms(duration_ms));
    }

    /// True iff a runtime expiry is armed and has passed.
    pub fn runtime_expired(&self, now: Ticks) -> bool {
        self.runtime_expiry
            .is_some_and(|deadline| now.is_at_or_after(deadline))
    }

    /// Arm the activation alarm `offset_ms` from `now`.
    pub fn set_alarm(&mut self, now: Ticks, offset_ms: u32) {
        self.alarm = Some(now.wrapping_add_ms(offset_ms));
    }

    /// True iff no alarm is armed, or the armed alarm time has passed.
    pub fn alarm_due(&self, now: Ticks) -> bool {
        match self.alarm {
            None => true,
            Some(t) => now.is_at_or_after(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u32) -> Ticks {
        Ticks::from_millis(ms)
    }

    #[test]
    fn starts_off_with_no_deadlines() {
        let a = ActuatorController::new("pump", 4);
        assert!(!a.is_on());
        assert!(a.alarm_due(at(0)));
        assert!(!a.runtime_expired(at(0)));
    }

    #[test]
    fn turn_on_records_state_and_runtime() {
        let mut a = ActuatorController::new("pump", 4);
        a.turn_on(at(0));
        a.set_runtime(at(0), 5_000);
        assert!(a.is_on());
        assert!(!a.runtime_expired(at(4_999)));
        assert!(a.runtime_expired(at(5_000)));
        assert!(a.runtime_expired(at(5_001)));
    }

    #[test]
    fn turn_on_when_on_does_not_rearm_runtime() {
        let mut a = ActuatorController::new("pump", 4);
        a.turn_on(at(0));
        a.set_runtime(at(0), 5_000);

        // A second turn_on later must not push the expiry out.
        a.turn_on(at(3_000));
        assert!(a.runtime_expired(at(5_000)));
    }

    #[test]
    fn turn_off_when_off_is_a_noop() {
        let mut a = ActuatorController::new("light", 6);
        a.turn_off();
        assert!(!a.is_on());
        assert!(a.alarm_due(at(0)));
    }

    #[test]
    fn turn_off_clears_runtime_but_keeps_alarm() {
        let mut a = ActuatorController::new("pump", 4);
        a.turn_on(at(0));
        a.set_runtime(at(0), 1_000);
        a.turn_off();
        a.set_alarm(at(1_000), 2_000);

        assert!(!a.runtime_expired(at(10_000)));
        assert!(!a.alarm_due(at(2_999)));
        assert!(a.alarm_due(at(3_000)));
    }

    #[test]
    fn deadlines_survive_counter_wraparound() {
        let mut a = ActuatorController::new("pump", 4);
        let near_wrap = at(u32::MAX - 1_000);
        a.turn_on(near_wrap);
        a.set_runtime(near_wrap, 5_000);

        // 5000ms later the counter has wrapped to 3999.
        assert!(!a.runtime_expired(near_wrap.wrapping_add_ms(4_999)));
        assert!(a.runtime_expired(near_wrap.wrapping_add_ms(5_000)));
    }
}
