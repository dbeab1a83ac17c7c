//! The control loop — the scheduling core of the firmware.
//!
//! [`ControlLoop`] owns the clock, the I2C bus, the sensor driver, and
//! every actuator controller, all injected at construction (no hidden
//! globals).  One `tick()` call runs one full evaluation pass:
//!
//! ```text
//!  Clock ──▶ ┌───────────────────────────────┐ ──▶ EventSink
//!            │          ControlLoop          │
//!  BusChannel│  sensor poll → actuator rules │
//!            └───────────────────────────────┘
//! ```
//!
//! Ordering within a tick is fixed: the sensor is polled first, so
//! interlock decisions always see the freshest reading; actuators are
//! evaluated second; telemetry goes out last.  Every operation is
//! non-blocking — long waits exist only as stored deadlines, which is
//! what lets one thread service everything at tick cadence.

use log::{info, warn};

use crate::bus::BusChannel;
use crate::clock::{Clock, Ticks};
use crate::config::SystemConfig;
use crate::drivers::actuator::ActuatorController;
use crate::sensors::{AcquisitionState, Aht21, SensorReading};

use super::events::{ActuatorStatus, AppEvent, TelemetryRecord};
use super::ports::EventSink;

/// The tick-driven scheduler.
pub struct ControlLoop<C: Clock, B: BusChannel> {
    clock: C,
    bus: B,
    sensor: Aht21,
    supply_pump: ActuatorController,
    nutrient_pump: ActuatorController,
    light: ActuatorController,
    config: SystemConfig,
    tick_count: u64,
    next_heartbeat_at: Ticks,
}

impl<C: Clock, B: BusChannel> ControlLoop<C, B> {
    /// Assemble the loop from its collaborators.  Call [`start`](Self::start)
    /// before the first tick.
    pub fn new(
        clock: C,
        bus: B,
        sensor: Aht21,
        supply_pump: ActuatorController,
        nutrient_pump: ActuatorController,
        light: ActuatorController,
        config: SystemConfig,
    ) -> Self {
        Self {
            clock,
            bus,
            sensor,
            supply_pump,
            nutrient_pump,
            light,
            config,
            tick_count: 0,
            next_heartbeat_at: Ticks::from_millis(0),
        }
    }

    /// Arm the telemetry heartbeat and announce startup.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        let now = self.clock.now();
        self.next_heartbeat_at = now.wrapping_add_ms(self.heartbeat_ms());
        sink.emit(&AppEvent::Started);
        info!("control loop started (tick {} ms)", self.config.control_loop_interval_ms);
    }

    /// Run one full evaluation pass: sensor poll → actuator rules → telemetry.
    pub fn tick(&mut self, sink: &mut impl EventSink) {
        self.tick_count += 1;
        let now = self.clock.now();

        // 1. Sensor acquisition — exactly once per tick, before any
        //    actuator decision, and the only bus traffic in this tick.
        match self.sensor.poll(now, &mut self.bus) {
            AcquisitionState::Complete => {
                sink.emit(&AppEvent::Telemetry(self.build_telemetry(now)));
            }
            AcquisitionState::Failed(reason) => {
                warn!("sensor acquisition failed: {reason}");
                sink.emit(&AppEvent::AcquisitionFailed(reason));
            }
            _ => {}
        }

        // 2. Actuator evaluation.  The humidity interlock gates only the
        //    supply pump; dosing and photoperiod are pure timers.
        let pump_blocked = self
            .config
            .pump_interlock
            .blocks(self.sensor.last_reading());
        let mut changed = evaluate_actuator(
            &mut self.supply_pump,
            now,
            self.config.supply_pump_run_ms,
            self.config.supply_pump_cooldown_ms,
            pump_blocked,
            sink,
        );
        changed |= evaluate_actuator(
            &mut self.nutrient_pump,
            now,
            self.config.nutrient_pump_run_ms,
            self.config.nutrient_pump_cooldown_ms,
            false,
            sink,
        );
        changed |= evaluate_actuator(
            &mut self.light,
            now,
            self.config.light_on_ms,
            self.config.light_off_ms,
            false,
            sink,
        );

        // 3. Telemetry: a record on any state change, plus the heartbeat.
        if changed {
            sink.emit(&AppEvent::Telemetry(self.build_telemetry(now)));
        }
        if now.is_at_or_after(self.next_heartbeat_at) {
            self.next_heartbeat_at = now.wrapping_add_ms(self.heartbeat_ms());
            sink.emit(&AppEvent::Telemetry(self.build_telemetry(now)));
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry record from the current state.  Sensor fields are
    /// omitted unless a valid (non-stale) reading is held.
    pub fn build_telemetry(&self, now: Ticks) -> TelemetryRecord {
        let reading = self.latest_valid_reading();
        TelemetryRecord {
            device_id: self.config.device_id.clone(),
            status: ActuatorStatus {
                supply_pump: self.supply_pump.is_on(),
                nutrient_pump: self.nutrient_pump.is_on(),
                light: self.light.is_on(),
            },
            timestamp: now.as_millis(),
            humidity: reading.map(|r| r.humidity),
            temperature: reading.map(|r| r.temperature),
        }
    }

    /// The held reading, only while it is still valid.
    pub fn latest_valid_reading(&self) -> Option<&SensorReading> {
        self.sensor.last_reading().filter(|r| r.valid)
    }

    pub fn supply_pump(&self) -> &ActuatorController {
        &self.supply_pump
    }

    pub fn nutrient_pump(&self) -> &ActuatorController {
        &self.nutrient_pump
    }

    pub fn light(&self) -> &ActuatorController {
        &self.light
    }

    pub fn acquisition_state(&self) -> AcquisitionState {
        self.sensor.state()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    fn heartbeat_ms(&self) -> u32 {
        self.config.telemetry_interval_secs.saturating_mul(1_000)
    }
}

/// One actuator's idle → running → idle rule.
///
/// Off, alarm clear, not interlocked → turn on and arm the runtime.
/// Running past its runtime → turn off and arm the cooldown alarm.
/// Free function so each controller can be borrowed independently of
/// the sink.  Returns whether a transition happened.
fn evaluate_actuator(
    actuator: &mut ActuatorController,
    now: Ticks,
    run_ms: u32,
    cooldown_ms: u32,
    blocked: bool,
    sink: &mut impl EventSink,
) -> bool {
    if !actuator.is_on() {
        if actuator.alarm_due(now) && !blocked {
            actuator.turn_on(now);
            actuator.set_runtime(now, run_ms);
            info!("{}: on for {} ms", actuator.label(), run_ms);
            sink.emit(&AppEvent::ActuatorChanged {
                label: actuator.label(),
                on: true,
                at_ms: now.as_millis(),
            });
            return true;
        }
    } else if actuator.runtime_expired(now) {
        actuator.turn_off();
        actuator.set_alarm(now, cooldown_ms);
        info!("{}: off, next activation in {} ms", actuator.label(), cooldown_ms);
        sink.emit(&AppEvent::ActuatorChanged {
            label: actuator.label(),
            on: false,
            at_ms: now.as_millis(),
        });
        return true;
    }
    false
}
