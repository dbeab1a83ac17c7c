//! System configuration parameters
//!
//! All tunable parameters for the HydroBed controller.
//! Values can be overridden via NVS or an external provisioning channel.

use serde::{Deserialize, Serialize};

/// Maximum length of the device identity string.
pub const DEVICE_ID_LEN: usize = 32;

/// Gate between the latest humidity reading and pump activation.
///
/// The policy is evaluated against the most recent *valid* reading; an
/// invalid or absent reading never blocks an actuator — a dead sensor
/// must not starve irrigation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InterlockPolicy {
    /// Pump activation ignores sensor state.
    Disabled,
    /// Block activation while humidity is below the threshold (%).
    MinHumidity(f32),
    /// Block activation while humidity is above the threshold (%).
    MaxHumidity(f32),
}

impl InterlockPolicy {
    /// True iff this policy blocks activation given the latest reading.
    pub fn blocks(&self, reading: Option<&crate::sensors::SensorReading>) -> bool {
        let Some(r) = reading else { return false };
        if !r.valid {
            return false;
        }
        match self {
            Self::Disabled => false,
            Self::MinHumidity(min) => r.humidity < *min,
            Self::MaxHumidity(max) => r.humidity > *max,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Actuator timing ---
    /// Supply pump run duration per activation (milliseconds)
    pub supply_pump_run_ms: u32,
    /// Cooldown between supply pump activations (milliseconds)
    pub supply_pump_cooldown_ms: u32,
    /// Nutrient pump dose duration (milliseconds)
    pub nutrient_pump_run_ms: u32,
    /// Cooldown between nutrient doses (milliseconds)
    pub nutrient_pump_cooldown_ms: u32,
    /// Grow light photoperiod: lit duration (milliseconds)
    pub light_on_ms: u32,
    /// Grow light photoperiod: dark duration (milliseconds)
    pub light_off_ms: u32,

    // --- Sensor acquisition ---
    /// Interval between acquisition cycles (milliseconds)
    pub sensor_cycle_interval_ms: u32,
    /// Extra hold-off before restarting after a failed acquisition (milliseconds)
    pub sensor_retry_cooldown_ms: u32,

    // --- Interlock ---
    /// Humidity gate on supply pump activation
    pub pump_interlock: InterlockPolicy,

    // --- Timing ---
    /// Control loop tick interval (milliseconds).  Must stay at or below
    /// half the sensor settle time so phase-ready windows are never missed.
    pub control_loop_interval_ms: u32,
    /// Telemetry heartbeat interval (seconds)
    pub telemetry_interval_secs: u32,

    // --- Identity ---
    /// Device identity carried in every telemetry record
    pub device_id: heapless::String<DEVICE_ID_LEN>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Supply pump: 5 s circulation every 5 min
            supply_pump_run_ms: 5_000,
            supply_pump_cooldown_ms: 300_000,

            // Nutrient pump: 1.5 s dose every 6 h
            nutrient_pump_run_ms: 1_500,
            nutrient_pump_cooldown_ms: 21_600_000,

            // Light: 16 h on / 8 h off
            light_on_ms: 57_600_000,
            light_off_ms: 28_800_000,

            // Sensor: one acquisition every 30 s, 5 s hold-off after failure
            sensor_cycle_interval_ms: 30_000,
            sensor_retry_cooldown_ms: 5_000,

            pump_interlock: InterlockPolicy::Disabled,

            control_loop_interval_ms: 25, // 40 Hz
            telemetry_interval_secs: 60,

            device_id: heapless::String::try_from("hydrobed-01").unwrap_or_default(),
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Called before persisting and at startup.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.control_loop_interval_ms == 0 || self.control_loop_interval_ms > 50 {
            return Err("control tick must be 1..=50 ms");
        }
        if self.supply_pump_run_ms == 0 || self.nutrient_pump_run_ms == 0 {
            return Err("pump run duration must be non-zero");
        }
        if self.light_on_ms == 0 || self.light_off_ms == 0 {
            return Err("photoperiod durations must be non-zero");
        }
        if self.sensor_cycle_interval_ms == 0 {
            return Err("sensor cycle interval must be non-zero");
        }
        match self.pump_interlock {
            InterlockPolicy::MinHumidity(h) | InterlockPolicy::MaxHumidity(h) => {
                if !(0.0..=100.0).contains(&h) {
                    return Err("interlock humidity threshold out of range");
                }
            }
            InterlockPolicy::Disabled => {}
        }
        if self.device_id.is_empty() {
            return Err("device id must not be empty");
        }
        Ok(())
    }
}
