//! Sensor subsystem.
//!
//! One bus sensor today (AHT21 humidity/temperature); the reading type
//! lives here so the control loop and interlock policy never depend on a
//! concrete driver.

pub mod aht21;

pub use aht21::{AcquisitionState, Aht21};

use crate::clock::Ticks;

/// A decoded environmental reading.
///
/// Produced only by a completed acquisition cycle.  `valid` is cleared
/// when a later acquisition fails, so a consumer holding this value can
/// distinguish a fresh reading from a stale one that outlived its sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Relative humidity, 0.0–100.0 %.
    pub humidity: f32,
    /// Temperature, −50.0–150.0 °C.
    pub temperature: f32,
    /// When the acquisition completed.
    pub captured_at: Ticks,
    /// False once a subsequent acquisition attempt has failed.
    pub valid: bool,
}
