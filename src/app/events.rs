//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through
//! the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them — log to serial, hand to the
//! MQTT publisher, record in a test.

use serde::Serialize;

use crate::config::DEVICE_ID_LEN;
use crate::error::SensorError;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A telemetry record is ready for the collector.
    Telemetry(TelemetryRecord),

    /// An actuator changed state.
    ActuatorChanged {
        label: &'static str,
        on: bool,
        /// Millisecond timestamp of the transition.
        at_ms: u32,
    },

    /// A sensor acquisition attempt was abandoned.
    AcquisitionFailed(SensorError),

    /// The control loop has started.
    Started,
}

/// Per-actuator on/off summary carried in every telemetry record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActuatorStatus {
    pub supply_pump: bool,
    pub nutrient_pump: bool,
    pub light: bool,
}

/// A point-in-time record for the remote collector.
///
/// The core only *produces* this; encoding and transport belong to the
/// publishing collaborator.  Humidity/temperature are absent until the
/// first acquisition completes, and absent again after a failed attempt
/// invalidates the held reading.
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryRecord {
    pub device_id: heapless::String<DEVICE_ID_LEN>,
    pub status: ActuatorStatus,
    /// Millisecond timestamp (wrapping counter, device epoch).
    pub timestamp: u32,
    pub humidity: Option<f32>,
    pub temperature: Option<f32>,
}
