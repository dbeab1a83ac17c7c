//! Event sink that writes structured events to the serial log.
//!
//! Telemetry records are serialized to JSON — the same shape the MQTT
//! publishing collaborator consumes — so a bench setup with only a serial
//! cable sees exactly what the collector would receive.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(record) => match serde_json::to_string(record) {
                Ok(json) => info!("telemetry: {json}"),
                Err(e) => warn!("telemetry serialization failed: {e}"),
            },
            AppEvent::ActuatorChanged { label, on, at_ms } => {
                info!("actuator {label}: {} at {at_ms} ms", if *on { "on" } else { "off" });
            }
            AppEvent::AcquisitionFailed(reason) => {
                warn!("acquisition failed: {reason}");
            }
            AppEvent::Started => info!("event stream started"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::{ActuatorStatus, TelemetryRecord};

    #[test]
    fn telemetry_record_serializes_with_optional_fields() {
        let record = TelemetryRecord {
            device_id: heapless::String::try_from("hydrobed-01").unwrap(),
            status: ActuatorStatus {
                supply_pump: true,
                nutrient_pump: false,
                light: true,
            },
            timestamp: 12_345,
            humidity: Some(48.5),
            temperature: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"hydrobed-01\""));
        assert!(json.contains("\"supply_pump\":true"));
        assert!(json.contains("\"temperature\":null"));

        // A sink must accept every event variant without panicking.
        let mut sink = LogEventSink::new();
        sink.emit(&AppEvent::Telemetry(record));
        sink.emit(&AppEvent::Started);
    }
}
