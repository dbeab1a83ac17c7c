//! Adapters — implementations of the port traits and platform services.
//!
//! Everything ESP-IDF-specific is guarded by `#[cfg(target_os = "espidf")]`
//! inside each module; host builds get in-memory or `std`-backed duals.

pub mod log_sink;
pub mod nvs;
pub mod time;

#[cfg(target_os = "espidf")]
pub mod i2c;
