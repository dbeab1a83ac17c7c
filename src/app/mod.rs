//! Application core — the hexagonal center of the firmware.
//!
//! [`service::ControlLoop`] holds all domain logic; [`ports`] defines the
//! trait boundary adapters implement; [`events`] carries everything the
//! core tells the outside world.

pub mod events;
pub mod ports;
pub mod service;
