//! Unified error types for the HydroBed firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform.  All variants are `Copy`
//! so they can be cheaply threaded through the acquisition state machine
//! without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An I2C bus transaction failed.
    Bus(BusError),
    /// The sensor acquisition failed or returned unusable data.
    Sensor(SensorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "bus: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Bus errors
// ---------------------------------------------------------------------------

/// Errors surfaced by [`BusChannel`](crate::bus::BusChannel) transactions.
///
/// The physical causes (NACK, timeout, arbitration loss) are deliberately
/// collapsed: the caller's recovery is identical for all of them, and the
/// caller must not assume a partial write reached the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusError {
    /// The transaction did not complete on the wire.
    TransportFailure,
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportFailure => write!(f, "transport failure"),
        }
    }
}

impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Self::Bus(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Terminal reasons for a failed acquisition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Status register reports the device is not calibrated (bits 3–4 clear).
    Uncalibrated,
    /// The device is still measuring (busy bit set).  Not terminal on its
    /// own — only after the bounded per-attempt retry budget is exhausted.
    DataNotReady,
    /// The bus failed repeatedly within one acquisition attempt.
    Transport,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncalibrated => write!(f, "device not calibrated"),
            Self::DataNotReady => write!(f, "measurement not ready"),
            Self::Transport => write!(f, "bus transport failure"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

impl From<BusError> for SensorError {
    fn from(_: BusError) -> Self {
        Self::Transport
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
