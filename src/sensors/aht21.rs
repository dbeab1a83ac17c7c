//! AHT21 humidity/temperature sensor driver.
//!
//! The AHT21 needs a four-step conversation per reading: a calibration
//! status check, a measurement trigger, a settle wait of at least 80 ms,
//! and a 6-byte data read.  The driver expresses that conversation as an
//! explicit state machine advanced **at most one phase per `poll` call**,
//! with the settle wait held as a stored deadline — the control loop keeps
//! servicing actuators between phases and never sleeps on the sensor.
//!
//! ```text
//!  Idle ──▶ AwaitingCalibration ──▶ CalibrationChecked
//!                │ status bits 3–4 clear      │ trigger sent
//!                ▼                            ▼
//!            Failed(Uncalibrated)     MeasurementTriggered
//!                                             │
//!                                             ▼
//!   Complete ◀── ReadingData ◀── AwaitingMeasurementDelay
//!      │             │ busy / bus fault (bounded retries)
//!      ▼             ▼
//!    Idle         Failed(…) ──▶ Idle (after retry cooldown)
//! ```
//!
//! Errors are terminal per attempt but never escape to the control loop;
//! the driver restarts from Idle on the next cycle.

use log::{debug, warn};

use crate::bus::BusChannel;
use crate::clock::Ticks;
use crate::error::SensorError;
use crate::sensors::SensorReading;

// ── Wire protocol (fixed by the part — bit-exact) ─────────────

/// Status-request command.
const STATUS_CMD: [u8; 1] = [0x71];
/// Measurement-trigger command.
const TRIGGER_CMD: [u8; 3] = [0xAC, 0x33, 0x00];
/// Status bits 3–4: both set once the factory calibration is loaded.
const CALIBRATED_MASK: u8 = 0x18;
/// Bit 7 of the first payload byte: measurement still running.
const BUSY_MASK: u8 = 0x80;
/// Measurement payload width.  Bytes 0–5 carry status + two 20-bit fields.
const PAYLOAD_LEN: usize = 6;

/// Minimum wait between trigger and read.  The part needs 80 ms; the
/// extra margin absorbs clock granularity.
pub const SETTLE_MS: u32 = 100;

/// Consecutive bus failures tolerated within one acquisition attempt.
const MAX_TRANSPORT_FAILURES: u8 = 3;
/// Busy-flag retries tolerated before the attempt is abandoned.
const MAX_DATA_NOT_READY_TICKS: u8 = 25;

// ── Acquisition state machine ─────────────────────────────────

/// Where the driver is in the four-phase acquisition conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionState {
    /// No acquisition in progress; waiting for the next cycle start.
    Idle,
    /// Cycle started; the calibration status check runs on the next poll.
    AwaitingCalibration,
    /// Calibration confirmed; the trigger goes out on the next poll.
    CalibrationChecked,
    /// Trigger sent; settle deadline armed.
    MeasurementTriggered,
    /// Holding until the settle deadline passes.
    AwaitingMeasurementDelay,
    /// Settled; reading (and re-reading while busy) the payload.
    ReadingData,
    /// A fresh reading is available via `last_reading()`.
    Complete,
    /// The attempt was abandoned; restarts from Idle after a cooldown.
    Failed(SensorError),
}

/// AHT21 driver.  One instance per physical sensor; owns its acquisition
/// state and cycle cadence exclusively.
pub struct Aht21 {
    addr: u8,
    state: AcquisitionState,
    /// Next cycle start.  `None` until the first poll (start immediately).
    next_cycle_at: Option<Ticks>,
    settle_deadline: Ticks,
    transport_failures: u8,
    busy_ticks: u8,
    cycle_interval_ms: u32,
    retry_cooldown_ms: u32,
    last_reading: Option<SensorReading>,
}

impl Aht21 {
    pub fn new(addr: u8, cycle_interval_ms: u32, retry_cooldown_ms: u32) -> Self {
        Self {
            addr,
            state: AcquisitionState::Idle,
            next_cycle_at: None,
            settle_deadline: Ticks::from_millis(0),
            transport_failures: 0,
            busy_ticks: 0,
            cycle_interval_ms,
            retry_cooldown_ms,
            last_reading: None,
        }
    }

    /// Advance the acquisition by at most one phase.  Call every tick.
    ///
    /// Returns the state *after* this poll, so a caller sees `Complete`
    /// or `Failed` exactly once; the next poll folds back to `Idle`.
    pub fn poll(&mut self, now: Ticks, bus: &mut impl BusChannel) -> AcquisitionState {
        match self.state {
            AcquisitionState::Idle => {
                let due = self.next_cycle_at.is_none_or(|t| now.is_at_or_after(t));
                if due {
                    self.transport_failures = 0;
                    self.busy_ticks = 0;
                    self.state = AcquisitionState::AwaitingCalibration;
                }
            }

            AcquisitionState::AwaitingCalibration => match self.read_status(bus) {
                Ok(status) => {
                    self.transport_failures = 0;
                    if status & CALIBRATED_MASK == CALIBRATED_MASK {
                        self.state = AcquisitionState::CalibrationChecked;
                    } else {
                        debug!("aht21: status 0x{status:02x}, calibration bits clear");
                        self.fail(now, SensorError::Uncalibrated);
                    }
                }
                Err(_) => self.note_transport_failure(now),
            },

            AcquisitionState::CalibrationChecked => {
                match bus.write(self.addr, &TRIGGER_CMD) {
                    Ok(()) => {
                        self.transport_failures = 0;
                        // The settle clock starts when the trigger hits
                        // the wire, not when the delay state is entered.
                        self.settle_deadline = now.wrapping_add_ms(SETTLE_MS);
                        self.state = AcquisitionState::MeasurementTriggered;
                    }
                    Err(_) => self.note_transport_failure(now),
                }
            }

            AcquisitionState::MeasurementTriggered => {
                self.state = AcquisitionState::AwaitingMeasurementDelay;
            }

            AcquisitionState::AwaitingMeasurementDelay => {
                if now.is_at_or_after(self.settle_deadline) {
                    self.state = AcquisitionState::ReadingData;
                }
            }

            AcquisitionState::ReadingData => {
                let mut payload = [0u8; PAYLOAD_LEN];
                match bus.read(self.addr, &mut payload) {
                    Ok(()) => {
                        self.transport_failures = 0;
                        if payload[0] & BUSY_MASK != 0 {
                            self.busy_ticks += 1;
                            if self.busy_ticks >= MAX_DATA_NOT_READY_TICKS {
                                warn!(
                                    "aht21: still busy after {} reads, abandoning attempt",
                                    self.busy_ticks
                                );
                                self.fail(now, SensorError::Transport);
                            }
                            // else: stay in ReadingData, retry next tick
                        } else {
                            self.last_reading = Some(SensorReading {
                                humidity: decode_humidity(&payload),
                                temperature: decode_temperature(&payload),
                                captured_at: now,
                                valid: true,
                            });
                            self.next_cycle_at = Some(now.wrapping_add_ms(self.cycle_interval_ms));
                            self.state = AcquisitionState::Complete;
                        }
                    }
                    Err(_) => self.note_transport_failure(now),
                }
            }

            AcquisitionState::Complete | AcquisitionState::Failed(_) => {
                // The terminal state has been observed by the caller once;
                // fold back and wait for the next cycle start.
                self.state = AcquisitionState::Idle;
            }
        }

        self.state
    }

    /// The most recent reading, if any acquisition has ever completed.
    /// Check `valid` — a reading outliving a failed attempt is stale.
    pub fn last_reading(&self) -> Option<&SensorReading> {
        self.last_reading.as_ref()
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    // ── Internal ──────────────────────────────────────────────

    fn read_status(&mut self, bus: &mut impl BusChannel) -> Result<u8, crate::error::BusError> {
        bus.write(self.addr, &STATUS_CMD)?;
        let mut status = [0u8; 1];
        bus.read(self.addr, &mut status)?;
        Ok(status[0])
    }

    fn note_transport_failure(&mut self, now: Ticks) {
        self.transport_failures += 1;
        if self.transport_failures >= MAX_TRANSPORT_FAILURES {
            warn!(
                "aht21: {} consecutive bus failures, abandoning attempt",
                self.transport_failures
            );
            self.fail(now, SensorError::Transport);
        } else {
            debug!(
                "aht21: bus failure {}/{}, retrying next tick",
                self.transport_failures, MAX_TRANSPORT_FAILURES
            );
        }
    }

    fn fail(&mut self, now: Ticks, reason: SensorError) {
        if let Some(r) = self.last_reading.as_mut() {
            r.valid = false;
        }
        self.next_cycle_at = Some(now.wrapping_add_ms(self.retry_cooldown_ms));
        self.state = AcquisitionState::Failed(reason);
    }
}

// ── Payload decoding ──────────────────────────────────────────

/// Extract the 20-bit humidity field from bytes 1–3 and scale to percent.
pub fn decode_humidity(payload: &[u8; PAYLOAD_LEN]) -> f32 {
    let raw = (u32::from(payload[1]) << 12)
        | (u32::from(payload[2]) << 4)
        | (u32::from(payload[3]) >> 4);
    (raw as f32 / (1u32 << 20) as f32) * 100.0
}

/// Extract the 20-bit temperature field from bytes 3–5 and scale to °C.
pub fn decode_temperature(payload: &[u8; PAYLOAD_LEN]) -> f32 {
    let raw = (u32::from(payload[3] & 0x0F) << 16)
        | (u32::from(payload[4]) << 8)
        | u32::from(payload[5]);
    (raw as f32 / (1u32 << 20) as f32) * 200.0 - 50.0
}
