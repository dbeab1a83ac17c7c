//! GPIO / peripheral pin assignments for the HydroBed controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Actuator relays (active HIGH)
// ---------------------------------------------------------------------------

/// Supply pump relay — circulates water from the reservoir to the grow bed.
pub const SUPPLY_PUMP_GPIO: i32 = 4;
/// Nutrient dosing pump relay.
pub const NUTRIENT_PUMP_GPIO: i32 = 5;
/// Grow light relay.
pub const LIGHT_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// I2C bus (shared by all bus sensors)
// ---------------------------------------------------------------------------

/// I2C serial data.
pub const I2C_SDA_GPIO: i32 = 8;
/// I2C serial clock.
pub const I2C_SCL_GPIO: i32 = 9;
/// Bus frequency — 100 kHz standard mode; the AHT21 tops out at 400 kHz.
pub const I2C_FREQ_HZ: u32 = 100_000;

/// 7-bit address of the AHT21 humidity/temperature sensor (fixed by the part).
pub const AHT21_I2C_ADDR: u8 = 0x38;
