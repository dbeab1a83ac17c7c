//! ESP-IDF I2C bus construction.
//!
//! Builds the esp-idf-hal `I2cDriver` for the shared sensor bus and wraps
//! it in [`HalI2cBus`].  The driver carries its own transaction timeout,
//! so a wedged device surfaces as a transport failure instead of hanging
//! the control loop.

use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;

use crate::bus::HalI2cBus;
use crate::pins;

/// Take the I2C0 peripheral and configure the sensor bus.
///
/// Call once at startup; the GPIO numbers are fixed by `pins.rs` and the
/// board layout.  `Peripherals::take` succeeds at most once, so a second
/// bus instance cannot be constructed.
pub fn init_bus() -> anyhow::Result<HalI2cBus<I2cDriver<'static>>> {
    let peripherals = Peripherals::take()?;
    let config = I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ));
    let driver = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio8, // pins::I2C_SDA_GPIO
        peripherals.pins.gpio9, // pins::I2C_SCL_GPIO
        &config,
    )?;
    Ok(HalI2cBus::new(driver))
}
