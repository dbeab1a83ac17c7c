//! Shared I2C bus access.
//!
//! All bus sensors sit behind [`BusChannel`] — serialized write/read
//! transactions against 7-bit-addressed devices, at most one in flight.
//! Exclusive access is structural: the control loop holds the only `&mut`
//! to the channel and only its sensor step issues transactions in a tick.
//!
//! Every transport-level failure collapses to
//! [`BusError::TransportFailure`]; the underlying HAL's transaction
//! timeout bounds a stalled transfer, so the loop never hangs on the bus.

use crate::error::BusError;

/// Serialized request/response transactions on the shared two-wire bus.
pub trait BusChannel {
    /// Write `bytes` to the device at `addr`.
    ///
    /// On error the caller must not assume any prefix of the write reached
    /// the device.
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError>;

    /// Read exactly `buf.len()` bytes from the device at `addr`.
    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), BusError>;
}

/// Adapter from any [`embedded_hal::i2c::I2c`] implementation.
///
/// On hardware this wraps esp-idf-hal's `I2cDriver`; in tests, a scripted
/// mock.  HAL error details are logged and then collapsed — recovery is
/// identical regardless of cause.
pub struct HalI2cBus<I> {
    i2c: I,
}

impl<I: embedded_hal::i2c::I2c> HalI2cBus<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Release the underlying I2C peripheral.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: embedded_hal::i2c::I2c> BusChannel for HalI2cBus<I> {
    fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), BusError> {
        self.i2c.write(addr, bytes).map_err(|e| {
            log::debug!("i2c write to 0x{addr:02x} failed: {e:?}");
            BusError::TransportFailure
        })
    }

    fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), BusError> {
        self.i2c.read(addr, buf).map_err(|e| {
            log::debug!("i2c read from 0x{addr:02x} failed: {e:?}");
            BusError::TransportFailure
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{self, ErrorKind, ErrorType, Operation, SevenBitAddress};

    #[derive(Debug)]
    struct FakeError;

    impl i2c::Error for FakeError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    struct FakeI2c {
        fail: bool,
    }

    impl ErrorType for FakeI2c {
        type Error = FakeError;
    }

    impl i2c::I2c for FakeI2c {
        fn transaction(
            &mut self,
            _address: SevenBitAddress,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(FakeError);
            }
            for op in operations.iter_mut() {
                if let Operation::Read(buf) = op {
                    buf.fill(0xAB);
                }
            }
            Ok(())
        }
    }

    #[test]
    fn hal_errors_collapse_to_transport_failure() {
        let mut bus = HalI2cBus::new(FakeI2c { fail: true });
        let mut buf = [0u8; 1];
        assert_eq!(bus.write(0x38, &[0x71]), Err(BusError::TransportFailure));
        assert_eq!(bus.read(0x38, &mut buf), Err(BusError::TransportFailure));
    }

    #[test]
    fn successful_transactions_pass_through() {
        let mut bus = HalI2cBus::new(FakeI2c { fail: false });
        assert_eq!(bus.write(0x38, &[0x71]), Ok(()));
        let mut buf = [0u8; 2];
        assert_eq!(bus.read(0x38, &mut buf), Ok(()));
        assert_eq!(buf, [0xAB, 0xAB]);
    }
}
