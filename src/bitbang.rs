//! Software (bit-banged) I2C master on two GPIO lines.
//!
//! Boards that wire the IP5328P to plain GPIOs instead of an I2C
//! peripheral can use [`SoftI2c`] as the bus: it implements
//! [`embedded_hal::i2c::I2c`], so [`crate::Ip5328p`] runs on it unchanged.
//!
//! The engine is blocking and delay-loop timed. Data is driven only while
//! the clock is low; bytes move MSB-first; a repeated start is an ordinary
//! start issued mid-transaction. There is no clock stretching or
//! arbitration support, and exclusive bus ownership is expected (`&mut
//! self` on every operation enforces it within one context; sharing across
//! tasks needs an external mutex).

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::i2c::{
    self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress,
};

/// Default SCL half-period in microseconds (roughly 100 kHz).
pub const DEFAULT_HALF_PERIOD_US: u32 = 5;
/// Default number of ACK samples taken before giving up on a slave.
pub const DEFAULT_ACK_POLLS: u8 = 8;

/// Bus-level failure of the software engine.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SoftI2cError<E> {
    /// A GPIO line could not be driven or sampled.
    Pin(E),
    /// The slave did not pull SDA low within the bounded ACK window.
    NoAcknowledge(NoAcknowledgeSource),
}

impl<E: core::fmt::Debug> i2c::Error for SoftI2cError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            SoftI2cError::Pin(_) => ErrorKind::Bus,
            SoftI2cError::NoAcknowledge(source) => ErrorKind::NoAcknowledge(*source),
        }
    }
}

/// Bit-banged I2C master over an SCL output, a bidirectional SDA and a
/// delay provider.
pub struct SoftI2c<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
    half_period_us: u32,
    ack_polls: u8,
}

impl<SCL, SDA, D> SoftI2c<SCL, SDA, D> {
    /// Create an engine with default timing (~100 kHz, 8 ACK polls).
    pub fn new(scl: SCL, sda: SDA, delay: D) -> Self {
        Self::with_timing(scl, sda, delay, DEFAULT_HALF_PERIOD_US, DEFAULT_ACK_POLLS)
    }

    /// Create an engine with an explicit half-period and ACK poll count.
    pub fn with_timing(scl: SCL, sda: SDA, delay: D, half_period_us: u32, ack_polls: u8) -> Self {
        Self {
            scl,
            sda,
            delay,
            half_period_us,
            ack_polls: ack_polls.max(1),
        }
    }

    /// Release the pins and the delay provider.
    pub fn free(self) -> (SCL, SDA, D) {
        (self.scl, self.sda, self.delay)
    }
}

impl<SCL, SDA, D, E> SoftI2c<SCL, SDA, D>
where
    SCL: OutputPin<Error = E>,
    SDA: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
{
    fn wait(&mut self) {
        self.delay.delay_us(self.half_period_us);
    }

    fn scl_high(&mut self) -> Result<(), SoftI2cError<E>> {
        self.scl.set_high().map_err(SoftI2cError::Pin)?;
        self.wait();
        Ok(())
    }

    fn scl_low(&mut self) -> Result<(), SoftI2cError<E>> {
        self.scl.set_low().map_err(SoftI2cError::Pin)?;
        self.wait();
        Ok(())
    }

    fn sda_high(&mut self) -> Result<(), SoftI2cError<E>> {
        self.sda.set_high().map_err(SoftI2cError::Pin)?;
        self.wait();
        Ok(())
    }

    fn sda_low(&mut self) -> Result<(), SoftI2cError<E>> {
        self.sda.set_low().map_err(SoftI2cError::Pin)?;
        self.wait();
        Ok(())
    }

    /// Start condition: SDA falls while SCL is high. Issued mid-transaction
    /// this is a repeated start.
    fn start(&mut self) -> Result<(), SoftI2cError<E>> {
        self.sda_high()?;
        self.scl_high()?;
        self.sda_low()?;
        self.scl_low()
    }

    /// Stop condition: SDA rises while SCL is high, releasing the bus.
    fn stop(&mut self) -> Result<(), SoftI2cError<E>> {
        self.sda_low()?;
        self.scl_high()?;
        self.sda_high()
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), SoftI2cError<E>> {
        if bit {
            self.sda_high()?;
        } else {
            self.sda_low()?;
        }
        self.scl_high()?;
        self.scl_low()
    }

    fn read_bit(&mut self) -> Result<bool, SoftI2cError<E>> {
        self.scl_high()?;
        let bit = self.sda.is_high().map_err(SoftI2cError::Pin)?;
        self.scl_low()?;
        Ok(bit)
    }

    /// Clock out one byte MSB-first, then sample the slave ACK slot with a
    /// bounded poll. SCL is always driven low again before an error
    /// returns, so a NACK leaves the bus clockable.
    fn write_byte(&mut self, byte: u8, nack: NoAcknowledgeSource) -> Result<(), SoftI2cError<E>> {
        for shift in (0..8).rev() {
            self.write_bit(byte & (1 << shift) != 0)?;
        }
        self.sda_high()?;
        self.scl_high()?;
        let mut acked = self.sda.is_low().map_err(SoftI2cError::Pin)?;
        let mut polls = 1;
        while !acked && polls < self.ack_polls {
            self.wait();
            acked = self.sda.is_low().map_err(SoftI2cError::Pin)?;
            polls += 1;
        }
        self.scl_low()?;
        if acked {
            Ok(())
        } else {
            Err(SoftI2cError::NoAcknowledge(nack))
        }
    }

    /// Clock in one byte MSB-first, then answer with a master ACK (more
    /// bytes wanted) or NACK (end of the read).
    fn read_byte(&mut self, ack: bool) -> Result<u8, SoftI2cError<E>> {
        self.sda_high()?;
        let mut byte = 0u8;
        for _ in 0..8 {
            byte <<= 1;
            if self.read_bit()? {
                byte |= 1;
            }
        }
        self.write_bit(!ack)?;
        self.sda_high()?;
        Ok(byte)
    }

    fn run_operations(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), SoftI2cError<E>> {
        let count = operations.len();
        let mut prev_read: Option<bool> = None;
        for index in 0..count {
            let next_is_read = operations
                .get(index + 1)
                .map(|op| matches!(op, Operation::Read(_)));
            let op = &mut operations[index];
            let is_read = matches!(op, Operation::Read(_));
            if prev_read != Some(is_read) {
                self.start()?;
                self.write_byte((address << 1) | is_read as u8, NoAcknowledgeSource::Address)?;
            }
            match op {
                Operation::Write(bytes) => {
                    for &byte in bytes.iter() {
                        self.write_byte(byte, NoAcknowledgeSource::Data)?;
                    }
                }
                Operation::Read(buffer) => {
                    // NACK only the very last byte before a direction change
                    // or the stop; adjacent reads continue with ACKs.
                    let ends_sequence = next_is_read != Some(true);
                    let len = buffer.len();
                    for (pos, byte) in buffer.iter_mut().enumerate() {
                        let last = ends_sequence && pos + 1 == len;
                        *byte = self.read_byte(!last)?;
                    }
                }
            }
            prev_read = Some(is_read);
        }
        Ok(())
    }
}

impl<SCL, SDA, D, E> ErrorType for SoftI2c<SCL, SDA, D>
where
    SCL: OutputPin<Error = E>,
    SDA: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
    E: core::fmt::Debug,
{
    type Error = SoftI2cError<E>;
}

impl<SCL, SDA, D, E> I2c<SevenBitAddress> for SoftI2c<SCL, SDA, D>
where
    SCL: OutputPin<Error = E>,
    SDA: OutputPin<Error = E> + InputPin<Error = E>,
    D: DelayNs,
    E: core::fmt::Debug,
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if operations.is_empty() {
            return Ok(());
        }
        match self.run_operations(address, operations) {
            Ok(()) => self.stop(),
            Err(e) => {
                // Release the bus even after a failed byte; the NACK error
                // matters more than a secondary stop failure.
                let _ = self.stop();
                Err(e)
            }
        }
    }
}
