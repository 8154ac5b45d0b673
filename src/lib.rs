//! IP5328P Rust Driver
//!
//! Driver for the Injoinic IP5328P power-bank SoC: lithium fuel gauge,
//! multi-port charger and boost controller behind a byte-wide I2C register
//! file. The crate has two halves:
//!
//! - [`Ip5328p`], the device driver, generic over any
//!   [`embedded_hal::i2c::I2c`] bus. It decodes the ADC channels into
//!   millivolts/milliamps/milliwatts, the status registers into closed
//!   enums, and derives per-port readings with the chip's cross-register
//!   corrections applied ([`driver::Ip5328p::read_snapshot`]).
//! - [`SoftI2c`], a bit-banged I2C master over two GPIOs and a delay
//!   provider, for boards without a spare I2C peripheral.
//!
//! Everything is blocking and single-owner: the bus handle moves into the
//! driver and every operation takes `&mut self`, so interleaved bus access
//! needs an explicit mutex at the platform layer.

#![no_std]

pub mod bitbang;
pub mod data_types;
pub mod driver;
pub mod error;
pub mod registers;

pub use bitbang::{SoftI2c, SoftI2cError};
pub use driver::Ip5328p;
pub use error::Error;
pub use registers::DEFAULT_I2C_ADDRESS;
