//! This is a platform-agnostic Rust driver for the TMP102 temperature sensor
//! based on the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//!
//! The TMP102 exposes four 16-bit registers behind a one-byte pointer:
//! temperature, configuration and the two alert thresholds. The driver
//! keeps an in-memory shadow of the configuration register so every
//! setting goes out as a single full-word write, and caches the last
//! register selected through the pointer so repeated reads of the same
//! register skip the pointer write.
//!
//! For further details of the device architecture and operation, please refer
//! to the official [`Datasheet`].
//!
//! [`Datasheet`]: https://www.ti.com/lit/gpn/tmp102

#![doc(html_root_url = "https://docs.rs/tmp102/latest")]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

mod registers;
pub use registers::*;

pub mod blocking;

/// ADD0 pin logic level representation.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Add0 {
    /// ADD0 tied to GND (default).
    Gnd,
    /// ADD0 tied to V+.
    Vplus,
    /// ADD0 tied to SDA.
    Sda,
    /// ADD0 tied to SCL.
    Scl,
}

impl Default for Add0 {
    fn default() -> Self {
        Self::Gnd
    }
}

impl From<Add0> for u8 {
    fn from(strap: Add0) -> Self {
        match strap {
            Add0::Gnd => 0b100_1000,
            Add0::Vplus => 0b100_1001,
            Add0::Sda => 0b100_1010,
            Add0::Scl => 0b100_1011,
        }
    }
}
