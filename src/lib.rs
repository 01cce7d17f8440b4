#![no_std]
//! nRF905 Radio Driver
//!
//! This crate provides a type-safe interface for the Nordic nRF905 sub-GHz
//! radio transceiver, together with a channel hopping scheme that derives the
//! TX and RX addresses of a link from the active channel.
//!
//! # Features
//! - 433 MHz ISM band, 511 channels (the 868/915 MHz PLL setting is not
//!   used by this driver)
//! - GFSK, 50 kbps, Manchester encoded
//! - Up to 32 byte payloads with address matching and 8/16-bit CRC
//! - Mode selection through three pins (PWR_UP, TRX_CE, TX_EN)
//! - Data-ready (DR) output for receive and transmit completion
//!
//! # Architecture
//! The driver is organized into several layers:
//!
//! - [`device`]: Raw SPI interface, one transaction per chip instruction
//! - [`registers`]: Configuration and status register definitions
//! - [`commands`]: Instruction opcodes, TX address commands and the fast
//!   channel config instruction
//! - [`mode`]: The pin-selected operating mode state machine
//! - [`address`]: TX/RX address derivation from the channel/power word
//! - [`Nrf905`]: The driver itself: initialization, hopping, transmit and
//!   data-ready handling, with every register access wrapped in Standby
//! - [`StatusRegistry`]: Mode, channel, addresses and traffic counters shared
//!   between tasks
//! - [`Radio`]: Async session sharing one driver between a foreground task
//!   and the data-ready event loop, with a channel watchdog and bounded
//!   acknowledgment wait
//!
//! # Usage
//! 1. Place a [`StatusRegistry`] in a `static`
//! 2. Create an [`Nrf905`] with the SPI device, the three mode pins and a
//!    [`ChipProfile`]
//! 3. Call [`Nrf905::initialize`] (or [`Radio::initialize`])
//! 4. Call `start_listening` with the hopping table shared by both ends
//! 5. Feed rising DR edges to [`Nrf905::on_data_ready`], or run
//!    [`Radio::run`] in its own task
//!
//! # Important Notes
//! - Registers and payload buffers are only accessible in Standby
//! - Setting the current mode again causes no pin activity
//! - Both ends must use the same hopping table and power level to agree on
//!   addresses
//!
//! # Example
//! ```no_run
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
//! use nrf905::{ChipProfile, Error, Nrf905, StatusRegistry};
//!
//! static STATUS: StatusRegistry<CriticalSectionRawMutex> = StatusRegistry::new();
//! static TABLE: [u16; 3] = [3, 17, 42];
//!
//! fn start<SPI, P>(
//!     spi: SPI,
//!     tx_en: P,
//!     trx_ce: P,
//!     pwr_up: P,
//!     delay: &mut impl DelayNs,
//! ) -> Result<(), Error>
//! where
//!     SPI: SpiDevice,
//!     P: OutputPin,
//! {
//!     let mut radio = Nrf905::new(spi, tx_en, trx_ce, pwr_up, &STATUS, ChipProfile::DEFAULT);
//!     radio.initialize(delay, 3)?;
//!     radio.start_listening(&TABLE)?;
//!     Ok(())
//! }
//! ```

#[macro_use]
mod fmt;

pub mod address;
mod bridge;
pub mod commands;
mod config;
pub mod device;
mod driver;
mod error;
pub mod mode;
mod radio;
pub mod registers;
mod roaming;
mod status;

pub use address::Address;
pub use bridge::{DataReady, Frame};
pub use commands::{ChannelPowerWord, FastConfig};
pub use config::{ChipProfile, RadioConfig};
pub use device::Device;
pub use driver::{Nrf905, POWER_UP_DELAY_US};
pub use error::Error;
pub use mode::{Mode, ModeController, PinLevels};
pub use radio::{Radio, FRAME_QUEUE_DEPTH};
pub use registers::*;
pub use roaming::RoamingEngine;
pub use status::{Status, StatusRegistry, Tuning};
