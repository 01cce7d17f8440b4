//! nRF905 bus interface
//!
//! This module provides the raw SPI layer of the driver. [`Device<SPI>`] wraps
//! an SPI device and turns each chip instruction into exactly one SPI
//! transaction:
//! - Reading and writing typed configuration registers
//! - Reading and writing raw configuration bytes and payloads
//! - Executing TX address commands
//! - Issuing the 16-bit fast channel config instruction
//!
//! `Device` does not know about operating modes. The chip ignores register
//! access outside Standby, so callers go through
//! [`Nrf905`](crate::Nrf905), which switches modes around each call.
//!
//! # Example
//! ```no_run
//! use embedded_hal::spi::SpiDevice;
//! use nrf905::{ConfigRegister, Device, Error};
//!
//! fn read_config<SPI: SpiDevice>(spi: SPI) -> Result<ConfigRegister, Error> {
//!     let mut device = Device::new(spi);
//!     device.read_register::<ConfigRegister>()
//! }
//! ```

use core::convert::Infallible;

use embedded_hal::spi::{Operation, SpiDevice};
use regiface::{ByteArray, Command, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::commands::{self, FastConfig, MAX_TRANSFER_LEN, WRITE_TX_PAYLOAD};
use crate::{Error, StatusRegister};

/// Raw bus interface of the nRF905
pub struct Device<SPI> {
    spi: SPI,
}

impl<SPI> Device<SPI> {
    /// Creates a new Device instance wrapping the provided SPI interface.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Releases the underlying SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

fn check_len(len: usize) -> Result<(), Error> {
    if (1..=MAX_TRANSFER_LEN).contains(&len) {
        Ok(())
    } else {
        Err(Error::InvalidLength(len))
    }
}

impl<SPI> Device<SPI>
where
    SPI: SpiDevice,
{
    /// Reads the status register.
    ///
    /// Clocks a single `RC` instruction for configuration byte 1; the byte
    /// shifted back during the instruction is the status register.
    pub fn read_status(&mut self) -> Result<StatusRegister, Error> {
        let mut frame = [commands::read_config(1)];
        self.spi
            .transfer_in_place(&mut frame)
            .map_err(|_| Error::Transport)?;

        Ok(StatusRegister::from_bits_retain(frame[0]))
    }

    /// Reads a typed configuration register.
    ///
    /// # Errors
    /// * `Error::Transport` - SPI communication failed
    pub fn read_register<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible>,
    {
        let mut raw_value = R::Array::new();

        self.spi
            .transaction(&mut [
                Operation::Write(&[commands::read_config(R::id())]),
                Operation::Read(raw_value.as_mut()),
            ])
            .map_err(|_| Error::Transport)?;

        Ok(R::from_bytes(raw_value).unwrap_or_else(|never| match never {}))
    }

    /// Writes a typed configuration register.
    ///
    /// # Errors
    /// * `Error::Transport` - SPI communication failed
    pub fn write_register<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let raw_value = register.to_bytes().unwrap_or_else(|never| match never {});

        self.spi
            .transaction(&mut [
                Operation::Write(&[commands::write_config(R::id())]),
                Operation::Write(raw_value.as_ref()),
            ])
            .map_err(|_| Error::Transport)
    }

    /// Reads `buffer.len()` configuration bytes starting at `index`.
    ///
    /// # Errors
    /// * `Error::InvalidLength` - buffer empty or longer than 32 bytes
    /// * `Error::Transport` - SPI communication failed
    pub fn read_config(&mut self, index: u8, buffer: &mut [u8]) -> Result<(), Error> {
        check_len(buffer.len())?;

        self.spi
            .transaction(&mut [
                Operation::Write(&[commands::read_config(index)]),
                Operation::Read(buffer),
            ])
            .map_err(|_| Error::Transport)
    }

    /// Writes configuration bytes starting at `index`.
    ///
    /// # Errors
    /// * `Error::InvalidLength` - buffer empty or longer than 32 bytes
    /// * `Error::Transport` - SPI communication failed
    pub fn write_config(&mut self, index: u8, bytes: &[u8]) -> Result<(), Error> {
        check_len(bytes.len())?;

        self.spi
            .transaction(&mut [
                Operation::Write(&[commands::write_config(index)]),
                Operation::Write(bytes),
            ])
            .map_err(|_| Error::Transport)
    }

    /// Reads a payload buffer with the given read instruction
    /// ([`READ_TX_PAYLOAD`](commands::READ_TX_PAYLOAD) or
    /// [`READ_RX_PAYLOAD`](commands::READ_RX_PAYLOAD)).
    ///
    /// # Errors
    /// * `Error::InvalidLength` - buffer empty or longer than 32 bytes
    /// * `Error::Transport` - SPI communication failed
    pub fn read_payload(&mut self, opcode: u8, buffer: &mut [u8]) -> Result<(), Error> {
        check_len(buffer.len())?;

        self.spi
            .transaction(&mut [Operation::Write(&[opcode]), Operation::Read(buffer)])
            .map_err(|_| Error::Transport)
    }

    /// Loads the TX payload buffer.
    ///
    /// # Errors
    /// * `Error::InvalidLength` - payload empty or longer than 32 bytes
    /// * `Error::Transport` - SPI communication failed
    pub fn write_tx_payload(&mut self, bytes: &[u8]) -> Result<(), Error> {
        check_len(bytes.len())?;

        self.spi
            .transaction(&mut [Operation::Write(&[WRITE_TX_PAYLOAD]), Operation::Write(bytes)])
            .map_err(|_| Error::Transport)
    }

    /// Issues the 16-bit channel config instruction.
    pub fn write_fast_config(&mut self, command: FastConfig) -> Result<(), Error> {
        self.spi
            .write(&command.to_frame())
            .map_err(|_| Error::Transport)
    }

    /// Executes a command on the device.
    ///
    /// # Returns
    /// Command response parameters on success
    ///
    /// # Errors
    /// * `Error::Transport` - SPI communication failed or the response did
    ///   not decode
    pub fn execute_command<C>(&mut self, command: C) -> Result<C::ResponseParameters, Error>
    where
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray<Error = Infallible>,
    {
        let request = command
            .invoking_parameters()
            .to_bytes()
            .unwrap_or_else(|never| match never {});
        let mut raw_response = <C::ResponseParameters as FromByteArray>::Array::new();

        self.spi
            .transaction(&mut [
                Operation::Write(&[C::id()]),
                Operation::Write(request.as_ref()),
                Operation::Read(raw_response.as_mut()),
            ])
            .map_err(|_| Error::Transport)?;

        C::ResponseParameters::from_bytes(raw_response).map_err(|_| Error::Transport)
    }
}
