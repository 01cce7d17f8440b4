//! Data-ready handling
//!
//! The DR pin rises for two reasons: a packet with a matching address and a
//! valid CRC was received, or a burst transmission finished. The chip does
//! not say which; the mode the driver put it in does.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use heapless::Vec;

use crate::commands::MAX_TRANSFER_LEN;
use crate::{Error, Mode, Nrf905};

/// One received payload
pub type Frame = Vec<u8, MAX_TRANSFER_LEN>;

/// Meaning of a data-ready edge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataReady {
    /// A packet was received and drained from the chip
    Received(Frame),
    /// A transmission finished; the radio is back in burst receive
    Acknowledged,
}

impl<'a, M, SPI, TXEN, CE, PWR> Nrf905<'a, M, SPI, TXEN, CE, PWR>
where
    M: RawMutex,
    SPI: SpiDevice,
    TXEN: OutputPin,
    CE: OutputPin,
    PWR: OutputPin,
{
    /// Handles one rising edge of the data-ready pin.
    ///
    /// - In burst receive: drains the payload (profile payload width), counts
    ///   it and re-arms burst receive. A status register without the DR flag
    ///   is logged and the payload is read anyway.
    /// - In burst transmit: the transmission is done; switches to burst
    ///   receive.
    ///
    /// # Errors
    /// * `Error::ProtocolInconsistency` - the edge arrived in power down or
    ///   Standby; nothing is changed
    /// * `Error::Transport` - a pin or bus transaction failed
    pub fn on_data_ready(&mut self) -> Result<DataReady, Error> {
        match self.status.mode() {
            Mode::BurstReceive => {
                let received = self.drain_payload();
                let rearmed = self.set_mode(Mode::BurstReceive);

                let frame = received?;
                rearmed?;
                self.status.increment_received();
                Ok(DataReady::Received(frame))
            }
            Mode::BurstTransmit => {
                self.set_mode(Mode::BurstReceive)?;
                trace!("transmission acknowledged");
                Ok(DataReady::Acknowledged)
            }
            mode => {
                error!("data ready in mode {:?}, neither receiving nor transmitting", mode);
                Err(Error::ProtocolInconsistency(mode))
            }
        }
    }

    fn drain_payload(&mut self) -> Result<Frame, Error> {
        self.set_mode(Mode::Standby)?;

        let status = self.device.read_status()?;
        if !status.data_ready() {
            warn!(
                "data ready edge without DR flag in status register ({})",
                status.bits()
            );
        }

        let len = usize::from(self.profile.payload_len);
        let mut buffer = [0u8; MAX_TRANSFER_LEN];
        let payload = buffer.get_mut(..len).ok_or(Error::InvalidLength(len))?;
        self.device
            .read_payload(self.profile.rx_payload_opcode, payload)?;

        Frame::from_slice(payload).map_err(|_| Error::InvalidLength(len))
    }
}
