//! nRF905 driver
//!
//! [`Nrf905`] combines the bus interface, the mode pins and the hopping table
//! cursor. Register access is only accepted by the chip in Standby, so every
//! codec call here switches to Standby for the transaction and restores the
//! previous mode afterwards. The fast channel config instruction is the
//! exception: it is only issued while hopping, when the radio is already in
//! Standby.
//!
//! Configuration follows a fixed sequence:
//!
//! 1. [`Nrf905::new`] with the SPI device, the three mode pins and a
//!    [`StatusRegistry`]
//! 2. [`Nrf905::initialize`]: Standby, settle delay, configuration register
//! 3. [`Nrf905::start_listening`]: tune to the first hopping table entry and
//!    enter burst receive
//! 4. [`Nrf905::on_data_ready`] on every rising edge of DR,
//!    [`Nrf905::roam`] to hop, [`Nrf905::send_frame`] to transmit
//!
//! For use from an interrupt-driven task and a foreground task at the same
//! time, wrap the driver in a [`Radio`](crate::Radio).

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use crate::commands::{FastConfig, ReadTxAddress, WriteTxAddress};
use crate::status::Tuning;
use crate::{
    Address, ChannelPowerWord, ChipProfile, ConfigRegister, Device, Error, Mode, ModeController,
    RoamingEngine, RxAddress, Status, StatusRegister, StatusRegistry,
};

/// Time between entering Standby and the first configuration write.
pub const POWER_UP_DELAY_US: u32 = 3000;

/// nRF905 driver
pub struct Nrf905<'a, M: RawMutex, SPI, TXEN, CE, PWR> {
    pub(crate) device: Device<SPI>,
    modes: ModeController<TXEN, CE, PWR>,
    pub(crate) status: &'a StatusRegistry<M>,
    pub(crate) profile: ChipProfile,
    roaming: Option<RoamingEngine<'a>>,
}

impl<'a, M, SPI, TXEN, CE, PWR> Nrf905<'a, M, SPI, TXEN, CE, PWR>
where
    M: RawMutex,
{
    /// Creates a driver. No pin or bus activity happens until
    /// [`initialize`](Self::initialize).
    pub fn new(
        spi: SPI,
        tx_enable: TXEN,
        chip_enable: CE,
        power_up: PWR,
        status: &'a StatusRegistry<M>,
        profile: ChipProfile,
    ) -> Self {
        Self {
            device: Device::new(spi),
            modes: ModeController::new(tx_enable, chip_enable, power_up),
            status,
            profile,
            roaming: None,
        }
    }

    /// Releases the SPI device and the pins as
    /// `(spi, tx_enable, chip_enable, power_up)`.
    pub fn release(self) -> (SPI, TXEN, CE, PWR) {
        let (tx_enable, chip_enable, power_up) = self.modes.release();
        (self.device.release(), tx_enable, chip_enable, power_up)
    }

    /// Returns the status registry shared with the driver.
    pub fn status(&self) -> &'a StatusRegistry<M> {
        self.status
    }

    /// Mode the chip was last switched to.
    pub fn mode(&self) -> Mode {
        self.status.mode()
    }

    /// Returns the active chip profile.
    pub fn profile(&self) -> &ChipProfile {
        &self.profile
    }

    /// Whether a hopping table is active.
    pub fn is_listening(&self) -> bool {
        self.roaming.is_some()
    }

    /// Position of the next hop in the hopping table, if listening.
    pub fn hop_position(&self) -> Option<usize> {
        self.roaming.as_ref().map(RoamingEngine::position)
    }

    /// Sets the power level used from the next hop on.
    pub fn set_power(&self, level: u8) {
        self.status.set_power(level);
    }
}

impl<'a, M, SPI, TXEN, CE, PWR> Nrf905<'a, M, SPI, TXEN, CE, PWR>
where
    M: RawMutex,
    SPI: SpiDevice,
    TXEN: OutputPin,
    CE: OutputPin,
    PWR: OutputPin,
{
    /// Switches the chip to `mode`. A no-op if it is already there.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error> {
        self.modes.set_mode(self.status, mode)
    }

    /// Runs one bus transaction in Standby and restores the previous mode,
    /// also when the transaction failed. A transaction error takes
    /// precedence over a failure to restore.
    fn with_standby<T>(
        &mut self,
        transaction: impl FnOnce(&mut Device<SPI>) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let previous = self.status.mode();
        self.set_mode(Mode::Standby)?;
        debug_assert!(self.status.mode().allows_register_access());

        let result = transaction(&mut self.device);
        let restored = self.set_mode(previous);

        let value = result?;
        restored?;
        Ok(value)
    }

    /// Powers the chip up into Standby and writes the configuration register
    /// for the active profile.
    ///
    /// `power` is stored for the channel/power word of later hops.
    pub fn initialize<D: DelayNs>(&mut self, delay: &mut D, power: u8) -> Result<(), Error> {
        self.status.set_power(power);
        self.set_mode(Mode::Standby)?;
        delay.delay_us(POWER_UP_DELAY_US);

        let config = ConfigRegister::for_profile(&self.profile);
        self.with_standby(|device| device.write_register(config))?;

        debug!("nRF905 initialized, power level {}", power);
        Ok(())
    }

    /// Reads the status register in Standby.
    pub fn read_status(&mut self) -> Result<StatusRegister, Error> {
        self.with_standby(|device| device.read_status())
    }

    /// Reads configuration bytes starting at `index` in Standby.
    pub fn read_config(&mut self, index: u8, buffer: &mut [u8]) -> Result<(), Error> {
        self.with_standby(|device| device.read_config(index, buffer))
    }

    /// Writes configuration bytes starting at `index` in Standby.
    pub fn write_config(&mut self, index: u8, bytes: &[u8]) -> Result<(), Error> {
        self.with_standby(|device| device.write_config(index, bytes))
    }

    /// Reads the whole configuration register in Standby.
    pub fn read_config_register(&mut self) -> Result<ConfigRegister, Error> {
        self.with_standby(|device| device.read_register::<ConfigRegister>())
    }

    /// Reads a received payload with the profile's read instruction.
    pub fn read_payload(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        let opcode = self.profile.rx_payload_opcode;
        self.with_standby(|device| device.read_payload(opcode, buffer))
    }

    /// Loads the TX payload buffer in Standby without transmitting.
    pub fn write_tx_payload(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.with_standby(|device| device.write_tx_payload(bytes))
    }

    /// Sets the TX address in Standby.
    pub fn write_tx_address(&mut self, address: Address) -> Result<(), Error> {
        self.with_standby(|device| device.execute_command(WriteTxAddress { address }))?;
        Ok(())
    }

    /// Reads the TX address in Standby.
    pub fn read_tx_address(&mut self) -> Result<Address, Error> {
        self.with_standby(|device| device.execute_command(ReadTxAddress))
    }

    /// Sets the RX address (configuration bytes 5 to 8) in Standby.
    pub fn write_rx_address(&mut self, address: Address) -> Result<(), Error> {
        self.with_standby(|device| device.write_register(RxAddress { address }))
    }

    /// Issues the channel config instruction in the current mode.
    pub fn write_fast_config(&mut self, word: ChannelPowerWord) -> Result<(), Error> {
        self.device.write_fast_config(FastConfig {
            word,
            flag: self.profile.fast_config_flag,
        })
    }

    /// Writes channel and addresses of `tuning` and enters burst receive.
    /// Expects the chip in Standby.
    fn apply_tuning(&mut self, tuning: Tuning) -> Result<(), Error> {
        self.write_fast_config(tuning.channel_power)?;
        self.write_tx_address(tuning.tx_address)?;
        self.write_rx_address(tuning.rx_address)?;
        self.set_mode(Mode::BurstReceive)
    }

    /// Starts receiving on the first channel of `table`.
    ///
    /// The first channel is applied without counting a hop or moving the
    /// table position, so the next [`roam`](Self::roam) applies the same
    /// channel again and the one after moves on to the second entry.
    ///
    /// # Errors
    /// * `Error::EmptyHoppingTable` - `table` has no entries
    pub fn start_listening(&mut self, table: &'a [u16]) -> Result<(), Error> {
        let engine = RoamingEngine::new(table)?;
        let channel = engine.current();
        self.roaming = Some(engine);

        self.set_mode(Mode::Standby)?;
        let tuning = self.status.record_channel(channel, false);
        self.apply_tuning(tuning)?;

        info!("listening on channel {}", channel);
        Ok(())
    }

    /// Hops to the next channel of the hopping table.
    ///
    /// The status registry is updated before the chip is written; if a bus
    /// write fails the registry already describes the new channel and the
    /// next successful hop brings both back in line.
    ///
    /// # Errors
    /// * `Error::NotListening` - no hopping table is active
    /// * `Error::Transport` - a pin or bus write failed
    pub fn roam(&mut self) -> Result<Tuning, Error> {
        if self.roaming.is_none() {
            return Err(Error::NotListening);
        }

        self.set_mode(Mode::Standby)?;
        let channel = self
            .roaming
            .as_mut()
            .map(RoamingEngine::advance)
            .ok_or(Error::NotListening)?;
        let tuning = self.status.record_channel(channel, true);
        self.apply_tuning(tuning)?;

        debug!("hopped to channel {}", channel);
        Ok(tuning)
    }

    /// Loads `payload` and starts a burst transmission.
    ///
    /// Returns once the chip is in burst transmit. The data-ready edge that
    /// marks the end of the transmission is handled by
    /// [`on_data_ready`](Self::on_data_ready).
    ///
    /// If loading the payload fails, the mode held before the call is
    /// restored, so a listening radio keeps receiving.
    ///
    /// # Errors
    /// * `Error::InvalidLength` - payload empty or longer than the profile's
    ///   payload width
    /// * `Error::Transport` - a pin or bus write failed
    pub fn send_frame(&mut self, payload: &[u8]) -> Result<(), Error> {
        if payload.is_empty() || payload.len() > usize::from(self.profile.payload_len) {
            return Err(Error::InvalidLength(payload.len()));
        }

        let previous = self.status.mode();
        self.set_mode(Mode::Standby)?;
        if let Err(e) = self.device.write_tx_payload(payload) {
            if let Err(restore) = self.set_mode(previous) {
                warn!("restoring {:?} failed: {:?}", previous, restore);
            }
            return Err(e);
        }
        self.set_mode(Mode::BurstTransmit)?;
        self.status.increment_sent();
        Ok(())
    }

    /// Returns to Standby and forgets the hopping table.
    pub fn stop_listening(&mut self) -> Result<(), Error> {
        self.roaming = None;
        self.set_mode(Mode::Standby)
    }

    /// Puts the chip into power down. Configuration is retained.
    pub fn power_down(&mut self) -> Result<(), Error> {
        self.roaming = None;
        self.set_mode(Mode::PowerDown)
    }

    /// Consistent copy of the radio status.
    pub fn snapshot(&self) -> Status {
        self.status.snapshot()
    }
}
