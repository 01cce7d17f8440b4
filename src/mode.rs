//! Operating mode control
//!
//! The nRF905 has no mode command. Its state is selected by three input pins
//! driven by the host:
//!
//! | Mode          | PWR_UP | TRX_CE | TX_EN |
//! |---------------|--------|--------|-------|
//! | Power down    | low    | low    | low   |
//! | Standby       | high   | low    | low   |
//! | Burst receive | high   | high   | low   |
//! | Burst transmit| high   | high   | high  |
//!
//! The configuration register, the address registers and the payload buffers
//! are only accessible over SPI while the chip is in Standby.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::{OutputPin, PinState};

use crate::{Error, StatusRegistry};

/// Operating mode of the chip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Lowest current draw, register contents retained
    #[default]
    PowerDown = 0,
    /// Idle; SPI register access allowed
    Standby = 1,
    /// Receiving on the configured channel and RX address
    BurstReceive = 2,
    /// Transmitting the TX payload buffer
    BurstTransmit = 3,
}

impl TryFrom<u8> for Mode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::PowerDown),
            1 => Ok(Self::Standby),
            2 => Ok(Self::BurstReceive),
            3 => Ok(Self::BurstTransmit),
            invalid => Err(Error::InvalidMode(invalid)),
        }
    }
}

/// Pin levels selecting one [`Mode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinLevels {
    pub power_up: PinState,
    pub chip_enable: PinState,
    pub tx_enable: PinState,
}

impl Mode {
    /// Returns the pin triple that selects this mode.
    pub const fn pin_levels(self) -> PinLevels {
        use PinState::{High, Low};

        let (power_up, chip_enable, tx_enable) = match self {
            Self::PowerDown => (Low, Low, Low),
            Self::Standby => (High, Low, Low),
            Self::BurstReceive => (High, High, Low),
            Self::BurstTransmit => (High, High, High),
        };

        PinLevels {
            power_up,
            chip_enable,
            tx_enable,
        }
    }

    /// Whether SPI register access is accepted in this mode.
    pub const fn allows_register_access(self) -> bool {
        matches!(self, Self::Standby)
    }
}

/// Owns the three mode pins and applies mode transitions.
///
/// The current mode is recorded in the [`StatusRegistry`] rather than here, so
/// that readers of the status snapshot see the same mode the pins select.
pub struct ModeController<TXEN, CE, PWR> {
    tx_enable: TXEN,
    chip_enable: CE,
    power_up: PWR,
}

impl<TXEN, CE, PWR> ModeController<TXEN, CE, PWR> {
    /// Takes ownership of the three mode pins. The pins are not driven until
    /// the first [`set_mode`](Self::set_mode).
    pub fn new(tx_enable: TXEN, chip_enable: CE, power_up: PWR) -> Self {
        Self {
            tx_enable,
            chip_enable,
            power_up,
        }
    }

    /// Releases the pins as `(tx_enable, chip_enable, power_up)`.
    pub fn release(self) -> (TXEN, CE, PWR) {
        (self.tx_enable, self.chip_enable, self.power_up)
    }
}

impl<TXEN, CE, PWR> ModeController<TXEN, CE, PWR>
where
    TXEN: OutputPin,
    CE: OutputPin,
    PWR: OutputPin,
{
    /// Drives the pins for `target` and records it as the current mode.
    ///
    /// Requesting the mode that is already recorded does not touch the pins.
    /// A failed pin write leaves the recorded mode unchanged, even though some
    /// of the three pins may already carry the new level.
    pub fn set_mode<M: RawMutex>(
        &mut self,
        status: &StatusRegistry<M>,
        target: Mode,
    ) -> Result<(), Error> {
        let current = status.mode();
        if current == target {
            return Ok(());
        }

        let levels = target.pin_levels();
        self.tx_enable
            .set_state(levels.tx_enable)
            .map_err(|_| Error::Transport)?;
        self.chip_enable
            .set_state(levels.chip_enable)
            .map_err(|_| Error::Transport)?;
        self.power_up
            .set_state(levels.power_up)
            .map_err(|_| Error::Transport)?;

        status.record_mode(target);
        trace!("mode {:?} -> {:?}", current, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_mode_values_round_trip() {
        for raw in 0..4u8 {
            let mode = Mode::try_from(raw).unwrap();
            assert_eq!(mode as u8, raw);
        }
        assert_eq!(Mode::try_from(4), Err(Error::InvalidMode(4)));
        assert_eq!(Mode::try_from(0xFF), Err(Error::InvalidMode(0xFF)));
    }

    #[test]
    fn burst_modes_enable_the_chip() {
        assert_eq!(Mode::BurstReceive.pin_levels().chip_enable, PinState::High);
        assert_eq!(Mode::BurstTransmit.pin_levels().tx_enable, PinState::High);
        assert_eq!(Mode::BurstReceive.pin_levels().tx_enable, PinState::Low);
        assert_eq!(Mode::Standby.pin_levels().power_up, PinState::High);
        assert_eq!(Mode::PowerDown.pin_levels().power_up, PinState::Low);
    }

    #[test]
    fn only_standby_accepts_register_access() {
        assert!(Mode::Standby.allows_register_access());
        assert!(!Mode::PowerDown.allows_register_access());
        assert!(!Mode::BurstReceive.allows_register_access());
        assert!(!Mode::BurstTransmit.allows_register_access());
    }
}
