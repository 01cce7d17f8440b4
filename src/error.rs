//! Driver error type

use core::fmt;

use crate::Mode;

/// Errors reported by the nRF905 driver
///
/// Bus and pin failures of the underlying HAL are collapsed into
/// [`Error::Transport`]; the HAL error types carry no information the driver
/// could act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Raw mode value outside `0..=3`
    InvalidMode(u8),
    /// Buffer length outside the range accepted by the chip (1 to 32 bytes,
    /// or the active payload width for frames)
    InvalidLength(usize),
    /// An SPI transaction or a pin write failed
    Transport,
    /// A data-ready edge arrived while the radio was in a mode that cannot
    /// produce one
    ProtocolInconsistency(Mode),
    /// `start_listening` was given an empty hopping table
    EmptyHoppingTable,
    /// The operation needs a hopping table but the radio is not listening
    NotListening,
    /// No acknowledgment edge arrived within the configured window
    AckTimeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMode(value) => write!(f, "invalid mode value {value}"),
            Self::InvalidLength(len) => write!(f, "invalid buffer length {len}"),
            Self::Transport => f.write_str("bus or pin transaction failed"),
            Self::ProtocolInconsistency(mode) => {
                write!(f, "data ready signalled in mode {mode:?}")
            }
            Self::EmptyHoppingTable => f.write_str("hopping table is empty"),
            Self::NotListening => f.write_str("radio is not listening"),
            Self::AckTimeout => f.write_str("transmit was not acknowledged"),
        }
    }
}

impl core::error::Error for Error {}
