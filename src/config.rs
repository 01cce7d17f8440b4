//! Driver configuration
//!
//! Two board layouts exist for the same chip. They differ in the selector bit
//! of the fast channel config instruction and in the payload width the
//! configuration register is programmed with. Pin assignment is not part of
//! the profile: pins are handed to the driver as `OutputPin` values.

use crate::commands::READ_TX_PAYLOAD;

/// Board/firmware layout of an nRF905 installation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipProfile {
    /// Bit OR-ed into the channel/power word to form the channel config
    /// instruction
    pub fast_config_flag: u16,
    /// RX and TX payload width in bytes (1 to 32)
    pub payload_len: u8,
    /// Instruction used to drain a received payload
    pub rx_payload_opcode: u8,
}

impl ChipProfile {
    /// 32-byte payloads, `0x8000` channel config selector
    pub const DEFAULT: Self = Self {
        fast_config_flag: 0x8000,
        payload_len: 32,
        rx_payload_opcode: READ_TX_PAYLOAD,
    };

    /// 16-byte payloads, `0x1000` channel config selector
    pub const LEGACY: Self = Self {
        fast_config_flag: 0x1000,
        payload_len: 16,
        rx_payload_opcode: READ_TX_PAYLOAD,
    };
}

impl Default for ChipProfile {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings of a [`Radio`](crate::Radio) session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    /// Power level applied by `initialize` and used for every hop
    pub initial_power: u8,
    /// How long `send_frame` waits for the data-ready edge that
    /// acknowledges a transmission
    pub ack_timeout_ms: u32,
    /// Window without data-ready activity after which the session hops to
    /// the next channel
    pub watchdog_timeout_ms: u32,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            initial_power: 0,
            ack_timeout_ms: 100,
            watchdog_timeout_ms: 1000,
        }
    }
}
