//! Status register
//!
//! The status register has no address. Its value is shifted out on MISO
//! during the instruction byte of every SPI transaction.

use bitflags::bitflags;

bitflags! {
    /// Status register flags
    ///
    /// Mirrors the AM and DR output pins.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusRegister: u8 {
        /// Address match: a packet with the configured RX address is being
        /// received
        const ADDRESS_MATCH = 1 << 7;
        /// Data ready: a packet was received, or a transmission finished
        const DATA_READY = 1 << 5;
    }
}

impl StatusRegister {
    /// DR flag set.
    pub fn data_ready(self) -> bool {
        self.contains(Self::DATA_READY)
    }

    /// AM flag set.
    pub fn address_match(self) -> bool {
        self.contains(Self::ADDRESS_MATCH)
    }
}
