//! Radio command implementations
//!
//! The nRF905 SPI instruction set is small. Every transaction starts with one
//! instruction byte, followed by the data written or read:
//!
//! | Instruction            | Byte              | Data                    |
//! |------------------------|-------------------|-------------------------|
//! | Write configuration    | `0000 aaaa`       | from byte `a` onward    |
//! | Read configuration     | `0001 aaaa`       | from byte `a` onward    |
//! | Write TX payload       | `0x20`            | 1 to 32 bytes           |
//! | Read TX payload        | `0x21`            | 1 to 32 bytes           |
//! | Write TX address       | `0x22`            | 4 bytes                 |
//! | Read TX address        | `0x23`            | 4 bytes                 |
//! | Read RX payload        | `0x24`            | 1 to 32 bytes           |
//! | Channel config (fast)  | `10pp hccc cccc cccc` | none, 16-bit instruction |
//!
//! The status register is clocked out on MISO while the instruction byte is
//! clocked in.
//!
//! # Command Categories
//! - [`address`]: TX address commands
//! - [`channel`]: channel/power word and the fast channel config instruction
//!
//! Payload and configuration access take variable-length buffers and are
//! issued through [`Device`](crate::Device) directly with the opcodes below.

mod address;
mod channel;

pub use address::*;
pub use channel::*;

/// Longest payload or configuration block the chip transfers in one
/// instruction.
pub const MAX_TRANSFER_LEN: usize = 32;

/// Write configuration register starting at byte `index`.
pub const fn write_config(index: u8) -> u8 {
    index & 0x0F
}

/// Read configuration register starting at byte `index`.
pub const fn read_config(index: u8) -> u8 {
    (index & 0x0F) | 0x10
}

/// Write TX payload
pub const WRITE_TX_PAYLOAD: u8 = 0x20;
/// Read TX payload
pub const READ_TX_PAYLOAD: u8 = 0x21;
/// Write TX address
pub const WRITE_TX_ADDRESS: u8 = 0x22;
/// Read TX address
pub const READ_TX_ADDRESS: u8 = 0x23;
/// Read RX payload
pub const READ_RX_PAYLOAD: u8 = 0x24;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_opcodes_mask_the_index() {
        assert_eq!(write_config(0), 0x00);
        assert_eq!(write_config(5), 0x05);
        assert_eq!(write_config(0x25), 0x05);
        assert_eq!(read_config(1), 0x11);
        assert_eq!(read_config(0x1F), 0x1F);
    }
}
