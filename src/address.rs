//! Address derivation
//!
//! Both ends of a link compute their TX and RX addresses from the channel/power
//! word at the same hopping table position, so no address exchange is needed
//! after a hop. The word is replicated into both halves of a 32-bit value and
//! masked with a TX and an RX mask.

use core::convert::Infallible;

use regiface::{FromByteArray, ToByteArray};

use crate::ChannelPowerWord;

/// Mask selecting the TX address bits.
pub const TX_ADDRESS_MASK: u32 = 0xA33D_59AA;

/// Mask selecting the RX address bits.
pub const RX_ADDRESS_MASK: u32 = 0x5CA2_59AA;

/// 4-byte over-the-air address
///
/// Transferred to the chip least significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Address(pub u32);

impl ToByteArray for Address {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.0.to_le_bytes())
    }
}

impl FromByteArray for Address {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self(u32::from_le_bytes(bytes)))
    }
}

const fn replicate(word: ChannelPowerWord) -> u32 {
    let word = word.raw() as u32;
    word | (word << 16)
}

/// TX address for a channel/power word.
pub const fn tx_address(word: ChannelPowerWord) -> Address {
    Address(replicate(word) & TX_ADDRESS_MASK)
}

/// RX address for a channel/power word.
pub const fn rx_address(word: ChannelPowerWord) -> Address {
    Address(replicate(word) & RX_ADDRESS_MASK)
}

/// Both addresses for a channel/power word as `(tx, rx)`.
pub const fn derive(word: ChannelPowerWord) -> (Address, Address) {
    (tx_address(word), rx_address(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    // The low halves of both masks are identical, so TX and RX can only differ
    // through the upper half. Words without bits outside 0x0060 collide.
    const COLLIDING_BITS: u16 = !((TX_ADDRESS_MASK ^ RX_ADDRESS_MASK) >> 16) as u16;

    #[test]
    fn upper_mask_halves_are_disjoint_except_one_bit() {
        let tx_high = TX_ADDRESS_MASK >> 16;
        let rx_high = RX_ADDRESS_MASK >> 16;
        assert_eq!(tx_high & rx_high, 0x0020);
        assert_eq!(TX_ADDRESS_MASK & 0xFFFF, RX_ADDRESS_MASK & 0xFFFF);
    }

    #[test]
    fn tx_and_rx_differ_for_every_non_colliding_word() {
        for raw in 0..=u16::MAX {
            let word = ChannelPowerWord::from_raw(raw);
            let (tx, rx) = derive(word);
            if raw & !COLLIDING_BITS == 0 {
                assert_eq!(tx, rx, "word {raw:#06x}");
            } else {
                assert_ne!(tx, rx, "word {raw:#06x}");
            }
        }
    }

    #[test]
    fn every_word_with_power_set_yields_distinct_addresses() {
        for channel in 0..0x200u16 {
            for power in 1..4u8 {
                let (tx, rx) = derive(ChannelPowerWord::new(channel, power));
                assert_ne!(tx, rx);
            }
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        let word = ChannelPowerWord::new(17, 5);
        let first = derive(word);
        for _ in 0..8 {
            assert_eq!(derive(word), first);
        }
        assert_eq!(first.0, Address(0x0011_1000));
    }

    #[test]
    fn known_addresses() {
        // 3 | (5 << 10) = 0x1403
        let word = ChannelPowerWord::new(3, 5);
        assert_eq!(word.raw(), 0x1403);
        assert_eq!(tx_address(word), Address(0x0001_1002));
        assert_eq!(rx_address(word), Address(0x1402_1002));
    }

    #[test]
    fn addresses_are_sent_little_endian() {
        let bytes = Address(0x1234_5678).to_bytes().unwrap();
        assert_eq!(bytes, [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(Address::from_bytes(bytes).unwrap(), Address(0x1234_5678));
    }
}
