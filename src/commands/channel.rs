//! Channel/power word and the fast channel config instruction
//!
//! The channel config instruction is 16 bits wide and carries its payload in
//! the instruction itself: the upper bits select the instruction, the rest
//! hold the power level, the band bit and the 9-bit channel number. It
//! updates the channel without rewriting the configuration register.

/// Channel number bits of a channel/power word.
pub const CHANNEL_MASK: u16 = 0x01FF;

/// Bit position of the power level in a channel/power word.
pub const POWER_SHIFT: u16 = 10;

/// Compact selection of channel and output power
///
/// Packed as `channel | (power << 10)`. This is the only record of which
/// channel is active and the input of address derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelPowerWord(u16);

impl ChannelPowerWord {
    /// Packs a channel number and a power level.
    ///
    /// Channel bits above bit 8 are dropped, so bit 9 of the instruction
    /// (HFREQ_PLL) stays clear and the radio remains in the 433 MHz band.
    pub const fn new(channel: u16, power: u8) -> Self {
        Self((channel & CHANNEL_MASK) | ((power as u16) << POWER_SHIFT))
    }

    /// Wraps a packed word as stored in the status registry.
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Packed word as sent in the channel config instruction.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Channel number (9 bits).
    pub const fn channel(self) -> u16 {
        self.0 & CHANNEL_MASK
    }

    /// Power level.
    pub const fn power(self) -> u8 {
        (self.0 >> POWER_SHIFT) as u8
    }
}

/// Fast channel config instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastConfig {
    pub word: ChannelPowerWord,
    /// Instruction selector OR-ed into the word, see
    /// [`ChipProfile::fast_config_flag`](crate::ChipProfile::fast_config_flag)
    pub flag: u16,
}

impl FastConfig {
    /// Bytes as clocked out on the bus, instruction bits first.
    pub const fn to_frame(self) -> [u8; 2] {
        (self.word.raw() | self.flag).to_be_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_packs_channel_and_power() {
        let word = ChannelPowerWord::new(42, 5);
        assert_eq!(word.raw(), 42 | (5 << 10));
        assert_eq!(word.channel(), 42);
        assert_eq!(word.power(), 5);
    }

    #[test]
    fn channel_is_limited_to_nine_bits() {
        let word = ChannelPowerWord::new(0x3FF, 0);
        assert_eq!(word.channel(), 0x1FF);
        assert_eq!(word.raw(), 0x1FF);
    }

    #[test]
    fn fast_config_frame_leads_with_the_instruction_bits() {
        let frame = FastConfig {
            word: ChannelPowerWord::new(3, 5),
            flag: 0x8000,
        }
        .to_frame();
        assert_eq!(frame, [0x94, 0x03]);

        let legacy = FastConfig {
            word: ChannelPowerWord::new(3, 0),
            flag: 0x1000,
        }
        .to_frame();
        assert_eq!(legacy, [0x10, 0x03]);
    }

    #[test]
    fn channel_never_selects_the_high_band() {
        let word = ChannelPowerWord::new(0xFFFF, 0);
        assert_eq!(word.raw() & (1 << 9), 0);

        let frame = FastConfig { word, flag: 0x8000 }.to_frame();
        assert_eq!(frame[0] & 0x02, 0);
    }
}
