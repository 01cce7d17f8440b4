//! Configuration register
//!
//! The nRF905 configuration register is a 10-byte block addressed by byte
//! index. The instruction `WC`/`RC` selects the first byte; the transfer then
//! continues through the following bytes.
//!
//! | Byte | Content                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | CH_NO[7:0]                                                  |
//! | 1    | AUTO_RETRAN, RX_RED_PWR, PA_PWR[1:0], HFREQ_PLL, CH_NO[8]   |
//! | 2    | RX_AFW[2:0] << 4, TX_AFW[2:0]                               |
//! | 3    | RX_PW[5:0]                                                  |
//! | 4    | TX_PW[5:0]                                                  |
//! | 5-8  | RX_ADDRESS, least significant byte first                    |
//! | 9    | CRC_MODE, CRC_EN, XOF[2:0], UP_CLK_EN, UP_CLK_FREQ[1:0]     |
//!
//! The register is written once at initialization. Channel changes afterwards
//! go through [`FastConfig`](crate::FastConfig), and the RX address through
//! [`RxAddress`].

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::{Address, ChipProfile};

/// Configuration byte index of the RX address.
pub const RX_ADDRESS_INDEX: u8 = 5;

/// Address width in bytes used for both TX and RX.
pub const ADDRESS_WIDTH: u8 = 4;

bitflags! {
    /// Configuration byte 1
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RfConfig: u8 {
        /// Retransmit the TX payload until TRX_CE is pulled low
        const AUTO_RETRANSMIT = 1 << 5;
        /// Reduced receive current at lower sensitivity
        const RX_REDUCED_POWER = 1 << 4;
        const PA_POWER_HIGH = 1 << 3;
        const PA_POWER_LOW = 1 << 2;
        /// 868/915 MHz band instead of 433 MHz
        const HFREQ_PLL = 1 << 1;
        /// Bit 8 of the channel number
        const CHANNEL_MSB = 1 << 0;
    }
}

bitflags! {
    /// Configuration byte 9
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OutputConfig: u8 {
        /// 16-bit CRC instead of 8-bit
        const CRC_MODE_16 = 1 << 7;
        const CRC_ENABLE = 1 << 6;
        const XOF_2 = 1 << 5;
        const XOF_1 = 1 << 4;
        const XOF_0 = 1 << 3;
        /// 16 MHz crystal
        const XTAL_16MHZ = Self::XOF_1.bits() | Self::XOF_0.bits();
        /// Output clock on the UP_CLK pin
        const UP_CLK_ENABLE = 1 << 2;
        const UP_CLK_FREQ_1 = 1 << 1;
        const UP_CLK_FREQ_0 = 1 << 0;
    }
}

/// Configuration register (configuration bytes 0 to 9)
#[register(0x00u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct ConfigRegister {
    /// Channel number bits 7:0
    pub channel: u8,
    pub rf: RfConfig,
    pub rx_address_width: u8,
    pub tx_address_width: u8,
    pub rx_payload_width: u8,
    pub tx_payload_width: u8,
    /// Base RX address, replaced by the derived address on every hop
    pub rx_address: Address,
    pub output: OutputConfig,
}

impl ConfigRegister {
    /// Register template for a chip profile
    ///
    /// 433 MHz band, channel 0x4C, maximum PA power, 4-byte addresses,
    /// payload width from the profile, 16 MHz crystal, CRC enabled.
    pub fn for_profile(profile: &ChipProfile) -> Self {
        Self {
            channel: 0x4C,
            rf: RfConfig::PA_POWER_HIGH | RfConfig::PA_POWER_LOW,
            rx_address_width: ADDRESS_WIDTH,
            tx_address_width: ADDRESS_WIDTH,
            rx_payload_width: profile.payload_len,
            tx_payload_width: profile.payload_len,
            rx_address: Address(0x0840_0C00),
            output: OutputConfig::CRC_ENABLE | OutputConfig::XTAL_16MHZ,
        }
    }
}

impl Default for ConfigRegister {
    fn default() -> Self {
        Self::for_profile(&ChipProfile::DEFAULT)
    }
}

impl FromByteArray for ConfigRegister {
    type Error = Infallible;
    type Array = [u8; 10];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            channel: bytes[0],
            rf: RfConfig::from_bits_retain(bytes[1]),
            rx_address_width: (bytes[2] >> 4) & 0x07,
            tx_address_width: bytes[2] & 0x07,
            rx_payload_width: bytes[3] & 0x3F,
            tx_payload_width: bytes[4] & 0x3F,
            rx_address: Address(u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]])),
            output: OutputConfig::from_bits_retain(bytes[9]),
        })
    }
}

impl ToByteArray for ConfigRegister {
    type Error = Infallible;
    type Array = [u8; 10];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let address = self.rx_address.0.to_le_bytes();
        Ok([
            self.channel,
            self.rf.bits(),
            ((self.rx_address_width & 0x07) << 4) | (self.tx_address_width & 0x07),
            self.rx_payload_width & 0x3F,
            self.tx_payload_width & 0x3F,
            address[0],
            address[1],
            address[2],
            address[3],
            self.output.bits(),
        ])
    }
}

/// RX address register (configuration bytes 5 to 8)
///
/// The chip has no dedicated RX address instruction; the address is written
/// through the configuration register starting at byte 5.
#[register(0x05u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct RxAddress {
    pub address: Address,
}

impl FromByteArray for RxAddress {
    type Error = Infallible;
    type Array = [u8; 4];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            address: Address(u32::from_le_bytes(bytes)),
        })
    }
}

impl ToByteArray for RxAddress {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.address.0.to_le_bytes())
    }
}
