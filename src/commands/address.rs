//! TX address commands
//!
//! The TX address lives behind dedicated instructions. The RX address is part
//! of the configuration register, see [`RxAddress`](crate::RxAddress).

use regiface::{Command, NoParameters};

use super::{READ_TX_ADDRESS, WRITE_TX_ADDRESS};
use crate::Address;

/// Write TX address command (0x22)
///
/// Sets the address prepended to every transmitted packet. Only accepted in
/// Standby.
#[derive(Debug, Clone)]
pub struct WriteTxAddress {
    pub address: Address,
}

impl Command for WriteTxAddress {
    type IdType = u8;
    type CommandParameters = Address;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        WRITE_TX_ADDRESS
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.address
    }
}

/// Read TX address command (0x23)
#[derive(Debug, Clone)]
pub struct ReadTxAddress;

impl Command for ReadTxAddress {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = Address;

    fn id() -> Self::IdType {
        READ_TX_ADDRESS
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}
