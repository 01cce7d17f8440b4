//! Simulated nRF905 for driver tests
//!
//! `MockSpi`, the three `MockPin`s and `DataReadyPin` share one `Chip` that
//! records every transaction and pin write and answers reads the way the real
//! chip would.

#![allow(dead_code)]

use std::cell::RefCell;
use std::future::{pending, poll_fn};
use std::rc::Rc;
use std::task::Poll;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};
use embedded_hal_async::digital::Wait;
use nrf905::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pin {
    TxEnable,
    ChipEnable,
    PowerUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Chip mode selected by the pins while the transaction ran
    pub mode: Mode,
    /// Every byte clocked into the chip
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct Chip {
    pub transactions: Vec<Transaction>,
    pub pin_writes: Vec<(Pin, bool)>,
    pub tx_enable: bool,
    pub chip_enable: bool,
    pub power_up: bool,
    /// Value shifted out during every instruction byte
    pub status: u8,
    /// Contents returned by payload reads
    pub payload: Vec<u8>,
    pub tx_address: [u8; 4],
    pub config: [u8; 10],
    pub fail_spi: bool,
    pub fail_pins: bool,
    /// Pending rising edges on DR
    pub edges: usize,
    /// Raise DR whenever TX_EN goes high
    pub ack_on_transmit: bool,
}

impl Default for Chip {
    fn default() -> Self {
        Self {
            transactions: Vec::new(),
            pin_writes: Vec::new(),
            tx_enable: false,
            chip_enable: false,
            power_up: false,
            status: 0,
            payload: vec![0; 32],
            tx_address: [0; 4],
            config: [0; 10],
            fail_spi: false,
            fail_pins: false,
            edges: 0,
            ack_on_transmit: false,
        }
    }
}

impl Chip {
    pub fn mode(&self) -> Mode {
        match (self.power_up, self.chip_enable, self.tx_enable) {
            (false, _, _) => Mode::PowerDown,
            (true, false, _) => Mode::Standby,
            (true, true, false) => Mode::BurstReceive,
            (true, true, true) => Mode::BurstTransmit,
        }
    }

    /// Bytes of every transaction, in order.
    pub fn frames(&self) -> Vec<Vec<u8>> {
        self.transactions.iter().map(|t| t.bytes.clone()).collect()
    }

    /// Number of transactions starting with `opcode`.
    pub fn count_opcode(&self, opcode: u8) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.bytes.first() == Some(&opcode))
            .count()
    }

    pub fn clear_log(&mut self) {
        self.transactions.clear();
        self.pin_writes.clear();
    }

    fn response(&self, opcode: Option<u8>) -> Vec<u8> {
        match opcode {
            Some(0x21) | Some(0x24) => self.payload.clone(),
            Some(0x23) => self.tx_address.to_vec(),
            Some(op) if op & 0xF0 == 0x10 => self.config[usize::from(op & 0x0F)..].to_vec(),
            _ => Vec::new(),
        }
    }

    fn apply_write(&mut self, bytes: &[u8]) {
        match bytes {
            [0x22, address @ ..] if address.len() == 4 => {
                self.tx_address.copy_from_slice(address);
            }
            [op, data @ ..] if *op <= 0x0F && !data.is_empty() => {
                let start = usize::from(*op);
                for (offset, byte) in data.iter().enumerate() {
                    if let Some(slot) = self.config.get_mut(start + offset) {
                        *slot = *byte;
                    }
                }
            }
            _ => {}
        }
    }

    fn drive(&mut self, pin: Pin, level: bool) -> Result<(), digital::ErrorKind> {
        if self.fail_pins {
            return Err(digital::ErrorKind::Other);
        }

        self.pin_writes.push((pin, level));
        match pin {
            Pin::TxEnable => {
                if level && !self.tx_enable && self.ack_on_transmit {
                    self.edges += 1;
                }
                self.tx_enable = level;
            }
            Pin::ChipEnable => self.chip_enable = level,
            Pin::PowerUp => self.power_up = level,
        }
        Ok(())
    }
}

pub type SharedChip = Rc<RefCell<Chip>>;

pub struct MockSpi {
    chip: SharedChip,
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        let mut chip = self.chip.borrow_mut();
        if chip.fail_spi {
            return Err(spi::ErrorKind::Other);
        }

        let mut written = Vec::new();
        let mut performed_read = false;
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => written.extend_from_slice(&bytes[..]),
                Operation::Read(buffer) => {
                    performed_read = true;
                    let source = chip.response(written.first().copied());
                    for (index, byte) in buffer.iter_mut().enumerate() {
                        *byte = source.get(index).copied().unwrap_or(0);
                    }
                }
                Operation::TransferInPlace(buffer) => {
                    performed_read = true;
                    written.extend_from_slice(&buffer[..]);
                    let status = chip.status;
                    if let Some(first) = buffer.first_mut() {
                        *first = status;
                    }
                }
                Operation::Transfer(read, write) => {
                    performed_read = true;
                    written.extend_from_slice(&write[..]);
                    read.fill(0);
                    let status = chip.status;
                    if let Some(first) = read.first_mut() {
                        *first = status;
                    }
                }
                Operation::DelayNs(_) => {}
            }
        }

        if !performed_read || written.first() == Some(&0x22) {
            chip.apply_write(&written);
        }
        let mode = chip.mode();
        chip.transactions.push(Transaction {
            mode,
            bytes: written,
        });
        Ok(())
    }
}

pub struct MockPin {
    pin: Pin,
    chip: SharedChip,
}

impl digital::ErrorType for MockPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.chip.borrow_mut().drive(self.pin, false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.chip.borrow_mut().drive(self.pin, true)
    }
}

/// DR line of the simulated chip; yields one rising edge per pending edge.
pub struct DataReadyPin {
    chip: SharedChip,
}

impl DataReadyPin {
    pub fn new(chip: SharedChip) -> Self {
        Self { chip }
    }
}

impl digital::ErrorType for DataReadyPin {
    type Error = digital::ErrorKind;
}

impl Wait for DataReadyPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        pending().await
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        pending().await
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        poll_fn(|_| {
            let mut chip = self.chip.borrow_mut();
            if chip.edges > 0 {
                chip.edges -= 1;
                Poll::Ready(Ok(()))
            } else {
                Poll::Pending
            }
        })
        .await
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        pending().await
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.wait_for_rising_edge().await
    }
}

/// Blocking delay that returns immediately.
pub struct NoDelay;

impl embedded_hal::delay::DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

/// Async delay that expires on the second poll.
#[derive(Default)]
pub struct YieldDelay {
    pub expired: usize,
}

impl YieldDelay {
    async fn expire(&mut self) {
        embassy_futures::yield_now().await;
        self.expired += 1;
    }
}

impl embedded_hal_async::delay::DelayNs for YieldDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        self.expire().await
    }

    async fn delay_us(&mut self, _us: u32) {
        self.expire().await
    }

    async fn delay_ms(&mut self, _ms: u32) {
        self.expire().await
    }
}

/// Async delay that never expires.
pub struct NeverDelay;

impl embedded_hal_async::delay::DelayNs for NeverDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        pending().await
    }

    async fn delay_us(&mut self, _us: u32) {
        pending().await
    }

    async fn delay_ms(&mut self, _ms: u32) {
        pending().await
    }
}

/// A simulated chip and the bus/pin handles wired to it, as
/// `(chip, spi, tx_enable, chip_enable, power_up)`.
pub fn parts() -> (SharedChip, MockSpi, MockPin, MockPin, MockPin) {
    let chip = Rc::new(RefCell::new(Chip::default()));
    let spi = MockSpi { chip: chip.clone() };
    let tx_enable = MockPin {
        pin: Pin::TxEnable,
        chip: chip.clone(),
    };
    let chip_enable = MockPin {
        pin: Pin::ChipEnable,
        chip: chip.clone(),
    };
    let power_up = MockPin {
        pin: Pin::PowerUp,
        chip: chip.clone(),
    };
    (chip, spi, tx_enable, chip_enable, power_up)
}

/// Async delay that expires after `window` scheduler yields.
pub struct TickDelay {
    pub window: usize,
    pub expired: usize,
}

impl TickDelay {
    pub fn new(window: usize) -> Self {
        Self { window, expired: 0 }
    }

    async fn expire(&mut self) {
        for _ in 0..self.window {
            embassy_futures::yield_now().await;
        }
        self.expired += 1;
    }
}

impl embedded_hal_async::delay::DelayNs for TickDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        self.expire().await
    }

    async fn delay_us(&mut self, _us: u32) {
        self.expire().await
    }

    async fn delay_ms(&mut self, _ms: u32) {
        self.expire().await
    }
}

/// Async delay that breaks the simulated bus when it expires.
pub struct BusFailingDelay {
    chip: SharedChip,
}

impl BusFailingDelay {
    pub fn new(chip: SharedChip) -> Self {
        Self { chip }
    }

    async fn expire(&mut self) {
        embassy_futures::yield_now().await;
        self.chip.borrow_mut().fail_spi = true;
    }
}

impl embedded_hal_async::delay::DelayNs for BusFailingDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        self.expire().await
    }

    async fn delay_us(&mut self, _us: u32) {
        self.expire().await
    }

    async fn delay_ms(&mut self, _ms: u32) {
        self.expire().await
    }
}
