//! Shared radio status
//!
//! [`StatusRegistry`] is the one record of what the radio is doing: current
//! mode, active channel/power word, derived addresses and traffic counters.
//! It is read by the foreground API and by the data-ready handler, so all
//! access goes through a blocking mutex with short critical sections. No bus
//! transaction ever runs inside one.
//!
//! The registry is `const`-constructible and is usually placed in a `static`:
//!
//! ```
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use nrf905::StatusRegistry;
//!
//! static STATUS: StatusRegistry<CriticalSectionRawMutex> = StatusRegistry::new();
//! ```

use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::RawMutex, Mutex};

use crate::{address, Address, ChannelPowerWord, Mode};

/// Snapshot of the radio status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub received_frames: u32,
    pub sent_frames: u32,
    pub hops: u32,
    pub tx_address: Address,
    pub rx_address: Address,
    pub channel_power: ChannelPowerWord,
    pub mode: Mode,
}

impl Status {
    /// Zeroed counters and addresses, powered down.
    pub const fn new() -> Self {
        Self {
            received_frames: 0,
            sent_frames: 0,
            hops: 0,
            tx_address: Address(0),
            rx_address: Address(0),
            channel_power: ChannelPowerWord::from_raw(0),
            mode: Mode::PowerDown,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

/// Channel settings produced by a hop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tuning {
    pub channel_power: ChannelPowerWord,
    pub tx_address: Address,
    pub rx_address: Address,
}

#[derive(Clone, Copy)]
struct Shared {
    status: Status,
    power: u8,
}

/// Mutex-guarded [`Status`] plus the power level for the next hop
pub struct StatusRegistry<M: RawMutex> {
    inner: Mutex<M, Cell<Shared>>,
}

impl<M: RawMutex> StatusRegistry<M> {
    /// Creates a registry in the state of [`Status::new`] with power level 0.
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(Shared {
                status: Status::new(),
                power: 0,
            })),
        }
    }

    fn update<R>(&self, f: impl FnOnce(&mut Shared) -> R) -> R {
        self.inner.lock(|cell| {
            let mut shared = cell.get();
            let result = f(&mut shared);
            cell.set(shared);
            result
        })
    }

    /// Consistent copy of every status field.
    pub fn snapshot(&self) -> Status {
        self.inner.lock(|cell| cell.get().status)
    }

    /// Frames drained from the chip.
    pub fn received_count(&self) -> u32 {
        self.snapshot().received_frames
    }

    /// Frames loaded for transmission.
    pub fn sent_count(&self) -> u32 {
        self.snapshot().sent_frames
    }

    /// Channel hops, not counting the first channel of `start_listening`.
    pub fn hop_count(&self) -> u32 {
        self.snapshot().hops
    }

    /// Mode selected by the last successful pin write.
    pub fn mode(&self) -> Mode {
        self.snapshot().mode
    }

    /// Power level used for the next hop.
    pub fn power(&self) -> u8 {
        self.inner.lock(|cell| cell.get().power)
    }

    /// Sets the power level applied by the next hop.
    ///
    /// Does not reconfigure the chip by itself.
    pub fn set_power(&self, level: u8) {
        self.update(|shared| shared.power = level);
    }

    pub(crate) fn record_mode(&self, mode: Mode) {
        self.update(|shared| shared.status.mode = mode);
    }

    pub(crate) fn increment_received(&self) {
        self.update(|shared| {
            shared.status.received_frames = shared.status.received_frames.wrapping_add(1)
        });
    }

    pub(crate) fn increment_sent(&self) {
        self.update(|shared| shared.status.sent_frames = shared.status.sent_frames.wrapping_add(1));
    }

    /// Records `channel` at the current power level as the active channel,
    /// derives the addresses and, for a hop, bumps the hop counter.
    ///
    /// Word, addresses and counter change in one critical section.
    pub(crate) fn record_channel(&self, channel: u16, hop: bool) -> Tuning {
        self.update(|shared| {
            let channel_power = ChannelPowerWord::new(channel, shared.power);
            let (tx_address, rx_address) = address::derive(channel_power);

            shared.status.channel_power = channel_power;
            shared.status.tx_address = tx_address;
            shared.status.rx_address = rx_address;
            if hop {
                shared.status.hops = shared.status.hops.wrapping_add(1);
            }

            Tuning {
                channel_power,
                tx_address,
                rx_address,
            }
        })
    }
}

impl<M: RawMutex> Default for StatusRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}
