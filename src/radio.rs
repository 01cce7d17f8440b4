//! Shared radio session
//!
//! [`Radio`] lets a foreground task and the data-ready event loop use one
//! [`Nrf905`] at the same time. The driver sits behind a single async mutex
//! that is held for the whole of an operation, mode changes and bus
//! transactions included, so a data-ready edge can never be handled halfway
//! through a hop or a transmission.
//!
//! Received frames are delivered through a bounded queue read with
//! [`Radio::read_frame`]. Transmit acknowledgments are passed from the event
//! loop to [`Radio::send_frame`] through a signal.
//!
//! # Example
//! ```ignore
//! static STATUS: StatusRegistry<CriticalSectionRawMutex> = StatusRegistry::new();
//! static TABLE: [u16; 3] = [3, 17, 42];
//!
//! let driver = Nrf905::new(spi, tx_en, trx_ce, pwr_up, &STATUS, ChipProfile::DEFAULT);
//! let radio = Radio::new(driver, RadioConfig { initial_power: 3, ..Default::default() });
//!
//! radio.initialize(&mut Delay).await?;
//! radio.start_listening(&TABLE).await?;
//!
//! // event task
//! radio.run(&mut dr_pin, &mut Delay).await?;
//!
//! // foreground task
//! let frame = radio.read_frame().await;
//! radio.send_frame(&frame, &mut Delay).await?;
//! ```

use core::pin::pin;

use embassy_futures::select::{select, select3, Either, Either3};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use embedded_hal_async::digital::Wait;

use crate::{DataReady, Error, Frame, Mode, Nrf905, RadioConfig, StatusRegistry, Tuning};

/// Number of received frames buffered for [`Radio::read_frame`].
pub const FRAME_QUEUE_DEPTH: usize = 4;

/// Driver shared between a foreground task and the data-ready event loop
pub struct Radio<'a, M: RawMutex, SPI, TXEN, CE, PWR> {
    driver: Mutex<M, Nrf905<'a, M, SPI, TXEN, CE, PWR>>,
    status: &'a StatusRegistry<M>,
    config: RadioConfig,
    frames: Channel<M, Frame, FRAME_QUEUE_DEPTH>,
    acknowledged: Signal<M, ()>,
    stop: Signal<M, ()>,
}

impl<'a, M, SPI, TXEN, CE, PWR> Radio<'a, M, SPI, TXEN, CE, PWR>
where
    M: RawMutex,
{
    /// Creates a session around `driver`. The status registry is taken from
    /// the driver.
    pub fn new(driver: Nrf905<'a, M, SPI, TXEN, CE, PWR>, config: RadioConfig) -> Self {
        let status = driver.status();
        Self {
            driver: Mutex::new(driver),
            status,
            config,
            frames: Channel::new(),
            acknowledged: Signal::new(),
            stop: Signal::new(),
        }
    }

    /// Releases the driver.
    pub fn release(self) -> Nrf905<'a, M, SPI, TXEN, CE, PWR> {
        self.driver.into_inner()
    }

    /// Returns the session settings.
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Sets the power level used from the next hop on.
    pub fn set_power(&self, level: u8) {
        self.status.set_power(level);
    }

    /// Frames received since creation.
    pub fn received_count(&self) -> u32 {
        self.status.received_count()
    }

    /// Frames loaded for transmission since creation.
    pub fn sent_count(&self) -> u32 {
        self.status.sent_count()
    }

    /// Channel hops since creation.
    pub fn hop_count(&self) -> u32 {
        self.status.hop_count()
    }

    /// Mode the chip was last switched to.
    pub fn mode(&self) -> Mode {
        self.status.mode()
    }

    /// Waits for the next received frame.
    pub async fn read_frame(&self) -> Frame {
        self.frames.receive().await
    }

    /// Takes a received frame if one is queued.
    pub fn try_read_frame(&self) -> Option<Frame> {
        self.frames.try_receive().ok()
    }
}

impl<'a, M, SPI, TXEN, CE, PWR> Radio<'a, M, SPI, TXEN, CE, PWR>
where
    M: RawMutex,
    SPI: SpiDevice,
    TXEN: OutputPin,
    CE: OutputPin,
    PWR: OutputPin,
{
    /// Initializes the chip with the configured power level.
    pub async fn initialize<D>(&self, delay: &mut D) -> Result<(), Error>
    where
        D: embedded_hal::delay::DelayNs,
    {
        self.driver
            .lock()
            .await
            .initialize(delay, self.config.initial_power)
    }

    /// Starts receiving on the first channel of `table`. Clears a stop
    /// request left over from an earlier [`stop_listening`](Self::stop_listening).
    pub async fn start_listening(&self, table: &'a [u16]) -> Result<(), Error> {
        self.stop.reset();
        self.driver.lock().await.start_listening(table)
    }

    /// Returns to Standby, drops queued frames and ends [`run`](Self::run).
    pub async fn stop_listening(&self) -> Result<(), Error> {
        let result = self.driver.lock().await.stop_listening();
        while self.frames.try_receive().is_ok() {}
        self.stop.signal(());
        result
    }

    /// Hops to the next channel of the hopping table.
    pub async fn roam(&self) -> Result<Tuning, Error> {
        self.driver.lock().await.roam()
    }

    /// Transmits `payload` and waits for the acknowledging data-ready edge.
    ///
    /// The edge is handled by [`run`](Self::run), which must be running. If
    /// no acknowledgment arrives within
    /// [`ack_timeout_ms`](RadioConfig::ack_timeout_ms) the radio hops to the
    /// next channel when listening, or returns to Standby otherwise, and
    /// `Error::AckTimeout` is returned. A failure of that hop or mode change is
    /// logged and does not replace `AckTimeout`. The frame still counts as
    /// sent.
    pub async fn send_frame<D>(&self, payload: &[u8], delay: &mut D) -> Result<(), Error>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        self.acknowledged.reset();
        self.driver.lock().await.send_frame(payload)?;

        match select(
            self.acknowledged.wait(),
            delay.delay_ms(self.config.ack_timeout_ms),
        )
        .await
        {
            Either::First(()) => Ok(()),
            Either::Second(()) => {
                warn!("no acknowledgment within {} ms", self.config.ack_timeout_ms);
                let mut driver = self.driver.lock().await;
                let recovered = if driver.is_listening() {
                    driver.roam().map(|_| ())
                } else {
                    driver.set_mode(Mode::Standby)
                };
                if let Err(e) = recovered {
                    warn!("recovery after missing acknowledgment failed: {:?}", e);
                }
                Err(Error::AckTimeout)
            }
        }
    }

    /// Handles one data-ready edge and delivers its result.
    ///
    /// Received frames go to the frame queue; when the queue is full the
    /// frame is dropped. Acknowledgments wake a pending
    /// [`send_frame`](Self::send_frame).
    ///
    /// Returns `true` if the edge carried a received frame.
    pub async fn handle_data_ready(&self) -> Result<bool, Error> {
        let outcome = self.driver.lock().await.on_data_ready()?;

        match outcome {
            DataReady::Received(frame) => {
                if self.frames.try_send(frame).is_err() {
                    warn!("frame queue full, dropping received frame");
                }
                Ok(true)
            }
            DataReady::Acknowledged => {
                self.acknowledged.signal(());
                Ok(false)
            }
        }
    }

    async fn watchdog_expired(&self) {
        let mut driver = self.driver.lock().await;
        if !driver.is_listening() {
            return;
        }

        debug!("no frame for {} ms", self.config.watchdog_timeout_ms);
        if let Err(e) = driver.roam() {
            warn!("watchdog hop failed: {:?}", e);
        }
    }

    /// Data-ready event loop with channel watchdog.
    ///
    /// Waits for whichever comes first:
    /// - a stop request from [`stop_listening`](Self::stop_listening): returns
    /// - a rising edge on `data_ready`: handled with
    ///   [`handle_data_ready`](Self::handle_data_ready)
    /// - [`watchdog_timeout_ms`](RadioConfig::watchdog_timeout_ms) without a
    ///   received frame: hops to the next channel if listening
    ///
    /// Only a received frame or a watchdog expiry restarts the watchdog
    /// window. Acknowledgments and failed drains do not.
    ///
    /// Failures of single events are logged and the loop continues.
    ///
    /// # Errors
    /// * `Error::Transport` - waiting on `data_ready` failed
    pub async fn run<DR, D>(&self, data_ready: &mut DR, delay: &mut D) -> Result<(), Error>
    where
        DR: Wait,
        D: embedded_hal_async::delay::DelayNs,
    {
        loop {
            let mut watchdog = pin!(delay.delay_ms(self.config.watchdog_timeout_ms));

            loop {
                match select3(
                    self.stop.wait(),
                    data_ready.wait_for_rising_edge(),
                    &mut watchdog,
                )
                .await
                {
                    Either3::First(()) => return Ok(()),
                    Either3::Second(edge) => {
                        edge.map_err(|_| Error::Transport)?;
                        match self.handle_data_ready().await {
                            Ok(true) => break,
                            Ok(false) => {}
                            Err(e) => warn!("data ready handling failed: {:?}", e),
                        }
                    }
                    Either3::Third(()) => {
                        self.watchdog_expired().await;
                        break;
                    }
                }
            }
        }
    }
}
