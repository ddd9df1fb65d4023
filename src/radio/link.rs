//! Foreground Link Interface
//!
//! [`Link`] shares one [`Transceiver`] between the byte-ready interrupt and
//! the foreground loop. Every call runs inside a critical section, so the
//! foreground can never observe (or produce) a half-updated state, and the
//! interrupt handler always sees a consistent state and frame position.
//!
//! The finished receive slot is copied out under the lock; the caller owns
//! its copy and the state machine is free to reuse the slot.

use core::cell::RefCell;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;

use crate::config::{RadioConfig, UserRegister, BYTE_PERIOD_US};
use crate::drivers::mrf49xa::Status;
use crate::hal::spi::RegisterBus;
use crate::radio::transceiver::Transceiver;
use crate::types::{LinkEvent, LinkState, Packet, SubmitError, TestPattern};

/// Transceiver shared between interrupt and foreground
pub struct Link<B> {
    core: Mutex<RefCell<Transceiver<B>>>,
}

impl<B: RegisterBus> Link<B> {
    /// Create the link (the radio is not touched until [`Link::init`])
    pub fn new(bus: B, config: RadioConfig) -> Self {
        Self {
            core: Mutex::new(RefCell::new(Transceiver::new(bus, config))),
        }
    }

    /// Bring the radio up; call before the byte-ready interrupt is enabled
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Status {
        self.core.get_mut().get_mut().init(delay)
    }

    fn with<T>(&self, f: impl FnOnce(&mut Transceiver<B>) -> T) -> T {
        critical_section::with(|cs| f(&mut *self.core.borrow_ref_mut(cs)))
    }

    /// Byte-ready interrupt entry point
    pub fn on_interrupt(&self) -> Option<LinkEvent> {
        self.with(Transceiver::on_trigger)
    }

    /// Try once to claim the transmitter for `packet`
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Busy`] if a frame is in flight.
    pub fn try_submit(&self, packet: &Packet) -> Result<(), SubmitError> {
        self.with(|core| core.begin_transmit(packet))
    }

    /// Queue `packet` for transmission, waiting for the link to go idle
    ///
    /// Polls about once per wire byte period. Returns once the frame has
    /// been staged and the transmitter armed.
    pub fn submit(&self, packet: &Packet, delay: &mut impl DelayNs) {
        while self.try_submit(packet).is_err() {
            delay.delay_us(BYTE_PERIOD_US);
        }
    }

    /// Take the packet waiting in the mailbox, if any
    pub fn poll_received(&self) -> Option<Packet> {
        self.with(Transceiver::take_received)
    }

    /// Check if idle
    pub fn is_idle(&self) -> bool {
        self.with(|core| core.state().is_idle())
    }

    /// Current state
    pub fn state(&self) -> LinkState {
        self.with(|core| core.state())
    }

    /// Report health: the interrupt fired since the last call, or there is
    /// nothing to do
    pub fn liveness(&self) -> bool {
        self.with(|core| core.take_alive() || core.state().is_idle())
    }

    /// Abandon any frame in progress and return to receive
    pub fn reset(&self) {
        self.with(Transceiver::reset);
    }

    /// Transmit a fixed pattern until reset or the next submission
    pub fn enter_test_mode(&self, pattern: TestPattern) {
        self.with(|core| core.enter_test_mode(pattern));
    }

    /// Write a raw command word
    pub fn set_register(&self, word: u16) {
        self.with(|core| core.radio_mut().write(word));
    }

    /// Set the center frequency word; out-of-range values are ignored
    pub fn set_frequency(&self, freqb: u16) -> bool {
        self.with(|core| core.set_frequency(freqb))
    }

    /// Set the data rate; unreachable rates are ignored
    pub fn set_data_rate(&self, bps: u32) -> bool {
        self.with(|core| core.set_data_rate(bps))
    }

    /// Change one tunable register and reset the radio
    ///
    /// Returns the value actually written.
    pub fn set_user_register(&self, register: UserRegister, value: u16) -> u16 {
        self.with(|core| core.set_user_register(register, value))
    }

    /// Current register image
    pub fn config(&self) -> RadioConfig {
        self.with(|core| core.config())
    }

    /// Read the radio status word
    pub fn status(&self) -> Status {
        self.with(|core| core.radio_mut().status())
    }

    /// Run `f` against the underlying bus
    pub fn with_bus<T>(&self, f: impl FnOnce(&mut B) -> T) -> T {
        self.with(|core| f(core.radio_mut().bus_mut()))
    }
}
