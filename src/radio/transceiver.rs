//! Transceiver State Machine
//!
//! Driven by the byte-ready interrupt. Each trigger moves at most one wire
//! byte between the radio and the packet buffers:
//!
//! ```text
//!            submit                    trigger after trailer
//!   Idle ────────────► Transmitting ───────────────────► Idle
//!    │  valid length                     last byte
//!    └──────────────► Receiving ───────────────────────► Idle (mailbox raised)
//!    │  enter_test_mode
//!    └──────────────► Test(pattern) ── reset / submit ──► Idle
//! ```
//!
//! A bad length or type byte resets the radio and leaves the machine idle.

use embedded_hal::delay::DelayNs;

use crate::config::{RadioConfig, UserRegister, MAX_PAYLOAD, RX_OVERHEAD};
use crate::drivers::mrf49xa::{data_rate_word, reg, Mrf49xa, Status};
use crate::hal::spi::RegisterBus;
use crate::radio::buffers::PacketBuffers;
use crate::radio::frame;
use crate::types::{LinkEvent, LinkState, Packet, PacketType, SubmitError, TestPattern};

/// Link-layer state machine over one `MRF49XA`
pub struct Transceiver<B> {
    radio: Mrf49xa<B>,
    config: RadioConfig,
    state: LinkState,
    buffers: PacketBuffers,
    alive: bool,
}

impl<B: RegisterBus> Transceiver<B> {
    /// Create an idle state machine (the radio is not touched)
    pub fn new(bus: B, config: RadioConfig) -> Self {
        Self {
            radio: Mrf49xa::new(bus),
            config,
            state: LinkState::Idle,
            buffers: PacketBuffers::new(),
            alive: false,
        }
    }

    /// Bring the radio up with the stored register image
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Status {
        self.state = LinkState::Idle;
        self.radio.init(&self.config, delay)
    }

    /// Get the radio driver
    pub fn radio(&self) -> &Mrf49xa<B> {
        &self.radio
    }

    /// Get mutable access to the radio driver
    pub fn radio_mut(&mut self) -> &mut Mrf49xa<B> {
        &mut self.radio
    }

    /// Get the packet buffers
    pub fn buffers(&self) -> &PacketBuffers {
        &self.buffers
    }

    /// Current register image
    #[must_use]
    pub const fn config(&self) -> RadioConfig {
        self.config
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> LinkState {
        self.state
    }

    /// Handle one byte-ready trigger
    pub fn on_trigger(&mut self) -> Option<LinkEvent> {
        self.alive = true;

        if !self.radio.fifo_ready() {
            return Some(LinkEvent::NotReady);
        }

        match self.state {
            LinkState::Idle => self.receive_length(),
            LinkState::Receiving { position } => self.receive_byte(position),
            LinkState::Transmitting { position } => self.transmit_byte(position),
            LinkState::Test(pattern) => {
                self.radio.write_tx(pattern.byte());
                None
            }
        }
    }

    fn receive_length(&mut self) -> Option<LinkEvent> {
        let length = self.radio.read_fifo();
        if length == 0 || usize::from(length) > MAX_PAYLOAD {
            return Some(self.framing_error(length));
        }

        self.buffers.begin_frame(usize::from(length));
        self.state = LinkState::Receiving { position: 1 };
        None
    }

    fn receive_byte(&mut self, position: usize) -> Option<LinkEvent> {
        let byte = self.radio.read_fifo();

        if position == 1 {
            let Some(kind) = PacketType::from_wire(byte) else {
                return Some(self.framing_error(byte));
            };
            self.buffers.active_mut().set_kind(kind);
            self.state = LinkState::Receiving { position: 2 };
            return None;
        }

        let packet = self.buffers.active_mut();
        frame::place_rx_byte(packet, position - RX_OVERHEAD, byte);
        let position = position + 1;

        if position >= packet.rx_frame_len() {
            debug!("rx complete: {}", packet);
            self.radio.restart_fifo();
            self.buffers.complete_frame();
            self.state = LinkState::Idle;
            return Some(LinkEvent::PacketReceived);
        }

        self.state = LinkState::Receiving { position };
        None
    }

    fn transmit_byte(&mut self, position: usize) -> Option<LinkEvent> {
        let staged = self.buffers.staged();
        let frame_len = staged.tx_frame_len();

        // The trailer is still shifting out on the trigger after it was
        // loaded; only then is the transmitter switched off
        if position >= frame_len {
            debug!("tx complete: {} wire bytes", frame_len);
            self.radio.finish_transmit();
            self.state = LinkState::Idle;
            return Some(LinkEvent::PacketSent);
        }

        if let Some(byte) = frame::tx_byte(staged, position) {
            self.radio.write_tx(byte);
        }
        self.state = LinkState::Transmitting {
            position: position + 1,
        };
        None
    }

    fn framing_error(&mut self, byte: u8) -> LinkEvent {
        warn!("framing error on 0x{:02X}, resetting", byte);
        self.reset();
        LinkEvent::FramingError(byte)
    }

    /// Claim the transmitter for `packet` if idle
    ///
    /// A test mode is left first through a hardware reset.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Busy`] while a frame is being received or
    /// transmitted.
    pub fn begin_transmit(&mut self, packet: &Packet) -> Result<(), SubmitError> {
        if self.state.is_test() {
            self.reset();
        }
        if !self.state.is_idle() {
            return Err(SubmitError::Busy);
        }

        self.state = LinkState::Transmitting { position: 0 };
        self.buffers.stage(packet);
        self.radio.arm_transmit();
        Ok(())
    }

    /// Start re-emitting a fixed pattern
    ///
    /// Switching between patterns only changes the byte emitted on the next
    /// trigger.
    pub fn enter_test_mode(&mut self, pattern: TestPattern) {
        if !self.state.is_test() {
            self.radio.arm_test_pattern(pattern);
        }
        info!("test mode {}", pattern);
        self.state = LinkState::Test(pattern);
    }

    /// Abandon any frame in progress and return to receive
    pub fn reset(&mut self) {
        trace!("transceiver reset from {}", self.state);
        self.radio.reset();
        self.state = LinkState::Idle;
    }

    /// Take a copy of the packet waiting in the mailbox
    pub fn take_received(&mut self) -> Option<Packet> {
        self.buffers.take_finished().cloned()
    }

    /// Report and clear the trigger-seen flag
    pub fn take_alive(&mut self) -> bool {
        core::mem::take(&mut self.alive)
    }

    /// Set the center frequency word, keeping it in the image
    pub fn set_frequency(&mut self, freqb: u16) -> bool {
        let applied = self.radio.set_frequency(freqb);
        if applied {
            self.config
                .set(UserRegister::Cfs, reg::CFSREG | (freqb & reg::CFSREG_FREQB_MASK));
        }
        applied
    }

    /// Set the data rate, keeping it in the image
    pub fn set_data_rate(&mut self, bps: u32) -> bool {
        let applied = self.radio.set_data_rate(bps);
        if let (true, Some(word)) = (applied, data_rate_word(bps)) {
            self.config.set(UserRegister::Drs, word);
        }
        applied
    }

    /// Write a user register, keep it in the image, and reset the radio
    pub fn set_user_register(&mut self, register: UserRegister, value: u16) -> u16 {
        let value = self.config.set(register, value);
        self.radio.write_user(register, value);
        self.reset();
        value
    }
}
