//! Test doubles for the register bus
//!
//! Host-only stand-ins used by the integration tests: a register-level
//! transceiver model and plain GPIO pins for exercising the bit-banged bus.

use std::collections::VecDeque;
use std::vec::Vec;

use core::convert::Infallible;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::drivers::mrf49xa::reg;
use crate::hal::spi::RegisterBus;

/// Register-level stand-in for the transceiver
///
/// Records every command word written and answers FIFO reads from a queue
/// of received bytes.
#[derive(Debug, Default)]
pub struct MockBus {
    /// Command words written, oldest first
    pub sent: Vec<u16>,
    /// Bytes the receive FIFO will return
    pub to_receive: VecDeque<u8>,
    /// Response to the status command
    pub status: u16,
    /// Value reported by the FIFO flag (default: ready)
    pub not_ready: bool,
    latched: u16,
}

impl MockBus {
    /// Create an idle bus
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the receive FIFO
    pub fn queue_rx(&mut self, bytes: &[u8]) {
        self.to_receive.extend(bytes.iter().copied());
    }

    /// Bytes written through the transmit register, in order
    #[must_use]
    pub fn transmitted(&self) -> Vec<u8> {
        self.sent
            .iter()
            .filter(|&&word| word & 0xFF00 == reg::TXBREG)
            .map(|&word| word.to_be_bytes()[1])
            .collect()
    }

    /// Check if a command word was written
    #[must_use]
    pub fn wrote(&self, word: u16) -> bool {
        self.sent.contains(&word)
    }

    /// Forget the command history
    pub fn clear_sent(&mut self) {
        self.sent.clear();
    }
}

impl RegisterBus for MockBus {
    fn transfer8(&mut self, word: u8) -> u8 {
        self.sent.push(u16::from(word));
        self.latched = 0;
        0
    }

    fn transfer16(&mut self, word: u16) -> u16 {
        self.sent.push(word);
        let response = if word == reg::RXFIFOREG {
            u16::from(self.to_receive.pop_front().unwrap_or(0))
        } else if word == reg::STSREG {
            self.status
        } else {
            0
        };
        self.latched = response;
        response
    }

    fn fifo_ready(&mut self) -> bool {
        !self.not_ready
    }

    fn latched(&self) -> u16 {
        self.latched
    }

    fn set_latched(&mut self, word: u16) {
        self.latched = word;
    }
}

/// Output pin that records its level history
#[derive(Clone, Debug, Default)]
pub struct MockPin {
    /// Current level
    pub state: bool,
    /// Every level written, oldest first
    pub changes: Vec<bool>,
}

impl MockPin {
    /// Create a pin at the given level
    #[must_use]
    pub fn new(state: bool) -> Self {
        Self {
            state,
            changes: Vec::new(),
        }
    }
}

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state = false;
        self.changes.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state = true;
        self.changes.push(true);
        Ok(())
    }
}

/// Input pin replaying a fixed sequence of levels (low once exhausted)
#[derive(Clone, Debug, Default)]
pub struct ScriptedPin {
    /// Levels still to be sampled
    pub levels: VecDeque<bool>,
    /// Number of samples taken
    pub samples: usize,
}

impl ScriptedPin {
    /// Replay the bits of `word`, MSB first
    #[must_use]
    pub fn from_word(word: u16, bits: u32) -> Self {
        Self {
            levels: (0..bits).rev().map(|bit| word & (1 << bit) != 0).collect(),
            samples: 0,
        }
    }
}

impl ErrorType for ScriptedPin {
    type Error = Infallible;
}

impl InputPin for ScriptedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.samples += 1;
        Ok(self.levels.pop_front().unwrap_or(false))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Delay that returns immediately
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
