//! Register Bus
//!
//! Fixed-width command/response words to and from the transceiver. A
//! transaction asserts select, clocks bits out MSB-first while sampling the
//! response line, then deasserts select. The peer is a passive register
//! interface with bounded latency, so no transaction can fail or time out.

use core::cell::RefCell;
use core::convert::Infallible;

use critical_section::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::config::{BUS_HALF_PERIOD_NS, SELECT_SETUP_NS};

/// Full-duplex fixed-width register bus
pub trait RegisterBus {
    /// Clock out one byte, returning the byte sampled meanwhile
    fn transfer8(&mut self, word: u8) -> u8;

    /// Clock out one 16-bit word, returning the word sampled meanwhile
    fn transfer16(&mut self, word: u16) -> u16;

    /// Sample the response line with select asserted
    ///
    /// The MRF49XA drives its FIFO flag onto SDO as soon as it is selected.
    fn fifo_ready(&mut self) -> bool;

    /// Response latched by the last transaction
    fn latched(&self) -> u16;

    /// Replace the latched response
    fn set_latched(&mut self, word: u16);

    /// Write an 8-bit word
    fn write8(&mut self, word: u8) {
        let _ = self.transfer8(word);
    }

    /// Write a 16-bit command word
    fn write16(&mut self, word: u16) {
        let _ = self.transfer16(word);
    }

    /// Read the low byte of the latched response, clearing the latch
    fn read8(&mut self) -> u8 {
        let [_, low] = self.latched().to_be_bytes();
        self.set_latched(0);
        low
    }

    /// Read the latched 16-bit response
    fn read16(&mut self) -> u16 {
        self.latched()
    }
}

/// Pins that cannot fail to drive or sample
fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

/// Software serial bus over four GPIO lines
///
/// `SDI` is the radio's data input (our output), `SDO` its data output.
pub struct BitBangBus<CS, SCK, SDI, SDO, D> {
    cs: CS,
    sck: SCK,
    sdi: SDI,
    sdo: SDO,
    delay: D,
    latched: u16,
}

impl<CS, SCK, SDI, SDO, D> BitBangBus<CS, SCK, SDI, SDO, D>
where
    CS: OutputPin + ErrorType<Error = Infallible>,
    SCK: OutputPin + ErrorType<Error = Infallible>,
    SDI: OutputPin + ErrorType<Error = Infallible>,
    SDO: InputPin + ErrorType<Error = Infallible>,
    D: DelayNs,
{
    /// Create the bus, parking every line in its inactive level
    pub fn new(mut cs: CS, mut sck: SCK, mut sdi: SDI, sdo: SDO, delay: D) -> Self {
        infallible(cs.set_high());
        infallible(sck.set_low());
        infallible(sdi.set_low());
        Self {
            cs,
            sck,
            sdi,
            sdo,
            delay,
            latched: 0,
        }
    }

    /// Release the pins
    pub fn release(self) -> (CS, SCK, SDI, SDO, D) {
        (self.cs, self.sck, self.sdi, self.sdo, self.delay)
    }

    /// Shift `bits` bits of `word` out MSB-first, sampling SDO on each
    /// rising clock edge
    fn shift(&mut self, word: u16, bits: u32) -> u16 {
        infallible(self.cs.set_low());
        let mut response = 0u16;
        for bit in (0..bits).rev() {
            if word & (1 << bit) != 0 {
                infallible(self.sdi.set_high());
            } else {
                infallible(self.sdi.set_low());
            }
            self.delay.delay_ns(BUS_HALF_PERIOD_NS);
            infallible(self.sck.set_high());
            response = (response << 1) | u16::from(infallible(self.sdo.is_high()));
            self.delay.delay_ns(BUS_HALF_PERIOD_NS);
            infallible(self.sck.set_low());
        }
        infallible(self.sdi.set_low());
        infallible(self.cs.set_high());
        self.latched = response;
        response
    }
}

impl<CS, SCK, SDI, SDO, D> RegisterBus for BitBangBus<CS, SCK, SDI, SDO, D>
where
    CS: OutputPin + ErrorType<Error = Infallible>,
    SCK: OutputPin + ErrorType<Error = Infallible>,
    SDI: OutputPin + ErrorType<Error = Infallible>,
    SDO: InputPin + ErrorType<Error = Infallible>,
    D: DelayNs,
{
    fn transfer8(&mut self, word: u8) -> u8 {
        let [_, low] = self.shift(u16::from(word), 8).to_be_bytes();
        low
    }

    fn transfer16(&mut self, word: u16) -> u16 {
        self.shift(word, 16)
    }

    fn fifo_ready(&mut self) -> bool {
        infallible(self.cs.set_low());
        self.delay.delay_ns(SELECT_SETUP_NS);
        let ready = infallible(self.sdo.is_high());
        infallible(self.cs.set_high());
        ready
    }

    fn latched(&self) -> u16 {
        self.latched
    }

    fn set_latched(&mut self, word: u16) {
        self.latched = word;
    }
}

/// Register bus shared between the byte-ready handler and the foreground
///
/// The busy flag is the borrow state of the inner cell. It is taken and
/// released inside one critical section, so neither context can observe a
/// half-finished transaction. A nested attempt (a transaction started from
/// inside another) is refused.
///
/// Inside [`crate::radio::Link`] every transaction already runs under the
/// link's own critical section. The busy flag guards direct bus users
/// outside the link, such as a configuration path holding its own handle.
pub struct SharedBus<B> {
    bus: Mutex<RefCell<B>>,
}

impl<B> SharedBus<B> {
    /// Wrap a bus
    pub const fn new(bus: B) -> Self {
        Self {
            bus: Mutex::new(RefCell::new(bus)),
        }
    }

    /// Run `f` as one exclusive transaction, or `None` if the bus is busy
    pub fn try_transaction<R>(&self, f: impl FnOnce(&mut B) -> R) -> Option<R> {
        critical_section::with(|cs| {
            let mut bus = self.bus.borrow(cs).try_borrow_mut().ok()?;
            Some(f(&mut *bus))
        })
    }

    /// Check if a transaction is in progress
    pub fn is_busy(&self) -> bool {
        critical_section::with(|cs| self.bus.borrow(cs).try_borrow_mut().is_err())
    }

    /// Unwrap the bus
    pub fn into_inner(self) -> B {
        self.bus.into_inner().into_inner()
    }
}

impl<B: RegisterBus> SharedBus<B> {
    fn transaction<R: Default>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        self.try_transaction(f).unwrap_or_else(|| {
            warn!("register bus re-entered, transaction dropped");
            R::default()
        })
    }
}

impl<B: RegisterBus> RegisterBus for &SharedBus<B> {
    fn transfer8(&mut self, word: u8) -> u8 {
        self.transaction(|bus| bus.transfer8(word))
    }

    fn transfer16(&mut self, word: u16) -> u16 {
        self.transaction(|bus| bus.transfer16(word))
    }

    fn fifo_ready(&mut self) -> bool {
        self.transaction(RegisterBus::fifo_ready)
    }

    fn latched(&self) -> u16 {
        self.transaction(|bus| bus.latched())
    }

    fn set_latched(&mut self, word: u16) {
        self.transaction(|bus| bus.set_latched(word));
    }

    fn read8(&mut self) -> u8 {
        self.transaction(RegisterBus::read8)
    }
}
