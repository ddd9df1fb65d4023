//! `MRF49XA` Transceiver Driver
//!
//! Command words and register sequences for the Microchip MRF49XA
//! sub-GHz FSK transceiver. Every register is written as one 16-bit
//! command word whose high bits select the register; FIFO data and the
//! status word come back on the same transaction.
//!
//! The driver only knows sequences. Deciding when to run them is the job
//! of [`crate::radio::transceiver`].

use embedded_hal::delay::DelayNs;

use crate::config::{RadioConfig, UserRegister, ANTENNA_TUNE_MS};
use crate::hal::spi::RegisterBus;
use crate::types::TestPattern;

/// `MRF49XA` command words and bit fields
pub mod reg {
    /// Status read
    pub const STSREG: u16 = 0x0000;

    /// General configuration
    pub const GENCREG: u16 = 0x8000;
    /// Enable the transmit register
    pub const GENCREG_TXDEN: u16 = 0x0080;
    /// Enable the receive FIFO
    pub const GENCREG_FIFOEN: u16 = 0x0040;
    /// 434 MHz band
    pub const GENCREG_FBS_434: u16 = 0x0010;
    /// Crystal load: 8.5 pF + 0.5 pF per step
    pub const GENCREG_LCS_MASK: u16 = 0x000F;

    /// Automatic frequency control
    pub const AFCCREG: u16 = 0xC400;
    /// Transmit configuration
    pub const TXCREG: u16 = 0x9800;
    /// Transmit byte
    pub const TXBREG: u16 = 0xB800;

    /// Center frequency
    pub const CFSREG: u16 = 0xA000;
    /// Frequency word field
    pub const CFSREG_FREQB_MASK: u16 = 0x0FFF;

    /// Receive control
    pub const RXCREG: u16 = 0x9000;
    /// Route the FIFO interrupt to nIRO
    pub const RXCREG_FINTDIO: u16 = 0x0400;

    /// Baseband filter
    pub const BBFCREG: u16 = 0xC200;

    /// Receive FIFO read
    pub const RXFIFOREG: u16 = 0xB000;

    /// FIFO and reset mode
    pub const FIFORSTREG: u16 = 0xCA00;
    /// FIFO fill bit count (interrupt level)
    pub const FIFORSTREG_FFBC_MASK: u16 = 0x00F0;
    /// Synchronous character length
    pub const FIFORSTREG_SYCHLEN: u16 = 0x0008;
    /// FIFO fill start condition
    pub const FIFORSTREG_FFSC: u16 = 0x0004;
    /// FIFO synchronous character fill (latched sync detect)
    pub const FIFORSTREG_FSCF: u16 = 0x0002;
    /// Disable the sensitive reset mode
    pub const FIFORSTREG_DRSTM: u16 = 0x0001;

    /// Synchronous byte
    pub const SYNBREG: u16 = 0xCE00;

    /// Data rate
    pub const DRSREG: u16 = 0xC600;
    /// Data rate prescaler (divide by 8)
    pub const DRSREG_DRPE: u16 = 0x0080;
    /// Data rate divider field
    pub const DRSREG_DRPV_MASK: u16 = 0x007F;

    /// Power management
    pub const PMCREG: u16 = 0x8200;
    /// Receiver chain on
    pub const PMCREG_RXCEN: u16 = 0x0080;
    /// Baseband on
    pub const PMCREG_BBCEN: u16 = 0x0040;
    /// Transmitter on
    pub const PMCREG_TXCEN: u16 = 0x0020;
    /// Synthesizer on
    pub const PMCREG_SYNEN: u16 = 0x0010;
    /// Crystal oscillator on
    pub const PMCREG_OSCEN: u16 = 0x0008;
    /// Low battery detector on
    pub const PMCREG_LBDEN: u16 = 0x0004;
    /// Wake-up timer on
    pub const PMCREG_WUTEN: u16 = 0x0002;
    /// Disable the clock output pin
    pub const PMCREG_CLKODIS: u16 = 0x0001;

    /// PLL configuration
    pub const PLLCREG: u16 = 0xCC00;

    /// General config used everywhere: 434 MHz band, 10 pF crystal load
    pub const GENCREG_SET: u16 = GENCREG | GENCREG_FBS_434 | (0x0003 & GENCREG_LCS_MASK);

    /// FIFO config: interrupt every 8 bits, sensitive reset disabled
    pub const FIFORSTREG_SET: u16 = FIFORSTREG | ((8 << 4) & FIFORSTREG_FFBC_MASK) | FIFORSTREG_DRSTM;
}

/// Decoded status word
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Status(u16);

impl Status {
    /// Wrap a raw status word
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw status word
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Transmit register ready / FIFO reached its fill level
    #[must_use]
    pub const fn fifo_flag(self) -> bool {
        self.0 & 0x8000 != 0
    }

    /// Power-on reset occurred (cleared by reading)
    #[must_use]
    pub const fn power_on_reset(self) -> bool {
        self.0 & 0x4000 != 0
    }

    /// Transmit underrun or receive FIFO overflow
    #[must_use]
    pub const fn overflow(self) -> bool {
        self.0 & 0x2000 != 0
    }

    /// Receive FIFO empty
    #[must_use]
    pub const fn fifo_empty(self) -> bool {
        self.0 & 0x0200 != 0
    }

    /// Signal above the RSSI threshold
    #[must_use]
    pub const fn rssi(self) -> bool {
        self.0 & 0x0100 != 0
    }

    /// Data quality detector output
    #[must_use]
    pub const fn data_quality(self) -> bool {
        self.0 & 0x0080 != 0
    }

    /// Clock recovery locked
    #[must_use]
    pub const fn clock_locked(self) -> bool {
        self.0 & 0x0040 != 0
    }

    /// AFC offset in synthesizer steps (signed 5-bit)
    #[must_use]
    pub const fn afc_offset(self) -> i8 {
        let raw = (self.0 & 0x001F) as i8;
        // Sign-extend from bit 4
        (raw << 3) >> 3
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Status {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Status(0x{:04X})", self.0);
    }
}

/// Crystal frequency divided by the fixed data rate divider (29)
const DATA_RATE_BASE: u32 = 10_000_000 / 29;

/// Data rate command word for `bps`, or `None` if out of reach
///
/// `bps = 10 MHz / 29 / (R + 1) / (1 + 7 * prescaler)`. The prescaler is
/// used only when `R` would not fit its 7-bit field.
#[must_use]
pub const fn data_rate_word(bps: u32) -> Option<u16> {
    if bps == 0 {
        return None;
    }
    let divider = (DATA_RATE_BASE + bps / 2) / bps;
    if divider >= 1 && divider - 1 <= reg::DRSREG_DRPV_MASK as u32 {
        return Some(reg::DRSREG | (divider - 1) as u16);
    }
    let base = DATA_RATE_BASE / 8;
    let divider = (base + bps / 2) / bps;
    if divider >= 1 && divider - 1 <= reg::DRSREG_DRPV_MASK as u32 {
        return Some(reg::DRSREG | reg::DRSREG_DRPE | (divider - 1) as u16);
    }
    None
}

/// `MRF49XA` driver
pub struct Mrf49xa<B> {
    bus: B,
    fifo_config: u16,
}

impl<B: RegisterBus> Mrf49xa<B> {
    /// Lowest valid center frequency word
    pub const FREQB_MIN: u16 = 96;

    /// Highest valid center frequency word
    pub const FREQB_MAX: u16 = 3903;

    /// Create a new driver (the radio is left untouched)
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            fifo_config: reg::FIFORSTREG_SET,
        }
    }

    /// Get the underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Get mutable access to the underlying bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Bring the radio up in receive mode
    ///
    /// Applies the register image, runs the transmitter briefly for antenna
    /// tuning, then arms the receiver. The returned status read also clears
    /// the power-on reset flag.
    pub fn init(&mut self, config: &RadioConfig, delay: &mut impl DelayNs) -> Status {
        self.fifo_config = config.get(UserRegister::FifoRst);
        self.restart_fifo();
        self.write(reg::GENCREG_SET);
        for word in config.words() {
            self.write(word);
        }

        // Shut everything down, then tune the antenna with the PA on
        self.write(reg::PMCREG | reg::PMCREG_CLKODIS);
        self.write(reg::PMCREG | reg::PMCREG_CLKODIS | reg::PMCREG_TXCEN);
        delay.delay_ms(ANTENNA_TUNE_MS);

        self.write(reg::PMCREG | reg::PMCREG_CLKODIS | reg::PMCREG_RXCEN);
        self.write(reg::GENCREG_SET | reg::GENCREG_FIFOEN);
        self.restart_fifo();

        let status = self.status();
        debug!("MRF49XA up, {}", status);
        status
    }

    /// Write one raw command word
    pub fn write(&mut self, word: u16) {
        self.bus.write16(word);
    }

    /// Write a user register, keeping its mandatory bits
    pub fn write_user(&mut self, register: UserRegister, value: u16) -> u16 {
        let value = register.sanitize(value);
        if register == UserRegister::FifoRst {
            self.fifo_config = value;
        }
        self.write(value);
        value
    }

    /// Return to receive with a fresh FIFO, dropping anything in progress
    pub fn reset(&mut self) {
        self.write(reg::PMCREG);
        self.write(self.fifo_config);
        self.write(reg::GENCREG_SET);
        self.write(reg::GENCREG_SET | reg::GENCREG_FIFOEN);
        self.write(self.fifo_config | reg::FIFORSTREG_FSCF);
        self.write(reg::PMCREG | reg::PMCREG_RXCEN);
    }

    /// Clear the FIFO and re-arm sync word detection
    pub fn restart_fifo(&mut self) {
        self.write(self.fifo_config);
        self.write(self.fifo_config | reg::FIFORSTREG_FSCF);
    }

    /// Switch from receive to transmit
    ///
    /// The transmit register resets to the preamble pattern; every
    /// following byte-ready interrupt asks for the next byte.
    pub fn arm_transmit(&mut self) {
        self.write(reg::PMCREG);
        self.write(reg::GENCREG_SET | reg::GENCREG_TXDEN);
        self.write(reg::PMCREG | reg::PMCREG_TXCEN);
    }

    /// Switch from transmit back to receive
    pub fn finish_transmit(&mut self) {
        self.write(reg::PMCREG | reg::PMCREG_RXCEN);
        self.write(reg::GENCREG_SET | reg::GENCREG_FIFOEN);
        self.restart_fifo();
    }

    /// Start transmitting a fixed pattern
    pub fn arm_test_pattern(&mut self, pattern: TestPattern) {
        self.write(reg::GENCREG_SET | reg::GENCREG_TXDEN);
        self.write_tx(pattern.byte());
        self.write(reg::PMCREG | reg::PMCREG_CLKODIS | reg::PMCREG_TXCEN);
    }

    /// Load the next byte into the transmit register
    pub fn write_tx(&mut self, byte: u8) {
        self.write(reg::TXBREG | u16::from(byte));
    }

    /// Pop one byte from the receive FIFO
    pub fn read_fifo(&mut self) -> u8 {
        let [_, byte] = self.bus.transfer16(reg::RXFIFOREG).to_be_bytes();
        byte
    }

    /// Check the FIFO flag mirrored on the response line
    pub fn fifo_ready(&mut self) -> bool {
        self.bus.fifo_ready()
    }

    /// Read the status word
    pub fn status(&mut self) -> Status {
        Status(self.bus.transfer16(reg::STSREG))
    }

    /// Set the center frequency word, ignoring values outside the valid span
    pub fn set_frequency(&mut self, freqb: u16) -> bool {
        if (Self::FREQB_MIN..=Self::FREQB_MAX).contains(&freqb) {
            self.write(reg::CFSREG | (freqb & reg::CFSREG_FREQB_MASK));
            true
        } else {
            warn!("frequency word {} out of range, ignored", freqb);
            false
        }
    }

    /// Set the over-the-air data rate, ignoring rates out of reach
    pub fn set_data_rate(&mut self, bps: u32) -> bool {
        match data_rate_word(bps) {
            Some(word) => {
                self.write(word);
                true
            }
            None => {
                warn!("data rate {} bps out of range, ignored", bps);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_rate_matches_factory_word() {
        assert_eq!(data_rate_word(9579), Some(0xC623));
        assert_eq!(data_rate_word(9600), Some(0xC623));
    }

    #[test]
    fn slow_rates_use_prescaler() {
        let word = data_rate_word(1200).unwrap();
        assert_ne!(word & reg::DRSREG_DRPE, 0);
    }

    #[test]
    fn unreachable_rates_rejected() {
        assert_eq!(data_rate_word(0), None);
        assert_eq!(data_rate_word(100), None);
        assert_eq!(data_rate_word(1_000_000), None);
    }

    #[test]
    fn fifo_set_is_factory_word() {
        assert_eq!(reg::FIFORSTREG_SET, 0xCA81);
    }

    #[test]
    fn afc_offset_sign_extends() {
        assert_eq!(Status::from_raw(0x0001).afc_offset(), 1);
        assert_eq!(Status::from_raw(0x001F).afc_offset(), -1);
        assert_eq!(Status::from_raw(0x0010).afc_offset(), -16);
    }
}
