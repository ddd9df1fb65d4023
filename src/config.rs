//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the MRF49XA dongle.
//! Frame layout, timing, pin mappings and the default register image are
//! centralized here.

use crate::drivers::mrf49xa::reg;

/// Maximum payload carried by one packet
pub const MAX_PAYLOAD: usize = 64;

/// Header bytes counted by the receive position: length and type
pub const RX_OVERHEAD: usize = 2;

/// Bytes clocked out around the payload: preamble, two sync bytes,
/// length, type and one trailing flush byte
pub const TX_OVERHEAD: usize = 6;

/// Bytes sent ahead of the length byte (preamble + sync word)
pub const TX_LEAD_IN: usize = 3;

/// Preamble byte (also the transmit register reset pattern)
pub const PREAMBLE: u8 = 0xAA;

/// Sync word matched by the receiver before it starts filling the FIFO
pub const SYNC_WORD: [u8; 2] = [0x2D, 0xD4];

/// Byte clocked out after the payload so the last payload byte leaves the
/// shift register before the transmitter is switched off
pub const TX_TRAILER: u8 = PREAMBLE;

/// Largest on-air frame (ECC payload doubles)
pub const MAX_TX_FRAME: usize = TX_OVERHEAD + MAX_PAYLOAD * 2;

/// Test pattern byte: all zeros
pub const TEST_PATTERN_ZERO: u8 = 0x00;

/// Test pattern byte: all ones
pub const TEST_PATTERN_ONE: u8 = 0xFF;

/// Test pattern byte: alternating ones and zeros
pub const TEST_PATTERN_ALTERNATING: u8 = 0xAA;

/// Just under one byte period at the default 9579 bps data rate (~835 us)
///
/// The foreground polls for an idle link at this interval.
pub const BYTE_PERIOD_US: u32 = 800;

/// Transmitter settle time for antenna tuning during init
pub const ANTENNA_TUNE_MS: u32 = 5;

/// Synchronizer settle time after asserting select, before sampling SDO
pub const SELECT_SETUP_NS: u32 = 1_000;

/// Half of one register bus clock period
pub const BUS_HALF_PERIOD_NS: u32 = 100;

/// Echo every received packet back over the air
pub const REFLECT_RECEIVED: bool = false;

/// Heartbeat interval for liveness reporting in milliseconds
pub const HEARTBEAT_MS: u64 = 1_000;

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// Status LED (directly on MCU)
    pub const LED_STATUS: &str = "PA5";

    /// MRF49XA chip select (active low)
    pub const MRF_CS: &str = "PB12";

    /// Register bus clock
    pub const MRF_SCK: &str = "PB13";

    /// Register bus data from the radio (SDO)
    pub const MRF_SDO: &str = "PB14";

    /// Register bus data to the radio (SDI)
    pub const MRF_SDI: &str = "PB15";

    /// FSEL/DATA pin, held high to use the internal FIFO
    pub const MRF_FSEL: &str = "PB11";

    /// nIRO interrupt request (falling edge)
    pub const MRF_IRO: &str = "PC7";
}

/// Tunable transceiver register image
///
/// These are the nine registers an operator may change. The remaining
/// registers (general config, power management, FIFO reads) are driven by
/// the link layer itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RadioConfig {
    /// Register command words, indexed by [`UserRegister`]
    words: [u16; UserRegister::COUNT],
}

impl RadioConfig {
    /// Factory defaults: 434 MHz band, ~9.6 kbps, 67 kHz receive bandwidth
    pub const DEFAULT: Self = Self {
        words: [
            0xC4F7, // AFCCREG
            0x9810, // TXCREG
            0xA348, // CFSREG
            0x94C0, // RXCREG
            0xC2AC, // BBFCREG
            0xCA81, // FIFORSTREG
            0xCED4, // SYNBREG
            0xC623, // DRSREG
            0xCC77, // PLLCREG
        ],
    };

    /// Get the command word for a register
    #[must_use]
    pub const fn get(&self, register: UserRegister) -> u16 {
        self.words[register as usize]
    }

    /// Set the command word for a register
    ///
    /// The receiver config always keeps FINTDIO set, otherwise the FIFO
    /// interrupt never reaches the nIRO pin.
    pub fn set(&mut self, register: UserRegister, value: u16) -> u16 {
        let value = register.sanitize(value);
        self.words[register as usize] = value;
        value
    }

    /// Iterate the command words in the order they are applied
    pub fn words(&self) -> impl Iterator<Item = u16> + '_ {
        self.words.iter().copied()
    }
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Operator-tunable registers, in storage/menu order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserRegister {
    /// Automatic frequency control
    Afc = 0,
    /// Transmit configuration
    Txc = 1,
    /// Center frequency
    Cfs = 2,
    /// Receive control
    Rxc = 3,
    /// Baseband filter
    Bbfc = 4,
    /// FIFO and reset mode
    FifoRst = 5,
    /// Synchronous pattern
    Synb = 6,
    /// Data rate
    Drs = 7,
    /// PLL
    Pllc = 8,
}

impl UserRegister {
    /// Number of tunable registers
    pub const COUNT: usize = 9;

    /// All registers in menu order
    pub const ALL: [Self; Self::COUNT] = [
        Self::Afc,
        Self::Txc,
        Self::Cfs,
        Self::Rxc,
        Self::Bbfc,
        Self::FifoRst,
        Self::Synb,
        Self::Drs,
        Self::Pllc,
    ];

    /// Look up a register by its menu index
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Self::ALL[index as usize])
        } else {
            None
        }
    }

    /// Apply the register's mandatory bits
    #[must_use]
    pub const fn sanitize(self, value: u16) -> u16 {
        match self {
            Self::Rxc => value | reg::RXCREG_FINTDIO,
            _ => value,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for UserRegister {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Afc => defmt::write!(f, "AFCREG"),
            Self::Txc => defmt::write!(f, "TXCREG"),
            Self::Cfs => defmt::write!(f, "CFSREG"),
            Self::Rxc => defmt::write!(f, "RXCREG"),
            Self::Bbfc => defmt::write!(f, "BBFCREG"),
            Self::FifoRst => defmt::write!(f, "FIFORSTREG"),
            Self::Synb => defmt::write!(f, "SYNBREG"),
            Self::Drs => defmt::write!(f, "DRSREG"),
            Self::Pllc => defmt::write!(f, "PLLCREG"),
        }
    }
}
