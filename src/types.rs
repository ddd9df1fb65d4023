//! Shared types used across the dongle firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

use heapless::Vec;

use crate::config::{
    MAX_PAYLOAD, RX_OVERHEAD, TEST_PATTERN_ALTERNATING, TEST_PATTERN_ONE, TEST_PATTERN_ZERO,
    TX_OVERHEAD,
};

/// Packet payload storage (never exceeds [`MAX_PAYLOAD`])
pub type Payload = Vec<u8, MAX_PAYLOAD>;

/// Hint for the internal structure of a packet
///
/// The ECC variants carry each payload byte as two codec-encoded nibble
/// bytes on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PacketType {
    /// Transparent serial data
    #[default]
    Serial,
    /// Transparent serial data, nibble coded
    SerialEcc,
    /// Host-framed packet
    Packet,
    /// Host-framed packet, nibble coded
    PacketEcc,
}

impl PacketType {
    /// Decode the wire type byte
    #[must_use]
    pub const fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Serial),
            0x02 => Some(Self::SerialEcc),
            0x03 => Some(Self::Packet),
            0x04 => Some(Self::PacketEcc),
            _ => None,
        }
    }

    /// Encode as the wire type byte
    #[must_use]
    pub const fn to_wire(self) -> u8 {
        match self {
            Self::Serial => 0x01,
            Self::SerialEcc => 0x02,
            Self::Packet => 0x03,
            Self::PacketEcc => 0x04,
        }
    }

    /// Check if the payload is nibble coded
    #[must_use]
    pub const fn is_ecc(self) -> bool {
        matches!(self, Self::SerialEcc | Self::PacketEcc)
    }

    /// Number of wire bytes needed for `len` payload bytes
    #[must_use]
    pub const fn wire_len(self, len: usize) -> usize {
        if self.is_ecc() {
            len * 2
        } else {
            len
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PacketType {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Serial => defmt::write!(f, "SERIAL"),
            Self::SerialEcc => defmt::write!(f, "SERIAL-ECC"),
            Self::Packet => defmt::write!(f, "PACKET"),
            Self::PacketEcc => defmt::write!(f, "PACKET-ECC"),
        }
    }
}

/// Packet construction error
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketError {
    /// Payload longer than [`MAX_PAYLOAD`]
    TooLong(usize),
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong(len) => write!(f, "payload of {len} bytes exceeds {MAX_PAYLOAD}"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PacketError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::TooLong(len) => defmt::write!(f, "TooLong({})", len),
        }
    }
}

/// One link-layer packet
///
/// The payload size is the length of the payload vector, so it can never
/// exceed [`MAX_PAYLOAD`].
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Packet {
    kind: PacketType,
    payload: Payload,
}

impl Packet {
    /// Create an empty packet
    #[must_use]
    pub const fn new(kind: PacketType) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    /// Create a packet from payload bytes
    ///
    /// # Errors
    ///
    /// Returns [`PacketError::TooLong`] if `payload` exceeds [`MAX_PAYLOAD`].
    pub fn from_slice(kind: PacketType, payload: &[u8]) -> Result<Self, PacketError> {
        let payload = Vec::from_slice(payload).map_err(|()| PacketError::TooLong(payload.len()))?;
        Ok(Self { kind, payload })
    }

    /// Get the packet type
    #[must_use]
    pub const fn kind(&self) -> PacketType {
        self.kind
    }

    /// Set the packet type
    pub fn set_kind(&mut self, kind: PacketType) {
        self.kind = kind;
    }

    /// Get the payload size in bytes
    #[must_use]
    pub fn payload_size(&self) -> usize {
        self.payload.len()
    }

    /// Get the payload bytes
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Get mutable access to the payload bytes
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.payload
    }

    /// Drop the payload, keeping the type
    pub fn clear(&mut self) {
        self.payload.clear();
    }

    /// Zero-fill the payload to `len` bytes (clamped to [`MAX_PAYLOAD`])
    pub fn zero_fill(&mut self, len: usize) {
        self.payload.clear();
        // Cannot fail after the clamp
        let _ = self.payload.resize(len.min(MAX_PAYLOAD), 0);
    }

    /// Copy another packet into this one without touching other storage
    pub fn copy_from(&mut self, other: &Self) {
        self.kind = other.kind;
        self.payload.clear();
        // Same capacity on both sides
        let _ = self.payload.extend_from_slice(&other.payload);
    }

    /// Number of payload bytes on the wire
    #[must_use]
    pub fn wire_payload_len(&self) -> usize {
        self.kind.wire_len(self.payload.len())
    }

    /// Transmit frame length (preamble through trailer)
    #[must_use]
    pub fn tx_frame_len(&self) -> usize {
        TX_OVERHEAD + self.wire_payload_len()
    }

    /// Receive frame length (length byte through last payload byte)
    #[must_use]
    pub fn rx_frame_len(&self) -> usize {
        RX_OVERHEAD + self.wire_payload_len()
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("kind", &self.kind)
            .field("payload", &self.payload.as_slice())
            .finish()
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Packet {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Packet({}, {} bytes)", self.kind, self.payload.len());
    }
}

/// Fixed pattern transmitted in a test mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TestPattern {
    /// Continuous zeros
    Zero,
    /// Continuous ones
    One,
    /// Alternating ones and zeros
    Alternating,
}

impl TestPattern {
    /// The byte re-emitted on every trigger
    #[must_use]
    pub const fn byte(self) -> u8 {
        match self {
            Self::Zero => TEST_PATTERN_ZERO,
            Self::One => TEST_PATTERN_ONE,
            Self::Alternating => TEST_PATTERN_ALTERNATING,
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for TestPattern {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Zero => defmt::write!(f, "ZERO"),
            Self::One => defmt::write!(f, "ONE"),
            Self::Alternating => defmt::write!(f, "ALT"),
        }
    }
}

/// Transceiver state
///
/// The frame position counts wire bytes already handled in the current
/// frame. Receiving starts at 1 because the length byte was consumed while
/// idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LinkState {
    /// Listening for the length byte of a new frame
    #[default]
    Idle,
    /// Filling the active receive buffer
    Receiving {
        /// Wire bytes consumed so far, length byte included
        position: usize,
    },
    /// Clocking out the staged packet
    Transmitting {
        /// Wire bytes written so far, preamble included
        position: usize,
    },
    /// Re-emitting a fixed pattern until reset or a new submission
    Test(TestPattern),
}

impl LinkState {
    /// Check if idle
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Check if in a test mode
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Test(_))
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkState {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Idle => defmt::write!(f, "IDLE"),
            Self::Receiving { position } => defmt::write!(f, "RX@{}", position),
            Self::Transmitting { position } => defmt::write!(f, "TX@{}", position),
            Self::Test(pattern) => defmt::write!(f, "TEST-{}", pattern),
        }
    }
}

/// Notable outcome of one byte-ready trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// The FIFO flag was not set; nothing was done
    NotReady,
    /// Bad length or type byte; the hardware was reset
    FramingError(u8),
    /// A frame completed and the mailbox was raised
    PacketReceived,
    /// The staged frame was fully clocked out
    PacketSent,
}

#[cfg(feature = "embedded")]
impl defmt::Format for LinkEvent {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::NotReady => defmt::write!(f, "NotReady"),
            Self::FramingError(byte) => defmt::write!(f, "FramingError(0x{:02X})", byte),
            Self::PacketReceived => defmt::write!(f, "PacketReceived"),
            Self::PacketSent => defmt::write!(f, "PacketSent"),
        }
    }
}

/// Admission failure for a non-blocking submit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// A frame is in flight; try again after about one byte period
    Busy,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => write!(f, "transceiver busy"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SubmitError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Busy => defmt::write!(f, "Busy"),
        }
    }
}
