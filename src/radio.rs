//! Packet Link
//!
//! Byte-at-a-time framing over the `MRF49XA`: double-buffered receive,
//! staged transmit, and fixed-pattern test modes, shared between the
//! byte-ready interrupt and the foreground loop.

pub mod buffers;
pub mod frame;
pub mod link;
pub mod transceiver;

pub use link::Link;
pub use transceiver::Transceiver;
