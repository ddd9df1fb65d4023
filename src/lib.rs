//! MRF49XA Packet Transceiver Firmware Library
//!
//! This library provides the link layer for a dongle built around the
//! Microchip MRF49XA narrowband FM transceiver. The radio is driven over a
//! software serial register bus; every byte it moves raises a "FIFO ready"
//! interrupt, and the firmware frames fixed-format packets one byte per
//! interrupt.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    FOREGROUND LOOP                           │
//! │  submit  │  poll_received  │  liveness  │  configuration     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                      LINK LAYER                              │
//! │  Transceiver state machine  │  Packet buffers  │  ECC codec  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   DRIVER / BUS LAYER                         │
//! │  MRF49XA command words  │  Register bus (busy-flag guarded)  │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │     embassy-rs (thread executor + interrupt executor)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **No allocation**: every buffer is fixed-size and reused for the
//!   lifetime of the firmware
//! - **Two contexts, one lock**: the byte-ready handler and the foreground
//!   share state only through a critical-section guarded [`radio::link::Link`]
//! - **Tables from matrices**: the nibble codec is derived at compile time
//!   from its generator and check matrices
//! - **No unsafe in application code**
//! - **Best-effort link**: no retransmission, no acknowledgement

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Logging macros must be declared before the modules that use them
#[macro_use]
mod macros;

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;

/// Hardware Abstraction Layer
///
/// Register bus traits, the bit-banged bus and the shared bus guard.
pub mod hal;

/// Peripheral Drivers
///
/// MRF49XA command words and register sequences.
pub mod drivers;

/// Error Correcting Code
///
/// (8,4) nibble codec with single-error correction.
pub mod ecc;

/// Radio Link Logic
///
/// Transceiver state machine, packet buffers and the shared link handle.
pub mod radio;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    pub use crate::drivers::mrf49xa::Mrf49xa;
    pub use crate::hal::spi::{BitBangBus, RegisterBus, SharedBus};
    pub use crate::radio::link::Link;
    pub use crate::radio::transceiver::Transceiver;

    // Common traits
    pub use embedded_hal::delay::DelayNs;
    pub use embedded_hal::digital::OutputPin;

    // Embassy
    pub use embassy_time::{Delay, Duration, Instant, Timer};

    // Error handling
    pub use core::result::Result;

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
