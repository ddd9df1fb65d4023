//! Hardware Abstraction Layer
//!
//! Provides the register bus between the MCU and the transceiver.
//! The bus is generic over `embedded-hal` pins so the link layer runs
//! unchanged on the target and on the host.

pub mod spi;

#[cfg(feature = "std")]
pub mod doubles;
