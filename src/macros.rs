//! Logging shims
//!
//! Library code logs through these macros. With the `embedded` feature they
//! forward to `defmt`; on the host they expand to nothing so the `std` build
//! needs no global logger.

#![allow(unused_macros)]

#[cfg(feature = "embedded")]
macro_rules! trace {
    ($($arg:tt)*) => { defmt::trace!($($arg)*) };
}

#[cfg(feature = "embedded")]
macro_rules! debug {
    ($($arg:tt)*) => { defmt::debug!($($arg)*) };
}

#[cfg(feature = "embedded")]
macro_rules! info {
    ($($arg:tt)*) => { defmt::info!($($arg)*) };
}

#[cfg(feature = "embedded")]
macro_rules! warn {
    ($($arg:tt)*) => { defmt::warn!($($arg)*) };
}

#[cfg(not(feature = "embedded"))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "embedded"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "embedded"))]
macro_rules! info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "embedded"))]
macro_rules! warn {
    ($($arg:tt)*) => {};
}
