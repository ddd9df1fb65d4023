//! Build script for the MRF49XA dongle firmware
//!
//! Handles:
//! - Linker scripts for the embedded binary (cortex-m-rt and defmt)

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (tests) link normally
    if std::env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    // memory.x itself is generated by embassy-stm32 (memory-x feature)
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
