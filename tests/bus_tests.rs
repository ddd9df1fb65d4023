//! Register Bus Tests
//!
//! Tests for the bit-banged bus timing-independent behavior and the
//! busy-flag guarded shared bus.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test bus_tests

use mrf49xa_dongle::hal::doubles::{MockBus, MockPin, NoDelay, ScriptedPin};
use mrf49xa_dongle::hal::spi::{BitBangBus, RegisterBus, SharedBus};

fn bit_bang(sdo: ScriptedPin) -> BitBangBus<MockPin, MockPin, MockPin, ScriptedPin, NoDelay> {
    BitBangBus::new(
        MockPin::new(true),
        MockPin::new(false),
        MockPin::new(false),
        sdo,
        NoDelay,
    )
}

/// Reassemble the word clocked out on SDI (level latched before each SCK rise)
fn clocked_word(sdi: &MockPin, bits: usize) -> u16 {
    // Parking writes one level before the first transaction
    sdi.changes[1..=bits]
        .iter()
        .fold(0, |word, &bit| (word << 1) | u16::from(bit))
}

// =============================================================================
// Bit-Banged Bus Tests
// =============================================================================

#[test]
fn new_parks_lines() {
    let bus = bit_bang(ScriptedPin::default());
    let (cs, sck, sdi, _, _) = bus.release();
    assert!(cs.state);
    assert!(!sck.state);
    assert!(!sdi.state);
}

#[test]
fn transfer16_shifts_msb_first() {
    let mut bus = bit_bang(ScriptedPin::default());
    let _ = bus.transfer16(0xCA81);
    let (cs, sck, sdi, _, _) = bus.release();
    assert_eq!(clocked_word(&sdi, 16), 0xCA81);
    // 16 rising and 16 falling edges after parking
    assert_eq!(sck.changes.len(), 1 + 32);
    // Selected once, released once
    assert_eq!(cs.changes, [true, false, true]);
}

#[test]
fn transfer16_samples_response() {
    let mut bus = bit_bang(ScriptedPin::from_word(0x80A5, 16));
    assert_eq!(bus.transfer16(0xB000), 0x80A5);
    assert_eq!(bus.read16(), 0x80A5);
}

#[test]
fn transfer8_returns_byte() {
    let mut bus = bit_bang(ScriptedPin::from_word(0x5A, 8));
    assert_eq!(bus.transfer8(0xFF), 0x5A);
    let (_, _, sdi, sdo, _) = bus.release();
    assert_eq!(clocked_word(&sdi, 8), 0xFF);
    assert_eq!(sdo.samples, 8);
}

#[test]
fn read8_clears_latch() {
    let mut bus = bit_bang(ScriptedPin::from_word(0x1234, 16));
    bus.write16(0xB000);
    assert_eq!(bus.read8(), 0x34);
    assert_eq!(bus.read16(), 0);
}

#[test]
fn fifo_ready_samples_with_select_asserted() {
    let mut bus = bit_bang(ScriptedPin::from_word(1, 1));
    assert!(bus.fifo_ready());
    assert!(!bus.fifo_ready());
    let (cs, _, _, _, _) = bus.release();
    assert_eq!(cs.changes, [true, false, true, false, true]);
}

// =============================================================================
// Shared Bus Tests
// =============================================================================

#[test]
fn shared_bus_forwards_transactions() {
    let shared = SharedBus::new(MockBus::new());
    let mut handle = &shared;
    handle.write16(0x8213);
    assert_eq!(shared.into_inner().sent, [0x8213]);
}

#[test]
fn shared_bus_refuses_nested_transaction() {
    let shared = SharedBus::new(MockBus::new());
    let nested = shared.try_transaction(|_| shared.try_transaction(|bus| bus.write16(1)));
    assert_eq!(nested, Some(None));
    assert!(shared.into_inner().sent.is_empty());
}

#[test]
fn shared_bus_reports_busy_inside_transaction() {
    let shared = SharedBus::new(MockBus::new());
    assert!(!shared.is_busy());
    assert_eq!(shared.try_transaction(|_| shared.is_busy()), Some(true));
    assert!(!shared.is_busy());
}

#[test]
fn shared_bus_read8_is_one_transaction() {
    let mut inner = MockBus::new();
    inner.queue_rx(&[0x42]);
    let shared = SharedBus::new(inner);
    let mut handle = &shared;
    handle.write16(0xB000);
    assert_eq!(handle.read8(), 0x42);
    assert_eq!(handle.read8(), 0);
}
