//! Tests for shared types
//!
//! Tests packet construction, wire lengths, type bytes and link state.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test types_tests

use mrf49xa_dongle::config::{MAX_PAYLOAD, RX_OVERHEAD, TX_OVERHEAD};
use mrf49xa_dongle::types::*;

// ============================================================================
// PacketType Tests
// ============================================================================

#[test]
fn packet_type_wire_bytes() {
    assert_eq!(PacketType::Serial.to_wire(), 0x01);
    assert_eq!(PacketType::SerialEcc.to_wire(), 0x02);
    assert_eq!(PacketType::Packet.to_wire(), 0x03);
    assert_eq!(PacketType::PacketEcc.to_wire(), 0x04);
}

#[test]
fn packet_type_from_wire() {
    for kind in [
        PacketType::Serial,
        PacketType::SerialEcc,
        PacketType::Packet,
        PacketType::PacketEcc,
    ] {
        assert_eq!(PacketType::from_wire(kind.to_wire()), Some(kind));
    }
    assert_eq!(PacketType::from_wire(0x00), None);
    assert_eq!(PacketType::from_wire(0x05), None);
}

#[test]
fn packet_type_ecc_flags() {
    assert!(!PacketType::Serial.is_ecc());
    assert!(PacketType::SerialEcc.is_ecc());
    assert!(!PacketType::Packet.is_ecc());
    assert!(PacketType::PacketEcc.is_ecc());
}

#[test]
fn packet_type_wire_len() {
    assert_eq!(PacketType::Serial.wire_len(5), 5);
    assert_eq!(PacketType::PacketEcc.wire_len(5), 10);
}

// ============================================================================
// Packet Tests
// ============================================================================

#[test]
fn packet_from_slice() {
    let packet = Packet::from_slice(PacketType::Serial, &[1, 2, 3, 4, 5]).unwrap();
    assert_eq!(packet.kind(), PacketType::Serial);
    assert_eq!(packet.payload_size(), 5);
    assert_eq!(packet.payload(), &[1, 2, 3, 4, 5]);
}

#[test]
fn packet_max_payload_accepted() {
    let packet = Packet::from_slice(PacketType::Packet, &[0x55; MAX_PAYLOAD]).unwrap();
    assert_eq!(packet.payload_size(), MAX_PAYLOAD);
}

#[test]
fn packet_too_long_rejected() {
    let result = Packet::from_slice(PacketType::Packet, &[0; MAX_PAYLOAD + 1]);
    assert_eq!(result, Err(PacketError::TooLong(MAX_PAYLOAD + 1)));
}

#[test]
fn packet_zero_fill_clamps() {
    let mut packet = Packet::from_slice(PacketType::Serial, &[9, 9]).unwrap();
    packet.zero_fill(4);
    assert_eq!(packet.payload(), &[0, 0, 0, 0]);
    packet.zero_fill(MAX_PAYLOAD + 10);
    assert_eq!(packet.payload_size(), MAX_PAYLOAD);
}

#[test]
fn packet_frame_lengths() {
    let serial = Packet::from_slice(PacketType::Serial, &[0; 5]).unwrap();
    assert_eq!(serial.tx_frame_len(), TX_OVERHEAD + 5);
    assert_eq!(serial.rx_frame_len(), RX_OVERHEAD + 5);

    let ecc = Packet::from_slice(PacketType::PacketEcc, &[0; 3]).unwrap();
    assert_eq!(ecc.wire_payload_len(), 6);
    assert_eq!(ecc.tx_frame_len(), TX_OVERHEAD + 6);
}

#[test]
fn packet_copy_from() {
    let source = Packet::from_slice(PacketType::SerialEcc, &[7, 8]).unwrap();
    let mut target = Packet::from_slice(PacketType::Packet, &[1, 2, 3]).unwrap();
    target.copy_from(&source);
    assert_eq!(target, source);
}

#[test]
fn packet_error_display() {
    let text = format!("{}", PacketError::TooLong(70));
    assert!(text.contains("70"));
}

// ============================================================================
// Test Pattern and State Tests
// ============================================================================

#[test]
fn test_pattern_bytes() {
    assert_eq!(TestPattern::Zero.byte(), 0x00);
    assert_eq!(TestPattern::One.byte(), 0xFF);
    assert_eq!(TestPattern::Alternating.byte(), 0xAA);
}

#[test]
fn link_state_default_idle() {
    let state = LinkState::default();
    assert!(state.is_idle());
    assert!(!state.is_test());
}

#[test]
fn link_state_predicates() {
    assert!(!LinkState::Receiving { position: 1 }.is_idle());
    assert!(!LinkState::Transmitting { position: 0 }.is_idle());
    assert!(LinkState::Test(TestPattern::One).is_test());
}

#[test]
fn submit_error_display() {
    assert_eq!(format!("{}", SubmitError::Busy), "transceiver busy");
}
