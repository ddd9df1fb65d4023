//! Packet Buffer Tests
//!
//! Tests for the receive double buffer, the single-slot mailbox and the
//! transmit staging slot.
//! Run with: cargo test --target x86_64-unknown-linux-gnu --no-default-features --features std --test buffer_tests

use mrf49xa_dongle::radio::buffers::PacketBuffers;
use mrf49xa_dongle::types::{Packet, PacketType};

fn receive(buffers: &mut PacketBuffers, kind: PacketType, payload: &[u8]) {
    buffers.begin_frame(payload.len());
    let active = buffers.active_mut();
    active.set_kind(kind);
    active.payload_mut().copy_from_slice(payload);
    buffers.complete_frame();
}

#[test]
fn starts_empty() {
    let mut buffers = PacketBuffers::new();
    assert_eq!(buffers.active_index(), 0);
    assert!(!buffers.has_finished());
    assert!(buffers.take_finished().is_none());
}

#[test]
fn completed_frame_delivered_once() {
    let mut buffers = PacketBuffers::new();
    receive(&mut buffers, PacketType::Packet, &[9, 8, 7]);

    assert!(buffers.has_finished());
    let packet = buffers.take_finished().unwrap();
    assert_eq!(packet.kind(), PacketType::Packet);
    assert_eq!(packet.payload(), &[9, 8, 7]);
    assert!(buffers.take_finished().is_none());
}

#[test]
fn slots_alternate() {
    let mut buffers = PacketBuffers::new();
    receive(&mut buffers, PacketType::Serial, &[1]);
    assert_eq!(buffers.active_index(), 1);
    receive(&mut buffers, PacketType::Serial, &[2]);
    assert_eq!(buffers.active_index(), 0);
}

#[test]
fn unread_packet_overwritten() {
    let mut buffers = PacketBuffers::new();
    receive(&mut buffers, PacketType::Serial, &[1, 1]);
    receive(&mut buffers, PacketType::Serial, &[2, 2]);

    assert_eq!(buffers.take_finished().unwrap().payload(), &[2, 2]);
    assert!(buffers.take_finished().is_none());
}

#[test]
fn new_active_slot_starts_empty() {
    let mut buffers = PacketBuffers::new();
    receive(&mut buffers, PacketType::Serial, &[1, 2, 3]);
    receive(&mut buffers, PacketType::Serial, &[4]);
    // Slot 0 held the first packet and is active again
    assert_eq!(buffers.active().payload_size(), 0);
}

#[test]
fn finished_packet_stable_while_next_frame_fills() {
    let mut buffers = PacketBuffers::new();
    receive(&mut buffers, PacketType::Serial, &[5, 6]);
    buffers.begin_frame(2);
    buffers.active_mut().payload_mut()[0] = 0xEE;
    assert_eq!(buffers.take_finished().unwrap().payload(), &[5, 6]);
}

#[test]
fn staging_copies_packet() {
    let mut buffers = PacketBuffers::new();
    let mut packet = Packet::from_slice(PacketType::SerialEcc, &[0xAB, 0xCD]).unwrap();
    buffers.stage(&packet);
    packet.clear();

    assert_eq!(buffers.staged().kind(), PacketType::SerialEcc);
    assert_eq!(buffers.staged().payload(), &[0xAB, 0xCD]);
}

#[test]
fn staging_replaces_previous_packet() {
    let mut buffers = PacketBuffers::new();
    buffers.stage(&Packet::from_slice(PacketType::Serial, &[1, 2, 3, 4]).unwrap());
    buffers.stage(&Packet::from_slice(PacketType::Packet, &[9]).unwrap());
    assert_eq!(buffers.staged().kind(), PacketType::Packet);
    assert_eq!(buffers.staged().payload(), &[9]);
}
