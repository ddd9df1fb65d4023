//! Packet Buffers
//!
//! Two receive slots form a double buffer. One is always active (being
//! filled); the other is idle or holds the finished packet waiting in the
//! mailbox. The mailbox holds at most one packet: a frame completed while
//! the previous one is still unread replaces it.
//!
//! A separate staging slot holds the outbound frame for the whole
//! transmission.

use crate::types::{Packet, PacketType};

/// Single-slot handoff to the foreground
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Mailbox {
    /// Slot holding the last finished packet
    finished: Option<usize>,
    /// Set on frame completion, cleared when taken
    flag: bool,
}

/// Receive double buffer, mailbox and transmit staging
#[derive(Debug)]
pub struct PacketBuffers {
    slots: [Packet; 2],
    active: usize,
    mailbox: Mailbox,
    staging: Packet,
}

impl PacketBuffers {
    /// Create empty buffers with slot 0 active
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: [Packet::new(PacketType::Serial), Packet::new(PacketType::Serial)],
            active: 0,
            mailbox: Mailbox {
                finished: None,
                flag: false,
            },
            staging: Packet::new(PacketType::Serial),
        }
    }

    /// Index of the slot being filled
    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    /// The slot being filled
    #[must_use]
    pub fn active(&self) -> &Packet {
        &self.slots[self.active]
    }

    /// Mutable access to the slot being filled
    pub fn active_mut(&mut self) -> &mut Packet {
        &mut self.slots[self.active]
    }

    /// Start a new frame of `len` payload bytes in the active slot
    ///
    /// The payload is zeroed so nibble-decoded bytes can be OR-accumulated.
    pub fn begin_frame(&mut self, len: usize) {
        let packet = self.active_mut();
        packet.set_kind(PacketType::Serial);
        packet.zero_fill(len);
    }

    /// Hand the active slot to the mailbox and switch to the other slot
    pub fn complete_frame(&mut self) {
        if self.mailbox.flag {
            trace!("unread packet in slot {} replaced", self.active ^ 1);
        }
        self.mailbox.finished = Some(self.active);
        self.mailbox.flag = true;
        self.active ^= 1;
        self.slots[self.active].clear();
    }

    /// Check if a finished packet is waiting
    #[must_use]
    pub const fn has_finished(&self) -> bool {
        self.mailbox.flag
    }

    /// Take the finished packet, if one arrived since the last take
    pub fn take_finished(&mut self) -> Option<&Packet> {
        if !self.mailbox.flag {
            return None;
        }
        self.mailbox.flag = false;
        self.mailbox.finished.map(|slot| &self.slots[slot])
    }

    /// Copy an outbound packet into staging
    pub fn stage(&mut self, packet: &Packet) {
        self.staging.copy_from(packet);
    }

    /// The staged outbound packet
    #[must_use]
    pub fn staged(&self) -> &Packet {
        &self.staging
    }
}

impl Default for PacketBuffers {
    fn default() -> Self {
        Self::new()
    }
}
