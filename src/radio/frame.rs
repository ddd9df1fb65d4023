//! Wire Frame Layout
//!
//! ```text
//! preamble | sync (2) | length | type | payload ... | trailer
//! ```
//!
//! `length` counts original payload bytes. ECC packets carry two codewords
//! per payload byte, low nibble first. The receiver only sees the bytes
//! after the sync word; its frame position starts at the length byte.

use crate::config::{PREAMBLE, RX_OVERHEAD, SYNC_WORD, TX_LEAD_IN, TX_TRAILER};
use crate::ecc;
use crate::types::Packet;

/// Wire byte at `position` of the transmit frame for `packet`
///
/// Returns `None` past the end of the frame.
#[must_use]
pub fn tx_byte(packet: &Packet, position: usize) -> Option<u8> {
    let payload_start = TX_LEAD_IN + RX_OVERHEAD;
    let trailer = packet.tx_frame_len() - 1;
    match position {
        0 => Some(PREAMBLE),
        1 | 2 => Some(SYNC_WORD[position - 1]),
        3 => u8::try_from(packet.payload_size()).ok(),
        4 => Some(packet.kind().to_wire()),
        p if p == trailer => Some(TX_TRAILER),
        p if p < trailer => {
            let offset = p - payload_start;
            if packet.kind().is_ecc() {
                let byte = *packet.payload().get(offset / 2)?;
                Some(ecc::encode_byte(byte)[offset % 2])
            } else {
                packet.payload().get(offset).copied()
            }
        }
        _ => None,
    }
}

/// Store a received payload wire byte at `offset` (wire bytes past the
/// type byte)
///
/// ECC bytes are decoded and OR-ed into place: even offsets fill the low
/// nibble, odd offsets the high nibble. The payload must have been zeroed
/// at frame start.
pub fn place_rx_byte(packet: &mut Packet, offset: usize, byte: u8) {
    let ecc = packet.kind().is_ecc();
    let payload = packet.payload_mut();
    if ecc {
        if let Some(slot) = payload.get_mut(offset / 2) {
            let nibble = ecc::decode_nibble(byte);
            *slot |= if offset % 2 == 0 { nibble } else { nibble << 4 };
        }
    } else if let Some(slot) = payload.get_mut(offset) {
        *slot = byte;
    }
}
