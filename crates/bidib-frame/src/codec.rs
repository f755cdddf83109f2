//! Escaping and frame-level sealing.
//!
//! Wire layout of a frame, between two magic bytes:
//!
//! ```text
//! ┌────────────────────────────┬──────────┐
//! │ messages (escaped)         │ CRC-8    │
//! │ one or more, concatenated  │ (escaped)│
//! └────────────────────────────┴──────────┘
//! ```
//!
//! The CRC is computed over the unescaped bytes; a receiver folding the
//! CRC byte into the sum must end up at zero.

use crate::crc::crc8;
use crate::error::{FrameError, Result};

/// Frame delimiter. Never appears inside a frame body.
pub const MAGIC: u8 = 0xFE;

/// Escape marker; the following byte is XOR-ed with [`ESCAPE_XOR`].
pub const ESCAPE: u8 = 0xFD;

/// XOR applied to an escaped byte.
pub const ESCAPE_XOR: u8 = 0x20;

/// Escape every magic and escape byte in `data`.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 2);
    for &byte in data {
        if byte == MAGIC || byte == ESCAPE {
            out.push(ESCAPE);
            out.push(byte ^ ESCAPE_XOR);
        } else {
            out.push(byte);
        }
    }
    out
}

/// Undo [`escape`]. Fails if the input ends in a dangling escape byte.
pub fn unescape(data: &[u8]) -> Result<Vec<u8>> {
    if data.last() == Some(&ESCAPE) {
        return Err(FrameError::EscapingIncomplete);
    }

    let mut out = Vec::with_capacity(data.len());
    let mut escaped = false;
    for &byte in data {
        if escaped {
            out.push(byte ^ ESCAPE_XOR);
            escaped = false;
        } else if byte == ESCAPE {
            escaped = true;
        } else {
            out.push(byte);
        }
    }
    Ok(out)
}

/// Build the complete wire form of a packet: append the CRC, escape, and
/// delimit with magic bytes on both sides.
pub fn seal(packet: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(packet.len() + 1);
    body.extend_from_slice(packet);
    body.push(crc8(packet));

    let mut out = Vec::with_capacity(body.len() + 4);
    out.push(MAGIC);
    out.extend_from_slice(&escape(&body));
    out.push(MAGIC);
    out
}

/// Validate a received frame (as produced by the splitter) and return the
/// packet it carries, without the trailing CRC byte.
pub fn open(frame: &[u8]) -> Result<Vec<u8>> {
    let mut packet = unescape(frame)?;
    let residue = crc8(&packet);
    if residue != 0 {
        return Err(FrameError::BadChecksum { residue });
    }
    packet.pop();
    Ok(packet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_leaves_plain_bytes_alone() {
        assert_eq!(escape(&[1, 2, 3, 4]), vec![1, 2, 3, 4]);
        assert_eq!(escape(&[]), Vec::<u8>::new());
    }

    #[test]
    fn escape_stuffs_both_reserved_bytes() {
        assert_eq!(escape(&[ESCAPE]), vec![ESCAPE, ESCAPE ^ 0x20]);
        assert_eq!(escape(&[MAGIC]), vec![ESCAPE, MAGIC ^ 0x20]);
        assert_eq!(
            escape(&[1, 2, ESCAPE, 3, 4, MAGIC, 5, 6]),
            vec![1, 2, ESCAPE, ESCAPE ^ 0x20, 3, 4, ESCAPE, MAGIC ^ 0x20, 5, 6]
        );
    }

    #[test]
    fn unescape_inverts_escape() {
        let inputs: &[&[u8]] = &[
            &[],
            &[1, 2, 3, 4],
            &[ESCAPE],
            &[MAGIC],
            &[1, 2, ESCAPE, 3, 4, MAGIC, 5, 6],
            &[MAGIC, MAGIC, ESCAPE, ESCAPE],
        ];
        for input in inputs {
            assert_eq!(unescape(&escape(input)).unwrap(), input.to_vec());
        }
    }

    #[test]
    fn trailing_escape_byte_is_rejected() {
        assert_eq!(
            unescape(&[1, 2, 3, ESCAPE]),
            Err(FrameError::EscapingIncomplete)
        );
    }

    #[test]
    fn seal_then_open_roundtrips() {
        let packet = vec![0x07, 0x00, 0x2a, 0x01, 10, 20, 30, 40];
        let wire = seal(&packet);
        assert_eq!(wire.first(), Some(&MAGIC));
        assert_eq!(wire.last(), Some(&MAGIC));

        let inner = &wire[1..wire.len() - 1];
        assert_eq!(open(inner).unwrap(), packet);
    }

    #[test]
    fn seal_escapes_a_magic_valued_crc() {
        // A packet whose CRC happens to be the magic byte must still
        // produce a frame free of interior 0xFE.
        let packet: Vec<u8> = (0..=255u8)
            .map(|seed| vec![seed])
            .find(|p| crc8(p) == MAGIC)
            .expect("some single byte has a magic CRC");
        let wire = seal(&packet);
        assert!(!wire[1..wire.len() - 1].contains(&MAGIC));
        assert_eq!(open(&wire[1..wire.len() - 1]).unwrap(), packet);
    }

    #[test]
    fn open_rejects_corrupted_frames() {
        let mut wire = seal(&[1, 2, 3, 4]);
        let len = wire.len();
        wire[2] ^= 0x01;
        assert!(matches!(
            open(&wire[1..len - 1]),
            Err(FrameError::BadChecksum { .. })
        ));
    }
}
