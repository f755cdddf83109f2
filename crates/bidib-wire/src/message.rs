//! Message records and their packet form.
//!
//! A packet (one CRC-validated frame body) carries one or more records:
//!
//! ```text
//! ┌─────┬──────────────┬──────┬─────┬──────┬─────────┐
//! │ L   │ address hops │ 0x00 │ seq │ type │ payload │
//! └─────┴──────────────┴──────┴─────┴──────┴─────────┘
//! ```
//!
//! `L` counts every byte after it, and the whole record is capped at 64
//! bytes (`L` ≤ 63).

use std::fmt;

use crate::address::Address;
use crate::consts::message_name;
use crate::error::{Result, WireError};
use crate::pack::{pack, PackArgs};

const MAX_MESSAGE_SIZE: usize = 63;

/// One BiDiB operation: a type byte plus its payload.
///
/// Immutable once constructed; addressing and sequence numbering are
/// applied at serialization time.
#[derive(Clone, PartialEq, Eq)]
pub struct Message {
    ty: u8,
    payload: Vec<u8>,
}

impl Message {
    pub fn new(ty: u8, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            ty,
            payload: payload.into(),
        }
    }

    /// Build a message by packing a tuple of fields as the payload.
    pub fn with<T: PackArgs>(ty: u8, args: T) -> Self {
        Self::new(ty, pack(args))
    }

    pub fn ty(&self) -> u8 {
        self.ty
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serialize into packet form for the given address and sequence
    /// number.
    pub fn to_send_buffer(&self, address: Address, number: u8) -> Result<Vec<u8>> {
        let size = 3 + address.size() + self.payload.len();
        if size > MAX_MESSAGE_SIZE {
            return Err(WireError::MessageTooLarge);
        }

        let mut buf = Vec::with_capacity(size + 1);
        buf.push(size as u8);
        buf.extend_from_slice(&address.to_bytes());
        buf.push(number);
        buf.push(self.ty);
        buf.extend_from_slice(&self.payload);
        Ok(buf)
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", message_name(self.ty), hex(&self.payload))
    }
}

/// A parsed inbound record: where it was headed, its per-hop sequence
/// number, and the message itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub address: Address,
    pub number: u8,
    pub message: Message,
}

impl fmt::Display for MessageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:?}] {} {}",
            self.address,
            self.number,
            message_name(self.message.ty())
        )?;
        if !self.message.payload().is_empty() {
            write!(f, " {}", hex(self.message.payload()))?;
        }
        Ok(())
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join("-")
}

/// Iterate the records of a packet.
///
/// Body-level problems (bad address, record too short) are reported per
/// record and scanning continues at the next length boundary; a length
/// byte that overruns the packet ends iteration with [`WireError::OutOfData`].
pub fn split_packet(packet: &[u8]) -> RecordSplitter<'_> {
    RecordSplitter {
        packet,
        pos: 0,
        dead: false,
    }
}

#[derive(Debug)]
pub struct RecordSplitter<'a> {
    packet: &'a [u8],
    pos: usize,
    dead: bool,
}

impl Iterator for RecordSplitter<'_> {
    type Item = Result<MessageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.dead || self.pos >= self.packet.len() {
            return None;
        }

        let len = usize::from(self.packet[self.pos]);
        let start = self.pos + 1;
        let end = start + len;
        if end > self.packet.len() {
            // No usable boundary left; abandon the rest of the packet.
            self.dead = true;
            return Some(Err(WireError::OutOfData));
        }
        self.pos = end;

        Some(parse_record(&self.packet[start..end]))
    }
}

impl std::iter::FusedIterator for RecordSplitter<'_> {}

fn parse_record(body: &[u8]) -> Result<MessageRecord> {
    let terminator = body
        .iter()
        .position(|&b| b == 0)
        .ok_or(WireError::AddressMissingTerminator)?;
    if terminator > 4 {
        return Err(WireError::AddressTooLong);
    }
    if body.len() < terminator + 3 {
        return Err(WireError::MessageMalformed);
    }

    Ok(MessageRecord {
        address: Address::from_hops(&body[..terminator]),
        number: body[terminator + 1],
        message: Message::new(body[terminator + 2], &body[terminator + 3..]),
    })
}

/// Outbound sequence numbers: 1..=255, wrapping back to 1, never 0.
#[derive(Debug, Default)]
pub struct Sequence {
    num: u8,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> u8 {
        if self.num == 0 {
            self.num = 1;
        }
        let n = self.num;
        self.num = self.num.wrapping_add(1);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MSG_SYS_GET_MAGIC, MSG_SYS_MAGIC};

    #[test]
    fn message_keeps_type_and_payload() {
        let m = Message::new(1, vec![1, 2, 3, 4]);
        assert_eq!(m.ty(), 1);
        assert_eq!(m.payload(), &[1, 2, 3, 4]);
    }

    #[test]
    fn send_buffer_for_local_node() {
        let m = Message::new(1, vec![10, 20, 30, 40]);
        let buf = m.to_send_buffer(Address::local(), 42).unwrap();
        assert_eq!(buf, vec![7, 0, 42, 1, 10, 20, 30, 40]);
    }

    #[test]
    fn send_buffer_with_address() {
        let m = Message::new(1, vec![10, 20, 30, 40]);
        let addr = Address::parse(&[9, 4, 5, 0]).unwrap();
        let buf = m.to_send_buffer(addr, 99).unwrap();
        assert_eq!(buf, vec![10, 9, 4, 5, 0, 99, 1, 10, 20, 30, 40]);
    }

    #[test]
    fn send_buffer_rejects_oversized_payload() {
        let m = Message::new(1, vec![0; 100]);
        let addr = Address::parse(&[9, 4, 5, 0]).unwrap();
        assert_eq!(
            m.to_send_buffer(addr, 99),
            Err(WireError::MessageTooLarge)
        );
    }

    #[test]
    fn send_buffer_edge_of_limit() {
        // 3 + 0 + 60 == 63: just fits.
        let m = Message::new(1, vec![0; 60]);
        assert!(m.to_send_buffer(Address::local(), 1).is_ok());

        let m = Message::new(1, vec![0; 61]);
        assert_eq!(
            m.to_send_buffer(Address::local(), 1),
            Err(WireError::MessageTooLarge)
        );
    }

    #[test]
    fn split_single_record() {
        let packet = [7, 0, 42, 1, 10, 20, 30, 40];
        let records: Vec<_> = split_packet(&packet).collect();
        assert_eq!(records.len(), 1);
        let rec = records[0].as_ref().unwrap();
        assert!(rec.address.is_local());
        assert_eq!(rec.number, 42);
        assert_eq!(rec.message, Message::new(1, vec![10, 20, 30, 40]));
    }

    #[test]
    fn split_multiple_records() {
        let mut packet = vec![3, 0, 1, MSG_SYS_GET_MAGIC];
        packet.extend_from_slice(&[5, 2, 0, 7, MSG_SYS_MAGIC, 0xaf]);
        let records: Vec<_> = split_packet(&packet).map(Result::unwrap).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].number, 1);
        assert_eq!(records[0].message.ty(), MSG_SYS_GET_MAGIC);
        assert_eq!(records[1].address, Address::parse(&[2, 0]).unwrap());
        assert_eq!(records[1].message.payload(), &[0xaf]);
    }

    #[test]
    fn record_roundtrips_through_send_buffer() {
        let m = Message::with(MSG_SYS_MAGIC, (0xaffeu16,));
        let addr = Address::parse(&[3, 1, 0]).unwrap();
        let buf = m.to_send_buffer(addr, 17).unwrap();

        let records: Vec<_> = split_packet(&buf).map(Result::unwrap).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].address, addr);
        assert_eq!(records[0].number, 17);
        assert_eq!(records[0].message, m);
    }

    #[test]
    fn overrunning_length_byte_abandons_packet() {
        let packet = [9, 0, 42, 1, 10];
        let records: Vec<_> = split_packet(&packet).collect();
        assert_eq!(records, vec![Err(WireError::OutOfData)]);
    }

    #[test]
    fn malformed_record_does_not_poison_the_next() {
        // First record: address bytes with no terminator. Second: valid.
        let packet = [3, 9, 9, 9, 4, 0, 5, MSG_SYS_GET_MAGIC, 0xaa];
        let records: Vec<_> = split_packet(&packet).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Err(WireError::AddressMissingTerminator));
        let rec = records[1].as_ref().unwrap();
        assert_eq!(rec.number, 5);
        assert_eq!(rec.message.ty(), MSG_SYS_GET_MAGIC);
    }

    #[test]
    fn record_with_overlong_address() {
        let packet = [8, 1, 2, 3, 4, 5, 0, 6, 7];
        let records: Vec<_> = split_packet(&packet).collect();
        assert_eq!(records, vec![Err(WireError::AddressTooLong)]);
    }

    #[test]
    fn record_too_short_for_seq_and_type() {
        let packet = [2, 0, 42];
        let records: Vec<_> = split_packet(&packet).collect();
        assert_eq!(records, vec![Err(WireError::MessageMalformed)]);
    }

    #[test]
    fn sequence_starts_at_one_and_skips_zero() {
        let mut seq = Sequence::new();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);

        for _ in 3..=255 {
            seq.next();
        }
        // 255 emitted above; the wrap lands on 1, never 0.
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
    }
}
