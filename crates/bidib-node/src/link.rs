use std::time::Instant;

use tracing::{error, warn};

use bidib_frame::FrameSplitter;
use bidib_wire::{split_packet, Address, Message, Sequence};

use crate::node::Node;

/// Byte-level driver for a [`Node`].
///
/// Owns the frame reassembly state and the outbound sequence counter, so
/// the I/O loop only shuttles opaque chunks: whatever the transport
/// received goes into [`handle_bytes`](Self::handle_bytes), and the
/// returned bytes go back out. Reassembly state survives a transport
/// reopen.
pub struct NodeLink {
    splitter: FrameSplitter,
    seq: Sequence,
    node: Node,
}

impl NodeLink {
    pub fn new(node: Node) -> Self {
        Self {
            splitter: FrameSplitter::new(),
            seq: Sequence::new(),
            node,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn node_mut(&mut self) -> &mut Node {
        &mut self.node
    }

    /// Feed received bytes through the stack and return the wire form of
    /// every reply this produced.
    pub fn handle_bytes(&mut self, data: &[u8], now: Instant) -> Vec<u8> {
        for frame in self.splitter.feed(data) {
            let packet = match bidib_frame::open(&frame) {
                Ok(packet) => packet,
                Err(err) => {
                    warn!(error = %err, frame = frame.len(), "dropping bad frame");
                    continue;
                }
            };

            for record in split_packet(&packet) {
                match record {
                    Ok(record) => self.node.handle_record(&record, now),
                    Err(err) => warn!(error = %err, "dropping malformed record"),
                }
            }
        }

        self.flush()
    }

    /// Fire due timers and return the wire form of anything they emitted.
    pub fn poll(&mut self, now: Instant) -> Vec<u8> {
        self.node.poll(now);
        self.flush()
    }

    /// When the loop must wake up next, if any timer is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.node.next_deadline()
    }

    fn flush(&mut self) -> Vec<u8> {
        let mut wire = Vec::new();
        for message in self.node.take_outgoing() {
            match message.to_send_buffer(Address::local(), self.seq.next()) {
                Ok(packet) => wire.extend_from_slice(&bidib_frame::seal(&packet)),
                Err(err) => error!(error = %err, message = ?message, "dropping reply"),
            }
        }
        wire
    }
}

/// Serialize one message the way the link does, for tests and tools.
pub fn encode_message(message: &Message, number: u8) -> Option<Vec<u8>> {
    message
        .to_send_buffer(Address::local(), number)
        .map(|packet| bidib_frame::seal(&packet))
        .ok()
}
