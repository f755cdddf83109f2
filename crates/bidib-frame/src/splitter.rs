use bytes::{Bytes, BytesMut};

/// Reassembles magic-delimited frames from an arbitrary chunking of the
/// serial byte stream.
///
/// Every `0xFE` terminates the frame in progress. Bytes seen before the
/// first magic byte are line noise and are dropped. Consecutive magic
/// bytes (an idle keep-alive pattern) produce no frames. A partial frame
/// is kept across calls to [`feed`](Self::feed).
#[derive(Debug, Default)]
pub struct FrameSplitter {
    current: BytesMut,
    synced: bool,
}

impl FrameSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push received bytes, returning every frame completed by this chunk.
    pub fn feed(&mut self, data: &[u8]) -> Vec<Bytes> {
        let mut frames = Vec::new();

        for &byte in data {
            if byte == crate::MAGIC {
                if !self.current.is_empty() {
                    frames.push(self.current.split().freeze());
                }
                self.synced = true;
            } else if self.synced {
                self.current.extend_from_slice(&[byte]);
            } else {
                tracing::trace!(byte, "dropping garbage before first frame");
            }
        }

        frames
    }

    /// Number of bytes buffered for the frame in progress.
    pub fn pending(&self) -> usize {
        self.current.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAGIC;

    #[test]
    fn contiguous_frame() {
        let mut splitter = FrameSplitter::new();
        let frames = splitter.feed(&[MAGIC, 1, 2, 3, 4, MAGIC]);
        assert_eq!(frames, vec![Bytes::from_static(&[1, 2, 3, 4])]);
    }

    #[test]
    fn fragmented_frame() {
        let mut splitter = FrameSplitter::new();
        assert!(splitter.feed(&[MAGIC, 1, 2]).is_empty());
        assert_eq!(splitter.pending(), 2);

        let frames = splitter.feed(&[3, 4, MAGIC]);
        assert_eq!(frames, vec![Bytes::from_static(&[1, 2, 3, 4])]);
        assert_eq!(splitter.pending(), 0);
    }

    #[test]
    fn multiple_frames_across_chunks() {
        let mut splitter = FrameSplitter::new();
        assert!(splitter.feed(&[MAGIC, 1, 2]).is_empty());

        let frames = splitter.feed(&[3, 4, MAGIC, 5, 6, MAGIC, 7, 8]);
        assert_eq!(
            frames,
            vec![
                Bytes::from_static(&[1, 2, 3, 4]),
                Bytes::from_static(&[5, 6])
            ]
        );

        let frames = splitter.feed(&[9, 10, MAGIC]);
        assert_eq!(frames, vec![Bytes::from_static(&[7, 8, 9, 10])]);
    }

    #[test]
    fn leading_garbage_is_skipped() {
        let mut splitter = FrameSplitter::new();
        let frames = splitter.feed(&[5, 6, MAGIC, 1, 2, 3, 4, MAGIC]);
        assert_eq!(frames, vec![Bytes::from_static(&[1, 2, 3, 4])]);
    }

    #[test]
    fn idle_magic_bytes_emit_nothing() {
        let mut splitter = FrameSplitter::new();
        assert!(splitter.feed(&[MAGIC, MAGIC, MAGIC]).is_empty());
        assert_eq!(splitter.pending(), 0);
    }

    #[test]
    fn empty_input_is_a_no_op() {
        let mut splitter = FrameSplitter::new();
        assert!(splitter.feed(&[]).is_empty());
    }
}
