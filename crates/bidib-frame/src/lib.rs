//! Serial framing for the BiDiB bus.
//!
//! The wire carries frames delimited by the magic byte `0xFE`. Inside a
//! frame, the magic and the escape byte `0xFD` are escaped, and the frame
//! ends with a CRC-8 over the unescaped content. This crate turns a raw
//! byte stream into validated packets and back:
//!
//! - [`FrameSplitter`] — stream of bytes → delimited frames
//! - [`escape`] / [`unescape`] — reserved-byte stuffing
//! - [`crc8`] — CRC-8/MAXIM used to protect every frame
//! - [`seal`] / [`open`] — packet bytes ⇄ complete wire frame

pub mod codec;
pub mod crc;
pub mod error;
pub mod splitter;

pub use codec::{escape, open, seal, unescape, ESCAPE, ESCAPE_XOR, MAGIC};
pub use crc::crc8;
pub use error::{FrameError, Result};
pub use splitter::FrameSplitter;
