//! Byte transport for the node daemon.
//!
//! The protocol stack is transport-agnostic: anything that yields byte
//! chunks and accepts byte chunks will do. [`ByteTransport`] is that
//! contract; [`SerialLink`] implements it over a serial port.

pub mod error;
pub mod serial;

pub use error::{Result, TransportError};
pub use serial::{SerialConfig, SerialLink};

use std::time::Duration;

/// A bidirectional, chunk-oriented byte pipe.
pub trait ByteTransport {
    /// Read whatever is available into `buf`, waiting at most `timeout`.
    /// Returns 0 when the wait elapsed without data.
    fn recv(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Write the whole chunk.
    fn send(&mut self, data: &[u8]) -> Result<()>;
}
