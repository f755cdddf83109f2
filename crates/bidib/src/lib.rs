//! BiDiB node emulation over a serial link.
//!
//! # Crate structure
//!
//! - [`frame`] — framing, escaping and CRC (wire layer)
//! - [`wire`] — addresses, message records, typed pack/unpack
//! - [`transport`] — serial-port byte transport
//! - [`node`] — the node engine and its byte-level driver

/// Re-export frame types.
pub mod frame {
    pub use bidib_frame::*;
}

/// Re-export wire types.
pub mod wire {
    pub use bidib_wire::*;
}

/// Re-export transport types.
pub mod transport {
    pub use bidib_transport::*;
}

/// Re-export node engine types.
pub mod node {
    pub use bidib_node::*;
}
