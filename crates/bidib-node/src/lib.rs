//! The node engine: everything above the wire.
//!
//! [`Node`] owns the protocol state — handler table, features, node table,
//! strings, booster and command-station state — and turns inbound message
//! records into outbound messages. It never blocks and never reads a
//! clock; the caller passes `Instant`s in, which keeps every timed
//! behavior testable.
//!
//! [`NodeLink`] wraps a `Node` together with frame reassembly and
//! outbound serialization into a byte-in/byte-out driver for the serve
//! loop.

pub mod config;
pub mod handler;
pub mod link;
pub mod node;

pub use config::NodeConfig;
pub use link::NodeLink;
pub use node::Node;
