//! The BiDiB message layer.
//!
//! Sits between the frame codec and the node engine: a validated packet
//! (one frame, CRC stripped) is split into [`MessageRecord`]s, and outbound
//! [`Message`]s are serialized back into packet bytes. Payload contents are
//! encoded and decoded through the typed [`pack`]/[`unpack`] interface.

pub mod address;
pub mod consts;
pub mod error;
pub mod message;
pub mod pack;
pub mod types;

pub use address::Address;
pub use consts::message_name;
pub use error::{Result, WireError};
pub use message::{split_packet, Message, MessageRecord, Sequence};
pub use pack::{pack, unpack, PackField, Packer, UnpackField, Unpacker};
pub use types::{CsDrive, KeyValue, SoftwareVersion, Time, UniqueId};
