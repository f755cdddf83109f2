/// Errors produced while parsing or building messages and payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Fewer bytes available than the requested field needs.
    #[error("out of data")]
    OutOfData,

    /// More than four address bytes before the terminator.
    #[error("address stack exceeds four entries")]
    AddressTooLong,

    /// `downstream` called on the local-node (empty) address.
    #[error("address stack is empty")]
    AddressStackEmpty,

    /// `upstream` called on a four-deep address.
    #[error("address stack is full")]
    AddressStackFull,

    /// No zero terminator within the address bytes.
    #[error("address missing zero terminator")]
    AddressMissingTerminator,

    /// Serialized message would exceed the 63-byte wire limit.
    #[error("message too large")]
    MessageTooLarge,

    /// Record too short to hold sequence number and message type.
    #[error("message malformed")]
    MessageMalformed,
}

pub type Result<T> = std::result::Result<T, WireError>;
