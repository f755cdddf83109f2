/// Errors raised by the byte transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The device could not be opened.
    #[error("failed to open {device}: {source}")]
    Open {
        device: String,
        source: serialport::Error,
    },

    /// An I/O error occurred on the open link.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TransportError>;
