/// Errors that can occur while decoding a wire frame.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The frame ends with a lone escape byte.
    #[error("escape sequence incomplete (frame ends with 0xFD)")]
    EscapingIncomplete,

    /// The CRC-8 over the unescaped frame did not come out as zero.
    #[error("frame checksum mismatch (residue 0x{residue:02x})")]
    BadChecksum { residue: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
