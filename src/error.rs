//! Error types for `oggdemux`.

/// Result type for page decoding and packet demuxing.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned while reading an Ogg/Vorbis stream.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The byte source failed (unreachable offset, short source, device error).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes read do not follow the Ogg page or Vorbis header layout.
    #[error("invalid format: {0}")]
    FormatInvalid(String),

    /// Page checksum mismatch. Only raised when CRC verification is enabled.
    #[error("crc mismatch (expected {expected:#010x}, got {actual:#010x})")]
    CrcMismatch {
        /// CRC stored in the page header.
        expected: u32,
        /// CRC computed over the page bytes.
        actual: u32,
    },
}

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::FormatInvalid(msg.into())
    }

    /// True for structural errors, false for errors raised by the byte source.
    pub fn is_format(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}
