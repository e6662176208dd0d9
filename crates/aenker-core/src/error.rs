use thiserror::Error;

pub type AenkerResult<T> = Result<T, AenkerError>;

/// Every failure a decode session can end with.
///
/// Messages name the boundary that failed (header, key derivation, chunk N)
/// and never carry key material or plaintext.
#[derive(Debug, Error)]
pub enum AenkerError {
    #[error("unknown magic bytes: not an aenker stream")]
    UnknownFormat,

    #[error("malformed header: stream ended before the 48-byte header was read")]
    MalformedHeader,

    #[error("truncated stream: chunk {chunk} is incomplete or missing")]
    TruncatedStream { chunk: u64 },

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("authentication failed at chunk {chunk}: wrong key or tampered data")]
    AuthenticationFailed { chunk: u64 },

    #[error("unknown framing tag {tag:#04x} at chunk {chunk}")]
    UnknownFramingTag { chunk: u64, tag: u8 },

    #[error("invalid padding length at chunk {chunk}")]
    InvalidPadding { chunk: u64 },

    #[error("nonce space exhausted after chunk {chunk}")]
    NonceExhausted { chunk: u64 },

    #[error("stream already finished: final chunk was consumed")]
    StreamFinished,

    #[error("decode session aborted by an earlier error")]
    SessionAborted,

    #[error("extraneous data after the final chunk")]
    TrailingData,

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AenkerError {
    /// True for failures that indicate a wrong key or tampering, as opposed
    /// to a format mismatch or a short read.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, AenkerError::AuthenticationFailed { .. })
    }
}
