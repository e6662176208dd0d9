//! Fixed 48-byte stream header
//!
//! ```text
//! [8 bytes: magic "aenker\xe7\x9e"][8 bytes: HKDF salt][32 bytes: ephemeral X25519 public key]
//! ```
//!
//! The header is not authenticated on its own. Its raw bytes are bound into
//! every chunk as AEAD associated data, so any change to salt or ephemeral
//! key surfaces as an authentication failure on the first chunk.

use std::io::{ErrorKind, Read};

use aenker_core::{AenkerError, AenkerResult};

use crate::{KEY_SIZE, SALT_SIZE};

/// Magic bytes identifying an aenker stream. The two bytes after "aenker"
/// are the first two bytes of BLAKE2b-512("aenker").
pub const MAGIC: [u8; 8] = *b"aenker\xe7\x9e";

/// Total header length on the wire
pub const HEADER_SIZE: usize = MAGIC.len() + SALT_SIZE + KEY_SIZE;

const SALT_OFFSET: usize = MAGIC.len();
const EPHEMERAL_OFFSET: usize = SALT_OFFSET + SALT_SIZE;

/// A validated stream header. Keeps the raw bytes for use as associated data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    raw: [u8; HEADER_SIZE],
    salt: [u8; SALT_SIZE],
    ephemeral: [u8; KEY_SIZE],
}

impl StreamHeader {
    /// Read exactly [`HEADER_SIZE`] bytes from `reader` and validate them.
    ///
    /// Consumes nothing beyond the header.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> AenkerResult<Self> {
        let mut raw = [0u8; HEADER_SIZE];
        reader.read_exact(&mut raw).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => AenkerError::MalformedHeader,
            _ => AenkerError::Io(e),
        })?;
        Self::parse(raw)
    }

    /// Validate a header already held in memory.
    pub fn parse(raw: [u8; HEADER_SIZE]) -> AenkerResult<Self> {
        // public data, no need for a constant-time compare
        if raw[..MAGIC.len()] != MAGIC {
            return Err(AenkerError::UnknownFormat);
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&raw[SALT_OFFSET..EPHEMERAL_OFFSET]);
        let mut ephemeral = [0u8; KEY_SIZE];
        ephemeral.copy_from_slice(&raw[EPHEMERAL_OFFSET..]);

        Ok(Self {
            raw,
            salt,
            ephemeral,
        })
    }

    /// Validate the first [`HEADER_SIZE`] bytes of `bytes`.
    pub fn from_slice(bytes: &[u8]) -> AenkerResult<Self> {
        let raw: [u8; HEADER_SIZE] = bytes
            .get(..HEADER_SIZE)
            .and_then(|b| b.try_into().ok())
            .ok_or(AenkerError::MalformedHeader)?;
        Self::parse(raw)
    }

    /// The verbatim header, used as associated data for every chunk.
    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.raw
    }

    pub fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    pub fn ephemeral_public_key(&self) -> &[u8; KEY_SIZE] {
        &self.ephemeral
    }
}
