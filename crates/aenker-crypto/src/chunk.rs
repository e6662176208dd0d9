//! Chunked ChaCha20-Poly1305 stream decoding
//!
//! Wire format after the header:
//! ```text
//! [chunk_size bytes: ciphertext][16 bytes: Poly1305 tag]   × n
//! nonce = chunk index as 12 bytes little-endian
//! AAD   = the raw 48-byte stream header
//! ```
//!
//! Every chunk on the wire has the same size, including the last one. The
//! framing tag inside the plaintext marks the end of the stream, so the
//! decoder never reads past the final chunk.

use std::io::{ErrorKind, Read, Write};

use chacha20poly1305::{
    aead::{AeadInPlace, KeyInit},
    ChaCha20Poly1305, Key, Nonce,
};

use aenker_core::config::{validate_chunk_size, StreamConfig, DEFAULT_CHUNK_SIZE};
use aenker_core::{AenkerError, AenkerResult, PaddingMode};

use crate::framing::{self, ChunkKind};
use crate::keys::SymmetricKey;
use crate::nonce::NonceCounter;
use crate::TAG_SIZE;

/// Out-of-band parameters shared between producer and consumer of a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Plaintext bytes per chunk, framing tag included (default: 1984)
    pub chunk_size: usize,
    pub padding: PaddingMode,
    /// Fail with `TrailingData` if anything follows the final chunk
    pub reject_trailing_data: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            padding: PaddingMode::ByValue,
            reject_trailing_data: false,
        }
    }
}

impl From<&StreamConfig> for DecoderOptions {
    fn from(config: &StreamConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            padding: config.padding,
            reject_trailing_data: config.reject_trailing_data,
        }
    }
}

/// One authenticated chunk with its framing removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedChunk {
    pub payload: Vec<u8>,
    pub kind: ChunkKind,
}

impl DecodedChunk {
    pub fn is_final(&self) -> bool {
        self.kind.is_final()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    pub chunks: u64,
    pub plaintext_bytes: u64,
}

/// A single decode session: owns the stream cipher and the nonce counter.
///
/// Not `Clone`; a key and counter pair must never drive two sessions.
/// The first error ends the session: later calls fail without reading.
pub struct ChunkDecoder<R> {
    reader: R,
    cipher: ChaCha20Poly1305,
    associated_data: Vec<u8>,
    nonces: NonceCounter,
    wire_chunk_size: usize,
    padding: PaddingMode,
    reject_trailing_data: bool,
    summary: DecodeSummary,
    finished: bool,
    failed: bool,
}

impl<R: Read> ChunkDecoder<R> {
    pub fn new(
        reader: R,
        key: SymmetricKey,
        associated_data: impl Into<Vec<u8>>,
        options: &DecoderOptions,
    ) -> AenkerResult<Self> {
        validate_chunk_size(options.chunk_size)?;

        Ok(Self {
            reader,
            cipher: ChaCha20Poly1305::new(Key::from_slice(key.as_bytes())),
            associated_data: associated_data.into(),
            nonces: NonceCounter::new(),
            wire_chunk_size: options.chunk_size + TAG_SIZE,
            padding: options.padding,
            reject_trailing_data: options.reject_trailing_data,
            summary: DecodeSummary::default(),
            finished: false,
            failed: false,
        })
    }

    /// Read, authenticate and unframe the next chunk.
    ///
    /// Nothing from a chunk is returned unless its tag verified. After any
    /// error, every later call returns `SessionAborted`.
    pub fn next_chunk(&mut self) -> AenkerResult<DecodedChunk> {
        if self.failed {
            return Err(AenkerError::SessionAborted);
        }
        if self.finished {
            return Err(AenkerError::StreamFinished);
        }

        let result = self.open_chunk();
        if result.is_err() {
            self.failed = true;
        }
        result
    }

    fn open_chunk(&mut self) -> AenkerResult<DecodedChunk> {
        let index = self.summary.chunks;

        let mut buf = vec![0u8; self.wire_chunk_size];
        self.reader.read_exact(&mut buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => AenkerError::TruncatedStream { chunk: index },
            _ => AenkerError::Io(e),
        })?;

        // The counter moves once per chunk attempt, whatever the outcome.
        let nonce = self
            .nonces
            .next_nonce()
            .ok_or(AenkerError::NonceExhausted { chunk: index })?;
        self.summary.chunks += 1;

        self.cipher
            .decrypt_in_place(Nonce::from_slice(&nonce), &self.associated_data, &mut buf)
            .map_err(|_| AenkerError::AuthenticationFailed { chunk: index })?;

        let kind = framing::unframe(&mut buf, self.padding, index)?;
        if kind.is_final() {
            self.finished = true;
        }
        self.summary.plaintext_bytes += buf.len() as u64;

        Ok(DecodedChunk { payload: buf, kind })
    }

    /// Decode until the final chunk, writing payloads to `writer` in order.
    pub fn decode_all<W: Write + ?Sized>(&mut self, writer: &mut W) -> AenkerResult<DecodeSummary> {
        loop {
            let chunk = self.next_chunk()?;
            writer.write_all(&chunk.payload)?;
            tracing::trace!(
                chunk = self.summary.chunks - 1,
                bytes = chunk.payload.len(),
                kind = ?chunk.kind,
                "chunk decoded"
            );
            if chunk.is_final() {
                break;
            }
        }

        if self.reject_trailing_data && self.has_trailing_data()? {
            return Err(AenkerError::TrailingData);
        }

        Ok(self.summary)
    }

    fn has_trailing_data(&mut self) -> AenkerResult<bool> {
        let mut probe = [0u8; 1];
        loop {
            match self.reader.read(&mut probe) {
                Ok(n) => return Ok(n > 0),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    pub fn summary(&self) -> DecodeSummary {
        self.summary
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True once any call has returned an error.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn wire_chunk_size(&self) -> usize {
        self.wire_chunk_size
    }

    /// Give back the underlying reader, positioned after the last chunk read.
    pub fn into_inner(self) -> R {
        self.reader
    }
}
