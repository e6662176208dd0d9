//! Decrypt driver: header → key → chunks → plaintext

use std::io::{Read, Write};

use aenker_core::config::validate_chunk_size;
use aenker_core::AenkerResult;

use crate::chunk::{ChunkDecoder, DecodeSummary, DecoderOptions};
use crate::header::StreamHeader;
use crate::kdf::{derive_key, KEY_INFO};
use crate::keys::PrivateKey;

/// Decrypt an aenker stream with the default chunk size (1984) and
/// compatible padding removal.
pub fn decrypt<R, W>(
    private_key: &PrivateKey,
    reader: &mut R,
    writer: &mut W,
) -> AenkerResult<DecodeSummary>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    decrypt_with(private_key, reader, writer, &DecoderOptions::default())
}

/// Decrypt an aenker stream with explicit decoder options.
///
/// Plaintext is written chunk by chunk as each one authenticates. On error,
/// `writer` holds the payloads of every chunk before the failing one.
pub fn decrypt_with<R, W>(
    private_key: &PrivateKey,
    reader: &mut R,
    writer: &mut W,
    options: &DecoderOptions,
) -> AenkerResult<DecodeSummary>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    validate_chunk_size(options.chunk_size)?;

    let header = StreamHeader::read_from(reader)?;
    tracing::debug!("aenker header read");

    let key = derive_key(
        private_key,
        header.ephemeral_public_key(),
        header.salt(),
        KEY_INFO,
    )?;
    tracing::debug!("stream key derived");

    let mut decoder = ChunkDecoder::new(reader, key, header.as_bytes().as_slice(), options)?;
    let summary = decoder.decode_all(writer)?;

    tracing::debug!(
        chunks = summary.chunks,
        bytes = summary.plaintext_bytes,
        "stream decrypted"
    );
    Ok(summary)
}
