//! aenker-crypto: decryption of aenker streams
//!
//! Architecture: anonymous ECDH, then a chunked AEAD stream
//!
//! ```text
//! header (48 bytes)  = magic[8] || salt[8] || ephemeral_public[32]
//! shared secret      = X25519(recipient_private, ephemeral_public)
//! stream key         = HKDF-BLAKE2b-512(ikm=shared, salt=salt, info="aenker elliptic")[..32]
//! chunk i            = ChaCha20-Poly1305(key, nonce=i as 12-byte LE, aad=header)
//!                      over payload || [padding] || tag
//! ```
//!
//! Pipeline: read header → derive key → open chunks in order → strip framing → write payload
//!
//! Only the read direction is implemented here.

pub mod chunk;
pub mod framing;
pub mod header;
pub mod kdf;
pub mod keys;
pub mod nonce;
pub mod pipeline;

pub use aenker_core::{AenkerError, AenkerResult, PaddingMode};
pub use chunk::{ChunkDecoder, DecodeSummary, DecodedChunk, DecoderOptions};
pub use framing::ChunkKind;
pub use header::{StreamHeader, HEADER_SIZE, MAGIC};
pub use kdf::{derive_key, derive_key_from_slices, KEY_INFO};
pub use keys::{PrivateKey, SymmetricKey};
pub use nonce::NonceCounter;
pub use pipeline::{decrypt, decrypt_with};

/// Size of X25519 keys and of the derived ChaCha20-Poly1305 key (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of a ChaCha20-Poly1305 nonce (96-bit)
pub const NONCE_SIZE: usize = 12;

/// Size of a Poly1305 authentication tag
pub const TAG_SIZE: usize = 16;

/// Size of the HKDF salt carried in the header
pub const SALT_SIZE: usize = 8;
