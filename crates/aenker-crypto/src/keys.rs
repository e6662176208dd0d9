//! Key material: the recipient's X25519 private key and the derived stream key

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::Zeroize;

use aenker_core::{AenkerError, AenkerResult};

use crate::KEY_SIZE;

/// Length of a 32-byte key in padded standard base64
const BASE64_KEY_LEN: usize = 44;

/// The recipient's static X25519 private key. Zeroized on drop.
#[derive(Clone)]
pub struct PrivateKey {
    bytes: [u8; KEY_SIZE],
}

impl PrivateKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Decode a key given as standard base64 (44 characters, one `=` pad).
    pub fn from_base64(text: &str) -> AenkerResult<Self> {
        let text = text.trim();
        if !is_base64_key(text) {
            return Err(AenkerError::InvalidKey(
                "expected 44 characters of base64 encoding 32 bytes".into(),
            ));
        }

        let mut decoded = STANDARD
            .decode(text)
            .map_err(|e| AenkerError::InvalidKey(format!("base64 decode: {e}")))?;

        if decoded.len() != KEY_SIZE {
            let len = decoded.len();
            decoded.zeroize();
            return Err(AenkerError::InvalidKey(format!(
                "key must be {KEY_SIZE} bytes, got {len}"
            )));
        }

        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self::from_bytes(bytes))
    }

    /// Find the first line of a key file that holds a base64 key.
    ///
    /// Other lines (comments, the matching public key label, blank lines)
    /// are skipped.
    pub fn from_key_file_contents(contents: &str) -> AenkerResult<Self> {
        contents
            .lines()
            .map(str::trim)
            .find(|line| is_base64_key(line))
            .ok_or_else(|| AenkerError::InvalidKey("no base64 encoded key found".into()))
            .and_then(Self::from_base64)
    }
}

/// Whether `text` has the exact shape of a base64-encoded 32-byte key.
pub fn is_base64_key(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() == BASE64_KEY_LEN
        && bytes[BASE64_KEY_LEN - 1] == b'='
        && bytes[..BASE64_KEY_LEN - 1]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'+' || *b == b'/')
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The per-stream ChaCha20-Poly1305 key. Zeroized on drop, never persisted.
pub struct SymmetricKey {
    bytes: [u8; KEY_SIZE],
}

impl SymmetricKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}
