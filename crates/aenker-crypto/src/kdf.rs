//! Key agreement: anonymous X25519 → HKDF-BLAKE2b-512 → stream key
//!
//! The sender's identity is not authenticated. A stream that decrypts only
//! proves it was produced by whoever held the ephemeral private key.

use blake2::Blake2b512;
use hkdf::SimpleHkdf;
use x25519_dalek::{PublicKey, StaticSecret};

use aenker_core::{AenkerError, AenkerResult};

use crate::keys::{PrivateKey, SymmetricKey};
use crate::{KEY_SIZE, SALT_SIZE};

/// HKDF info string for aenker's elliptic key derivation
pub const KEY_INFO: &[u8] = b"aenker elliptic";

/// Derive the 32-byte stream key from the recipient's private key and the
/// header's ephemeral public key and salt.
pub fn derive_key(
    private: &PrivateKey,
    ephemeral_public: &[u8; KEY_SIZE],
    salt: &[u8; SALT_SIZE],
    info: &[u8],
) -> AenkerResult<SymmetricKey> {
    let secret = StaticSecret::from(*private.as_bytes());
    let peer = PublicKey::from(*ephemeral_public);
    let shared = secret.diffie_hellman(&peer);

    // A low-order ephemeral point yields the all-zero secret.
    if !shared.was_contributory() {
        return Err(AenkerError::KeyDerivation(
            "ephemeral public key is a low-order point".into(),
        ));
    }

    hkdf_blake2b(shared.as_bytes(), salt, info)
}

/// [`derive_key`] over unsized inputs, rejecting wrong lengths.
pub fn derive_key_from_slices(
    private: &[u8],
    ephemeral_public: &[u8],
    salt: &[u8],
    info: &[u8],
) -> AenkerResult<SymmetricKey> {
    let private: [u8; KEY_SIZE] = fixed(private, "private key")?;
    let ephemeral_public: [u8; KEY_SIZE] = fixed(ephemeral_public, "ephemeral public key")?;
    let salt: [u8; SALT_SIZE] = fixed(salt, "salt")?;

    derive_key(&PrivateKey::from_bytes(private), &ephemeral_public, &salt, info)
}

fn hkdf_blake2b(ikm: &[u8; KEY_SIZE], salt: &[u8], info: &[u8]) -> AenkerResult<SymmetricKey> {
    // BLAKE2b is a lazy-buffer hash, so it needs the SimpleHmac-based HKDF.
    let hkdf = SimpleHkdf::<Blake2b512>::new(Some(salt), ikm);
    let mut okm = [0u8; KEY_SIZE];
    hkdf.expand(info, &mut okm)
        .map_err(|e| AenkerError::KeyDerivation(format!("HKDF expand failed: {e}")))?;
    Ok(SymmetricKey::from_bytes(okm))
}

fn fixed<const N: usize>(bytes: &[u8], what: &str) -> AenkerResult<[u8; N]> {
    bytes.try_into().map_err(|_| {
        AenkerError::KeyDerivation(format!(
            "{what} must be {N} bytes, got {}",
            bytes.len()
        ))
    })
}
