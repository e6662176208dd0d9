//! Chunk nonce counter
//!
//! 96-bit unsigned counter, emitted as 12 little-endian bytes. Starts at zero
//! and advances by one per chunk; no value is ever handed out twice.

use crate::NONCE_SIZE;

const NONCE_LIMIT: u128 = 1 << (NONCE_SIZE * 8);

#[derive(Debug, Default)]
pub struct NonceCounter {
    next: u128,
}

impl NonceCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current nonce and advance. `None` once all 2^96 values
    /// have been used.
    pub fn next_nonce(&mut self) -> Option<[u8; NONCE_SIZE]> {
        if self.next >= NONCE_LIMIT {
            return None;
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&self.next.to_le_bytes()[..NONCE_SIZE]);
        self.next += 1;
        Some(nonce)
    }

    /// Number of nonces handed out so far.
    pub fn issued(&self) -> u128 {
        self.next
    }
}
