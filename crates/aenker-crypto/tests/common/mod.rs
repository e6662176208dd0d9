//! Test-only aenker producer.
//!
//! Writes streams the way aenker's writer does, so the decoder can be tested
//! against arbitrary plaintexts, chunk sizes and keys.

#![allow(dead_code)]

use aenker_crypto::{PrivateKey, HEADER_SIZE, KEY_INFO, MAGIC, TAG_SIZE};
use blake2::Blake2b512;
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use hkdf::SimpleHkdf;
use rand::RngCore;
use x25519_dalek::{PublicKey, StaticSecret};

pub struct Recipient {
    pub private: PrivateKey,
    pub public: [u8; 32],
}

pub fn recipient_from(bytes: [u8; 32]) -> Recipient {
    let public = PublicKey::from(&StaticSecret::from(bytes)).to_bytes();
    Recipient {
        private: PrivateKey::from_bytes(bytes),
        public,
    }
}

pub fn random_recipient() -> Recipient {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    recipient_from(bytes)
}

/// Seal `plaintext` for `recipient_public` with a fresh ephemeral key and salt.
pub fn seal(recipient_public: &[u8; 32], plaintext: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut ephemeral = [0u8; 32];
    let mut salt = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut ephemeral);
    rand::thread_rng().fill_bytes(&mut salt);
    seal_with(ephemeral, salt, recipient_public, plaintext, chunk_size)
}

/// Seal with caller-chosen ephemeral secret and salt.
pub fn seal_with(
    ephemeral: [u8; 32],
    salt: [u8; 8],
    recipient_public: &[u8; 32],
    plaintext: &[u8],
    chunk_size: usize,
) -> Vec<u8> {
    assert!(chunk_size >= 2 || plaintext.is_empty(), "chunk must carry data");

    let secret = StaticSecret::from(ephemeral);
    let shared = secret.diffie_hellman(&PublicKey::from(*recipient_public));
    let mut key = [0u8; 32];
    SimpleHkdf::<Blake2b512>::new(Some(&salt[..]), shared.as_bytes())
        .expand(KEY_INFO, &mut key)
        .unwrap();

    let mut header = Vec::with_capacity(HEADER_SIZE);
    header.extend_from_slice(&MAGIC);
    header.extend_from_slice(&salt);
    header.extend_from_slice(PublicKey::from(&secret).as_bytes());

    let chunks = frame(plaintext, chunk_size);
    let mut stream = header.clone();
    for (i, chunk) in chunks.iter().enumerate() {
        stream.extend(seal_chunk(&key, i as u64, &header, chunk));
    }
    stream
}

/// Split into framed chunks of exactly `chunk_size` bytes each.
pub fn frame(plaintext: &[u8], chunk_size: usize) -> Vec<Vec<u8>> {
    let data_per_chunk = chunk_size - 1;
    let mut chunks = Vec::new();
    let mut rest = plaintext;

    while rest.len() > data_per_chunk {
        let (head, tail) = rest.split_at(data_per_chunk);
        let mut chunk = head.to_vec();
        chunk.push(0x00);
        chunks.push(chunk);
        rest = tail;
    }

    chunks.push(frame_final(rest, chunk_size));
    chunks
}

/// Final chunk: unpadded if it fills the chunk, otherwise padded with a byte
/// that differs from the last data byte.
pub fn frame_final(data: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut chunk = data.to_vec();
    let free = chunk_size - data.len();
    if free == 1 {
        chunk.push(0x01);
        return chunk;
    }
    let pad = if data.last() == Some(&0x00) || data.is_empty() {
        0x01
    } else {
        0x00
    };
    chunk.resize(chunk_size - 1, pad);
    chunk.push(0x02);
    chunk
}

pub fn seal_chunk(key: &[u8; 32], index: u64, header: &[u8], framed: &[u8]) -> Vec<u8> {
    let mut nonce = [0u8; 12];
    nonce[..8].copy_from_slice(&index.to_le_bytes());
    ChaCha20Poly1305::new(Key::from_slice(key))
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: framed,
                aad: header,
            },
        )
        .unwrap()
}

/// Number of wire chunks a sealed stream of `len` plaintext bytes carries.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    frame(&vec![0u8; len], chunk_size).len()
}

pub fn wire_size(len: usize, chunk_size: usize) -> usize {
    HEADER_SIZE + chunk_count(len, chunk_size) * (chunk_size + TAG_SIZE)
}

/// Deterministic test data that is not all one value.
pub fn make_data(size: usize) -> Vec<u8> {
    (0..size)
        .map(|i| (i.wrapping_mul(7) ^ (i >> 3)) as u8)
        .collect()
}
