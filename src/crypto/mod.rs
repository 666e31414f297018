//! Cryptographic primitives for sealed containers.
//!
//! Provides passphrase key derivation and the authenticated ciphers.

pub mod aead;
pub mod kdf;

pub use aead::{CipherSuite, decrypt, encrypt, generate_nonce, generate_salt};
pub use kdf::{KdfId, KdfParams, derive_key};

/// Length of the salt (16 bytes).
pub const SALT_LEN: usize = 16;
/// Length of the derived encryption key (32 bytes / 256 bits).
pub const KEY_LEN: usize = 32;
/// Length of the authentication tag (16 bytes for both suites).
pub const TAG_LEN: usize = 16;
/// Length of the XChaCha20-Poly1305 nonce.
pub const XCHACHA_NONCE_LEN: usize = 24;
/// Length of the AES-256-GCM nonce.
pub const GCM_NONCE_LEN: usize = 12;
