//! Passphrase-sealed secret containers.
//!
//! A secret is sealed under a passphrase into a self-describing container
//! (Argon2id key derivation, XChaCha20-Poly1305 or AES-256-GCM) and opened
//! again with the same passphrase. [`seal`] and [`open`] report failures as
//! [`Error`]; [`seal_hex`] and [`open_hex`] are the hex boundary used by
//! foreign hosts, where every failure becomes an empty string.

mod boundary;
pub mod crypto;
mod error;
#[cfg(feature = "ffi")]
pub mod ffi;
pub mod format;

pub use crate::boundary::{open_hex, seal_hex};
pub use crate::crypto::{CipherSuite, KdfId, KdfParams};
pub use crate::error::{Error, Result};
pub use crate::format::{BlobInfo, Header, SecureBlob};

use tracing::debug;
use zeroize::Zeroizing;

/// Sealing configuration: KDF cost and cipher suite.
///
/// Opening needs no configuration since every container records its own
/// parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sealer {
    kdf: KdfParams,
    cipher: CipherSuite,
}

impl Sealer {
    pub fn new(kdf: KdfParams, cipher: CipherSuite) -> Self {
        Self { kdf, cipher }
    }

    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn cipher(&self) -> CipherSuite {
        self.cipher
    }

    /// Seal `plaintext` under `passphrase` with a fresh salt and nonce.
    pub fn seal(&self, passphrase: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
        let salt = crypto::generate_salt()?;
        let nonce = crypto::generate_nonce(self.cipher)?;

        let key = crypto::derive_key(passphrase, &salt, self.kdf)?;

        let header = Header::new(self.kdf, self.cipher, salt, nonce)?;
        let aad = header.associated_data()?;
        let (ciphertext, tag) =
            crypto::encrypt(self.cipher, &key, header.nonce(), plaintext, &aad)?;
        drop(key);

        debug!(
            cipher = ?self.cipher,
            plaintext_len = plaintext.len(),
            "sealed container"
        );

        format::encode(&SecureBlob::new(header, ciphertext, tag))
    }

    /// Hex boundary variant of [`Sealer::seal`].
    ///
    /// Returns the container as lowercase hex, or an empty string on any
    /// failure.
    pub fn seal_hex(&self, passphrase: &str, cleartext_hex: &str) -> String {
        boundary::seal_hex_with(self, passphrase, cleartext_hex)
    }
}

/// Seal `plaintext` with the default KDF cost and cipher.
pub fn seal(passphrase: &str, plaintext: &[u8]) -> Result<Vec<u8>> {
    Sealer::default().seal(passphrase, plaintext)
}

/// Open a container produced by [`seal`].
///
/// Key derivation reuses the salt and cost recorded in the container. The
/// plaintext is only returned once the tag has been verified.
pub fn open(passphrase: &str, container: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let blob = format::decode(container)?;
    let header = blob.header();

    let key = crypto::derive_key(passphrase, header.salt(), *header.kdf())?;
    let aad = header.associated_data()?;

    crypto::decrypt(
        header.cipher(),
        &key,
        header.nonce(),
        blob.ciphertext(),
        blob.tag(),
        &aad,
    )
}

/// Describe a container's non-secret fields without a passphrase.
pub fn inspect(container: &[u8]) -> Result<BlobInfo> {
    Ok(format::decode(container)?.info())
}
