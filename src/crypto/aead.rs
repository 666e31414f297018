use aes_gcm::Aes256Gcm;
use chacha20poly1305::{
    XChaCha20Poly1305,
    aead::{self, Aead, KeyInit, Payload},
};
use getrandom::fill;
use serde::Serialize;
use zeroize::Zeroizing;

use super::{GCM_NONCE_LEN, KEY_LEN, SALT_LEN, TAG_LEN, XCHACHA_NONCE_LEN};
use crate::error::{Error, Result};

/// Authenticated cipher used to seal a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum CipherSuite {
    #[default]
    #[serde(rename = "xchacha20-poly1305")]
    XChaCha20Poly1305,
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

impl CipherSuite {
    /// Identifier byte stored in the container header.
    pub fn id(self) -> u8 {
        match self {
            CipherSuite::XChaCha20Poly1305 => 1,
            CipherSuite::Aes256Gcm => 2,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(CipherSuite::XChaCha20Poly1305),
            2 => Some(CipherSuite::Aes256Gcm),
            _ => None,
        }
    }

    pub fn nonce_len(self) -> usize {
        match self {
            CipherSuite::XChaCha20Poly1305 => XCHACHA_NONCE_LEN,
            CipherSuite::Aes256Gcm => GCM_NONCE_LEN,
        }
    }
}

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<()> {
    fill(buf).map_err(|_| Error::Random)
}

/// Generate salt
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    secure_random(&mut salt)?;
    Ok(salt)
}

/// Generate a random nonce sized for `suite`.
///
/// Each container also gets a fresh salt, so a nonce is never used twice
/// under the same key.
pub fn generate_nonce(suite: CipherSuite) -> Result<Vec<u8>> {
    let mut nonce = vec![0u8; suite.nonce_len()];
    secure_random(&mut nonce)?;
    Ok(nonce)
}

/// Encrypt plaintext, returning the ciphertext and its detached tag.
///
/// `aad` is authenticated but not encrypted.
pub fn encrypt(
    suite: CipherSuite,
    key: &[u8; KEY_LEN],
    nonce: &[u8],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN])> {
    if nonce.len() != suite.nonce_len() {
        return Err(Error::Encryption);
    }

    let mut sealed = match suite {
        CipherSuite::XChaCha20Poly1305 => {
            encrypt_with(&XChaCha20Poly1305::new(key.into()), nonce, plaintext, aad)?
        }
        CipherSuite::Aes256Gcm => {
            encrypt_with(&Aes256Gcm::new(key.into()), nonce, plaintext, aad)?
        }
    };

    let tag_start = sealed.len().checked_sub(TAG_LEN).ok_or(Error::Encryption)?;
    let tag: [u8; TAG_LEN] = sealed[tag_start..]
        .try_into()
        .map_err(|_| Error::Encryption)?;
    sealed.truncate(tag_start);

    Ok((sealed, tag))
}

/// Decrypt ciphertext after verifying its tag.
///
/// Nothing is returned unless authentication succeeds.
pub fn decrypt(
    suite: CipherSuite,
    key: &[u8; KEY_LEN],
    nonce: &[u8],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    if nonce.len() != suite.nonce_len() {
        return Err(Error::Authentication);
    }

    let mut sealed = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    sealed.extend_from_slice(ciphertext);
    sealed.extend_from_slice(tag);

    let plaintext = match suite {
        CipherSuite::XChaCha20Poly1305 => {
            decrypt_with(&XChaCha20Poly1305::new(key.into()), nonce, &sealed, aad)?
        }
        CipherSuite::Aes256Gcm => {
            decrypt_with(&Aes256Gcm::new(key.into()), nonce, &sealed, aad)?
        }
    };

    Ok(plaintext)
}

fn encrypt_with<A: Aead>(cipher: &A, nonce: &[u8], msg: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
    cipher
        .encrypt(aead::Nonce::<A>::from_slice(nonce), Payload { msg, aad })
        .map_err(|_| Error::Encryption)
}

fn decrypt_with<A: Aead>(
    cipher: &A,
    nonce: &[u8],
    msg: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let plaintext = cipher
        .decrypt(aead::Nonce::<A>::from_slice(nonce), Payload { msg, aad })
        .map_err(|_| Error::Authentication)?;
    Ok(Zeroizing::new(plaintext))
}
