//! Container format for sealed secrets.
//!
//! Provides version-aware parsing and serialization of the container.
//! Every parse failure surfaces as [`Error::MalformedContainer`]; the
//! specific reason only goes to the debug log.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::crypto::{CipherSuite, KdfId, KdfParams, SALT_LEN, TAG_LEN};
use crate::error::{Error, Result};

pub mod v1;

/// Magic bytes identifying a hexseal container ("HXSL").
pub const MAGIC: &[u8; 4] = b"HXSL";
/// Length of magic bytes.
pub const MAGIC_LEN: usize = 4;
/// Length of version field.
pub const VER_LEN: usize = 1;
/// Latest format version
pub const CURRENT_VERSION: u8 = v1::VERSION_V1;

/// The non-secret part of a container.
///
/// Its serialized form is the associated data for the cipher, so none of
/// these fields can be altered or swapped between containers undetected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    version: u8,
    kdf_id: KdfId,
    cipher: CipherSuite,
    kdf: KdfParams,
    salt: [u8; SALT_LEN],
    nonce: Vec<u8>,
}

impl Header {
    /// Creates a header for the current format version.
    ///
    /// # Errors
    ///
    /// Returns an error if the nonce does not have the length `cipher` uses.
    pub fn new(
        kdf: KdfParams,
        cipher: CipherSuite,
        salt: [u8; SALT_LEN],
        nonce: Vec<u8>,
    ) -> Result<Self> {
        if nonce.len() != cipher.nonce_len() {
            return Err(malformed("nonce length does not match cipher"));
        }

        Ok(Self {
            version: CURRENT_VERSION,
            kdf_id: KdfId::Argon2id,
            cipher,
            kdf,
            salt,
            nonce,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn kdf_id(&self) -> KdfId {
        self.kdf_id
    }

    pub fn cipher(&self) -> CipherSuite {
        self.cipher
    }

    pub fn kdf(&self) -> &KdfParams {
        &self.kdf
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8] {
        &self.nonce
    }

    /// Serialized header bytes, bound to the ciphertext as associated data.
    pub fn associated_data(&self) -> Result<Vec<u8>> {
        match self.version {
            v1::VERSION_V1 => Ok(v1::serialize_header(self)),
            _ => Err(malformed("unsupported version")),
        }
    }
}

/// A sealed secret: header, ciphertext and detached authentication tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecureBlob {
    header: Header,
    ciphertext: Vec<u8>,
    tag: [u8; TAG_LEN],
}

impl SecureBlob {
    pub fn new(header: Header, ciphertext: Vec<u8>, tag: [u8; TAG_LEN]) -> Self {
        Self {
            header,
            ciphertext,
            tag,
        }
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    /// Summary of the non-secret fields.
    pub fn info(&self) -> BlobInfo {
        BlobInfo {
            version: self.header.version,
            kdf: self.header.kdf_id,
            kdf_params: self.header.kdf,
            cipher: self.header.cipher,
            salt: hex::encode(self.header.salt),
            nonce: hex::encode(&self.header.nonce),
            ciphertext_len: self.ciphertext.len(),
        }
    }
}

/// Non-secret description of a container, as shown by `hexseal inspect`.
#[derive(Debug, Clone, Serialize)]
pub struct BlobInfo {
    pub version: u8,
    pub kdf: KdfId,
    pub kdf_params: KdfParams,
    pub cipher: CipherSuite,
    pub salt: String,
    pub nonce: String,
    pub ciphertext_len: usize,
}

impl fmt::Display for BlobInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version:        {}", self.version)?;
        writeln!(
            f,
            "kdf:            {:?} (mem {} KiB, time {}, parallelism {})",
            self.kdf,
            self.kdf_params.mem_cost_kib(),
            self.kdf_params.time_cost(),
            self.kdf_params.parallelism()
        )?;
        writeln!(f, "cipher:         {:?}", self.cipher)?;
        writeln!(f, "salt:           {}", self.salt)?;
        writeln!(f, "nonce:          {}", self.nonce)?;
        write!(f, "ciphertext len: {}", self.ciphertext_len)
    }
}

/// Parses a container.
///
/// Automatically dispatches to the appropriate version parser.
///
/// # Errors
///
/// Returns [`Error::MalformedContainer`] if the buffer is too short, the
/// magic bytes are invalid, the version or any algorithm identifier is
/// unknown, or the stored KDF parameters are out of range.
pub fn decode(data: &[u8]) -> Result<SecureBlob> {
    if data.len() < MAGIC_LEN + VER_LEN {
        return Err(malformed("container too short"));
    }

    if &data[..MAGIC_LEN] != MAGIC {
        return Err(malformed("invalid magic"));
    }

    match data[MAGIC_LEN] {
        v1::VERSION_V1 => v1::parse(data),
        _ => Err(malformed("unsupported version")),
    }
}

/// Serializes a container to bytes.
///
/// # Errors
///
/// Returns an error if the version is unsupported.
pub fn encode(blob: &SecureBlob) -> Result<Vec<u8>> {
    match blob.header.version {
        v1::VERSION_V1 => Ok(v1::serialize(blob)),
        _ => Err(malformed("unsupported version")),
    }
}

pub(crate) fn malformed(reason: &'static str) -> Error {
    debug!(reason, "rejecting container");
    Error::MalformedContainer
}
