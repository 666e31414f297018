//! Container format v1.
//!
//! V1 Container Format:
//! ```text
//! MAGIC (4) | VERSION (1) | KDF_ID (1) | CIPHER_ID (1) | MEM_COST (4) | TIME_COST (4)
//! | PARALLELISM (4) | SALT (16) | NONCE (24 or 12) | CIPHERTEXT | TAG (16)
//! ```
//!
//! Integers are little-endian. Everything up to and including the nonce is
//! the associated data.

use super::{Header, MAGIC, MAGIC_LEN, SecureBlob, VER_LEN, malformed};
use crate::crypto::{CipherSuite, KdfId, KdfParams, SALT_LEN, TAG_LEN};
use crate::error::Result;

/// Current container format version.
pub const VERSION_V1: u8 = 1;

const KDF_ID_LEN: usize = 1;
const CIPHER_ID_LEN: usize = 1;
const MEM_LEN: usize = 4;
const TIME_LEN: usize = 4;
const PAR_LEN: usize = 4;

/// Header length up to the nonce, which is the only cipher-dependent field.
const FIXED_LEN: usize =
    MAGIC_LEN + VER_LEN + KDF_ID_LEN + CIPHER_ID_LEN + MEM_LEN + TIME_LEN + PAR_LEN + SALT_LEN;

fn read_u32(data: &[u8], offset: &mut usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[*offset..*offset + 4]);
    *offset += 4;
    u32::from_le_bytes(buf)
}

/// Parses a v1 container.
///
/// # Errors
///
/// Returns an error if the container is too short, names an unknown
/// algorithm, or carries invalid KDF parameters.
pub fn parse(data: &[u8]) -> Result<SecureBlob> {
    if data.len() < FIXED_LEN {
        return Err(malformed("container too short for v1"));
    }

    let mut offset = MAGIC_LEN + VER_LEN;

    let kdf_id = KdfId::from_id(data[offset]).ok_or_else(|| malformed("unknown kdf id"))?;
    offset += KDF_ID_LEN;

    let cipher =
        CipherSuite::from_id(data[offset]).ok_or_else(|| malformed("unknown cipher id"))?;
    offset += CIPHER_ID_LEN;

    let mem_cost = read_u32(data, &mut offset);
    let time_cost = read_u32(data, &mut offset);
    let parallelism = read_u32(data, &mut offset);

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&data[offset..offset + SALT_LEN]);
    offset += SALT_LEN;

    let nonce_len = cipher.nonce_len();
    if data.len() < offset + nonce_len + TAG_LEN {
        return Err(malformed("container too short for v1"));
    }

    let nonce = data[offset..offset + nonce_len].to_vec();
    offset += nonce_len;

    let tag_start = data.len() - TAG_LEN;
    let ciphertext = data[offset..tag_start].to_vec();

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&data[tag_start..]);

    let kdf = KdfParams::new(mem_cost, time_cost, parallelism)
        .map_err(|_| malformed("kdf parameters out of range"))?;

    Ok(SecureBlob {
        header: Header {
            version: VERSION_V1,
            kdf_id,
            cipher,
            kdf,
            salt,
            nonce,
        },
        ciphertext,
        tag,
    })
}

/// Serializes the header fields of a v1 container.
pub fn serialize_header(header: &Header) -> Vec<u8> {
    let mut buf = Vec::with_capacity(FIXED_LEN + header.nonce.len());

    buf.extend_from_slice(MAGIC);
    buf.push(VERSION_V1);
    buf.push(header.kdf_id.id());
    buf.push(header.cipher.id());

    buf.extend_from_slice(&header.kdf.mem_cost_kib().to_le_bytes());
    buf.extend_from_slice(&header.kdf.time_cost().to_le_bytes());
    buf.extend_from_slice(&header.kdf.parallelism().to_le_bytes());

    buf.extend_from_slice(&header.salt);
    buf.extend_from_slice(&header.nonce);

    buf
}

/// Serializes a container to v1 format bytes.
pub fn serialize(blob: &SecureBlob) -> Vec<u8> {
    let mut buf = serialize_header(&blob.header);
    buf.reserve(blob.ciphertext.len() + TAG_LEN);
    buf.extend_from_slice(&blob.ciphertext);
    buf.extend_from_slice(&blob.tag);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn sample() -> Vec<u8> {
        let header = Header::new(
            KdfParams::new(65536, 3, 2).unwrap(),
            CipherSuite::XChaCha20Poly1305,
            [1u8; SALT_LEN],
            vec![2u8; 24],
        )
        .unwrap();
        serialize(&SecureBlob::new(header, vec![0u8; 10], [5u8; TAG_LEN]))
    }

    #[test]
    fn layout_matches_documented_offsets() {
        let bytes = sample();

        assert_eq!(&bytes[..4], b"HXSL");
        assert_eq!(bytes[4], VERSION_V1);
        assert_eq!(bytes[5], KdfId::Argon2id.id());
        assert_eq!(bytes[6], CipherSuite::XChaCha20Poly1305.id());
        assert_eq!(&bytes[7..11], &65536u32.to_le_bytes());
        assert_eq!(&bytes[11..15], &3u32.to_le_bytes());
        assert_eq!(&bytes[15..19], &2u32.to_le_bytes());
        assert_eq!(&bytes[19..35], &[1u8; 16]);
        assert_eq!(&bytes[35..59], &[2u8; 24]);
        assert_eq!(bytes.len(), 59 + 10 + TAG_LEN);
        assert_eq!(&bytes[bytes.len() - TAG_LEN..], &[5u8; TAG_LEN]);
    }

    #[test]
    fn unknown_kdf_id_fails() {
        let mut bytes = sample();
        bytes[5] = 0xEE;
        assert!(matches!(parse(&bytes), Err(Error::MalformedContainer)));
    }

    #[test]
    fn unknown_cipher_id_fails() {
        let mut bytes = sample();
        bytes[6] = 0;
        assert!(matches!(parse(&bytes), Err(Error::MalformedContainer)));
    }

    #[test]
    fn out_of_range_kdf_params_fail() {
        let mut bytes = sample();
        bytes[7..11].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(parse(&bytes), Err(Error::MalformedContainer)));

        let mut bytes = sample();
        bytes[11..15].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(parse(&bytes), Err(Error::MalformedContainer)));
    }

    #[test]
    fn every_truncation_fails() {
        let bytes = sample();
        for len in 0..59 + TAG_LEN {
            assert!(parse(&bytes[..len]).is_err(), "length {len} accepted");
        }
    }

    #[test]
    fn empty_ciphertext_is_allowed() {
        let bytes = sample();
        let mut short = bytes[..59].to_vec();
        short.extend_from_slice(&[5u8; TAG_LEN]);
        let blob = parse(&short).unwrap();
        assert!(blob.ciphertext().is_empty());
    }

    #[test]
    fn cipher_switch_changes_expected_length() {
        // Relabeling an XChaCha container as AES-GCM shifts every later field.
        let mut bytes = sample();
        bytes[6] = CipherSuite::Aes256Gcm.id();
        let blob = parse(&bytes).unwrap();
        assert_eq!(blob.header().nonce().len(), 12);
        assert_eq!(blob.ciphertext().len(), 22);
    }
}
