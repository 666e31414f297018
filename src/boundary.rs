//! Hex boundary: the two operations foreign hosts call.
//!
//! Both are total. Every failure, whatever its cause, comes back as the
//! empty string so a caller cannot tell a wrong passphrase from corrupted
//! input. The cause is only logged, at debug level.

use tracing::debug;
use zeroize::Zeroizing;

use crate::error::Result;
use crate::{Sealer, open};

/// Returned in place of a result when an operation fails.
pub const FAILURE: &str = "";

/// Seal hex-encoded cleartext under `secret_key` with the default settings.
///
/// Returns the container as lowercase hex, or an empty string on failure.
pub fn seal_hex(secret_key: &str, cleartext_hex: &str) -> String {
    seal_hex_with(&Sealer::default(), secret_key, cleartext_hex)
}

/// Open a hex-encoded container and return the cleartext as lowercase hex.
///
/// Returns an empty string on failure. An empty cleartext also yields an
/// empty string; use [`crate::open`] when that difference matters.
pub fn open_hex(secret_key: &str, ciphertext_hex: &str) -> String {
    collapse("open", try_open_hex(secret_key, ciphertext_hex))
}

pub(crate) fn seal_hex_with(sealer: &Sealer, secret_key: &str, cleartext_hex: &str) -> String {
    collapse("seal", try_seal_hex(sealer, secret_key, cleartext_hex))
}

fn try_seal_hex(sealer: &Sealer, secret_key: &str, cleartext_hex: &str) -> Result<String> {
    let cleartext = Zeroizing::new(hex::decode(cleartext_hex)?);
    let container = sealer.seal(secret_key, &cleartext)?;
    Ok(hex::encode(container))
}

fn try_open_hex(secret_key: &str, ciphertext_hex: &str) -> Result<String> {
    let container = hex::decode(ciphertext_hex)?;
    let cleartext = open(secret_key, &container)?;
    Ok(hex::encode(cleartext.as_slice()))
}

fn collapse(op: &'static str, result: Result<String>) -> String {
    match result {
        Ok(out) => out,
        Err(e) => {
            debug!(op, kind = e.kind(), "boundary call failed");
            FAILURE.to_string()
        }
    }
}
