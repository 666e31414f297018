//! Error types for hexseal.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while sealing or opening a container.
///
/// None of the messages carry secret material. Callers crossing the hex
/// boundary never see these variants; they are collapsed into the empty
/// sentinel there.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid hex encoding: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("malformed container")]
    MalformedContainer,

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed")]
    Encryption,

    #[error("invalid passphrase or corrupted data")]
    Authentication,

    #[error("OS random generator unavailable")]
    Random,
}

impl Error {
    /// Short, stable label for the failure category, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidHex(_) => "invalid_hex",
            Error::MalformedContainer => "malformed_container",
            Error::KeyDerivation(_) => "key_derivation",
            Error::Encryption => "encryption",
            Error::Authentication => "authentication",
            Error::Random => "random",
        }
    }
}
