use argon2::{Algorithm, Argon2, Params, Version};
use serde::Serialize;
use tracing::trace;
use zeroize::Zeroizing;

use super::KEY_LEN;
use crate::error::{Error, Result};

/// Upper bound on memory cost (1 GiB). Blobs are untrusted input, so the
/// cost they request has to be capped.
pub const MAX_MEM_COST_KIB: u32 = 1024 * 1024;
pub const MAX_TIME_COST: u32 = 64;
pub const MAX_PARALLELISM: u32 = 16;

/// Key-derivation algorithm identifier as stored in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfId {
    Argon2id,
}

impl KdfId {
    pub fn id(self) -> u8 {
        match self {
            KdfId::Argon2id => 1,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(KdfId::Argon2id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KdfParams {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            // default memory cost
            mem_cost_kib: 64 * 1024, // 64 MiB
            // default number of iterations
            time_cost: 3,
            // default number of lanes
            parallelism: 1,
        }
    }
}

impl KdfParams {
    pub fn new(mem_cost_kib: u32, time_cost: u32, parallelism: u32) -> Result<Self> {
        let params = Self {
            mem_cost_kib,
            time_cost,
            parallelism,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn mem_cost_kib(&self) -> u32 {
        self.mem_cost_kib
    }

    pub fn time_cost(&self) -> u32 {
        self.time_cost
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(Error::KeyDerivation(msg.to_string()));

        if self.parallelism < 1 {
            return invalid("argon2 parallelism must be >= 1");
        }
        if self.parallelism > MAX_PARALLELISM {
            return invalid("argon2 parallelism too high");
        }
        if self.time_cost < 1 {
            return invalid("argon2 time cost must be >= 1");
        }
        if self.time_cost > MAX_TIME_COST {
            return invalid("argon2 time cost too high");
        }
        if self.mem_cost_kib < 8 * self.parallelism {
            return invalid("argon2 memory cost must be at least 8 * parallelism");
        }
        if self.mem_cost_kib > MAX_MEM_COST_KIB {
            return invalid("argon2 memory cost too high");
        }
        Ok(())
    }
}

/// Derive the symmetric key for a container from the passphrase.
///
/// Deterministic in `(passphrase, salt, kdf)`. An empty passphrase is
/// rejected rather than hashed.
pub fn derive_key(
    passphrase: &str,
    salt: &[u8],
    kdf: KdfParams,
) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    if passphrase.is_empty() {
        return Err(Error::KeyDerivation("passphrase must not be empty".into()));
    }
    kdf.validate()?;

    let params = Params::new(
        kdf.mem_cost_kib,
        kdf.time_cost,
        kdf.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| Error::KeyDerivation(format!("failed to construct Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    trace!(
        mem_cost_kib = kdf.mem_cost_kib,
        time_cost = kdf.time_cost,
        parallelism = kdf.parallelism,
        "deriving key"
    );

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
        .map_err(|e| Error::KeyDerivation(format!("argon2 key derivation failed: {e}")))?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> KdfParams {
        KdfParams::new(64, 1, 1).unwrap()
    }

    #[test]
    fn kdf_is_deterministic() {
        let salt = [42u8; 16];

        let k1 = derive_key("password", &salt, cheap()).unwrap();
        let k2 = derive_key("password", &salt, cheap()).unwrap();

        assert_eq!(*k1, *k2);
    }

    #[test]
    fn kdf_params_affect_output() {
        let salt = [7u8; 16];

        let kdf1 = KdfParams {
            mem_cost_kib: 64,
            time_cost: 1,
            parallelism: 1,
        };

        let kdf2 = KdfParams {
            mem_cost_kib: 128,
            time_cost: 1,
            parallelism: 1,
        };

        let k1 = derive_key("pw", &salt, kdf1).unwrap();
        let k2 = derive_key("pw", &salt, kdf2).unwrap();

        assert_ne!(*k1, *k2);
    }

    #[test]
    fn salt_affects_output() {
        let k1 = derive_key("pw", &[1u8; 16], cheap()).unwrap();
        let k2 = derive_key("pw", &[2u8; 16], cheap()).unwrap();

        assert_ne!(*k1, *k2);
    }

    #[test]
    fn empty_passphrase_is_rejected() {
        let err = derive_key("", &[0u8; 16], cheap()).unwrap_err();
        assert!(matches!(err, Error::KeyDerivation(_)));
    }

    #[test]
    fn kdf_invalid_params_fail_gracefully() {
        assert!(KdfParams::new(0, 0, 0).is_err());
        assert!(KdfParams::new(64, 0, 1).is_err());
        assert!(KdfParams::new(15, 1, 2).is_err());
        assert!(KdfParams::new(MAX_MEM_COST_KIB + 1, 1, 1).is_err());
        assert!(KdfParams::new(64, MAX_TIME_COST + 1, 1).is_err());
        assert!(KdfParams::new(1024, 1, MAX_PARALLELISM + 1).is_err());
    }

    #[test]
    fn unvalidated_params_are_rejected_at_derivation() {
        let kdf = KdfParams {
            mem_cost_kib: 8,
            time_cost: 0,
            parallelism: 1,
        };
        assert!(derive_key("pw", &[0u8; 16], kdf).is_err());
    }

    #[test]
    fn default_params_are_valid() {
        KdfParams::default().validate().unwrap();
    }

    #[test]
    fn kdf_id_roundtrips_through_byte() {
        assert_eq!(KdfId::from_id(KdfId::Argon2id.id()), Some(KdfId::Argon2id));
        assert_eq!(KdfId::from_id(0), None);
    }
}
