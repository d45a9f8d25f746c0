//! Challenge keys: the secp256k1 key pair a recovery envelope is escrowed against.
//!
//! The wallet only ever holds the [`ChallengePublicKey`]. The matching [`ChallengePrivateKey`] is
//! held by whoever is allowed to recover the wallet, and is only needed to open an envelope.

use std::fmt;
use std::str::FromStr;

use rand::{CryptoRng, RngCore};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use serde::{
    de::{Deserialize, Deserializer, Error as DeError},
    ser::{Serialize, Serializer},
};
use serde_bytes::ByteBuf;

use crate::error::{Error, Result};

/// Length of a compressed secp256k1 public key.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Length of a secp256k1 private key.
pub const PRIVATE_KEY_LEN: usize = 32;

/// The recipient public key an envelope is encrypted to. Holds no private material.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChallengePublicKey {
    key: PublicKey,
}

impl ChallengePublicKey {
    /// Parse a SEC1 encoded point, compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_bytes(serialized: &[u8]) -> Result<Self> {
        let key = PublicKey::from_slice(serialized).map_err(|e| {
            tracing::debug!(len = serialized.len(), error = %e, "rejected challenge public key");
            Error::InvalidPublicKey(e)
        })?;
        Ok(ChallengePublicKey { key })
    }

    /// Compressed SEC1 encoding.
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        self.key.serialize()
    }

    pub fn as_inner(&self) -> &PublicKey {
        &self.key
    }
}

impl From<PublicKey> for ChallengePublicKey {
    fn from(key: PublicKey) -> Self {
        ChallengePublicKey { key }
    }
}

impl TryFrom<&[u8]> for ChallengePublicKey {
    type Error = Error;
    fn try_from(value: &[u8]) -> Result<Self> {
        Self::from_bytes(value)
    }
}

impl fmt::Display for ChallengePublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.to_bytes()))
    }
}

impl FromStr for ChallengePublicKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::from_bytes(&hex::decode(s)?)
    }
}

impl Serialize for ChallengePublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for ChallengePublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = ByteBuf::deserialize(deserializer)?;
        ChallengePublicKey::from_bytes(&bytes).map_err(D::Error::custom)
    }
}

/// The private half of a challenge key pair. Only used to open envelopes.
#[derive(Clone, PartialEq, Eq)]
pub struct ChallengePrivateKey {
    key: SecretKey,
}

impl ChallengePrivateKey {
    /// Generate a fresh key pair from a cryptographic RNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        ChallengePrivateKey {
            key: SecretKey::new(rng),
        }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key = SecretKey::from_slice(bytes).map_err(Error::InvalidPrivateKey)?;
        Ok(ChallengePrivateKey { key })
    }

    pub fn public_key(&self) -> ChallengePublicKey {
        let secp = Secp256k1::signing_only();
        ChallengePublicKey {
            key: PublicKey::from_secret_key(&secp, &self.key),
        }
    }

    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_LEN] {
        self.key.secret_bytes()
    }

    pub(crate) fn as_inner(&self) -> &SecretKey {
        &self.key
    }
}

impl fmt::Debug for ChallengePrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChallengePrivateKey")
            .field("public_key", &self.public_key())
            .finish_non_exhaustive()
    }
}
