//! The recovery envelope: a versioned binary container for an encrypted [`SecretPayload`], encoded
//! as base58 text for transcription.
//!
//! Wire format, all integers big-endian, no padding:
//!
//! | Offset | Length | Field                                       |
//! |--------|--------|---------------------------------------------|
//! | 0      | 1      | version, always `0x02`                      |
//! | 1      | 2      | birthday                                    |
//! | 3      | 33     | ephemeral public key, compressed            |
//! | 36     | 80     | ciphertext: 64-byte payload + 16-byte tag   |
//! | 116    | rest   | salt                                        |
//!
//! The salt has no length marker. The payload is always 64 bytes and the cipher always adds a
//! 16-byte tag, so the ciphertext length is fixed and the salt is whatever follows it.
//!
//! The text form is plain base58 with no checksum.

use std::fmt;
use std::str::FromStr;

use byteorder::ReadBytesExt;
use rand::{CryptoRng, RngCore};
use secp256k1::PublicKey;
use zeroize::Zeroize;

use crate::birthday::Birthday;
use crate::challenge_key::{ChallengePrivateKey, ChallengePublicKey, PUBLIC_KEY_LEN};
use crate::ecies;
use crate::error::{Error, Result};
use crate::extended_key::{self, SecretPayload, PAYLOAD_LEN};

/// The only envelope version produced or accepted.
pub const ENVELOPE_VERSION: u8 = 2;

/// Length of the compressed ephemeral public key.
pub const EPHEMERAL_KEY_LEN: usize = PUBLIC_KEY_LEN;

/// Version + birthday + ephemeral key.
pub const HEADER_LEN: usize = 1 + Birthday::LEN + EPHEMERAL_KEY_LEN;

/// Length of the encrypted payload, including the authentication tag.
pub const CIPHERTEXT_LEN: usize = PAYLOAD_LEN + ecies::TAG_LEN;

/// Smallest possible envelope: an empty salt.
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + CIPHERTEXT_LEN;

/// A parsed recovery envelope. Built once per issued recovery code and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveryEnvelope {
    birthday: Birthday,
    ephemeral_key: PublicKey,
    ciphertext: Vec<u8>,
    salt: Vec<u8>,
}

impl RecoveryEnvelope {
    /// Encrypt `payload` to `challenge_key` and wrap the result with the birthday and salt.
    pub fn seal<R: RngCore + CryptoRng>(
        challenge_key: &ChallengePublicKey,
        payload: &SecretPayload,
        salt: &[u8],
        birthday: Birthday,
        rng: &mut R,
    ) -> Result<Self> {
        let (ephemeral_key, ciphertext) =
            ecies::encrypt(challenge_key.as_inner(), payload.as_bytes(), rng).map_err(|e| {
                tracing::debug!(error = %e, "envelope encryption failed");
                e
            })?;
        if ciphertext.len() != CIPHERTEXT_LEN {
            return Err(Error::Encryption(format!(
                "expected ciphertext of {} bytes, got {}",
                CIPHERTEXT_LEN,
                ciphertext.len()
            )));
        }
        Ok(RecoveryEnvelope {
            birthday,
            ephemeral_key,
            ciphertext,
            salt: salt.to_vec(),
        })
    }

    /// Decrypt the payload. Authentication failures come back as [`Error::TamperedEnvelope`].
    pub fn open(&self, key: &ChallengePrivateKey) -> Result<SecretPayload> {
        let mut plaintext = ecies::decrypt(key.as_inner(), &self.ephemeral_key, &self.ciphertext)
            .map_err(|e| {
                tracing::debug!(error = %e, "envelope failed to open");
                e
            })?;
        let payload = SecretPayload::from_slice(&plaintext);
        plaintext.zeroize();
        payload
    }

    pub fn version(&self) -> u8 {
        ENVELOPE_VERSION
    }

    pub fn birthday(&self) -> Birthday {
        self.birthday
    }

    pub fn ephemeral_key(&self) -> &PublicKey {
        &self.ephemeral_key
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Total encoded size in bytes.
    pub fn size(&self) -> usize {
        HEADER_LEN + self.ciphertext.len() + self.salt.len()
    }

    /// Encode onto a byte vector.
    pub fn encode_vec(&self, buf: &mut Vec<u8>) {
        buf.reserve(self.size());
        buf.push(ENVELOPE_VERSION);
        buf.extend_from_slice(&self.birthday.to_be_bytes());
        buf.extend_from_slice(&self.ephemeral_key.serialize());
        buf.extend_from_slice(&self.ciphertext);
        buf.extend_from_slice(&self.salt);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut v = Vec::with_capacity(self.size());
        self.encode_vec(&mut v);
        v
    }

    /// Parse the binary form. Doesn't decrypt anything, so the birthday and salt can be read
    /// before the challenge private key is available.
    ///
    /// An ephemeral key that isn't a valid curve point is treated as tampering.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut buf = data;
        let version = buf.read_u8().map_err(|_| Error::LengthTooShort {
            step: "get version",
            actual: 0,
            expected: 1,
        })?;
        if version != ENVELOPE_VERSION {
            return Err(Error::UnsupportedVersion(version));
        }
        let birthday = Birthday::decode(&mut buf)?;

        if buf.len() < EPHEMERAL_KEY_LEN {
            return Err(Error::LengthTooShort {
                step: "get ephemeral key",
                actual: buf.len(),
                expected: EPHEMERAL_KEY_LEN,
            });
        }
        let (key_raw, buf) = buf.split_at(EPHEMERAL_KEY_LEN);
        let ephemeral_key = PublicKey::from_slice(key_raw).map_err(|e| {
            tracing::debug!(error = %e, "envelope ephemeral key is not a curve point");
            Error::TamperedEnvelope
        })?;

        if buf.len() < CIPHERTEXT_LEN {
            return Err(Error::LengthTooShort {
                step: "get ciphertext",
                actual: buf.len(),
                expected: CIPHERTEXT_LEN,
            });
        }
        let (ciphertext, salt) = buf.split_at(CIPHERTEXT_LEN);

        Ok(RecoveryEnvelope {
            birthday,
            ephemeral_key,
            ciphertext: ciphertext.to_vec(),
            salt: salt.to_vec(),
        })
    }
}

impl fmt::Display for RecoveryEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.to_bytes()).into_string())
    }
}

impl FromStr for RecoveryEnvelope {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let raw = bs58::decode(s).into_vec()?;
        RecoveryEnvelope::from_bytes(&raw)
    }
}

/// Encrypt `payload` to `challenge_key` and return the base58 recovery envelope.
///
/// Draws the ephemeral key from the OS random number generator, so repeated calls with the same
/// inputs give different envelopes.
#[cfg(feature = "getrandom")]
pub fn encode(
    challenge_key: &ChallengePublicKey,
    payload: &SecretPayload,
    salt: &[u8],
    birthday: Birthday,
) -> Result<String> {
    encode_with_rng(challenge_key, payload, salt, birthday, &mut rand::rngs::OsRng)
}

/// Like [`encode`], with the randomness supplied by the caller.
pub fn encode_with_rng<R: RngCore + CryptoRng>(
    challenge_key: &ChallengePublicKey,
    payload: &SecretPayload,
    salt: &[u8],
    birthday: Birthday,
    rng: &mut R,
) -> Result<String> {
    let envelope = RecoveryEnvelope::seal(challenge_key, payload, salt, birthday, rng)?;
    tracing::debug!(
        birthday = birthday.get(),
        salt_len = salt.len(),
        len = envelope.size(),
        "encoded recovery envelope"
    );
    Ok(envelope.to_string())
}

/// Like [`encode`], for callers holding the birthday as a wider integer. Out of range values
/// are rejected before any encryption happens.
#[cfg(feature = "getrandom")]
pub fn encode_with_raw_birthday(
    challenge_key: &ChallengePublicKey,
    payload: &SecretPayload,
    salt: &[u8],
    birthday: u32,
) -> Result<String> {
    let mut rng = rand::rngs::OsRng;
    encode_with_raw_birthday_with_rng(challenge_key, payload, salt, birthday, &mut rng)
}

/// Like [`encode_with_raw_birthday`], with the randomness supplied by the caller.
pub fn encode_with_raw_birthday_with_rng<R: RngCore + CryptoRng>(
    challenge_key: &ChallengePublicKey,
    payload: &SecretPayload,
    salt: &[u8],
    birthday: u32,
    rng: &mut R,
) -> Result<String> {
    let birthday = Birthday::try_from(birthday).map_err(|e| {
        tracing::debug!(birthday, "birthday doesn't fit in 16 bits");
        e
    })?;
    encode_with_rng(challenge_key, payload, salt, birthday, rng)
}

/// Extract the payload from a decoded extended private key, then encode it.
#[cfg(feature = "getrandom")]
pub fn encode_extended_key(
    challenge_key: &ChallengePublicKey,
    raw_extended_key: &[u8],
    salt: &[u8],
    birthday: Birthday,
) -> Result<String> {
    let payload = extended_key::extract(raw_extended_key)?;
    encode(challenge_key, &payload, salt, birthday)
}

/// Like [`encode_extended_key`], with the randomness supplied by the caller.
pub fn encode_extended_key_with_rng<R: RngCore + CryptoRng>(
    challenge_key: &ChallengePublicKey,
    raw_extended_key: &[u8],
    salt: &[u8],
    birthday: Birthday,
    rng: &mut R,
) -> Result<String> {
    let payload = extended_key::extract(raw_extended_key)?;
    encode_with_rng(challenge_key, &payload, salt, birthday, rng)
}

/// Parse a base58 recovery envelope and decrypt its payload with the challenge private key.
pub fn decode(text: &str, key: &ChallengePrivateKey) -> Result<SecretPayload> {
    let envelope = RecoveryEnvelope::from_str(text).map_err(|e| {
        tracing::debug!(error = %e, "failed to parse recovery envelope");
        e
    })?;
    tracing::trace!(
        birthday = envelope.birthday().get(),
        salt_len = envelope.salt().len(),
        "parsed recovery envelope"
    );
    envelope.open(key)
}
