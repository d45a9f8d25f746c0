//! Secret payload extraction from serialized BIP32 extended private keys.
//!
//! A decoded extended private key is laid out as:
//!
//! ```text
//! version (4) | depth (1) | parent fingerprint (4) | child index (4) |
//! chain code (32) | 0x00 (1) | private key (32) | [checksum (4)]
//! ```
//!
//! Only the chain code and private key are kept. They are read at fixed offsets, so this module
//! names every field it reads and checks the total size of what it produced against
//! [`PAYLOAD_LEN`].

use crate::error::{Error, Result};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of the secret payload: private key followed by chain code.
pub const PAYLOAD_LEN: usize = 64;

/// A fixed-position field inside a serialized extended key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyField {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
}

impl KeyField {
    /// One past the last byte of this field.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

pub const CHAIN_CODE_FIELD: KeyField = KeyField {
    name: "chain code",
    offset: 13,
    len: 32,
};

pub const PRIVATE_KEY_FIELD: KeyField = KeyField {
    name: "private key",
    offset: 46,
    len: 32,
};

/// Fields copied into the payload, in payload order.
pub const PAYLOAD_FIELDS: [KeyField; 2] = [PRIVATE_KEY_FIELD, CHAIN_CODE_FIELD];

/// Minimum decoded extended key length covering every payload field.
pub const MIN_EXTENDED_KEY_LEN: usize = max_field_end(&PAYLOAD_FIELDS);

const fn max_field_end(fields: &[KeyField]) -> usize {
    let mut end = 0;
    let mut i = 0;
    while i < fields.len() {
        if fields[i].end() > end {
            end = fields[i].end();
        }
        i += 1;
    }
    end
}

/// The 64 secret bytes of an HD master key: private key, then chain code.
///
/// The ordering is part of the envelope format; the decrypting side splits it back the same way.
/// Memory is wiped on drop, and the bytes never show up in `Debug` output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretPayload {
    bytes: [u8; PAYLOAD_LEN],
}

impl SecretPayload {
    /// Build a payload from exactly 64 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PAYLOAD_LEN {
            return Err(Error::MalformedKey {
                expected: PAYLOAD_LEN,
                actual: bytes.len(),
            });
        }
        let mut payload = SecretPayload {
            bytes: [0; PAYLOAD_LEN],
        };
        payload.bytes.copy_from_slice(bytes);
        Ok(payload)
    }

    pub fn from_parts(
        private_key: &[u8; PRIVATE_KEY_FIELD.len],
        chain_code: &[u8; CHAIN_CODE_FIELD.len],
    ) -> Self {
        let mut payload = SecretPayload {
            bytes: [0; PAYLOAD_LEN],
        };
        let (key, code) = payload.bytes.split_at_mut(PRIVATE_KEY_FIELD.len);
        key.copy_from_slice(private_key);
        code.copy_from_slice(chain_code);
        payload
    }

    pub fn private_key(&self) -> &[u8] {
        &self.bytes[..PRIVATE_KEY_FIELD.len]
    }

    pub fn chain_code(&self) -> &[u8] {
        &self.bytes[PRIVATE_KEY_FIELD.len..]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for SecretPayload {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl PartialEq for SecretPayload {
    fn eq(&self, other: &Self) -> bool {
        self.bytes[..].ct_eq(&other.bytes[..]).into()
    }
}

impl Eq for SecretPayload {}

impl fmt::Debug for SecretPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPayload").finish_non_exhaustive()
    }
}

/// Pull the secret payload out of a decoded extended private key.
///
/// Fails with [`Error::MalformedKey`] if `raw` is too short to hold both fields. Any trailing
/// bytes (like a base58check checksum) are ignored.
pub fn extract(raw: &[u8]) -> Result<SecretPayload> {
    if raw.len() < MIN_EXTENDED_KEY_LEN {
        tracing::debug!(
            len = raw.len(),
            min = MIN_EXTENDED_KEY_LEN,
            "extended key too short"
        );
        return Err(Error::MalformedKey {
            expected: MIN_EXTENDED_KEY_LEN,
            actual: raw.len(),
        });
    }

    let mut payload = Vec::with_capacity(PAYLOAD_LEN);
    for field in PAYLOAD_FIELDS.iter() {
        payload.extend_from_slice(&raw[field.offset..field.end()]);
    }
    let result = SecretPayload::from_slice(&payload);
    payload.zeroize();
    result
}

/// Base58-decode an extended private key string (`xprv...`, `tprv...`) and extract its payload.
pub fn extract_from_base58(text: &str) -> Result<SecretPayload> {
    let mut raw = bs58::decode(text).into_vec().map_err(|e| {
        tracing::debug!(error = %e, "extended key is not base58");
        Error::from(e)
    })?;
    let result = extract(&raw);
    raw.zeroize();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP32 test vector 1, chain m
    const VECTOR1_XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    const VECTOR1_CHAIN_CODE: &str =
        "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508";
    const VECTOR1_PRIVATE_KEY: &str =
        "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35";

    #[test]
    fn field_table() {
        assert_eq!(MIN_EXTENDED_KEY_LEN, 78);
        let total: usize = PAYLOAD_FIELDS.iter().map(|f| f.len).sum();
        assert_eq!(total, PAYLOAD_LEN);
        assert_eq!(CHAIN_CODE_FIELD.end(), 45);
        assert_eq!(PRIVATE_KEY_FIELD.end(), 78);
    }

    #[test]
    fn vector1_fixture() {
        let raw = bs58::decode(VECTOR1_XPRV).into_vec().unwrap();
        // 78 bytes of key plus the 4 byte checksum
        assert_eq!(raw.len(), 82);
        let payload = extract(&raw).unwrap();

        let mut expected = hex::decode(VECTOR1_PRIVATE_KEY).unwrap();
        expected.extend(hex::decode(VECTOR1_CHAIN_CODE).unwrap());
        assert_eq!(payload.as_bytes(), &expected[..]);
        assert_eq!(payload.private_key(), &hex::decode(VECTOR1_PRIVATE_KEY).unwrap()[..]);
        assert_eq!(payload.chain_code(), &hex::decode(VECTOR1_CHAIN_CODE).unwrap()[..]);
    }

    #[test]
    fn vector1_from_text() {
        let payload = extract_from_base58(VECTOR1_XPRV).unwrap();
        let raw = bs58::decode(VECTOR1_XPRV).into_vec().unwrap();
        assert_eq!(payload, extract(&raw).unwrap());
    }

    #[test]
    fn exact_length_key() {
        let raw: Vec<u8> = (0..78u8).collect();
        let payload = extract(&raw).unwrap();
        assert_eq!(payload.as_bytes().len(), PAYLOAD_LEN);
        assert_eq!(payload.private_key(), &raw[46..78]);
        assert_eq!(payload.chain_code(), &raw[13..45]);
    }

    #[test]
    fn short_key_rejected() {
        for len in [0, 1, 45, 46, 77] {
            let raw = vec![0xAAu8; len];
            match extract(&raw).unwrap_err() {
                Error::MalformedKey { expected, actual } => {
                    assert_eq!(expected, 78);
                    assert_eq!(actual, len);
                }
                e => panic!("Unexpected error: {}", e),
            }
        }
    }

    #[test]
    fn bad_base58_rejected() {
        assert!(matches!(
            extract_from_base58("xprv0OIl").unwrap_err(),
            Error::BadEncoding(_)
        ));
        // Valid base58, but way too short
        assert!(matches!(
            extract_from_base58("abc").unwrap_err(),
            Error::MalformedKey { .. }
        ));
    }

    #[test]
    fn payload_from_slice() {
        assert!(SecretPayload::from_slice(&[0u8; 63]).is_err());
        assert!(SecretPayload::from_slice(&[0u8; 65]).is_err());
        let p = SecretPayload::from_parts(&[1u8; 32], &[2u8; 32]);
        assert_eq!(p, SecretPayload::from_slice(p.as_bytes()).unwrap());
        assert_eq!(p.private_key(), &[1u8; 32]);
        assert_eq!(p.chain_code(), &[2u8; 32]);
    }

    #[test]
    fn payload_from_parts_matches_extract() {
        let raw = bs58::decode(VECTOR1_XPRV).into_vec().unwrap();
        let mut key = [0u8; 32];
        let mut code = [0u8; 32];
        key.copy_from_slice(&raw[PRIVATE_KEY_FIELD.offset..PRIVATE_KEY_FIELD.end()]);
        code.copy_from_slice(&raw[CHAIN_CODE_FIELD.offset..CHAIN_CODE_FIELD.end()]);
        let p = SecretPayload::from_parts(&key, &code);
        assert_eq!(p, extract(&raw).unwrap());
        assert_eq!(&p.as_bytes()[..PRIVATE_KEY_FIELD.len], &key);
        assert_eq!(&p.as_bytes()[PRIVATE_KEY_FIELD.len..], &code);
    }

    #[test]
    fn debug_hides_secret() {
        let p = SecretPayload::from_parts(&[0xABu8; 32], &[0xCDu8; 32]);
        assert_eq!(format!("{:?}", p), "SecretPayload { .. }");
    }
}
