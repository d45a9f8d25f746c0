//! Recovery envelopes escrow an HD wallet's master private key to a separately held secp256k1
//! "challenge public key". Whoever holds the matching private key can later recover the wallet;
//! nobody else, including whoever stores or transcribes the recovery code, learns the key.
//!
//! The pipeline is:
//!
//! 1. [`extract`] pulls the 32-byte private key and 32-byte chain code out of a decoded BIP32
//!    extended private key, giving a 64-byte [`SecretPayload`].
//! 2. [`encode`] encrypts the payload to a [`ChallengePublicKey`] with a fresh ephemeral key,
//!    wraps it in a versioned [`RecoveryEnvelope`] together with the wallet [`Birthday`] and a
//!    caller-supplied salt, and encodes the result as base58 text.
//! 3. [`decode`] reverses it with the [`ChallengePrivateKey`], refusing any envelope that fails
//!    authentication.
//!
//! ```
//! use rand::rngs::OsRng;
//! use recovery_envelope::{
//!     decode, encode_with_rng, extract_from_base58, Birthday, ChallengePrivateKey,
//! };
//!
//! let xprv = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
//! let payload = extract_from_base58(xprv)?;
//!
//! let challenge = ChallengePrivateKey::generate(&mut OsRng);
//! let pk = challenge.public_key();
//! let code = encode_with_rng(&pk, &payload, b"8bytes!!", Birthday::new(350), &mut OsRng)?;
//!
//! assert_eq!(decode(&code, &challenge)?, payload);
//! # Ok::<(), recovery_envelope::Error>(())
//! ```
//!
//! All operations are synchronous and stateless, and every type is `Send + Sync`.

mod birthday;
mod challenge_key;
mod envelope;
mod error;
mod extended_key;

pub mod ecies;

pub use self::birthday::Birthday;
pub use self::challenge_key::{
    ChallengePrivateKey, ChallengePublicKey, PRIVATE_KEY_LEN, PUBLIC_KEY_LEN,
};
#[cfg(feature = "getrandom")]
pub use self::envelope::{encode, encode_extended_key, encode_with_raw_birthday};
pub use self::envelope::{
    decode, encode_extended_key_with_rng, encode_with_raw_birthday_with_rng, encode_with_rng,
    RecoveryEnvelope, CIPHERTEXT_LEN, ENVELOPE_VERSION, EPHEMERAL_KEY_LEN, HEADER_LEN,
    MIN_ENVELOPE_LEN,
};
pub use self::error::{Error, Result};
pub use self::extended_key::{
    extract, extract_from_base58, KeyField, SecretPayload, CHAIN_CODE_FIELD,
    MIN_EXTENDED_KEY_LEN, PAYLOAD_FIELDS, PAYLOAD_LEN, PRIVATE_KEY_FIELD,
};
