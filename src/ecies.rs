//! Elliptic-curve integrated encryption over secp256k1.
//!
//! Encryption of a message `m` for recipient public key `P`:
//!
//! 1. Pick a fresh ephemeral secret `e` and compute `E = eG`.
//! 2. `shared = SHA256(compressed(eP))` (libsecp256k1's ECDH).
//! 3. HKDF-SHA256 with salt `E ∥ P` (both compressed) and a fixed info string expands `shared`
//!    into a 32-byte AES key and a 12-byte nonce.
//! 4. `ciphertext = AES-256-GCM(key, nonce, m)`, with the 16-byte tag appended.
//!
//! Every key is used for exactly one message, so the derived nonce never repeats under a key.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use secp256k1::{ecdh::SharedSecret, PublicKey, Secp256k1, SecretKey};
use sha2::Sha256;
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Bytes the AEAD adds to the plaintext.
pub const TAG_LEN: usize = 16;

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KDF_INFO: &[u8] = b"recovery-envelope/v2/aes-256-gcm";

/// Encrypt `plaintext` to `recipient`. Returns the ephemeral public key and the ciphertext (with
/// tag). Each call uses a new ephemeral key.
pub fn encrypt<R: RngCore + CryptoRng>(
    recipient: &PublicKey,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<(PublicKey, Vec<u8>)> {
    let secp = Secp256k1::signing_only();
    let ephemeral_secret = SecretKey::new(rng);
    let ephemeral = PublicKey::from_secret_key(&secp, &ephemeral_secret);

    let shared = SharedSecret::new(recipient, &ephemeral_secret);
    let (cipher, nonce) = derive_cipher(&shared, &ephemeral, recipient)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| Error::Encryption(e.to_string()))?;
    Ok((ephemeral, ciphertext))
}

/// Decrypt a ciphertext produced by [`encrypt`]. Any authentication failure is reported as
/// [`Error::TamperedEnvelope`] and no plaintext is returned.
pub fn decrypt(recipient: &SecretKey, ephemeral: &PublicKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let secp = Secp256k1::signing_only();
    let recipient_public = PublicKey::from_secret_key(&secp, recipient);

    let shared = SharedSecret::new(ephemeral, recipient);
    let (cipher, nonce) = derive_cipher(&shared, ephemeral, &recipient_public)?;
    cipher
        .decrypt(Nonce::from_slice(&nonce), ciphertext)
        .map_err(|_| Error::TamperedEnvelope)
}

fn derive_cipher(
    shared: &SharedSecret,
    ephemeral: &PublicKey,
    recipient: &PublicKey,
) -> Result<(Aes256Gcm, [u8; NONCE_LEN])> {
    let mut salt = [0u8; 66];
    salt[..33].copy_from_slice(&ephemeral.serialize());
    salt[33..].copy_from_slice(&recipient.serialize());

    let mut ikm = shared.secret_bytes();
    let hk = Hkdf::<Sha256>::new(Some(&salt), &ikm);
    ikm.zeroize();

    let mut okm = [0u8; KEY_LEN + NONCE_LEN];
    hk.expand(KDF_INFO, &mut okm)
        .map_err(|e| Error::Encryption(e.to_string()))?;
    let cipher = Aes256Gcm::new_from_slice(&okm[..KEY_LEN]);
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&okm[KEY_LEN..]);
    okm.zeroize();

    let cipher = cipher.map_err(|e| Error::Encryption(e.to_string()))?;
    Ok((cipher, nonce))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn keypair(rng: &mut StdRng) -> (SecretKey, PublicKey) {
        let secp = Secp256k1::signing_only();
        let sk = SecretKey::new(rng);
        let pk = PublicKey::from_secret_key(&secp, &sk);
        (sk, pk)
    }

    #[test]
    fn roundtrip() {
        let mut rng = StdRng::seed_from_u64(1);
        let (sk, pk) = keypair(&mut rng);
        let mut msg = [0u8; 64];
        rng.fill(&mut msg[..]);
        let (eph, ct) = encrypt(&pk, &msg, &mut rng).unwrap();
        assert_eq!(ct.len(), msg.len() + TAG_LEN);
        assert_eq!(decrypt(&sk, &eph, &ct).unwrap(), msg.to_vec());
    }

    #[test]
    fn fresh_ephemeral_each_call() {
        let mut rng = StdRng::seed_from_u64(2);
        let (_, pk) = keypair(&mut rng);
        let (eph1, ct1) = encrypt(&pk, b"same", &mut rng).unwrap();
        let (eph2, ct2) = encrypt(&pk, b"same", &mut rng).unwrap();
        assert_ne!(eph1, eph2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn deterministic_with_seeded_rng() {
        let (_, pk) = keypair(&mut StdRng::seed_from_u64(3));
        let a = encrypt(&pk, b"message", &mut StdRng::seed_from_u64(99)).unwrap();
        let b = encrypt(&pk, b"message", &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn wrong_key_fails() {
        let mut rng = StdRng::seed_from_u64(4);
        let (_, pk) = keypair(&mut rng);
        let (other, _) = keypair(&mut rng);
        let (eph, ct) = encrypt(&pk, b"secret", &mut rng).unwrap();
        assert!(matches!(
            decrypt(&other, &eph, &ct).unwrap_err(),
            Error::TamperedEnvelope
        ));
    }

    #[test]
    fn truncated_ciphertext_fails() {
        let mut rng = StdRng::seed_from_u64(5);
        let (sk, pk) = keypair(&mut rng);
        let (eph, ct) = encrypt(&pk, b"secret", &mut rng).unwrap();
        assert!(decrypt(&sk, &eph, &ct[..ct.len() - 1]).is_err());
        assert!(decrypt(&sk, &eph, &[]).is_err());
    }
}
