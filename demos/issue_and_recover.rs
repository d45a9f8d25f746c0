use recovery_envelope::*;
use std::str::FromStr;

fn main() {
    // The recovering party generates the challenge key pair and hands out only the public half.
    let challenge = ChallengePrivateKey::generate(&mut rand::rngs::OsRng);
    let challenge_public = ChallengePublicKey::from_str(&challenge.public_key().to_string())
        .expect("Public key should parse back from hex");

    // The wallet escrows its master key
    let xprv = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";
    let payload = extract_from_base58(xprv).expect("Test vector should be a valid xprv");
    let salt = *b"\x01\x23\x45\x67\x89\xab\xcd\xef";
    let code = encode(&challenge_public, &payload, &salt, Birthday::new(350))
        .expect("Encryption shouldn't fail with a valid key");
    println!("Recovery code: {}", code);

    // Later: read the birthday and salt without the key, then open it
    let envelope = RecoveryEnvelope::from_str(&code).expect("Code should parse");
    println!(
        "Version {}, birthday {}, salt {}",
        envelope.version(),
        envelope.birthday(),
        hex::encode(envelope.salt())
    );
    let recovered = envelope.open(&challenge).expect("Envelope should open");
    assert_eq!(recovered, payload);
    println!("Recovered chain code: {}", hex::encode(recovered.chain_code()));
}
