use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use recovery_envelope::*;

const XPRV: &str = "xprv9s21ZrQH143K3QTDL4LXw2F7HEK3wJUD2nW2nRk4stbPy6cq3jPPqjiChkVvvNKmPGJxWUtg6LnF5kejMRNNU3TGtRBeJgk33yuGBxrMPHi";

fn envelope(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xfeed);
    let challenge = ChallengePrivateKey::generate(&mut rng);
    let public = challenge.public_key();
    let raw = bs58::decode(XPRV).into_vec().unwrap();
    let payload = extract(&raw).unwrap();
    let salt = [0x42u8; 8];

    c.bench_function("extract", |b| b.iter(|| extract(black_box(&raw)).unwrap()));

    c.bench_function("encode", |b| {
        b.iter(|| {
            encode_with_rng(&public, &payload, &salt, Birthday::new(350), &mut rng).unwrap()
        })
    });

    let code = encode_with_rng(&public, &payload, &salt, Birthday::new(350), &mut rng).unwrap();
    c.bench_function("parse", |b| {
        b.iter(|| black_box(&code).parse::<RecoveryEnvelope>().unwrap())
    });
    c.bench_function("decode", |b| {
        b.iter(|| decode(black_box(&code), &challenge).unwrap())
    });
}

criterion_group!(benches, envelope);
criterion_main!(benches);
