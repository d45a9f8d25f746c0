#![no_main]
use libfuzzer_sys::fuzz_target;
use recovery_envelope::RecoveryEnvelope;

fuzz_target!(|data: &[u8]| {
    if let Ok(env) = RecoveryEnvelope::from_bytes(data) {
        assert_eq!(env.to_bytes(), data);
    }
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = text.parse::<RecoveryEnvelope>();
    }
});
