use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Occurs when a decoded extended key doesn't yield a 64-byte secret payload at the expected
    /// offsets. Reports the length that was required and the length that was found.
    #[error("Malformed extended key: expected {expected} bytes, found {actual}")]
    MalformedKey { expected: usize, actual: usize },
    /// The bytes given for a challenge public key are not a valid secp256k1 point.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(secp256k1::Error),
    /// The bytes given for a challenge private key are not a valid secp256k1 scalar.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(secp256k1::Error),
    /// Birthday doesn't fit in the 16-bit envelope field. It is never truncated.
    #[error("Birthday {0} is outside the range 0..=65535")]
    BirthdayOutOfRange(i64),
    /// Failure within the encryption primitive, passed along as-is.
    #[error("Encryption failed: {0}")]
    Encryption(String),
    /// The envelope failed authentication, or its ephemeral key is not a valid point.
    #[error("Recovery envelope failed authentication")]
    TamperedEnvelope,
    /// The envelope uses a version this crate doesn't understand.
    #[error("Unsupported envelope version {0}")]
    UnsupportedVersion(u8),
    /// Envelope ended too early.
    #[error("Expected data length {expected}, but got {actual} on step [{step}]")]
    LengthTooShort {
        step: &'static str,
        actual: usize,
        expected: usize,
    },
    /// Text was not valid base58 (or hex, for key strings).
    #[error("Bad text encoding: {0}")]
    BadEncoding(String),
}

impl From<bs58::decode::Error> for Error {
    fn from(e: bs58::decode::Error) -> Self {
        Self::BadEncoding(e.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        Self::BadEncoding(e.to_string())
    }
}
