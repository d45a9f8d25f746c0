use std::fmt;

use byteorder::{BigEndian, ReadBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Compact marker of roughly when a wallet was created, used to bound blockchain rescans during
/// recovery. Stored in the envelope as a big-endian u16.
///
/// Conversions from wider integers fail instead of wrapping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Birthday(u16);

impl Birthday {
    pub const MIN: Birthday = Birthday(0);
    pub const MAX: Birthday = Birthday(u16::MAX);

    /// Encoded size in bytes.
    pub const LEN: usize = 2;

    pub const fn new(value: u16) -> Self {
        Birthday(value)
    }

    pub const fn get(self) -> u16 {
        self.0
    }

    pub fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Read a birthday off the front of a byte slice, advancing it.
    pub fn decode(buf: &mut &[u8]) -> Result<Birthday> {
        let actual = buf.len();
        let v = buf
            .read_u16::<BigEndian>()
            .map_err(|_| Error::LengthTooShort {
                step: "get birthday",
                actual,
                expected: Self::LEN,
            })?;
        Ok(Birthday(v))
    }
}

impl From<u16> for Birthday {
    fn from(v: u16) -> Self {
        Birthday(v)
    }
}

impl From<Birthday> for u16 {
    fn from(v: Birthday) -> Self {
        v.0
    }
}

impl TryFrom<i64> for Birthday {
    type Error = Error;
    fn try_from(v: i64) -> Result<Self> {
        u16::try_from(v)
            .map(Birthday)
            .map_err(|_| Error::BirthdayOutOfRange(v))
    }
}

impl TryFrom<u32> for Birthday {
    type Error = Error;
    fn try_from(v: u32) -> Result<Self> {
        Birthday::try_from(i64::from(v))
    }
}

impl TryFrom<i32> for Birthday {
    type Error = Error;
    fn try_from(v: i32) -> Result<Self> {
        Birthday::try_from(i64::from(v))
    }
}

impl TryFrom<usize> for Birthday {
    type Error = Error;
    fn try_from(v: usize) -> Result<Self> {
        u16::try_from(v)
            .map(Birthday)
            .map_err(|_| Error::BirthdayOutOfRange(i64::try_from(v).unwrap_or(i64::MAX)))
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
