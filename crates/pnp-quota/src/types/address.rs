use crate::ThisError;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

pub const ADDRESS_BYTES: usize = 20;

///
/// AddressError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum AddressError {
    #[error("address must start with '0x'")]
    MissingPrefix,

    #[error("address must be {expected} hex characters, got {0}", expected = ADDRESS_BYTES * 2)]
    InvalidLength(usize),

    #[error("address contains non-hex characters")]
    InvalidHex,
}

///
/// Address
///
/// Ledger account identifier: 20 bytes, written as `0x` followed by 40 hex
/// digits. Parsing accepts either hex case; display is always lower case.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// True when `s` is a syntactically valid address.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.parse::<Self>().is_ok()
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").ok_or(AddressError::MissingPrefix)?;
        if digits.len() != ADDRESS_BYTES * 2 {
            return Err(AddressError::InvalidLength(digits.len()));
        }

        let mut bytes = [0u8; ADDRESS_BYTES];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::InvalidHex)?;

        Ok(Self(bytes))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;

        s.parse().map_err(de::Error::custom)
    }
}

///
/// TESTS
///
