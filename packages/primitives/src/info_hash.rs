use std::panic::Location;

use thiserror::Error;

/// `BitTorrent` Info Hash v1
///
/// It's the canonical identity of a transfer. The textual form is always the
/// 40 character lowercase hexadecimal string, whatever the case of the input
/// it was parsed from.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Default, Debug)]
pub struct InfoHash(pub [u8; 20]);

pub const INFO_HASH_BYTES_LEN: usize = 20;

/// Length of the hexadecimal representation.
pub const INFO_HASH_HEX_LEN: usize = 40;

impl InfoHash {
    /// Create a new `InfoHash` from a byte slice.
    ///
    /// # Panics
    ///
    /// Will panic if byte slice does not contains the exact amount of bytes need for the `InfoHash`.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), INFO_HASH_BYTES_LEN);
        let mut ret = Self([0u8; INFO_HASH_BYTES_LEN]);
        ret.0.clone_from_slice(bytes);
        ret
    }

    /// Returns the `InfoHash` internal byte array.
    #[must_use]
    pub fn bytes(&self) -> [u8; 20] {
        self.0
    }

    /// Returns the `InfoHash` as a lowercase hex string.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        self.to_string()
    }
}

impl Ord for InfoHash {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl std::cmp::PartialOrd<InfoHash> for InfoHash {
    fn partial_cmp(&self, other: &InfoHash) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for InfoHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut chars = [0u8; INFO_HASH_HEX_LEN];
        let hex = binascii::bin2hex(&self.0, &mut chars).map_err(|_| std::fmt::Error)?;
        let hex = std::str::from_utf8(hex).map_err(|_| std::fmt::Error)?;
        f.write_str(hex)
    }
}

impl std::str::FromStr for InfoHash {
    type Err = ConversionError;

    /// Parses a 40 character hexadecimal string. Uppercase digits are accepted
    /// and normalized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != INFO_HASH_HEX_LEN {
            return Err(ConversionError::InvalidHexLength {
                location: Location::caller(),
                length: s.len(),
            });
        }

        if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ConversionError::InvalidHexDigit {
                location: Location::caller(),
            });
        }

        let lowercase = s.to_ascii_lowercase();

        let mut i = Self([0u8; INFO_HASH_BYTES_LEN]);
        binascii::hex2bin(lowercase.as_bytes(), &mut i.0).map_err(|_| ConversionError::InvalidHexDigit {
            location: Location::caller(),
        })?;
        Ok(i)
    }
}

impl std::convert::From<[u8; 20]> for InfoHash {
    fn from(val: [u8; 20]) -> Self {
        InfoHash(val)
    }
}

/// Errors that can occur when building an `InfoHash`.
#[derive(Error, Debug, Clone)]
pub enum ConversionError {
    /// Not enough bytes for infohash. An infohash is 20 bytes.
    #[error("not enough bytes for infohash: {message} {location}")]
    NotEnoughBytes {
        location: &'static Location<'static>,
        message: String,
    },
    /// Too many bytes for infohash. An infohash is 20 bytes.
    #[error("too many bytes for infohash: {message} {location}")]
    TooManyBytes {
        location: &'static Location<'static>,
        message: String,
    },
    /// The hex representation must be exactly 40 characters long.
    #[error("expected a 40 character long string, got {length} characters {location}")]
    InvalidHexLength {
        location: &'static Location<'static>,
        length: usize,
    },
    /// The hex representation contains a non hexadecimal character.
    #[error("expected only hexadecimal characters {location}")]
    InvalidHexDigit { location: &'static Location<'static> },
}

impl TryFrom<Vec<u8>> for InfoHash {
    type Error = ConversionError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() < INFO_HASH_BYTES_LEN {
            return Err(ConversionError::NotEnoughBytes {
                location: Location::caller(),
                message: format! {"got {} bytes, expected {}", bytes.len(), INFO_HASH_BYTES_LEN},
            });
        }
        if bytes.len() > INFO_HASH_BYTES_LEN {
            return Err(ConversionError::TooManyBytes {
                location: Location::caller(),
                message: format! {"got {} bytes, expected {}", bytes.len(), INFO_HASH_BYTES_LEN},
            });
        }
        Ok(Self::from_bytes(&bytes))
    }
}

impl serde::ser::Serialize for InfoHash {
    fn serialize<S: serde::ser::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::de::Deserialize<'de> for InfoHash {
    fn deserialize<D: serde::de::Deserializer<'de>>(des: D) -> Result<Self, D::Error> {
        des.deserialize_str(InfoHashVisitor)
    }
}

struct InfoHashVisitor;

impl<'v> serde::de::Visitor<'v> for InfoHashVisitor {
    type Value = InfoHash;

    fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "a 40 character long hexadecimal string")
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse::<InfoHash>()
            .map_err(|_| serde::de::Error::invalid_value(serde::de::Unexpected::Str(v), &self))
    }
}
