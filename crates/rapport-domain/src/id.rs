//! Identifier module - UUIDv7-backed ids for accounts and content items
//!
//! UUIDv7 gives:
//! - Chronological sortability (ids created later compare greater)
//! - 128-bit uniqueness without coordination
//! - A canonical string form callers can pass around

use std::fmt;
use std::str::FromStr;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u128);

        impl $name {
            /// Generate a new UUIDv7-based id
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7().as_u128())
            }

            /// Create an id from a raw u128 value
            ///
            /// This is primarily for storage layer deserialization.
            pub fn from_value(value: u128) -> Self {
                Self(value)
            }

            /// Parse an id from its hyphenated UUID form
            pub fn from_string(s: &str) -> Result<Self, String> {
                uuid::Uuid::parse_str(s.trim())
                    .map(|u| Self(u.as_u128()))
                    .map_err(|e| format!("Invalid {} '{}': {}", $label, s, e))
            }

            /// Get the raw u128 value
            pub fn value(&self) -> u128 {
                self.0
            }

            /// Big-endian byte form used as a storage key
            pub fn to_bytes(&self) -> [u8; 16] {
                self.0.to_be_bytes()
            }

            /// Inverse of [`Self::to_bytes`]
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
                let arr: [u8; 16] = bytes.try_into().map_err(|_| {
                    format!("Expected 16 bytes for {}, got {}", $label, bytes.len())
                })?;
                Ok(Self(u128::from_be_bytes(arr)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", uuid::Uuid::from_u128(self.0))
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_string(s)
            }
        }
    };
}

uuid_id!(
    /// Identifier of an account in the follow graph
    AccountId,
    "account id"
);

uuid_id!(
    /// Identifier of a content item (post)
    ContentId,
    "content id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_ordering() {
        let a = AccountId::from_value(1000);
        let b = AccountId::from_value(2000);

        assert!(a < b);
        assert!(b > a);
    }

    #[test]
    fn test_ids_are_chronological() {
        let first = AccountId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = AccountId::new();

        assert!(first < second, "Earlier UUIDv7 should sort first");
    }

    #[test]
    fn test_display_and_parse() {
        let id = ContentId::new();
        let text = id.to_string();

        assert_eq!(text.len(), 36);
        assert_eq!(text.parse::<ContentId>().unwrap(), id);
    }

    #[test]
    fn test_invalid_string() {
        assert!(AccountId::from_string("not-an-id").is_err());
        assert!(AccountId::from_string("").is_err());
    }

    #[test]
    fn test_bytes_wrong_length() {
        let err = AccountId::from_bytes(&[1, 2, 3]).unwrap_err();
        assert!(err.contains("got 3"));
    }
}
