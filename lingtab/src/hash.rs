//! Content hashing
//!
//! Leaves and phrases are identified by a Jenkins one-at-a-time hash of
//! `payload + "|" + description`, rendered in base 62 when used as a key.
//! The hash depends on the payload bytes only, so a phrase keeps its
//! identity across runs and machines.

use crate::error::TableResult;
use crate::table::VariationTable;

const BASE62_DIGITS: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// What is being hashed
#[derive(Debug, Clone, Copy)]
pub enum HashPayload<'a> {
    /// Raw pattern of a text phrase or a single leaf
    Text(&'a str),
    /// A whole table, hashed through its canonical JSON
    Table(&'a VariationTable),
}

pub struct ContentHasher;

impl ContentHasher {
    /// Jenkins one-at-a-time over UTF-8 bytes. The empty string hashes to 0.
    pub fn jenkins_hash(input: &str) -> u32 {
        let mut hash: u32 = 0;
        for &byte in input.as_bytes() {
            hash = hash.wrapping_add(byte as u32);
            hash = hash.wrapping_add(hash << 10);
            hash ^= hash >> 6;
        }
        hash = hash.wrapping_add(hash << 3);
        hash ^= hash >> 11;
        hash.wrapping_add(hash << 15)
    }

    /// Hash a payload together with its description
    ///
    /// # Errors
    /// Fails only if a table payload cannot be serialized.
    pub fn hash(payload: HashPayload<'_>, description: &str) -> TableResult<u32> {
        let payload = match payload {
            HashPayload::Text(text) => text.to_string(),
            HashPayload::Table(table) => serde_json::to_string(table)?,
        };
        Ok(Self::jenkins_hash(&format!("{}|{}", payload, description)))
    }

    /// Base-62 key for a payload and description
    pub fn hash_key(payload: HashPayload<'_>, description: &str) -> TableResult<String> {
        Ok(to_base62(Self::hash(payload, description)?))
    }
}

/// Render an unsigned integer with digits `0-9a-zA-Z`
pub fn to_base62(mut value: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE62_DIGITS[(value % 62) as usize]);
        value /= 62;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_jenkins_known_vectors() {
        assert_eq!(ContentHasher::jenkins_hash(""), 0);
        assert_eq!(ContentHasher::jenkins_hash("a"), 0xca2e9442);
        assert_eq!(
            ContentHasher::jenkins_hash("The quick brown fox jumps over the lazy dog"),
            0x519e91f5
        );
    }

    #[test]
    fn test_text_hash_includes_description() {
        let hash = ContentHasher::hash(HashPayload::Text("Hello"), "greeting").unwrap();
        assert_eq!(hash, 0xcde881f2);
        assert_eq!(
            ContentHasher::hash_key(HashPayload::Text("Hello"), "greeting").unwrap(),
            "3LN0EW"
        );
        assert_ne!(
            hash,
            ContentHasher::hash(HashPayload::Text("Hello"), "farewell").unwrap()
        );
    }

    #[test]
    fn test_table_hash_is_key_order_independent() {
        let a: VariationTable = serde_json::from_value(json!({"b": "2", "a": "1"})).unwrap();
        let b: VariationTable = serde_json::from_value(json!({"a": "1", "b": "2"})).unwrap();
        assert_eq!(
            ContentHasher::hash(HashPayload::Table(&a), "d").unwrap(),
            ContentHasher::hash(HashPayload::Table(&b), "d").unwrap()
        );
        assert_eq!(
            ContentHasher::hash(HashPayload::Table(&a), "d").unwrap(),
            ContentHasher::hash(HashPayload::Text(r#"{"a":"1","b":"2"}"#), "d").unwrap()
        );
    }

    #[test]
    fn test_base62() {
        assert_eq!(to_base62(0), "0");
        assert_eq!(to_base62(61), "Z");
        assert_eq!(to_base62(62), "10");
        assert_eq!(to_base62(3843), "ZZ");
        assert_eq!(to_base62(0xca2e9442), "3HyHdM");
    }

    proptest! {
        #[test]
        fn test_hash_is_stable(payload in ".*", desc in ".*") {
            let first = ContentHasher::hash(HashPayload::Text(&payload), &desc).unwrap();
            let second = ContentHasher::hash(HashPayload::Text(&payload), &desc).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn test_base62_uses_only_alphanumerics(value in any::<u32>()) {
            let key = to_base62(value);
            prop_assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
            prop_assert!(key.len() <= 6);
        }
    }
}
