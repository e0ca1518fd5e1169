//! Source segments
//!
//! A phrase arrives as an ordered list of segments: literal text interleaved
//! with variation descriptors. The JSON form is what an extractor emits:
//!
//! ```json
//! ["You have ", {"kind": "plural", "singularText": "photo", "showCount": "yes", "token": "n"}]
//! ```

use crate::gender::PronounUsage;
use serde::{Deserialize, Serialize};

/// One piece of a phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Literal(String),
    Variation(Variation),
}

impl Segment {
    pub fn literal(text: impl Into<String>) -> Self {
        Segment::Literal(text.into())
    }

    pub fn is_variation(&self) -> bool {
        matches!(self, Segment::Variation(_))
    }
}

impl From<Variation> for Segment {
    fn from(variation: Variation) -> Self {
        Segment::Variation(variation)
    }
}

/// Whether a plural shows its count in the rendered text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShowCount {
    #[default]
    No,
    Yes,
    IfMany,
}

/// A variable part of a phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Variation {
    /// Gender of the sentence subject; contributes no text
    #[serde(rename_all = "camelCase")]
    Subject {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reuse_key: Option<String>,
    },
    /// A parameter whose value varies by gender
    #[serde(rename_all = "camelCase")]
    Gender {
        token: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reuse_key: Option<String>,
    },
    /// A parameter whose value varies by number
    #[serde(rename_all = "camelCase")]
    Number {
        token: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reuse_key: Option<String>,
    },
    /// A noun with singular and plural forms
    #[serde(rename_all = "camelCase")]
    Plural {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
        singular_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        many_text: Option<String>,
        #[serde(default)]
        show_count: ShowCount,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reuse_key: Option<String>,
    },
    /// A pronoun chosen by the referent's gender
    #[serde(rename_all = "camelCase")]
    Pronoun {
        usage: PronounUsage,
        #[serde(default)]
        human: bool,
        #[serde(default)]
        capitalize: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reuse_key: Option<String>,
    },
    /// One of a fixed set of literal alternatives
    #[serde(rename_all = "camelCase")]
    Enum {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
        #[serde(with = "ordered_range")]
        range: Vec<(String, String)>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reuse_key: Option<String>,
    },
}

impl Variation {
    pub fn reuse_key(&self) -> Option<&str> {
        match self {
            Variation::Subject { reuse_key }
            | Variation::Gender { reuse_key, .. }
            | Variation::Number { reuse_key, .. }
            | Variation::Plural { reuse_key, .. }
            | Variation::Pronoun { reuse_key, .. }
            | Variation::Enum { reuse_key, .. } => reuse_key.as_deref(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Variation::Subject { .. } => "subject",
            Variation::Gender { .. } => "gender",
            Variation::Number { .. } => "number",
            Variation::Plural { .. } => "plural",
            Variation::Pronoun { .. } => "pronoun",
            Variation::Enum { .. } => "enum",
        }
    }
}

/// Enum ranges are JSON objects whose entry order is significant, so they
/// are read into a vector rather than a map.
mod ordered_range {
    use serde::de::{Error, MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S>(range: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(range.len()))?;
        for (key, text) in range {
            map.serialize_entry(key, text)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RangeVisitor;

        impl<'de> Visitor<'de> for RangeVisitor {
            type Value = Vec<(String, String)>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of enum keys to literal text")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, String)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, text)) = access.next_entry::<String, String>()? {
                    if entries.iter().any(|(seen, _)| *seen == key) {
                        return Err(A::Error::custom(format!("duplicate enum key `{}`", key)));
                    }
                    entries.push((key, text));
                }
                Ok(entries)
            }
        }

        deserializer.deserialize_map(RangeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_and_enum_from_json() {
        let segments: Vec<Segment> = serde_json::from_value(json!([
            "Click to see ",
            {"kind": "enum", "range": {"groups": "groups", "photos": "photos"}}
        ]))
        .unwrap();

        assert_eq!(segments[0], Segment::literal("Click to see "));
        match &segments[1] {
            Segment::Variation(Variation::Enum { range, token, reuse_key }) => {
                assert_eq!(range[0], ("groups".to_string(), "groups".to_string()));
                assert_eq!(range[1], ("photos".to_string(), "photos".to_string()));
                assert!(token.is_none());
                assert!(reuse_key.is_none());
            }
            other => panic!("expected enum segment, got {:?}", other),
        }
    }

    #[test]
    fn test_enum_range_keeps_document_order() {
        let segment: Segment = serde_json::from_value(json!(
            {"kind": "enum", "range": {"zeta": "z", "alpha": "a", "mid": "m"}}
        ))
        .unwrap();
        let Segment::Variation(Variation::Enum { range, .. }) = segment else {
            panic!("expected enum segment");
        };
        let keys: Vec<&str> = range.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_enum_range_rejects_duplicate_keys() {
        let result: Result<Segment, _> = serde_json::from_str(
            r#"{"kind": "enum", "range": {"a": "first", "b": "second", "a": "third"}}"#,
        );
        assert!(result.is_err());

        let result: Result<Variation, _> = serde_json::from_str(
            r#"{"kind": "enum", "range": {"a": "first", "a": "again"}}"#,
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("duplicate enum key `a`"), "{}", message);
    }

    #[test]
    fn test_plural_defaults() {
        let segment: Segment = serde_json::from_value(json!(
            {"kind": "plural", "singularText": "cat", "reuseKey": "count"}
        ))
        .unwrap();
        match segment {
            Segment::Variation(v @ Variation::Plural { .. }) => {
                assert_eq!(v.reuse_key(), Some("count"));
                assert_eq!(v.kind_name(), "plural");
                if let Variation::Plural { show_count, many_text, token, .. } = v {
                    assert_eq!(show_count, ShowCount::No);
                    assert!(many_text.is_none());
                    assert!(token.is_none());
                }
            }
            other => panic!("expected plural segment, got {:?}", other),
        }
    }

    #[test]
    fn test_pronoun_from_json() {
        let segment: Segment = serde_json::from_value(json!(
            {"kind": "pronoun", "usage": "possessive", "human": true}
        ))
        .unwrap();
        assert_eq!(
            segment,
            Segment::Variation(Variation::Pronoun {
                usage: PronounUsage::Possessive,
                human: true,
                capitalize: false,
                reuse_key: None,
            })
        );
    }

    #[test]
    fn test_show_count_wire_names() {
        let value: ShowCount = serde_json::from_str("\"ifMany\"").unwrap();
        assert_eq!(value, ShowCount::IfMany);
        assert_eq!(serde_json::to_string(&ShowCount::Yes).unwrap(), "\"yes\"");
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result: Result<Segment, _> =
            serde_json::from_value(json!({"kind": "sarcasm", "token": "x"}));
        assert!(result.is_err());
    }
}
