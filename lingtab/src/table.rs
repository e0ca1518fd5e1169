//! Variation tables, metadata and phrases
//!
//! A [`VariationTable`] is a tree whose branches are keyed by selector keys
//! and whose leaves are text patterns. Every path from the root to a leaf has
//! the same length, and a parallel metadata array describes each level:
//!
//! ```json
//! {"type": "TABLE",
//!  "table": {"*": "{n} cats", "_1": "1 cat"},
//!  "metadata": [{"type": 2, "token": "n", "singular": true}]}
//! ```

use crate::catalog::VariationKind;
use crate::error::{TableError, TableResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// A text pattern with `{token}` placeholders, optionally paired with the
/// hash that identifies it for translation.
///
/// Serialized as a bare string, or as `[text, hash]` when hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub text: String,
    pub hash: Option<String>,
}

impl Leaf {
    pub fn new(text: impl Into<String>) -> Self {
        Leaf {
            text: text.into(),
            hash: None,
        }
    }

    pub fn with_hash(text: impl Into<String>, hash: impl Into<String>) -> Self {
        Leaf {
            text: text.into(),
            hash: Some(hash.into()),
        }
    }
}

impl Serialize for Leaf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.hash {
            None => serializer.serialize_str(&self.text),
            Some(hash) => (&self.text, hash).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Leaf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum LeafRepr {
            Text(String),
            Hashed(String, String),
        }

        Ok(match LeafRepr::deserialize(deserializer)? {
            LeafRepr::Text(text) => Leaf::new(text),
            LeafRepr::Hashed(text, hash) => Leaf::with_hash(text, hash),
        })
    }
}

/// A node of a variation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariationTable {
    Leaf(Leaf),
    Branch(BTreeMap<String, VariationTable>),
}

impl VariationTable {
    pub fn leaf(text: impl Into<String>) -> Self {
        VariationTable::Leaf(Leaf::new(text))
    }

    /// Number of levels above the leaves, or `None` if paths differ in length
    pub fn depth(&self) -> Option<usize> {
        match self {
            VariationTable::Leaf(_) => Some(0),
            VariationTable::Branch(children) => {
                let mut depths = children.values().map(VariationTable::depth);
                let first = depths.next().unwrap_or(Some(0))?;
                for depth in depths {
                    if depth? != first {
                        return None;
                    }
                }
                Some(first + 1)
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, VariationTable::Branch(children) if children.is_empty())
    }

    /// Rebuild the table with every leaf transformed by `f`
    pub fn try_map_leaves<F>(&self, f: &mut F) -> TableResult<VariationTable>
    where
        F: FnMut(&Leaf) -> TableResult<Leaf>,
    {
        match self {
            VariationTable::Leaf(leaf) => Ok(VariationTable::Leaf(f(leaf)?)),
            VariationTable::Branch(children) => {
                let mut mapped = BTreeMap::new();
                for (key, child) in children {
                    mapped.insert(key.clone(), child.try_map_leaves(f)?);
                }
                Ok(VariationTable::Branch(mapped))
            }
        }
    }

    /// All leaves in key order
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Leaf>) {
        match self {
            VariationTable::Leaf(leaf) => out.push(leaf),
            VariationTable::Branch(children) => {
                for child in children.values() {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

/// Description of one table level. Levels with nothing to describe are
/// stored as `null` in the metadata array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaEntry {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<VariationKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<String>>,
    /// The level has an exactly-one (`_1`) branch
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub singular: bool,
}

impl MetaEntry {
    pub fn variation(kind: VariationKind, token: Option<String>) -> Self {
        MetaEntry {
            kind: Some(kind),
            token,
            ..Default::default()
        }
    }
}

pub type Metadata = Vec<Option<MetaEntry>>;

/// Check that a metadata array describes a table.
///
/// The table must have uniform depth equal to the metadata length, gender
/// levels must name their token and pronoun levels must not.
pub fn validate_metadata(table: &VariationTable, metadata: &Metadata) -> TableResult<()> {
    let depth = table.depth().ok_or_else(|| TableError::InvalidMetadata {
        level: 0,
        reason: "table has leaves at different depths".to_string(),
    })?;
    if depth != metadata.len() {
        return Err(TableError::DepthMismatch {
            metadata: metadata.len(),
            depth,
        });
    }

    for (level, entry) in metadata.iter().enumerate() {
        let Some(entry) = entry else { continue };
        match entry.kind {
            Some(VariationKind::Gender) if entry.token.is_none() => {
                return Err(TableError::InvalidMetadata {
                    level,
                    reason: "gender level without a token".to_string(),
                });
            }
            Some(VariationKind::Pronoun) if entry.token.is_some() => {
                return Err(TableError::InvalidMetadata {
                    level,
                    reason: "pronoun level must not carry a token".to_string(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// A built phrase: plain text, or a table with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Phrase {
    #[serde(rename = "TEXT")]
    Text { pattern: String },
    #[serde(rename = "TABLE")]
    Table {
        table: VariationTable,
        metadata: Metadata,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_serialization() {
        assert_eq!(serde_json::to_value(Leaf::new("hi")).unwrap(), json!("hi"));
        assert_eq!(
            serde_json::to_value(Leaf::with_hash("hi", "3xk")).unwrap(),
            json!(["hi", "3xk"])
        );
        let leaf: Leaf = serde_json::from_value(json!(["hi", "3xk"])).unwrap();
        assert_eq!(leaf.hash.as_deref(), Some("3xk"));
    }

    #[test]
    fn test_table_from_json() {
        let table: VariationTable = serde_json::from_value(json!({
            "*": {"*": "a", "1": "b"},
            "2": {"*": ["c", "h1"], "1": "d"}
        }))
        .unwrap();
        assert_eq!(table.depth(), Some(2));
        assert_eq!(table.leaves().len(), 4);
        assert_eq!(table.leaves()[2], &Leaf::with_hash("c", "h1"));
    }

    #[test]
    fn test_ragged_depth() {
        let table: VariationTable = serde_json::from_value(json!({
            "*": "a",
            "1": {"*": "b"}
        }))
        .unwrap();
        assert_eq!(table.depth(), None);
    }

    #[test]
    fn test_branch_keys_serialize_sorted() {
        let table: VariationTable =
            serde_json::from_value(json!({"photos": "p", "_1": "x", "*": "y", "groups": "g"}))
                .unwrap();
        assert_eq!(
            serde_json::to_string(&table).unwrap(),
            r#"{"*":"y","_1":"x","groups":"g","photos":"p"}"#
        );
    }

    #[test]
    fn test_metadata_wire_form() {
        let metadata: Metadata = vec![
            None,
            Some(MetaEntry {
                kind: Some(VariationKind::Number),
                token: Some("n".to_string()),
                range: None,
                singular: true,
            }),
            Some(MetaEntry {
                range: Some(vec!["a".to_string(), "b".to_string()]),
                ..Default::default()
            }),
        ];
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            json!([null, {"type": 2, "token": "n", "singular": true}, {"range": ["a", "b"]}])
        );
    }

    #[test]
    fn test_phrase_wire_form() {
        let phrase: Phrase =
            serde_json::from_value(json!({"type": "TEXT", "pattern": "Hello"})).unwrap();
        assert_eq!(phrase, Phrase::Text { pattern: "Hello".to_string() });

        let phrase = Phrase::Table {
            table: VariationTable::leaf("x"),
            metadata: vec![],
        };
        assert_eq!(
            serde_json::to_value(&phrase).unwrap(),
            json!({"type": "TABLE", "table": "x", "metadata": []})
        );
    }

    #[test]
    fn test_validate_metadata() {
        let table: VariationTable = serde_json::from_value(json!({"*": "a", "1": "b"})).unwrap();
        let gender = Some(MetaEntry::variation(VariationKind::Gender, Some("g".to_string())));
        assert!(validate_metadata(&table, &vec![gender.clone()]).is_ok());
        assert!(validate_metadata(&table, &vec![None]).is_ok());

        assert!(matches!(
            validate_metadata(&table, &vec![gender.clone(), None]),
            Err(TableError::DepthMismatch { metadata: 2, depth: 1 })
        ));
        assert!(matches!(
            validate_metadata(&table, &vec![Some(MetaEntry::variation(VariationKind::Gender, None))]),
            Err(TableError::InvalidMetadata { level: 0, .. })
        ));
        assert!(matches!(
            validate_metadata(
                &table,
                &vec![Some(MetaEntry::variation(VariationKind::Pronoun, Some("p".to_string())))]
            ),
            Err(TableError::InvalidMetadata { level: 0, .. })
        ));
    }

    #[test]
    fn test_try_map_leaves() {
        let table: VariationTable = serde_json::from_value(json!({"a": "x", "b": "y"})).unwrap();
        let upper = table
            .try_map_leaves(&mut |leaf| Ok(Leaf::new(leaf.text.to_uppercase())))
            .unwrap();
        assert_eq!(serde_json::to_value(&upper).unwrap(), json!({"a": "X", "b": "Y"}));
    }
}
