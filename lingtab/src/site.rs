//! Source sites
//!
//! A [`SourceSite`] is a built phrase prepared for translation: every leaf is
//! paired with the hash translators key their work on, and a reverse index
//! maps each hash back to its source text and description.

use crate::error::TableResult;
use crate::hash::{ContentHasher, HashPayload};
use crate::table::{Leaf, Metadata, Phrase, VariationTable, validate_metadata};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Source text of one leaf and the description it was hashed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafSource {
    pub text: String,
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSite {
    /// Hash of the whole phrase
    pub hash: String,
    /// The phrase's table with every leaf as `[text, hash]`
    pub table: VariationTable,
    pub metadata: Metadata,
    pub hash_to_leaf: BTreeMap<String, LeafSource>,
}

impl SourceSite {
    /// Hash every leaf of a phrase. A `TEXT` phrase becomes a site with a
    /// single leaf and no levels.
    pub fn from_phrase(phrase: &Phrase, desc: &str) -> TableResult<Self> {
        let (table, metadata, hash) = match phrase {
            Phrase::Text { pattern } => (
                VariationTable::leaf(pattern.clone()),
                Metadata::new(),
                ContentHasher::hash_key(HashPayload::Text(pattern), desc)?,
            ),
            Phrase::Table { table, metadata } => {
                validate_metadata(table, metadata)?;
                (
                    table.clone(),
                    metadata.clone(),
                    ContentHasher::hash_key(HashPayload::Table(table), desc)?,
                )
            }
        };

        let mut hash_to_leaf = BTreeMap::new();
        let table = table.try_map_leaves(&mut |leaf| {
            let leaf_hash = ContentHasher::hash_key(HashPayload::Text(&leaf.text), desc)?;
            hash_to_leaf.insert(
                leaf_hash.clone(),
                LeafSource {
                    text: leaf.text.clone(),
                    desc: desc.to_string(),
                },
            );
            Ok(Leaf::with_hash(leaf.text.clone(), leaf_hash))
        })?;

        tracing::debug!(hash = %hash, leaves = hash_to_leaf.len(), "hashed source site");
        Ok(SourceSite {
            hash,
            table,
            metadata,
            hash_to_leaf,
        })
    }

    /// Source text for a leaf hash
    pub fn source_text(&self, hash: &str) -> Option<&str> {
        self.hash_to_leaf.get(hash).map(|leaf| leaf.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildOptions, TableBuilder};
    use crate::segment::Segment;
    use serde_json::json;

    #[test]
    fn test_text_phrase_site() {
        let phrase = Phrase::Text {
            pattern: "Hello".to_string(),
        };
        let site = SourceSite::from_phrase(&phrase, "greeting").unwrap();
        assert_eq!(site.hash, "3LN0EW");
        assert!(site.metadata.is_empty());
        assert_eq!(site.table, VariationTable::Leaf(Leaf::with_hash("Hello", "3LN0EW")));
        assert_eq!(site.source_text("3LN0EW"), Some("Hello"));
    }

    #[test]
    fn test_table_phrase_site() {
        let segments: Vec<Segment> = serde_json::from_value(json!([
            {"kind": "plural", "singularText": "cat", "showCount": "yes", "token": "n"}
        ]))
        .unwrap();
        let phrase = TableBuilder::new(BuildOptions::default())
            .unwrap()
            .build_phrase(&segments)
            .unwrap();
        let site = SourceSite::from_phrase(&phrase, "count of cats").unwrap();

        assert_eq!(
            serde_json::to_value(&site.table).unwrap(),
            json!({"*": ["{n} cats", "2QxgVU"], "_1": ["1 cat", "2gNqJw"]})
        );
        assert_eq!(site.hash_to_leaf.len(), 2);
        assert_eq!(site.source_text("2gNqJw"), Some("1 cat"));
        assert_eq!(site.metadata.len(), 1);
    }

    #[test]
    fn test_identical_leaves_share_a_hash() {
        let phrase: Phrase = serde_json::from_value(json!({
            "type": "TABLE",
            "table": {"*": "Hi", "1": "Hi", "2": "Hey"},
            "metadata": [{"type": 1, "token": "g"}]
        }))
        .unwrap();
        let site = SourceSite::from_phrase(&phrase, "d").unwrap();
        assert_eq!(site.hash_to_leaf.len(), 2);
    }

    #[test]
    fn test_site_rejects_inconsistent_metadata() {
        let phrase: Phrase = serde_json::from_value(json!({
            "type": "TABLE",
            "table": {"*": "Hi"},
            "metadata": []
        }))
        .unwrap();
        assert!(SourceSite::from_phrase(&phrase, "d").is_err());
    }

    #[test]
    fn test_site_wire_form() {
        let site = SourceSite::from_phrase(
            &Phrase::Text {
                pattern: "Hello".to_string(),
            },
            "greeting",
        )
        .unwrap();
        let value = serde_json::to_value(&site).unwrap();
        assert_eq!(
            value["hashToLeaf"]["3LN0EW"],
            json!({"text": "Hello", "desc": "greeting"})
        );
        let back: SourceSite = serde_json::from_value(value).unwrap();
        assert_eq!(back, site);
    }
}
