//! Per-locale table reconstruction
//!
//! [`TranslationBuilder`] rebuilds a source table for one locale. The source
//! table only has wildcard branches on its gender and number levels; the
//! translated table adds a branch for every category of the locale whose
//! translation differs from the wildcard one.
//!
//! # Viewer gender
//!
//! Translators may vary a string on the gender of the person reading it even
//! when the source does not. If any candidate is constrained on the
//! `__viewing_user__` token, the whole table is wrapped in an extra gender
//! level and the output is flagged with `"__vcg": 1` so readers know to select
//! that level with the viewer's gender first.

use crate::constraint::{ConstraintMap, ConstraintPairs, TokenAxes};
use crate::data::TranslationSet;
use crate::error::{TranslateError, TranslateResult};
use lingtab::{
    Axis, CategoryValue, EXACTLY_ONE, GenderCategory, Leaf, LocaleVariationConfig, MetaEntry,
    Metadata, Selector, SourceSite, TableAccessor, TableResult, VIEWING_USER, VariationCatalog,
    VariationKind, VariationTable, WILDCARD, validate_metadata,
};
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Key flagging a table with a hidden viewer-gender level
pub const VIEWER_GENDER_FLAG: &str = "__vcg";

/// Options for translated output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Emit leaves as `[text, hash]` so impressions can be attributed
    pub include_hash: bool,
}

/// Token to value constraints accumulated on the way down the table
type Constraints = BTreeMap<String, String>;

pub struct TranslationBuilder<'a> {
    translations: &'a TranslationSet,
    config: &'a LocaleVariationConfig,
    site: &'a SourceSite,
    options: TranslateOptions,
    table: VariationTable,
    metadata: Metadata,
    token_axes: TokenAxes,
    viewer_gender: bool,
    has_translations: bool,
    constraint_maps: RefCell<HashMap<String, Rc<ConstraintMap>>>,
}

impl<'a> TranslationBuilder<'a> {
    /// Prepare to translate `site` into the locale described by `config`.
    ///
    /// # Errors
    /// Fails when the site's metadata does not describe its table.
    pub fn new(
        translations: &'a TranslationSet,
        config: &'a LocaleVariationConfig,
        site: &'a SourceSite,
        options: TranslateOptions,
    ) -> TranslateResult<Self> {
        validate_metadata(&site.table, &site.metadata)?;

        let viewer_gender = site.hash_to_leaf.keys().any(|hash| {
            translations
                .get(hash)
                .is_some_and(|entry| entry.tokens().any(|token| token == VIEWING_USER))
        });
        let has_translations = site
            .hash_to_leaf
            .keys()
            .any(|hash| translations.get(hash).is_some_and(|e| e.has_translation()));

        let (table, metadata) = if viewer_gender {
            let mut metadata = Vec::with_capacity(site.metadata.len() + 1);
            metadata.push(Some(MetaEntry::variation(
                VariationKind::Gender,
                Some(VIEWING_USER.to_string()),
            )));
            metadata.extend(site.metadata.iter().cloned());
            let table =
                VariationTable::Branch(BTreeMap::from([(WILDCARD.to_string(), site.table.clone())]));
            (table, metadata)
        } else {
            (site.table.clone(), site.metadata.clone())
        };

        let mut token_axes = TokenAxes::new();
        for (level, entry) in metadata.iter().enumerate() {
            if let Some((token, axis)) = level_variation(level, entry.as_ref())? {
                match token_axes.iter_mut().find(|(t, _)| *t == token) {
                    Some(existing) => existing.1 = axis,
                    None => token_axes.push((token, axis)),
                }
            }
        }

        tracing::debug!(
            site = %site.hash,
            locale = config.locale(),
            viewer_gender,
            has_translations,
            tokens = ?token_axes,
            "prepared translation builder"
        );

        Ok(TranslationBuilder {
            translations,
            config,
            site,
            options,
            table,
            metadata,
            token_axes,
            viewer_gender,
            has_translations,
            constraint_maps: RefCell::new(HashMap::new()),
        })
    }

    /// Whether any leaf of the site has a translation in this locale
    pub fn has_translations(&self) -> bool {
        self.has_translations
    }

    pub fn has_viewer_gender(&self) -> bool {
        self.viewer_gender
    }

    /// Rebuild the table for the locale
    pub fn build(&self) -> TranslateResult<TranslatedTable> {
        let table = self
            .build_level(&self.table, &Constraints::new(), 0)?
            .unwrap_or_else(|| VariationTable::Branch(BTreeMap::new()));
        tracing::debug!(
            site = %self.site.hash,
            locale = self.config.locale(),
            leaves = table.leaves().len(),
            "built translated table"
        );
        Ok(TranslatedTable {
            table,
            viewer_gender: self.viewer_gender,
        })
    }

    /// `None` means nothing worth storing under this key
    fn build_level(
        &self,
        node: &VariationTable,
        constraints: &Constraints,
        level: usize,
    ) -> TranslateResult<Option<VariationTable>> {
        let children = match node {
            VariationTable::Leaf(leaf) => return self.leaf_translation(leaf, constraints),
            VariationTable::Branch(children) => children,
        };

        let variation = match self.metadata.get(level) {
            Some(entry) => level_variation(level, entry.as_ref())?,
            None => None,
        };

        // a source `_1` branch already holds the exactly-one form
        let has_exactly_one = children.contains_key(EXACTLY_ONE);

        let mut out = BTreeMap::new();
        for (key, child) in children {
            if let Some(translated) = self.build_level(child, constraints, level + 1)? {
                out.insert(key.clone(), translated);
            }

            let Some((token, axis)) = &variation else {
                continue;
            };
            if key == EXACTLY_ONE {
                continue;
            }
            if !VariationCatalog::is_valid_value(key) {
                return Err(TranslateError::InvalidKey {
                    level,
                    key: key.clone(),
                });
            }
            for category in self.config.categories_for(*axis) {
                if category == CategoryValue::ExactlyOne && has_exactly_one {
                    continue;
                }
                let mut constrained = constraints.clone();
                constrained.insert(token.clone(), category.key());
                if let Some(translated) = self.build_level(child, &constrained, level + 1)? {
                    tracing::trace!(level, token = %token, category = %category, "storing category branch");
                    out.insert(category.key(), translated);
                }
            }
        }

        Ok((!out.is_empty()).then_some(VariationTable::Branch(out)))
    }

    fn leaf_translation(
        &self,
        leaf: &Leaf,
        constraints: &Constraints,
    ) -> TranslateResult<Option<VariationTable>> {
        let hash = leaf
            .hash
            .as_deref()
            .ok_or_else(|| TranslateError::UnhashedLeaf {
                text: leaf.text.clone(),
            })?;

        let text = if constraints.is_empty() {
            let translated = self
                .translations
                .get(hash)
                .and_then(|entry| entry.default_translation(self.config));
            let text = translated
                .or_else(|| self.site.source_text(hash))
                .unwrap_or(&leaf.text);
            Some(text.to_string())
        } else {
            self.constrained_translation(hash, constraints)
        };

        Ok(text.map(|text| {
            VariationTable::Leaf(Leaf {
                text,
                hash: self.options.include_hash.then(|| hash.to_string()),
            })
        }))
    }

    /// Translation for a fully specified constraint combination, or `None`
    /// when it is missing or identical to the combination with any one
    /// constraint relaxed to the wildcard.
    fn constrained_translation(&self, hash: &str, constraints: &Constraints) -> Option<String> {
        let pairs: ConstraintPairs = self
            .token_axes
            .iter()
            .map(|(token, _)| {
                let value = constraints
                    .get(token)
                    .cloned()
                    .unwrap_or_else(|| WILDCARD.to_string());
                (token.clone(), value)
            })
            .collect();

        let map = self.constraint_map(hash);
        let translation = map.get(&pairs).filter(|text| !text.is_empty())?;

        for index in 0..pairs.len() {
            if pairs[index].1 == WILDCARD {
                continue;
            }
            let mut relaxed = pairs.clone();
            relaxed[index].1 = WILDCARD.to_string();
            if map.get(&relaxed) == Some(translation) {
                return None;
            }
        }
        Some(translation.to_string())
    }

    fn constraint_map(&self, hash: &str) -> Rc<ConstraintMap> {
        if let Some(map) = self.constraint_maps.borrow().get(hash) {
            return Rc::clone(map);
        }
        let map = Rc::new(ConstraintMap::from_entry(
            self.translations.get(hash),
            &self.token_axes,
            self.config,
        ));
        self.constraint_maps
            .borrow_mut()
            .insert(hash.to_string(), Rc::clone(&map));
        map
    }
}

/// Token and axis a level varies on, if it varies on one
fn level_variation(level: usize, entry: Option<&MetaEntry>) -> TranslateResult<Option<(String, Axis)>> {
    let Some(entry) = entry else {
        return Ok(None);
    };
    let Some(mask) = entry.kind.and_then(VariationCatalog::mask_of) else {
        return Ok(None);
    };
    let axis = VariationCatalog::axis_of_mask(mask)?;
    match (&entry.token, axis) {
        (Some(token), _) => Ok(Some((token.clone(), axis))),
        // flattened plurals without a shown count
        (None, Axis::Number) => Ok(None),
        (None, Axis::Gender) => Err(TranslateError::InvalidMetadata {
            level,
            reason: "gender level without a token".to_string(),
        }),
    }
}

/// A table rebuilt for one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedTable {
    pub table: VariationTable,
    /// The first level selects on the viewer's gender
    pub viewer_gender: bool,
}

impl TranslatedTable {
    /// Resolve with the viewer's gender prepended when the table has a
    /// viewer-gender level.
    pub fn resolve(
        &self,
        viewer: GenderCategory,
        selectors: &[Selector],
    ) -> TableResult<Option<&Leaf>> {
        if !self.viewer_gender {
            return TableAccessor::resolve(&self.table, selectors);
        }
        let mut all = Vec::with_capacity(selectors.len() + 1);
        all.push(Selector::gender(viewer));
        all.extend(selectors.iter().cloned());
        TableAccessor::resolve(&self.table, &all)
    }
}

impl Serialize for TranslatedTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (&self.table, self.viewer_gender) {
            (VariationTable::Branch(children), true) => {
                let mut map = serializer.serialize_map(Some(children.len() + 1))?;
                for (key, child) in children {
                    map.serialize_entry(key, child)?;
                }
                map.serialize_entry(VIEWER_GENDER_FLAG, &1)?;
                map.end()
            }
            _ => self.table.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for TranslatedTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = serde_json::Value::deserialize(deserializer)?;
        let viewer_gender = value
            .as_object_mut()
            .and_then(|object| object.remove(VIEWER_GENDER_FLAG))
            .is_some();
        let table = serde_json::from_value(value).map_err(D::Error::custom)?;
        Ok(TranslatedTable {
            table,
            viewer_gender,
        })
    }
}
