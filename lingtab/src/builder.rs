//! Variation table builder
//!
//! Turns an ordered list of [`Segment`]s into a [`VariationTable`] and its
//! metadata. Every variation segment adds one level whose branches are the
//! values it can take; literal text accumulates along each path and becomes
//! the leaf at the end.
//!
//! # Reuse
//!
//! Two segments of the same kind with the same `reuseKey` stand for one
//! variable. The second occurrence adds no level: it appends the text of the
//! branch its first occurrence chose on the current path.
//!
//! ```text
//! ["A ", enum{a,b} as k, " or ", enum{a,b} as k]
//!   => {"a": "A a or a", "b": "A b or b"}        metadata [null]
//! ```

use crate::catalog::{EXACTLY_ONE, SUBJECT, VariationKind, WILDCARD};
use crate::error::{TableError, TableResult};
use crate::gender::pronoun_branches;
use crate::segment::{Segment, ShowCount, Variation};
use crate::table::{Leaf, MetaEntry, Metadata, Phrase, VariationTable, validate_metadata};
use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Token used by a plural that shows its count without naming one
pub const DEFAULT_PLURAL_TOKEN: &str = "number";

/// Options controlling table construction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Emit `{type}` / `{range}` entries for levels that otherwise have
    /// `null` metadata, for consumers that resolve tables without code
    pub flatten_metadata: bool,
    /// Keep whitespace in leaves exactly as written
    pub preserve_whitespace: bool,
}

/// A table together with the description of its levels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTable {
    pub table: VariationTable,
    pub metadata: Metadata,
}

/// Namespaces for reuse keys. Repeats are only recognised within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ReuseScope {
    Enum,
    Plural,
    Pronoun,
    Param,
}

impl ReuseScope {
    fn of(variation: &Variation) -> Self {
        match variation {
            Variation::Enum { .. } => ReuseScope::Enum,
            Variation::Plural { .. } => ReuseScope::Plural,
            Variation::Pronoun { .. } => ReuseScope::Pronoun,
            Variation::Subject { .. } | Variation::Gender { .. } | Variation::Number { .. } => {
                ReuseScope::Param
            }
        }
    }
}

type Bindings = HashMap<(ReuseScope, String), String>;

pub struct TableBuilder {
    options: BuildOptions,
    whitespace: Regex,
}

impl TableBuilder {
    pub fn new(options: BuildOptions) -> TableResult<Self> {
        Ok(TableBuilder {
            options,
            whitespace: Regex::new(r"[^\S\x{00A0}]+")?,
        })
    }

    /// Build the table and metadata for a segment list
    ///
    /// # Errors
    /// Fails on an enum with an empty range, on a repeated variable whose
    /// chosen branch is missing from a later occurrence, and if the built
    /// table disagrees with its metadata.
    pub fn build(&self, segments: &[Segment]) -> TableResult<BuiltTable> {
        let mut bindings = Bindings::new();
        let table = self.build_from(segments, 0, String::new(), &mut bindings)?;
        let metadata = self.metadata(segments);
        validate_metadata(&table, &metadata)?;

        tracing::debug!(
            segments = segments.len(),
            levels = metadata.len(),
            leaves = table.leaves().len(),
            "built variation table"
        );
        Ok(BuiltTable { table, metadata })
    }

    /// Build a phrase: `TEXT` when no segment varies, `TABLE` otherwise
    pub fn build_phrase(&self, segments: &[Segment]) -> TableResult<Phrase> {
        if !segments.iter().any(Segment::is_variation) {
            let text: String = segments
                .iter()
                .filter_map(|s| match s {
                    Segment::Literal(text) => Some(text.as_str()),
                    Segment::Variation(_) => None,
                })
                .collect();
            return Ok(Phrase::Text {
                pattern: self.normalize(&text),
            });
        }
        let BuiltTable { table, metadata } = self.build(segments)?;
        Ok(Phrase::Table { table, metadata })
    }

    /// Collapse whitespace runs (other than no-break spaces) to one space and
    /// trim, unless whitespace is preserved.
    pub fn normalize(&self, text: &str) -> String {
        if self.options.preserve_whitespace {
            return text.to_string();
        }
        self.whitespace.replace_all(text, " ").trim().to_string()
    }

    fn build_from(
        &self,
        segments: &[Segment],
        mut index: usize,
        mut prefix: String,
        bindings: &mut Bindings,
    ) -> TableResult<VariationTable> {
        while let Some(Segment::Literal(text)) = segments.get(index) {
            prefix.push_str(text);
            index += 1;
        }

        let Some(Segment::Variation(variation)) = segments.get(index) else {
            return Ok(VariationTable::Leaf(Leaf::new(self.normalize(&prefix))));
        };

        let branches = self.branches(variation)?;
        let binding = variation
            .reuse_key()
            .map(|key| (ReuseScope::of(variation), key.to_string()));

        if let Some(scope) = &binding {
            if let Some(chosen) = bindings.get(scope).cloned() {
                let (_, text) = branches
                    .iter()
                    .find(|(key, _)| *key == chosen)
                    .ok_or_else(|| TableError::IncompatibleReuse {
                        kind: variation.kind_name(),
                        reuse_key: scope.1.clone(),
                        key: chosen.clone(),
                        available: branches.iter().map(|(key, _)| key.clone()).collect(),
                    })?;
                tracing::trace!(reuse_key = %scope.1, key = %chosen, "reusing bound branch");
                prefix.push_str(text);
                return self.build_from(segments, index + 1, prefix, bindings);
            }
        }

        let mut children = BTreeMap::new();
        for (key, text) in branches {
            if let Some(scope) = &binding {
                bindings.insert(scope.clone(), key.clone());
            }
            let child = self.build_from(segments, index + 1, format!("{}{}", prefix, text), bindings);
            if let Some(scope) = &binding {
                bindings.remove(scope);
            }
            children.insert(key, child?);
        }
        Ok(VariationTable::Branch(children))
    }

    /// `(key, text)` pairs a variation expands into
    fn branches(&self, variation: &Variation) -> TableResult<Vec<(String, String)>> {
        let branches = match variation {
            Variation::Subject { .. } => vec![(WILDCARD.to_string(), String::new())],
            Variation::Gender { token, .. } | Variation::Number { token, .. } => {
                vec![(WILDCARD.to_string(), format!("{{{}}}", token))]
            }
            Variation::Plural {
                token,
                singular_text,
                many_text,
                show_count,
                ..
            } => {
                let token = token.as_deref().unwrap_or(DEFAULT_PLURAL_TOKEN);
                let many = many_text
                    .clone()
                    .unwrap_or_else(|| format!("{}s", singular_text));
                let many = match show_count {
                    ShowCount::No => many,
                    ShowCount::Yes | ShowCount::IfMany => format!("{{{}}} {}", token, many),
                };
                let singular = match show_count {
                    ShowCount::Yes => format!("1 {}", singular_text),
                    ShowCount::No | ShowCount::IfMany => singular_text.clone(),
                };
                vec![
                    (WILDCARD.to_string(), many),
                    (EXACTLY_ONE.to_string(), singular),
                ]
            }
            Variation::Pronoun {
                usage,
                human,
                capitalize,
                ..
            } => pronoun_branches(*usage, *human, *capitalize),
            Variation::Enum {
                range,
                token,
                reuse_key,
            } => {
                let name = || {
                    reuse_key
                        .clone()
                        .or_else(|| token.clone())
                        .unwrap_or_else(|| "enum".to_string())
                };
                if range.is_empty() {
                    return Err(TableError::EmptyEnumRange { reuse_key: name() });
                }
                let mut seen = HashSet::new();
                if let Some((key, _)) = range.iter().find(|(key, _)| !seen.insert(key.as_str())) {
                    return Err(TableError::DuplicateEnumKey {
                        reuse_key: name(),
                        key: key.clone(),
                    });
                }
                range.clone()
            }
        };
        Ok(branches)
    }

    /// One entry per level, in the order first occurrences appear
    fn metadata(&self, segments: &[Segment]) -> Metadata {
        let mut seen = HashSet::new();
        segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Variation(variation) => Some(variation),
                Segment::Literal(_) => None,
            })
            .filter(|variation| match variation.reuse_key() {
                Some(key) => seen.insert((ReuseScope::of(variation), key.to_string())),
                None => true,
            })
            .map(|variation| self.meta_entry(variation))
            .collect()
    }

    fn meta_entry(&self, variation: &Variation) -> Option<MetaEntry> {
        let flatten = self.options.flatten_metadata;
        match variation {
            Variation::Subject { .. } => Some(MetaEntry::variation(
                VariationKind::Gender,
                Some(SUBJECT.to_string()),
            )),
            Variation::Gender { token, .. } => Some(MetaEntry::variation(
                VariationKind::Gender,
                Some(token.clone()),
            )),
            Variation::Number { token, .. } => Some(MetaEntry::variation(
                VariationKind::Number,
                Some(token.clone()),
            )),
            Variation::Plural {
                token, show_count, ..
            } => match show_count {
                ShowCount::Yes | ShowCount::IfMany => Some(MetaEntry {
                    singular: true,
                    ..MetaEntry::variation(
                        VariationKind::Number,
                        Some(
                            token
                                .clone()
                                .unwrap_or_else(|| DEFAULT_PLURAL_TOKEN.to_string()),
                        ),
                    )
                }),
                ShowCount::No => {
                    flatten.then(|| MetaEntry::variation(VariationKind::Number, None))
                }
            },
            Variation::Pronoun { .. } => {
                flatten.then(|| MetaEntry::variation(VariationKind::Pronoun, None))
            }
            Variation::Enum { range, .. } => flatten.then(|| MetaEntry {
                range: Some(range.iter().map(|(key, _)| key.clone()).collect()),
                ..Default::default()
            }),
        }
    }
}
