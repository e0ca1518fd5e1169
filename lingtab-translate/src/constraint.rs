//! Constraint maps
//!
//! For one source hash, a [`ConstraintMap`] maps every combination of
//! variation values the translator covered to its translation. Keys list the
//! varying tokens in table level order as `token%value`, joined by `:`, with
//! `*` for an unconstrained token:
//!
//! ```text
//! user%*:count%*    default gender, default number
//! user%2:count%4    female, ONE
//! ```
//!
//! A candidate written for a fallback value (UNKNOWN gender, OTHER number) is
//! also reachable with `*` in that position, so a lookup with an unconstrained
//! token finds it.

use crate::data::TranslationEntry;
use lingtab::{Axis, LocaleVariationConfig, VariationCatalog, WILDCARD};
use std::collections::HashMap;

/// Varying tokens of a table in level order, with the axis each varies on
pub type TokenAxes = Vec<(String, Axis)>;

/// `(token, value)` pairs in [`TokenAxes`] order
pub type ConstraintPairs = Vec<(String, String)>;

/// Join pairs into a constraint key, e.g. `user%2:count%24`
pub fn build_constraint_key(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(token, value)| format!("{}%{}", token, value))
        .collect::<Vec<_>>()
        .join(":")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintMap {
    entries: HashMap<String, String>,
}

impl ConstraintMap {
    /// Index the candidates of one translation entry.
    ///
    /// Candidates that pin a token the table does not vary on (or pin it to
    /// a value of the wrong axis) are dropped unless the pinned value is a
    /// fallback. When two candidates claim the same key the first one wins.
    pub fn from_entry(
        entry: Option<&TranslationEntry>,
        token_axes: &[(String, Axis)],
        config: &LocaleVariationConfig,
    ) -> Self {
        let mut map = ConstraintMap::default();
        let Some(entry) = entry else {
            return map;
        };

        let mut accepted = Vec::new();
        for candidate in &entry.candidate_translations {
            let mismatched = candidate.constraints.iter().find(|(token, value)| {
                let expected = token_axes
                    .iter()
                    .find(|(varying, _)| varying == *token)
                    .map(|(_, axis)| *axis);
                let fits = match expected {
                    Some(axis) => {
                        value.as_str() == WILDCARD
                            || VariationCatalog::axis_of_value(value) == Some(axis)
                    }
                    None => false,
                };
                !fits && !config.is_default_category(value)
            });
            if let Some((token, value)) = mismatched {
                tracing::trace!(
                    hash = %entry.hash,
                    token = %token,
                    value = %value,
                    "dropping candidate for a token the table does not vary on"
                );
                continue;
            }

            let pairs: ConstraintPairs = token_axes
                .iter()
                .map(|(token, _)| {
                    let value = candidate
                        .constraints
                        .get(token)
                        .cloned()
                        .unwrap_or_else(|| WILDCARD.to_string());
                    (token.clone(), value)
                })
                .collect();
            accepted.push((pairs, candidate.text.as_str()));
        }

        for (pairs, text) in &accepted {
            let key = build_constraint_key(pairs);
            if let Some(existing) = map.entries.get(&key) {
                tracing::warn!(
                    hash = %entry.hash,
                    key = %key,
                    kept = %existing,
                    dropped = %text,
                    "duplicate constraint key in translation"
                );
                continue;
            }
            map.entries.insert(key, text.to_string());
        }
        for (pairs, text) in &accepted {
            let mut pairs = pairs.clone();
            map.insert_default_aliases(&mut pairs, text, 0, config);
        }
        map
    }

    /// Make a translation reachable with `*` in place of each fallback value
    /// from `level` on, in every combination.
    fn insert_default_aliases(
        &mut self,
        pairs: &mut ConstraintPairs,
        text: &str,
        level: usize,
        config: &LocaleVariationConfig,
    ) {
        for index in level..pairs.len() {
            let value = pairs[index].1.clone();
            if value == WILDCARD || !config.is_default_category(&value) {
                continue;
            }
            pairs[index].1 = WILDCARD.to_string();
            self.entries
                .entry(build_constraint_key(pairs))
                .or_insert_with(|| text.to_string());
            self.insert_default_aliases(pairs, text, index + 1, config);
            pairs[index].1 = value;
        }
    }

    pub fn get(&self, pairs: &[(String, String)]) -> Option<&str> {
        self.entries
            .get(&build_constraint_key(pairs))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
