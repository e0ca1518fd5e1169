//! Runtime table access
//!
//! A table is read by walking it with one selector per level. A selector is
//! either a single key or an ordered list of candidate keys; candidates are
//! tried depth-first and the first path that reaches a leaf wins, so
//! `["4", "*"]` reads the ONE branch when present and the wildcard otherwise.

use crate::catalog::{EXACTLY_ONE, GenderCategory, WILDCARD};
use crate::error::{TableError, TableResult};
use crate::gender::{GenderConst, PronounUsage, pronoun_pivot_key};
use crate::locale::LocaleVariationConfig;
use crate::table::{Leaf, VariationTable};
use regex::Regex;
use std::collections::HashMap;

/// Key choice for one table level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Key(String),
    Candidates(Vec<String>),
}

impl Selector {
    pub fn key(key: impl Into<String>) -> Self {
        Selector::Key(key.into())
    }

    pub fn candidates<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::Candidates(keys.into_iter().map(Into::into).collect())
    }

    /// Selector for a count: exactly-one first when the count is 1, then the
    /// locale's plural category, then the wildcard.
    pub fn number(count: usize, config: &LocaleVariationConfig) -> Self {
        let category = config.number_category_for(count).value().to_string();
        if count == 1 {
            Selector::candidates([EXACTLY_ONE.to_string(), category, WILDCARD.to_string()])
        } else {
            Selector::candidates([category, WILDCARD.to_string()])
        }
    }

    pub fn gender(gender: GenderCategory) -> Self {
        Selector::candidates([gender.value().to_string(), WILDCARD.to_string()])
    }

    pub fn pronoun(usage: PronounUsage, gender: GenderConst) -> Self {
        Selector::candidates([pronoun_pivot_key(usage, gender), WILDCARD.to_string()])
    }

    fn keys(&self) -> &[String] {
        match self {
            Selector::Key(key) => std::slice::from_ref(key),
            Selector::Candidates(keys) => keys,
        }
    }
}

pub struct TableAccessor;

impl TableAccessor {
    /// Walk `table` with one selector per level.
    ///
    /// Returns `Ok(None)` when no candidate path exists.
    ///
    /// # Errors
    /// [`TableError::Access`] when the selectors run out above the leaves or
    /// a leaf is reached with selectors left over.
    pub fn resolve<'a>(
        table: &'a VariationTable,
        selectors: &[Selector],
    ) -> TableResult<Option<&'a Leaf>> {
        match (table, selectors.split_first()) {
            (VariationTable::Leaf(leaf), None) => Ok(Some(leaf)),
            (VariationTable::Leaf(_), Some(_)) => Err(TableError::Access(format!(
                "reached a leaf with {} selector(s) left",
                selectors.len()
            ))),
            (VariationTable::Branch(_), None) => Err(TableError::Access(
                "ran out of selectors before reaching a leaf".to_string(),
            )),
            (VariationTable::Branch(children), Some((selector, rest))) => {
                for key in selector.keys() {
                    let Some(child) = children.get(key) else {
                        continue;
                    };
                    if let Some(leaf) = Self::resolve(child, rest)? {
                        tracing::trace!(key = %key, "selected branch");
                        return Ok(Some(leaf));
                    }
                }
                Ok(None)
            }
        }
    }
}

/// Fills `{token}` placeholders of a resolved pattern
#[derive(Debug, Clone)]
pub struct TokenSubstituter {
    placeholder: Regex,
}

impl TokenSubstituter {
    pub fn new() -> TableResult<Self> {
        Ok(TokenSubstituter {
            placeholder: Regex::new(r"\{([^}]+)\}")?,
        })
    }

    /// Replace `{token}` placeholders with argument values. Unknown tokens
    /// are left in place.
    pub fn substitute(&self, pattern: &str, args: &HashMap<String, String>) -> String {
        self.placeholder
            .replace_all(pattern, |caps: &regex::Captures| {
                args.get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}
