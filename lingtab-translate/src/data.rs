//! Translation data
//!
//! Translators answer a source leaf (identified by its hash) with one or more
//! candidate translations. Each candidate lists the variation values it was
//! written for, keyed by token:
//!
//! ```json
//! {"hash": "2QxgVU",
//!  "candidateTranslations": [
//!    {"text": "{n} chats", "constraints": {"n": 24}},
//!    {"text": "{n} chat", "constraints": {"n": 4}}
//!  ]}
//! ```
//!
//! Constraint values are variation values and may be written as numbers or
//! strings.

use lingtab::LocaleVariationConfig;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One translation and the variation values it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateTranslation {
    pub text: String,
    #[serde(default, deserialize_with = "constraint_values")]
    pub constraints: BTreeMap<String, String>,
}

impl CandidateTranslation {
    pub fn new(text: impl Into<String>) -> Self {
        CandidateTranslation {
            text: text.into(),
            constraints: BTreeMap::new(),
        }
    }

    pub fn with_constraint(mut self, token: impl Into<String>, value: impl ToString) -> Self {
        self.constraints.insert(token.into(), value.to_string());
        self
    }

    /// Whether every constraint is a fallback value in `config`
    pub fn is_default(&self, config: &LocaleVariationConfig) -> bool {
        self.constraints
            .values()
            .all(|value| config.is_default_category(value))
    }
}

/// All candidates for one source hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    pub hash: String,
    #[serde(default)]
    pub candidate_translations: Vec<CandidateTranslation>,
}

impl TranslationEntry {
    pub fn new(hash: impl Into<String>, candidates: Vec<CandidateTranslation>) -> Self {
        TranslationEntry {
            hash: hash.into(),
            candidate_translations: candidates,
        }
    }

    /// First candidate whose constraints are all fallback values
    pub fn default_translation(&self, config: &LocaleVariationConfig) -> Option<&str> {
        self.candidate_translations
            .iter()
            .find(|candidate| candidate.is_default(config))
            .map(|candidate| candidate.text.as_str())
    }

    pub fn has_translation(&self) -> bool {
        !self.candidate_translations.is_empty()
    }

    /// Tokens constrained by any candidate
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.candidate_translations
            .iter()
            .flat_map(|candidate| candidate.constraints.keys())
            .map(String::as_str)
    }
}

/// Translations of one locale, keyed by source hash
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSet {
    entries: HashMap<String, TranslationEntry>,
}

impl TranslationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index entries by hash. A later entry for the same hash replaces an
    /// earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = TranslationEntry>) -> Self {
        let mut set = TranslationSet::new();
        for entry in entries {
            set.insert(entry);
        }
        set
    }

    pub fn insert(&mut self, entry: TranslationEntry) {
        if self.entries.contains_key(&entry.hash) {
            tracing::warn!(hash = %entry.hash, "replacing duplicate translation entry");
        }
        self.entries.insert(entry.hash.clone(), entry);
    }

    pub fn get(&self, hash: &str) -> Option<&TranslationEntry> {
        self.entries.get(hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn constraint_values<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawValue {
        Number(u64),
        Text(String),
    }

    let raw = BTreeMap::<String, RawValue>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(token, value)| {
            let value = match value {
                RawValue::Number(n) => n.to_string(),
                RawValue::Text(s) => s,
            };
            (token, value)
        })
        .collect())
}
