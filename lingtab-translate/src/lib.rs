//! Per-locale reconstruction of lingtab variation tables
//!
//! A source site carries one hashed leaf per source variant. Translators
//! answer each hash with candidates tagged by the number and gender values
//! they were written for; this crate folds those candidates back into a table
//! shaped for one locale, keeping only branches that differ from their
//! wildcard fallback.
//!
//! # Workflow Example
//!
//! ```
//! use lingtab::{BuildOptions, LocaleVariationConfig, Segment, Selector, SourceSite, TableBuilder};
//! use lingtab_translate::{
//!     CandidateTranslation, TranslateOptions, TranslationBuilder, TranslationEntry, TranslationSet,
//! };
//!
//! // 1. Build and hash the source phrase
//! let segments: Vec<Segment> = serde_json::from_str(
//!     r#"[{"kind": "plural", "singularText": "cat", "showCount": "yes", "token": "n"}]"#,
//! )?;
//! let phrase = TableBuilder::new(BuildOptions::default())?.build_phrase(&segments)?;
//! let site = SourceSite::from_phrase(&phrase, "count of cats")?;
//!
//! // 2. Collect translations by leaf hash
//! let translations = TranslationSet::from_entries(vec![TranslationEntry::new(
//!     "2QxgVU",
//!     vec![CandidateTranslation::new("{n} chats").with_constraint("n", 24)],
//! )]);
//!
//! // 3. Rebuild for the locale
//! let fr = LocaleVariationConfig::for_locale("fr")?;
//! let translated = TranslationBuilder::new(&translations, &fr, &site, TranslateOptions::default())?
//!     .build()?;
//!
//! let leaf = translated.resolve(lingtab::GenderCategory::Unknown, &[Selector::number(3, &fr)])?;
//! assert_eq!(leaf.map(|l| l.text.as_str()), Some("{n} chats"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod constraint;
pub mod data;
pub mod error;


pub use builder::{TranslateOptions, TranslatedTable, TranslationBuilder, VIEWER_GENDER_FLAG};
pub use constraint::{ConstraintMap, build_constraint_key};
pub use data::{CandidateTranslation, TranslationEntry, TranslationSet};
pub use error::{TranslateError, TranslateResult};
