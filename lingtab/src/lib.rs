//! Variation tables for strings that vary by number, gender, pronoun and enum
//!
//! A phrase such as "You have 1 photo / You have 3 photos" is described as an
//! ordered list of [`Segment`]s. The [`TableBuilder`] turns that list into a
//! nested [`VariationTable`] with one level per variable, and
//! [`TableAccessor`] reads it back at runtime with per-level fallback.
//!
//! # Example
//!
//! ```
//! use lingtab::{BuildOptions, LocaleVariationConfig, Segment, Selector, TableAccessor, TableBuilder};
//!
//! let segments: Vec<Segment> = serde_json::from_str(
//!     r#"[{"kind": "plural", "singularText": "cat", "showCount": "yes", "token": "n"}]"#,
//! )?;
//! let built = TableBuilder::new(BuildOptions::default())?.build(&segments)?;
//!
//! let en = LocaleVariationConfig::for_locale("en")?;
//! let leaf = TableAccessor::resolve(&built.table, &[Selector::number(1, &en)])?;
//! assert_eq!(leaf.map(|l| l.text.as_str()), Some("1 cat"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod accessor;
pub mod builder;
pub mod catalog;
pub mod error;
pub mod gender;
pub mod hash;
pub mod loader;
pub mod locale;
pub mod segment;
pub mod site;
pub mod table;

pub use accessor::{Selector, TableAccessor, TokenSubstituter};
pub use builder::{BuildOptions, BuiltTable, TableBuilder};
pub use catalog::{
    Axis, CategoryValue, EXACTLY_ONE, GenderCategory, NumberCategory, SUBJECT, VIEWING_USER,
    VariationCatalog, VariationKind, WILDCARD,
};
pub use error::{TableError, TableResult};
pub use gender::{GenderConst, PronounUsage};
pub use hash::{ContentHasher, HashPayload};
pub use loader::{load_json_dir, load_json_file, load_segments_from_file, load_site_from_file};
pub use locale::{GenderSystem, LocaleVariationConfig};
pub use segment::{Segment, ShowCount, Variation};
pub use site::{LeafSource, SourceSite};
pub use table::{Leaf, MetaEntry, Metadata, Phrase, VariationTable, validate_metadata};
