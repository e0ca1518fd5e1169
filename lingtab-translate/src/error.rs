use lingtab::TableError;
use thiserror::Error;

/// Error types for rebuilding tables per locale
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Error from the core table crate (locale, metadata, access, I/O)
    #[error(transparent)]
    Table(#[from] TableError),

    /// A source level whose metadata cannot drive translation
    #[error("malformed metadata at level {level}: {reason}")]
    InvalidMetadata { level: usize, reason: String },

    /// A table key that is not a variation value on a varying level
    #[error("key `{key}` at level {level} is not a variation value")]
    InvalidKey { level: usize, key: String },

    /// Source leaf that was never hashed into a site
    #[error("source leaf `{text}` has no hash")]
    UnhashedLeaf { text: String },

    /// JSON (de)serialization of translation data or output
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type for translation operations
pub type TranslateResult<T> = Result<T, TranslateError>;
