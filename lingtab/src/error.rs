use thiserror::Error;

/// Error types for building and reading variation tables
#[derive(Debug, Error)]
pub enum TableError {
    /// An enum segment was declared without any branch
    #[error("enum `{reuse_key}` has an empty range")]
    EmptyEnumRange { reuse_key: String },

    /// An enum range listed the same key twice
    #[error("enum `{reuse_key}` lists key `{key}` more than once")]
    DuplicateEnumKey { reuse_key: String, key: String },

    /// A repeated variable asked for a branch its own range does not have
    #[error(
        "{key} not found in {available:?}. Attempting to re-use incompatible {kind} `{reuse_key}`"
    )]
    IncompatibleReuse {
        kind: &'static str,
        reuse_key: String,
        key: String,
        available: Vec<String>,
    },

    /// Metadata entry violating the per-kind token rules
    #[error("invalid metadata at level {level}: {reason}")]
    InvalidMetadata { level: usize, reason: String },

    /// The metadata array and the table disagree on depth
    #[error("metadata describes {metadata} levels but the table is {depth} levels deep")]
    DepthMismatch { metadata: usize, depth: usize },

    /// Table access was driven by the wrong number of selectors
    #[error("table access failed: {0}")]
    Access(String),

    /// A key that cannot be coerced to a variation value
    #[error("invalid variation value `{0}`")]
    InvalidVariation(String),

    /// Locale identifier rejected by ICU
    #[error("unsupported locale '{locale}': {reason}")]
    Locale { locale: String, reason: String },

    /// Text pattern failed to compile
    #[error(transparent)]
    Regex(#[from] regex::Error),

    /// JSON (de)serialization of a wire type
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// File system errors while loading inputs
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
