use crate::error::{TableError, TableResult};
use crate::segment::Segment;
use crate::site::SourceSite;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

fn io_error(path: &Path, source: io::Error) -> TableError {
    TableError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Read and deserialize one JSON file
///
/// # Arguments
/// * `path` - Path to the JSON file
///
/// # Errors
/// - File read errors
/// - Invalid JSON or a shape that does not match `T`
pub fn load_json_file<T: DeserializeOwned>(path: &Path) -> TableResult<T> {
    let content = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    let value = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), "loaded JSON file");
    Ok(value)
}

/// Load the ordered segment list of one phrase
///
/// The file holds a JSON array of literal strings and variation objects:
/// ```json
/// ["Click to see ", {"kind": "enum", "range": {"groups": "groups", "photos": "photos"}}]
/// ```
pub fn load_segments_from_file(path: &Path) -> TableResult<Vec<Segment>> {
    load_json_file(path)
}

/// Load a source site written by [`SourceSite`]'s serializer
pub fn load_site_from_file(path: &Path) -> TableResult<SourceSite> {
    load_json_file(path)
}

/// Load every `*.json` file of a directory, keyed by file stem
///
/// The stem names the locale: `fr_FR.json` -> `"fr_FR"`.
///
/// # Errors
/// - Directory not found or not a directory
/// - File read/parse errors
pub fn load_json_dir<T: DeserializeOwned>(dir: &Path) -> TableResult<HashMap<String, T>> {
    if !dir.is_dir() {
        return Err(io_error(
            dir,
            io::Error::new(io::ErrorKind::NotFound, "not a directory"),
        ));
    }

    let mut loaded = HashMap::new();
    for entry in fs::read_dir(dir).map_err(|e| io_error(dir, e))? {
        let path = entry.map_err(|e| io_error(dir, e))?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        let Some(locale) = path.file_stem().and_then(|stem| stem.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping file with a non UTF-8 name");
            continue;
        };
        loaded.insert(locale.to_string(), load_json_file(&path)?);
    }

    if loaded.is_empty() {
        tracing::warn!(dir = %dir.display(), "no JSON files found");
    }
    Ok(loaded)
}
