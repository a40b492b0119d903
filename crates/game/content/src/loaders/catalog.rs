//! Id-keyed catalog loader.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::loaders::{LoadResult, read_file};

/// Loader for `{ "id": (...), ... }` RON maps.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog of `T` keyed by id.
    ///
    /// `kind` only labels error messages and logs.
    pub fn load<T: DeserializeOwned>(path: &Path, kind: &str) -> LoadResult<HashMap<String, T>> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content, kind)?;
        tracing::debug!(
            target: "content::loader",
            kind,
            path = %path.display(),
            entries = catalog.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse a catalog from RON text.
    pub fn parse<T: DeserializeOwned>(content: &str, kind: &str) -> LoadResult<HashMap<String, T>> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {} catalog RON: {}", kind, e))
    }
}
