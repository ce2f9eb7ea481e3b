use std::path::Path;

use crate::catalog::{Catalog, CatalogError};
use crate::index::SimilarityIndex;

/// Catalog and similarity index, built once at startup and read-only afterwards
///
/// Passed by reference into the lookup and recommendation services; share it
/// across request handlers through an `Arc`.
#[derive(Debug, Clone)]
pub struct MovieContext {
    catalog: Catalog,
    index: SimilarityIndex,
}

impl MovieContext {
    /// Indexes every movie's combined text
    pub fn new(catalog: Catalog) -> Self {
        let index = SimilarityIndex::build(catalog.movies().iter().map(|m| m.combined_text()));

        tracing::info!(
            movies = catalog.len(),
            vocabulary = index.vocabulary_size(),
            "Similarity index built"
        );

        Self { catalog, index }
    }

    /// Loads, normalizes and indexes a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        Catalog::load(path).map(Self::new)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn index(&self) -> &SimilarityIndex {
        &self.index
    }
}
