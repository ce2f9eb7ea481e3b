use serde::{Deserialize, Serialize};

use super::MovieId;

/// A normalized catalog entry
///
/// Every text field is populated (missing values become the empty string) and
/// `popularity` defaults to 0, so downstream code never deals with gaps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Position in the normalized catalog
    pub id: MovieId,
    pub title: String,
    pub original_title: String,
    pub overview: String,
    /// Genre field as it appeared in the source record
    pub genres_raw: String,
    /// Flattened genre names, e.g. "Action, Science Fiction"
    pub genres_clean: String,
    pub keywords: String,
    pub release_date: String,
    pub original_language: String,
    pub tagline: String,
    pub popularity: f64,
}

impl Movie {
    /// Text fed to the indexer: genres, title, overview and keywords joined by spaces
    pub fn combined_text(&self) -> String {
        [
            self.genres_clean.as_str(),
            self.title.as_str(),
            self.overview.as_str(),
            self.keywords.as_str(),
        ]
        .join(" ")
    }
}
