use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod movie;

pub use movie::Movie;

/// Stable identifier of a catalog entry: its 0-based position after normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub usize);

impl MovieId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for MovieId {
    fn from(value: usize) -> Self {
        MovieId(value)
    }
}

/// One entry of a recommendation list
///
/// Carries no score: ranking is internal to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Recommendation {
    pub id: MovieId,
    pub title: String,
}

impl From<&Movie> for Recommendation {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
        }
    }
}

/// Detail view of a single movie returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
    pub original_title: String,
    pub genres: String,
    pub overview: String,
    pub release_date: String,
    pub original_language: String,
    pub tagline: String,
    pub popularity: f64,
}

impl From<&Movie> for MovieDetail {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            original_title: movie.original_title.clone(),
            genres: movie.genres_clean.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            original_language: movie.original_language.clone(),
            tagline: movie.tagline.clone(),
            popularity: movie.popularity,
        }
    }
}
