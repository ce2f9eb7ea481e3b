//! Movie catalog loading and normalization
//!
//! Raw records arrive as JSON objects or CSV rows with arbitrary gaps.
//! Normalization runs once, in a single pass, and produces fully populated
//! [`Movie`] values whose ids are their positions in the catalog.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::models::{Movie, MovieId};

pub mod genres;
pub mod literal;

pub use genres::{parse_genres, GenreField};

/// A raw catalog row as read from the source file
pub type RawRecord = Map<String, Value>;

/// Failure to load the catalog; fatal at startup
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("catalog must be a JSON array of movie objects")]
    NotAnArray,

    #[error("catalog record {position} is not an object")]
    InvalidRecord { position: usize },
}

/// Normalized, read-only movie catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    /// Normalized title -> first movie carrying it
    titles: HashMap<String, MovieId>,
}

impl Catalog {
    /// Reads and normalizes a catalog file
    ///
    /// Files ending in `.csv` are read as CSV with a header row; anything else
    /// is read as a JSON array.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        };
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        let catalog = if is_csv {
            Self::from_csv_reader(std::fs::File::open(path).map_err(io_error)?)?
        } else {
            Self::from_json_str(&std::fs::read_to_string(path).map_err(io_error)?)?
        };

        tracing::info!(
            path = %path.display(),
            movies = catalog.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Parses a JSON array of movie objects
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let Value::Array(rows) = serde_json::from_str::<Value>(json)? else {
            return Err(CatalogError::NotAnArray);
        };

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(position, row)| match row {
                Value::Object(record) => Ok(record),
                _ => Err(CatalogError::InvalidRecord { position }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_records(records))
    }

    /// Parses CSV with a header row naming the columns
    ///
    /// Empty cells are treated as missing values.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = reader.headers()?.clone();

        let records = reader
            .records()
            .map(|row| -> Result<RawRecord, CatalogError> {
                let row = row?;
                Ok(headers
                    .iter()
                    .zip(row.iter())
                    .filter(|(_, cell)| !cell.is_empty())
                    .map(|(column, cell)| (column.to_string(), Value::String(cell.to_string())))
                    .collect::<RawRecord>())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_records(records))
    }

    /// Normalizes raw records; ids follow record order
    pub fn from_records(records: impl IntoIterator<Item = RawRecord>) -> Self {
        let mut fallbacks = 0usize;
        let movies: Vec<Movie> = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| {
                let genres = genres::parse_genre_value(record.get("genres"));
                if genres.is_fallback() {
                    fallbacks += 1;
                }
                normalize(MovieId(position), &record, genres)
            })
            .collect();

        if fallbacks > 0 {
            tracing::debug!(count = fallbacks, "Genre fields kept as raw text");
        }

        Self::from_movies(movies)
    }

    /// Builds a catalog from already-normalized movies, reassigning ids by position
    pub fn from_movies(mut movies: Vec<Movie>) -> Self {
        let mut titles = HashMap::with_capacity(movies.len());
        for (position, movie) in movies.iter_mut().enumerate() {
            movie.id = MovieId(position);
            // Catalog titles are matched as stored; only the query is trimmed
            titles.entry(movie.title.to_lowercase()).or_insert(movie.id);
        }
        Self { movies, titles }
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(id.index())
    }

    /// Case-insensitive exact match on the trimmed title; first in catalog order wins
    pub fn find_by_title(&self, title: &str) -> Option<&Movie> {
        let key = normalize_title(title);
        if key.is_empty() {
            return None;
        }
        self.titles.get(&key).and_then(|&id| self.get(id))
    }
}

/// Lookup key for a title query
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

fn normalize(id: MovieId, record: &RawRecord, genres: GenreField) -> Movie {
    Movie {
        id,
        title: text_field(record, "title"),
        original_title: text_field(record, "original_title"),
        overview: text_field(record, "overview"),
        genres_raw: text_field(record, "genres"),
        genres_clean: genres.into_text(),
        keywords: text_field(record, "keywords"),
        release_date: text_field(record, "release_date"),
        original_language: text_field(record, "original_language"),
        tagline: text_field(record, "tagline"),
        popularity: numeric_field(record, "popularity"),
    }
}

fn text_field(record: &RawRecord, key: &str) -> String {
    match record.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}

fn numeric_field(record: &RawRecord, key: &str) -> f64 {
    let value = match record.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}
