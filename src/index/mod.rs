//! TF-IDF similarity index over the catalog's combined text
//!
//! Built once from the whole corpus and never mutated afterwards. Each document
//! becomes a sparse, L2-normalized vector so cosine similarity is a dot product.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

mod stop_words;

pub use stop_words::{is_stop_word, ENGLISH_STOP_WORDS};

/// Index of a term in the sorted vocabulary
pub type TermId = u32;

/// Sparse vector: `(term, weight)` pairs sorted by term
pub type SparseVector = Vec<(TermId, f64)>;

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("token pattern is valid"))
}

/// Lowercases text and splits it into word tokens of two or more characters,
/// dropping English stop words
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    /// Sorted vocabulary; a term's position is its id
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    /// One vector per document, in document order
    vectors: Vec<SparseVector>,
    /// Term -> `(document, weight)` in document order
    postings: Vec<Vec<(usize, f64)>>,
}

impl SimilarityIndex {
    /// Builds the index in one pass over the corpus
    ///
    /// Weights are raw term counts times the smoothed IDF
    /// `ln((1 + n) / (1 + df)) + 1`, then L2-normalized per document.
    pub fn build<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let documents: Vec<Vec<String>> = texts
            .into_iter()
            .map(|text| tokenize(text.as_ref()))
            .collect();

        let vocabulary: Vec<String> = documents
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let counts: Vec<BTreeMap<TermId, u32>> = documents
            .iter()
            .map(|tokens| {
                let mut counts = BTreeMap::new();
                for token in tokens {
                    // Every token is in the vocabulary by construction
                    if let Ok(term) = vocabulary.binary_search(token) {
                        *counts.entry(term as TermId).or_insert(0) += 1;
                    }
                }
                counts
            })
            .collect();

        let mut document_frequency = vec![0u32; vocabulary.len()];
        for doc in &counts {
            for &term in doc.keys() {
                document_frequency[term as usize] += 1;
            }
        }

        let n = counts.len() as f64;
        let idf: Vec<f64> = document_frequency
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + f64::from(df))).ln() + 1.0)
            .collect();

        let vectors: Vec<SparseVector> = counts
            .iter()
            .map(|doc| {
                let mut vector: SparseVector = doc
                    .iter()
                    .map(|(&term, &count)| (term, f64::from(count) * idf[term as usize]))
                    .collect();
                normalize(&mut vector);
                vector
            })
            .collect();

        let mut postings = vec![Vec::new(); vocabulary.len()];
        for (doc, vector) in vectors.iter().enumerate() {
            for &(term, weight) in vector {
                postings[term as usize].push((doc, weight));
            }
        }

        Self {
            vocabulary,
            idf,
            vectors,
            postings,
        }
    }

    /// Number of indexed documents
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn term_id(&self, term: &str) -> Option<TermId> {
        self.vocabulary
            .binary_search_by(|probe| probe.as_str().cmp(term))
            .ok()
            .map(|i| i as TermId)
    }

    pub fn idf(&self, term: TermId) -> Option<f64> {
        self.idf.get(term as usize).copied()
    }

    pub fn vector(&self, doc: usize) -> Option<&SparseVector> {
        self.vectors.get(doc)
    }

    /// Cosine similarity of `doc` against every document, in document order
    ///
    /// Documents sharing no term with `doc` score 0. Returns `None` when `doc`
    /// is out of range.
    pub fn similarities(&self, doc: usize) -> Option<Vec<f64>> {
        let query = self.vectors.get(doc)?;
        let mut scores = vec![0.0; self.vectors.len()];
        for &(term, weight) in query {
            for &(other, other_weight) in &self.postings[term as usize] {
                scores[other] += weight * other_weight;
            }
        }
        Some(scores)
    }

    /// Cosine similarity between two indexed documents
    pub fn similarity(&self, a: usize, b: usize) -> Option<f64> {
        Some(dot(self.vectors.get(a)?, self.vectors.get(b)?))
    }
}

fn normalize(vector: &mut SparseVector) {
    let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for (_, weight) in vector.iter_mut() {
            *weight /= norm;
        }
    }
}

/// Dot product of two term-sorted sparse vectors
fn dot(a: &SparseVector, b: &SparseVector) -> f64 {
    let (mut i, mut j, mut sum) = (0, 0, 0.0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
