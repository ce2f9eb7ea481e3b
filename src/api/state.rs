use std::sync::Arc;

use crate::config::Config;
use crate::context::MovieContext;

/// Shared application state
///
/// The movie context is immutable after startup, so handlers read it without locking.
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<MovieContext>,
    pub default_top_n: usize,
    pub max_top_n: usize,
}

impl AppState {
    pub fn new(context: MovieContext, config: &Config) -> Self {
        Self {
            context: Arc::new(context),
            default_top_n: config.default_top_n,
            max_top_n: config.max_top_n,
        }
    }

    /// Resolves a requested recommendation count against the configured bounds
    pub fn top_n(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.default_top_n).min(self.max_top_n)
    }
}
