//! Content-based movie recommendations
//!
//! A catalog is normalized and indexed once at startup into a [`MovieContext`];
//! the lookup and recommendation services then answer read-only queries
//! against it, and [`api`] exposes them over HTTP.

pub mod api;
pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod index;
pub mod middleware;
pub mod models;
pub mod services;

pub use context::MovieContext;
