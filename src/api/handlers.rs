use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Form, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{MovieDetail, MovieId, Recommendation},
    services::{lookup, recommendations},
};

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub title: String,
    pub limit: Option<usize>,
}

/// Search box submission
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub movie_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Recommendations for a title given in the query string
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<RecommendationQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let Query(params) = query?;
    let top_n = state.top_n(params.limit);
    Ok(Json(run_recommendations(&state, &request_id, &params.title, top_n)))
}

/// Recommendations for a submitted search form, using the default count
pub async fn submit_search(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let Form(form) = form?;
    let top_n = state.top_n(None);
    Ok(Json(run_recommendations(&state, &request_id, &form.movie_name, top_n)))
}

fn run_recommendations(
    state: &AppState,
    request_id: &RequestId,
    title: &str,
    top_n: usize,
) -> Vec<Recommendation> {
    let recs = recommendations::recommend(&state.context, title, top_n);

    tracing::info!(
        request_id = %request_id,
        title = %title.trim(),
        top_n,
        results = recs.len(),
        "Recommendations served"
    );

    recs
}

/// Movie detail by stable id
pub async fn get_movie(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<MovieDetail>> {
    let id = raw_id
        .trim()
        .parse::<usize>()
        .map(MovieId)
        .map_err(|_| AppError::InvalidInput(format!("Invalid movie id: {}", raw_id)))?;

    lookup::by_id(&state.context, id)
        .map(|movie| Json(MovieDetail::from(movie)))
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))
}

/// Movie detail by exact (case-insensitive) title
pub async fn find_movie(
    State(state): State<AppState>,
    query: Result<Query<TitleQuery>, QueryRejection>,
) -> AppResult<Json<MovieDetail>> {
    let Query(params) = query?;
    lookup::by_title(&state.context, &params.title)
        .map(|movie| Json(MovieDetail::from(movie)))
        .ok_or_else(|| AppError::NotFound(format!("No movie titled '{}'", params.title.trim())))
}
