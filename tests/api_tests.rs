use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use movie_recs::{
    api::{create_router, AppState},
    catalog::Catalog,
    config::Config,
    MovieContext,
};

const CATALOG: &str = r#"[
    {"title": "Inception", "genres": "[{'id': 28, 'name': 'Action'}, {'id': 878, 'name': 'Science Fiction'}]",
     "overview": "A thief steals secrets through dream sharing", "keywords": "dream heist",
     "original_title": "Inception", "release_date": "2010-07-15", "original_language": "en",
     "tagline": "Your mind is the scene of the crime", "popularity": 167.58},
    {"title": "Paprika", "genres": "[{'id': 16, 'name': 'Animation'}]",
     "overview": "A device lets therapists enter dream worlds", "keywords": "dream"},
    {"title": "Heat", "genres": "[{'id': 80, 'name': 'Crime'}]",
     "overview": "A thief and a detective clash in a heist", "keywords": "heist bank"},
    {"title": "Finding Nemo", "genres": "not a list",
     "overview": "A clownfish searches the ocean for his son", "popularity": null},
    {"title": "Ratatouille", "overview": "A rat cooks in Paris"}
]"#;

fn create_test_server() -> TestServer {
    let catalog = Catalog::from_json_str(CATALOG).unwrap();
    let config = Config {
        max_top_n: 3,
        ..Config::default()
    };
    let state = AppState::new(MovieContext::new(catalog), &config);
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_recommendations_by_query() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations?title=inception&limit=2")
        .await;

    response.assert_status_ok();
    let recs: Vec<Value> = response.json();
    assert_eq!(
        recs,
        vec![
            json!({ "id": 1, "title": "Paprika" }),
            json!({ "id": 2, "title": "Heat" }),
        ]
    );
}

#[tokio::test]
async fn test_recommendation_limit_is_clamped() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations?title=Inception&limit=50")
        .await;

    response.assert_status_ok();
    let recs: Vec<Value> = response.json();
    assert_eq!(recs.len(), 3);
    assert!(recs.iter().all(|r| r["id"] != 0));
}

#[tokio::test]
async fn test_unknown_or_blank_title_is_empty_list() {
    let server = create_test_server();

    for title in ["Nonexistent%20Title%20XYZ", "%20%20", ""] {
        let response = server
            .get(&format!("/api/v1/recommendations?title={}", title))
            .await;
        response.assert_status_ok();
        let recs: Vec<Value> = response.json();
        assert!(recs.is_empty());
    }

    let response = server.get("/api/v1/recommendations").await;
    response.assert_status_ok();
    let recs: Vec<Value> = response.json();
    assert!(recs.is_empty());
}

#[tokio::test]
async fn test_invalid_limit_is_json_error() {
    let server = create_test_server();

    let response = server
        .get("/api/v1/recommendations?title=Heat&limit=abc")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_search_form_submission() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .form(&json!({ "movie_name": "  HEAT " }))
        .await;

    response.assert_status_ok();
    let recs: Vec<Value> = response.json();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["title"], "Inception");
}

#[tokio::test]
async fn test_movie_detail() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/0").await;

    response.assert_status_ok();
    let movie: Value = response.json();
    assert_eq!(movie["id"], 0);
    assert_eq!(movie["title"], "Inception");
    assert_eq!(movie["genres"], "Action, Science Fiction");
    assert_eq!(movie["tagline"], "Your mind is the scene of the crime");
    assert_eq!(movie["popularity"], 167.58);
}

#[tokio::test]
async fn test_movie_detail_fills_missing_fields() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/3").await;

    response.assert_status_ok();
    let movie: Value = response.json();
    assert_eq!(movie["genres"], "not a list");
    assert_eq!(movie["tagline"], "");
    assert_eq!(movie["popularity"], 0.0);
}

#[tokio::test]
async fn test_movie_detail_not_found() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/5").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_movie_detail_invalid_id() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies/abc").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/movies/-1").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_by_title() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies?title=finding%20nemo").await;
    response.assert_status_ok();
    let movie: Value = response.json();
    assert_eq!(movie["id"], 3);

    let response = server.get("/api/v1/movies?title=Jaws").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_movie_by_title_requires_title() {
    let server = create_test_server();

    let response = server.get("/api/v1/movies").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("title"));
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let server = create_test_server();

    let response = server.get("/health").await;

    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = create_test_server();
    let id = uuid::Uuid::new_v4().to_string();

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_str(&id).unwrap(),
        )
        .await;

    assert_eq!(response.header("x-request-id").to_str().unwrap(), id);
}
