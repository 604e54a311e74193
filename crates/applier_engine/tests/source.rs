use applier_engine::{
    BackendSettings, ReqwestVacancySource, SearchQuery, SharedRegistry, SourceError, VacancySource,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn query() -> SearchQuery {
    SearchQuery {
        job_title: "React developer".to_string(),
        location: "Remote".to_string(),
        radius: 0,
        job_platform: "Glassdoor".to_string(),
    }
}

fn source(server: &MockServer) -> ReqwestVacancySource {
    let settings = BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    };
    ReqwestVacancySource::new(&settings).expect("source")
}

#[tokio::test]
async fn search_returns_links_in_backend_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/get_links"))
        .and(body_json(json!({
            "job_title": "React developer",
            "location": "Remote",
            "radius": 0,
            "job_platform": "Glassdoor",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": ["https://a.example.com/1", "https://b.example.com/2"],
        })))
        .mount(&server)
        .await;

    let links = source(&server).search(&query()).await.expect("links");

    assert_eq!(
        links,
        vec![
            "https://a.example.com/1".to_string(),
            "https://b.example.com/2".to_string(),
        ]
    );
}

#[tokio::test]
async fn search_links_become_pending_vacancies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/get_links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": ["https://a.example.com/1", "https://a.example.com/1/", "https://b.example.com/2"],
        })))
        .mount(&server)
        .await;

    let links = source(&server).search(&query()).await.unwrap();
    let registry = SharedRegistry::default();
    let stats = registry.ingest_links(&links, &query().location);

    assert_eq!((stats.added, stats.skipped), (2, 1));
    assert_eq!(registry.count_pending(), 2);
    let snapshot = registry.snapshot();
    assert_eq!(snapshot[1].url(), "https://b.example.com/2");
    assert_eq!(snapshot[1].location(), "Remote");
}

#[tokio::test]
async fn missing_links_field_is_an_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/get_links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let links = source(&server).search(&query()).await.unwrap();
    assert!(links.is_empty());
}

#[tokio::test]
async fn bad_request_surfaces_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/get_links"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "job_title is required"})),
        )
        .mount(&server)
        .await;

    let err = source(&server).search(&query()).await.unwrap_err();
    assert_eq!(
        err,
        SourceError::HttpStatus {
            status: 400,
            message: "job_title is required".to_string(),
        }
    );
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/get_links"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"links": "nope"})))
        .mount(&server)
        .await;

    let err = source(&server).search(&query()).await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidResponse(_)));
}
