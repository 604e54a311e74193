use std::sync::Arc;
use std::time::Duration;

use applier_engine::{
    ApplicantProfile, BackendSettings, FieldEquals, ReqwestSubmitter, StatusOk,
    SubmissionFailure, SuccessPolicy, Submitter,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer) -> BackendSettings {
    BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    }
}

fn profile() -> ApplicantProfile {
    ApplicantProfile {
        resume_path: "/home/jane/resume.pdf".to_string(),
        full_name: "Jane Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone_number: "555-0100".to_string(),
        grad_year: "2015".to_string(),
        ..ApplicantProfile::default()
    }
}

fn submitter(server: &MockServer, policy: Arc<dyn SuccessPolicy>) -> ReqwestSubmitter {
    ReqwestSubmitter::new(&settings(server), policy).expect("submitter")
}

#[tokio::test]
async fn successful_application_sends_profile_and_link() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .and(body_partial_json(json!({
            "job_link": "https://boards.example.com/1",
            "full_name": "Jane Doe",
            "email": "jane@example.com",
            "resume_path": "/home/jane/resume.pdf",
            "cover_letter_path": "",
            "grad_year": "2015",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Application processed",
            "result": "Application successful",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let submitter = submitter(&server, Arc::new(FieldEquals::default()));
    let receipt = submitter
        .submit("https://boards.example.com/1", &profile())
        .await
        .expect("applied");

    assert_eq!(receipt.message.as_deref(), Some("Application successful"));
}

#[tokio::test]
async fn policy_rejection_reports_backend_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Application processed",
            "result": "Application failed: form not found",
        })))
        .mount(&server)
        .await;

    let submitter = submitter(&server, Arc::new(FieldEquals::default()));
    let err = submitter
        .submit("https://boards.example.com/2", &profile())
        .await
        .unwrap_err();

    assert_eq!(err.kind, SubmissionFailure::Rejected);
    assert_eq!(err.message, "Application failed: form not found");
}

#[tokio::test]
async fn status_ok_policy_accepts_any_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "queued"})))
        .mount(&server)
        .await;

    let submitter = submitter(&server, Arc::new(StatusOk));
    let receipt = submitter
        .submit("https://boards.example.com/3", &profile())
        .await
        .expect("applied");

    assert_eq!(receipt.message.as_deref(), Some("queued"));
}

#[tokio::test]
async fn error_status_carries_backend_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "chromedriver crashed"})),
        )
        .mount(&server)
        .await;

    let submitter = submitter(&server, Arc::new(FieldEquals::default()));
    let err = submitter
        .submit("https://boards.example.com/4", &profile())
        .await
        .unwrap_err();

    assert_eq!(err.kind, SubmissionFailure::HttpStatus(500));
    assert_eq!(err.message, "chromedriver crashed");
}

#[tokio::test]
async fn non_json_success_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let submitter = submitter(&server, Arc::new(StatusOk));
    let err = submitter
        .submit("https://boards.example.com/5", &profile())
        .await
        .unwrap_err();

    assert_eq!(err.kind, SubmissionFailure::InvalidResponse);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/apply"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"result": "Application successful"})),
        )
        .mount(&server)
        .await;

    let settings = BackendSettings {
        request_timeout: Duration::from_millis(50),
        ..settings(&server)
    };
    let submitter = ReqwestSubmitter::new(&settings, Arc::new(FieldEquals::default())).unwrap();
    let err = submitter
        .submit("https://boards.example.com/6", &profile())
        .await
        .unwrap_err();

    assert_eq!(err.kind, SubmissionFailure::Timeout);
}

#[test]
fn endpoint_respects_base_path() {
    let settings = BackendSettings {
        base_url: "http://backend.internal:8080/jobs".to_string(),
        ..BackendSettings::default()
    };
    let submitter = ReqwestSubmitter::new(&settings, Arc::new(StatusOk)).unwrap();
    assert_eq!(
        submitter.endpoint().as_str(),
        "http://backend.internal:8080/jobs/api/apply"
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    let settings = BackendSettings {
        base_url: "not a url".to_string(),
        ..BackendSettings::default()
    };
    let err = ReqwestSubmitter::new(&settings, Arc::new(StatusOk))
        .err()
        .expect("invalid url");
    assert_eq!(err.kind, SubmissionFailure::InvalidUrl);
}
