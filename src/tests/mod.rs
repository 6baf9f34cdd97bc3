use std::path::PathBuf;

use httpmock::prelude::*;
use serde_json::json;

use crate::client::{Backend, ClientError, ClientOptions, ScrutinyClient, Stage, UploadForm};
use crate::filter::StatusFilter;
use crate::model::{SyllabusStatus, TextbookStatus};
use crate::session::{self, Session};

fn client_for(base: String) -> ScrutinyClient {
    ScrutinyClient::new(&ClientOptions {
        server: base,
        timeout_seconds: 5,
        proxy: None,
    })
    .unwrap()
}

fn sample_results() -> serde_json::Value {
    json!([
        {
            "question_id": "Unit I - 1a",
            "question_text": "Define Software Engineering.",
            "syllabus_status": "IN_SYLLABUS",
            "syllabus_reasoning": "Unit I.",
            "textbook_status": "YES_IN_TEXTBOOK",
            "textbook_reasoning": "Chapter 1."
        },
        {
            "question_id": "Unit I - 1c",
            "question_text": "Describe CMMI levels.",
            "syllabus_status": "IN_SYLLABUS",
            "syllabus_reasoning": "Unit I process improvement.",
            "textbook_status": "NO_IN_PROVIDED_TEXTBOOK_EXCERPTS",
            "textbook_reasoning": "Not in the excerpts."
        },
        {
            "question_id": "Unit II - 2a",
            "question_text": "What is advanced quantum computing in software?",
            "syllabus_status": "OUT_OF_SYLLABUS",
            "syllabus_reasoning": "Not mentioned.",
            "textbook_status": "NOT_APPLICABLE",
            "textbook_reasoning": ""
        },
        {
            "question_id": "Q4",
            "question_text": "Garbled.",
            "syllabus_status": "ERROR",
            "syllabus_reasoning": "Could not parse LLM response",
            "textbook_status": "NOT_APPLICABLE",
            "textbook_reasoning": ""
        }
    ])
}

fn write_inputs(dir: &std::path::Path) -> UploadForm {
    let syllabus = dir.join("syllabus.json");
    let question_paper = dir.join("question_paper.json");
    let textbook_a = dir.join("se-vol1.pdf");
    let textbook_b = dir.join("se-vol2.pdf");
    std::fs::write(&syllabus, r#"{"course_name":"SE","units":[]}"#).unwrap();
    std::fs::write(&question_paper, r#"[{"question":"1a","text":"Define SE."}]"#).unwrap();
    std::fs::write(&textbook_a, b"%PDF-vol1").unwrap();
    std::fs::write(&textbook_b, b"%PDF-vol2").unwrap();
    UploadForm {
        syllabus: Some(syllabus),
        question_paper: Some(question_paper),
        textbooks: vec![textbook_a, textbook_b],
    }
}

#[tokio::test]
async fn upload_posts_every_file_as_multipart() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload")
                .header_exists("content-type")
                .body_includes(r#"name="syllabus"; filename="syllabus.json""#)
                .body_includes(r#"name="question_paper"; filename="question_paper.json""#)
                .body_includes(r#"name="textbooks"; filename="se-vol1.pdf""#)
                .body_includes(r#"name="textbooks"; filename="se-vol2.pdf""#)
                .body_includes("%PDF-vol2");
            then.status(200).json_body(json!({
                "success": true,
                "syllabus_docs": 7,
                "textbook_docs": 88,
                "question_paper_path": "uploads/question_paper.json"
            }));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let form = write_inputs(dir.path());
    let mut session = Session::new(Backend::Http(client_for(server.base_url())));
    let summary = session.handle_upload(&form).await.unwrap();

    upload.assert_async().await;
    assert_eq!(summary.syllabus_docs, 7);
    assert_eq!(summary.textbook_docs, 88);
    assert_eq!(
        session.question_paper_path(),
        Some("uploads/question_paper.json")
    );
}

#[tokio::test]
async fn upload_error_body_is_surfaced() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(400)
                .json_body(json!({ "error": "Missing required files" }));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let form = write_inputs(dir.path());
    let mut session = Session::new(Backend::Http(client_for(server.base_url())));
    let err = session.handle_upload(&form).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Server {
            stage: Stage::Upload,
            status: 400,
            ..
        }
    ));
    assert_eq!(err.to_string(), "Missing required files");
    assert!(session.question_paper_path().is_none());
}

#[tokio::test]
async fn upload_with_missing_local_file_sends_nothing() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST).path("/upload");
            then.status(200);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut form = write_inputs(dir.path());
    form.textbooks.push(dir.path().join("missing.pdf"));
    let client = client_for(server.base_url());
    let err = client.upload(&form).await.unwrap_err();

    assert!(matches!(err, ClientError::FileRead { field: "textbooks", .. }));
    assert!(err.to_string().contains("missing.pdf"));
    upload.assert_calls_async(0).await;
}

#[tokio::test]
async fn validate_sends_stored_path_and_keeps_all_results() {
    let server = MockServer::start_async().await;
    let validate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/validate")
                .json_body(json!({ "question_paper_path": "uploads/qp.json" }));
            then.status(200)
                .json_body(json!({ "results": sample_results() }));
        })
        .await;

    let mut session = Session::new(Backend::Http(client_for(server.base_url())));
    session.set_question_paper_path("uploads/qp.json");
    let results = session.start_validation().await.unwrap();
    assert_eq!(results.len(), 4);
    validate.assert_async().await;

    let stats = session.summary();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.in_syllabus, 2);
    assert_eq!(stats.out_of_syllabus, 1);
    assert_eq!(stats.in_textbook, 1);

    assert_eq!(session.visible(&StatusFilter::All).len(), 4);
    let errors = session.visible(&StatusFilter::parse("error").unwrap());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].syllabus_status(), Some(&SyllabusStatus::Error));

    let in_syllabus = session.visible(&StatusFilter::parse("in").unwrap());
    assert_eq!(in_syllabus.len(), 2);
    assert_eq!(
        in_syllabus[1].textbook_status(),
        Some(&TextbookStatus::NotInTextbook)
    );
}

#[tokio::test]
async fn validate_joins_endpoints_under_a_path_prefix() {
    let server = MockServer::start_async().await;
    let validate = server
        .mock_async(|when, then| {
            when.method(POST).path("/scrutiniser/validate");
            then.status(200).json_body(json!({ "results": [] }));
        })
        .await;

    let client = client_for(server.url("/scrutiniser"));
    let results = client.validate("demo_mode").await.unwrap();
    assert!(results.is_empty());
    validate.assert_async().await;
}

#[tokio::test]
async fn validate_maps_expired_key_and_quota() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/validate")
                .json_body(json!({ "question_paper_path": "expired" }));
            then.status(400).json_body(json!({
                "error": "API key expired. Please renew your Gemini API key."
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/validate")
                .json_body(json!({ "question_paper_path": "quota" }));
            then.status(429).json_body(json!({
                "error": "API quota exceeded. Please check your plan and billing details or try again later."
            }));
        })
        .await;

    let client = client_for(server.base_url());
    let err = client.validate("expired").await.unwrap_err();
    assert!(matches!(err, ClientError::ApiKeyExpired));
    assert!(err.to_string().starts_with("API Key Expired"));

    let err = client.validate("quota").await.unwrap_err();
    assert!(matches!(err, ClientError::QuotaExceeded));
}

#[tokio::test]
async fn failed_validation_keeps_previous_results() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/validate");
            then.status(500)
                .json_body(json!({ "error": "API error: ERROR_LLM_CALL_GENERAL" }));
        })
        .await;

    let mut session = Session::new(Backend::Http(client_for(server.base_url())));
    session.replace_results(serde_json::from_value(sample_results()).unwrap());
    session.set_question_paper_path("uploads/qp.json");

    let err = session.start_validation().await.unwrap_err();
    assert_eq!(err.to_string(), "API error: ERROR_LLM_CALL_GENERAL");
    assert_eq!(session.results().len(), 4);
}

#[tokio::test]
async fn non_json_body_is_an_invalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/validate");
            then.status(200).body("<html>proxy page</html>");
        })
        .await;

    let err = client_for(server.base_url())
        .validate("uploads/qp.json")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ClientError::InvalidResponse {
            stage: Stage::Validation,
            ..
        }
    ));
}

#[tokio::test]
async fn missing_results_key_means_no_results() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/validate");
            then.status(200).json_body(json!({}));
        })
        .await;

    let results = client_for(server.base_url())
        .validate("uploads/qp.json")
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = client_for(format!("http://127.0.0.1:{port}"));
    let err = client.validate("uploads/qp.json").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Network {
            stage: Stage::Validation,
            ..
        }
    ));
    assert!(err
        .to_string()
        .starts_with("Network error during validation: "));
}

#[tokio::test]
async fn sparse_and_null_records_render_and_export_unchanged() {
    let sent = json!([
        {
            "question_id": "Q1",
            "question_text": null,
            "syllabus_status": "IN_SYLLABUS",
            "syllabus_reasoning": null,
            "textbook_status": null,
            "textbook_reasoning": null
        },
        {
            "question_text": "Which unit covers testing?",
            "syllabus_reasoning": "r"
        }
    ]);
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/validate");
            then.status(200).json_body(json!({ "results": sent.clone() }));
        })
        .await;

    let mut session = Session::new(Backend::Http(client_for(server.base_url())));
    session.set_question_paper_path("uploads/qp.json");
    assert_eq!(session.start_validation().await.unwrap().len(), 2);
    assert_eq!(session.visible(&StatusFilter::All).len(), 2);
    assert_eq!(session.summary().in_syllabus, 1);

    let cards: Vec<String> = session
        .results()
        .iter()
        .map(crate::output::render_card)
        .collect();
    assert!(cards[0].contains("Q1"));
    assert!(cards[1].contains("Which unit covers testing?"));

    let exported: serde_json::Value =
        serde_json::from_str(&session.export_json().unwrap()).unwrap();
    assert_eq!(exported, sent);
}

#[tokio::test]
async fn exported_file_reopens_identically() {
    let mut session = Session::new(Backend::Demo);
    session.replace_results(serde_json::from_value(sample_results()).unwrap());

    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join(session::default_export_file_name());
    std::fs::write(&path, session.export_json().unwrap()).unwrap();

    let reopened = session::load_results_file(&path).await.unwrap();
    assert_eq!(reopened, session.results());
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw, sample_results());
}

#[tokio::test]
async fn malformed_results_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"results": "nope"}"#).unwrap();
    let err = session::load_results_file(&path).await.unwrap_err();
    assert!(err.contains("failed to parse results file"));
}
