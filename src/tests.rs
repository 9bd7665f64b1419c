use std::time::Duration;

use httpmock::Method::POST;
use httpmock::{Mock, MockServer};
use serde_json::json;

use crate::config::GeminiConfig;
use crate::error::TriageError;
use crate::reasoner::Reasoner;
use crate::retry::RetryPolicy;
use crate::testing;
use crate::types::{ChallengeType, InvokeOptions, RouterResult};
use crate::{ChallengeClassifier, ChallengeRouter};

fn quick_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        wait: Duration::from_millis(1),
    }
}

fn mock_config(server: &MockServer) -> GeminiConfig {
    GeminiConfig {
        api_key: Some("test-key".to_string()),
        base_url: Some(server.base_url()),
        timeout_ms: 5_000,
        ..GeminiConfig::default()
    }
}

fn mock_upload<'a>(server: &'a MockServer, uri: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(POST)
            .path("/upload/v1beta/files")
            .query_param("key", "test-key")
            .header("x-goog-upload-protocol", "raw");
        then.status(200).json_body(json!({
            "file": {
                "name": "files/abc123",
                "uri": uri,
                "mimeType": "image/png"
            }
        }));
    })
}

fn text_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [
            {
                "content": { "role": "model", "parts": [{ "text": text }] },
                "finishReason": "STOP"
            }
        ],
        "modelVersion": "test"
    })
}

#[tokio::test]
async fn classifier_structured_branch_constrains_reply_to_the_enum() {
    testing::init_test_logging();
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let upload = mock_upload(&server, "https://files.local/abc123");
    let generate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .query_param("key", "test-key")
            .header("content-type", "application/json")
            .body_contains("\"fileUri\":\"https://files.local/abc123\"")
            .body_contains("\"mimeType\":\"image/png\"")
            .body_contains("\"responseMimeType\":\"text/x.enum\"")
            .body_contains("(clicking ONE specific area/object)")
            .body_contains("\"temperature\":0.0");
        then.status(200)
            .json_body(text_reply("image_label_multi_select"));
    });

    let classifier = ChallengeClassifier::new(mock_config(&server))
        .expect("classifier should initialize");
    let challenge_type = classifier
        .classify(&screenshot, None)
        .await
        .expect("classification should succeed");

    upload.assert();
    generate.assert();
    assert_eq!(challenge_type, ChallengeType::ImageLabelMultiSelect);

    let last = classifier
        .last_response()
        .await
        .expect("raw response should be retained");
    assert_eq!(last.text().as_deref(), Some("image_label_multi_select"));
}

#[tokio::test]
async fn classifier_legacy_branch_moves_instructions_to_the_system_slot() {
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let upload = mock_upload(&server, "https://files.local/legacy");
    let generate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash-thinking-exp-01-21:generateContent")
            .query_param("key", "test-key")
            .body_contains("\"systemInstruction\"")
            .body_contains("## Rules")
            .body_contains("## Examples")
            .body_contains("\"fileUri\":\"https://files.local/legacy\"");
        then.status(200).json_body(text_reply("image_drag_single"));
    });

    let config = GeminiConfig {
        model: Some("gemini-2.0-flash-thinking-exp-01-21".to_string()),
        ..mock_config(&server)
    };
    let classifier =
        ChallengeClassifier::new(config).expect("classifier should initialize");
    let challenge_type = classifier
        .classify(&screenshot, None)
        .await
        .expect("legacy classification should succeed");

    upload.assert();
    generate.assert();
    assert_eq!(challenge_type, ChallengeType::ImageDragSingle);
}

#[tokio::test]
async fn classifier_round_trips_every_literal() {
    for expected in ChallengeType::all() {
        let server = MockServer::start();
        let (_dir, screenshot) = testing::temp_screenshot();

        let _upload = mock_upload(&server, "https://files.local/loop");
        let _generate = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-2.0-flash:generateContent");
            then.status(200).json_body(text_reply(expected.as_str()));
        });

        let classifier = ChallengeClassifier::new(mock_config(&server))
            .expect("classifier should initialize");
        let challenge_type = classifier
            .classify(&screenshot, None)
            .await
            .expect("classification should succeed");
        assert_eq!(challenge_type, *expected);
    }
}

#[tokio::test]
async fn classifier_per_call_override_wins_over_the_instance_default() {
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let _upload = mock_upload(&server, "https://files.local/override");
    let generate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.5-flash:generateContent");
        then.status(200).json_body(text_reply("image_drag_multi"));
    });

    let classifier = ChallengeClassifier::new(mock_config(&server))
        .expect("classifier should initialize");
    let challenge_type = classifier
        .classify(
            &screenshot,
            Some(InvokeOptions {
                model: Some("gemini-2.5-flash".to_string()),
            }),
        )
        .await
        .expect("override classification should succeed");

    generate.assert();
    assert_eq!(challenge_type, ChallengeType::ImageDragMulti);
}

#[tokio::test]
async fn classifier_unknown_literal_exhausts_retries() {
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let upload = mock_upload(&server, "https://files.local/garbage");
    let generate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent");
        then.status(200).json_body(text_reply("rotate_the_dial"));
    });

    let classifier =
        ChallengeClassifier::new_with_retry(mock_config(&server), quick_retry())
            .expect("classifier should initialize");
    let error = classifier.classify(&screenshot, None).await.unwrap_err();

    assert!(matches!(
        error,
        TriageError::InvalidResponse(ref message) if message.contains("rotate_the_dial")
    ));
    assert_eq!(upload.hits(), 3);
    assert_eq!(generate.hits(), 3);
}

#[tokio::test]
async fn classifier_missing_model_fails_before_any_network_call() {
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let upload = mock_upload(&server, "https://files.local/unused");

    let config = GeminiConfig {
        model: None,
        ..mock_config(&server)
    };
    let classifier =
        ChallengeClassifier::new(config).expect("classifier should initialize");
    let error = classifier.classify(&screenshot, None).await.unwrap_err();

    assert!(matches!(error, TriageError::Config(_)));
    assert_eq!(upload.hits(), 0);
}

#[tokio::test]
async fn classifier_auth_failure_surfaces_after_retries() {
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let upload = server.mock(|when, then| {
        when.method(POST).path("/upload/v1beta/files");
        then.status(401)
            .json_body(json!({ "error": { "status": "UNAUTHENTICATED" } }));
    });

    let classifier =
        ChallengeClassifier::new_with_retry(mock_config(&server), quick_retry())
            .expect("classifier should initialize");
    let error = classifier.classify(&screenshot, None).await.unwrap_err();

    assert!(matches!(error, TriageError::Auth(_)));
    assert_eq!(upload.hits(), 3);
}

#[tokio::test]
async fn router_mirrors_a_native_json_reply() {
    testing::init_test_logging();
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let upload = mock_upload(&server, "https://files.local/router");
    let generate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent")
            .query_param("key", "test-key")
            .body_contains("\"responseMimeType\":\"application/json\"")
            .body_contains("\"type\":\"OBJECT\"")
            .body_contains("\"required\":[\"challenge_prompt\",\"challenge_type\"]")
            .body_contains("(dragging MULTIPLE elements/pieces)");
        then.status(200).json_body(text_reply(
            r#"{"challenge_prompt": "Please click on the rabbit", "challenge_type": "image_label_single_select"}"#,
        ));
    });

    let router = ChallengeRouter::new(mock_config(&server)).expect("router should initialize");
    let result = router
        .route(&screenshot, None)
        .await
        .expect("routing should succeed");

    upload.assert();
    generate.assert();
    assert_eq!(
        result,
        RouterResult {
            challenge_prompt: "Please click on the rabbit".to_string(),
            challenge_type: ChallengeType::ImageLabelSingleSelect,
        }
    );
    assert!(router.last_response().await.is_some());
}

#[tokio::test]
async fn router_recovers_result_embedded_in_prose() {
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let _upload = mock_upload(&server, "https://files.local/prose");
    let _generate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent");
        then.status(200).json_body(text_reply(
            r#"Sure! {"challenge_prompt": "drag the piece", "challenge_type": "image_drag_single"} trailing {junk"#,
        ));
    });

    let router = ChallengeRouter::new(mock_config(&server)).expect("router should initialize");
    let result = router
        .route(&screenshot, None)
        .await
        .expect("routing should recover the embedded object");

    assert_eq!(result.challenge_prompt, "drag the piece");
    assert_eq!(result.challenge_type, ChallengeType::ImageDragSingle);
}

#[tokio::test]
async fn router_incomplete_reply_exhausts_retries() {
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let upload = mock_upload(&server, "https://files.local/partial");
    let generate = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-2.0-flash:generateContent");
        then.status(200)
            .json_body(text_reply(r#"{"challenge_prompt": "only half an answer"}"#));
    });

    let router = ChallengeRouter::new_with_retry(mock_config(&server), quick_retry())
        .expect("router should initialize");
    let error = router.route(&screenshot, None).await.unwrap_err();

    assert!(matches!(error, TriageError::InvalidResponse(_)));
    assert_eq!(upload.hits(), 3);
    assert_eq!(generate.hits(), 3);
}

#[tokio::test]
async fn router_missing_model_fails_before_any_network_call() {
    let server = MockServer::start();
    let (_dir, screenshot) = testing::temp_screenshot();

    let upload = mock_upload(&server, "https://files.local/unused");

    let config = GeminiConfig {
        model: None,
        ..mock_config(&server)
    };
    let router = ChallengeRouter::new(config).expect("router should initialize");
    let error = router.route(&screenshot, None).await.unwrap_err();

    assert!(matches!(error, TriageError::Config(_)));
    assert_eq!(upload.hits(), 0);
}

#[tokio::test]
async fn optional_real_gemini_classifier_when_enabled() {
    if std::env::var("RUN_REAL_GEMINI").ok().as_deref() != Some("1") {
        return;
    }
    dotenvy::dotenv().ok();

    let screenshot = std::env::var("CHALLENGE_SCREENSHOT")
        .expect("RUN_REAL_GEMINI=1 requires CHALLENGE_SCREENSHOT pointing at an image");

    let mut config = GeminiConfig::default();
    config.apply_env_overrides();
    config.validate().expect("config should validate");

    let classifier =
        ChallengeClassifier::new(config).expect("classifier should initialize");
    let challenge_type = classifier
        .classify(&screenshot, None)
        .await
        .expect("real classification should succeed");
    assert!(ChallengeType::all().contains(&challenge_type));
}
