//! Integration tests for the passage generation gateway.
//!
//! Runs the Gemini client against a wiremock server standing in for the
//! Generative Language API.

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vocabify_core::hunt::{Difficulty, GenerateError, GenerationRequest, WeaknessProfile};
use vocabify_core::providers::{GeminiClient, GeminiConfig};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(server: &MockServer) -> GeminiClient {
    GeminiClient::new(GeminiConfig {
        api_key: "test-api-key".to_string(),
        base_url: server.uri(),
        model: "gemini-2.5-flash".to_string(),
        temperature: 0.7,
        max_output_tokens: 800,
    })
}

fn request() -> GenerationRequest {
    GenerationRequest {
        topic: "space exploration".to_string(),
        difficulty: Difficulty::Medium,
        passage_length: 150,
        weaknesses: WeaknessProfile::default().weaknesses,
    }
}

fn function_call_body(passage: &str, suggested: &[&str]) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [{
                    "functionCall": {
                        "name": "outputPassage",
                        "args": {
                            "passage": passage,
                            "suggestedErrors": suggested
                        }
                    }
                }]
            }
        }]
    })
}

#[tokio::test]
async fn generate_returns_stubbed_result_unmodified() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(json!({
            "toolConfig": {
                "functionCallingConfig": { "mode": "ANY" }
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(function_call_body("The cat run fast.", &["Subject-verb agreement"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).generate_passage(&request()).await.unwrap();
    assert_eq!(result.passage, "The cat run fast.");
    assert_eq!(result.suggested_errors, vec!["Subject-verb agreement"]);
}

#[tokio::test]
async fn generate_sends_prompt_with_parameters_and_weaknesses() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(function_call_body("The cat run fast.", &[])),
        )
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).generate_passage(&request()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("\"space exploration\""));
    assert!(prompt.contains("\"medium\""));
    assert!(prompt.contains("150 words"));
    assert!(prompt.contains("- Comma splices"));
    let api_key = requests[0]
        .headers
        .get("x-goog-api-key")
        .and_then(|value| value.to_str().ok());
    assert_eq!(api_key, Some("test-api-key"));
}

#[tokio::test]
async fn generate_falls_back_to_free_text_json() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "Sure!\n{\"passage\": \"The cat run fast.\", \"suggestedErrors\": []}"
                    }]
                }
            }]
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).generate_passage(&request()).await.unwrap();
    assert_eq!(result.passage, "The cat run fast.");
    assert!(result.suggested_errors.is_empty());
}

#[tokio::test]
async fn generate_rejects_free_text_without_braces() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Here is your passage without any JSON." }] }
            }]
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).generate_passage(&request()).await.unwrap_err();
    assert!(matches!(err, GenerateError::MalformedResponse { .. }));
}

#[tokio::test]
async fn generate_maps_unauthorized_to_credential_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"error": {"message": "API key not valid"}})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).generate_passage(&request()).await.unwrap_err();
    let GenerateError::Provider { status, .. } = &err else {
        panic!("expected provider error, got {err:?}");
    };
    assert_eq!(*status, Some(401));
    assert!(err.user_message().contains("API key is not valid"));
}

#[tokio::test]
async fn invalid_input_makes_no_network_call() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut bad = request();
    bad.topic = "a".to_string();
    bad.passage_length = 49;

    let err = client_for(&server).generate_passage(&bad).await.unwrap_err();
    let GenerateError::Validation { issues } = err else {
        panic!("expected validation error");
    };
    assert_eq!(issues.len(), 2);
}

#[tokio::test]
async fn empty_candidates_map_to_empty_response() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    let err = client_for(&server).generate_passage(&request()).await.unwrap_err();
    assert!(matches!(err, GenerateError::EmptyResponse));
}
