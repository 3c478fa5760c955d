use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use draw_runner::llm_client::{LlmClient, LlmError, LlmRequest, MockLlm, OllamaClient};
use draw_runner::server::spawn_in_background;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

type Seen = Arc<Mutex<Vec<Value>>>;

async fn generate(State(seen): State<Seen>, Json(body): Json<Value>) -> Json<Value> {
    let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
    seen.lock().unwrap().push(body);
    Json(json!({"model": "llama3", "response": format!("echo: {prompt}"), "done": true}))
}

async fn tags() -> Json<Value> {
    Json(json!({"models": []}))
}

fn fake_ollama() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route("/api/generate", post(generate))
        .route("/api/tags", get(tags))
        .with_state(seen.clone());
    let addr = spawn_in_background(router).unwrap();
    (format!("http://{addr}"), seen)
}

fn request(prompt: &str) -> LlmRequest {
    LlmRequest {
        prompt: prompt.to_string(),
        timeout: Duration::from_secs(5),
    }
}

#[test]
fn generate_sends_non_streaming_request() {
    let (url, seen) = fake_ollama();
    let client = OllamaClient::new(&url, "llama3", Duration::from_secs(5)).unwrap();
    let resp = client.complete(request("draw a cat")).unwrap();
    assert_eq!(resp.content, "echo: draw a cat");

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["model"], "llama3");
    assert_eq!(bodies[0]["prompt"], "draw a cat");
    assert_eq!(bodies[0]["stream"], false);
    let temperature = bodies[0]["options"]["temperature"].as_f64().unwrap();
    assert!((temperature - 0.2).abs() < 1e-6);
}

#[test]
fn ping_uses_tags_endpoint() {
    let (url, _seen) = fake_ollama();
    let client = LlmClient::Ollama(OllamaClient::new(&url, "llama3", Duration::from_secs(5)).unwrap());
    client.ping().unwrap();
}

#[test]
fn server_errors_are_reported() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::NOT_FOUND, "model \"nope\" not found") }),
    );
    let addr = spawn_in_background(router).unwrap();
    let client = OllamaClient::new(&format!("http://{addr}"), "nope", Duration::from_secs(5)).unwrap();
    let err = client.complete(request("hi")).unwrap_err();
    match err {
        LlmError::Service(msg) => assert!(msg.starts_with("404"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(client.ping(), Err(LlmError::Service(_))));
}

#[test]
fn blank_response_is_empty() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async { Json(json!({"response": "   "})) }),
    );
    let addr = spawn_in_background(router).unwrap();
    let client = OllamaClient::new(&format!("http://{addr}"), "llama3", Duration::from_secs(5)).unwrap();
    assert!(matches!(client.complete(request("hi")), Err(LlmError::EmptyResponse)));
}

#[test]
fn unreachable_server_is_http_error() {
    let client = OllamaClient::new("http://127.0.0.1:1", "llama3", Duration::from_millis(500)).unwrap();
    assert!(matches!(client.ping(), Err(LlmError::Http(_))));
}

#[test]
fn mock_replays_then_runs_dry() {
    let client = LlmClient::Mock(MockLlm::new(vec!["one".into(), "two".into()]));
    assert_eq!(client.complete(request("a")).unwrap().content, "one");
    assert_eq!(client.complete(request("b")).unwrap().content, "two");
    assert!(matches!(client.complete(request("c")), Err(LlmError::MockExhausted)));
    client.ping().unwrap();
}
