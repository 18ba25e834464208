//! Provider tests against an in-process OpenAI-compatible server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use super::{ChatMessage, ChatRequest, EmbeddingProvider, LlmProvider, OpenAiCompatProvider};
use crate::core::errors::ApiError;

#[derive(Clone, Default)]
struct Recorded {
    auth: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

async fn chat_completions(
    State(recorded): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        recorded.auth.lock().unwrap().push(auth.to_string());
    }
    let has_tool_result = body["messages"]
        .as_array()
        .map(|m| m.iter().any(|msg| msg["role"] == "tool"))
        .unwrap_or(false);
    recorded.bodies.lock().unwrap().push(body);

    if has_tool_result {
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": "영업시간은 9시부터입니다."}}]
        }))
    } else {
        Json(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "retrieve_blog_posts", "arguments": "{\"query\":\"영업시간\"}"}
                }]
            }}]
        }))
    }
}

async fn embeddings(Json(body): Json<Value>) -> Json<Value> {
    let inputs = body["input"].as_array().cloned().unwrap_or_default();
    // Reverse order on purpose; the client must sort by index.
    let data: Vec<Value> = inputs
        .iter()
        .enumerate()
        .rev()
        .map(|(i, _)| json!({"index": i, "embedding": [i as f32, 1.0]}))
        .collect();
    Json(json!({"data": data}))
}

async fn failing() -> (StatusCode, &'static str) {
    (StatusCode::SERVICE_UNAVAILABLE, "model loading")
}

async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/v1", addr)
}

async fn fake_openai() -> (String, Recorded) {
    let recorded = Recorded::default();
    let router = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/v1/embeddings", post(embeddings))
        .route("/v1/models", get(|| async { Json(json!({"data": []})) }))
        .with_state(recorded.clone());
    (spawn_server(router).await, recorded)
}

fn provider(base_url: &str, api_key: &str) -> OpenAiCompatProvider {
    OpenAiCompatProvider::new(base_url, "test-model", api_key, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn chat_parses_tool_calls_and_sends_bearer_token() {
    let (base_url, recorded) = fake_openai().await;
    let llm = provider(&base_url, "secret");

    let reply = llm
        .chat(ChatRequest::new(vec![ChatMessage::user("영업시간이 어떻게 되나요?")]))
        .await
        .unwrap();

    let calls = reply.tool_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].name, "retrieve_blog_posts");
    assert_eq!(calls[0].arguments, json!({"query": "영업시간"}));

    assert_eq!(recorded.auth.lock().unwrap().as_slice(), ["Bearer secret"]);
    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(bodies[0]["model"], "test-model");
    assert_eq!(bodies[0]["stream"], false);
}

#[tokio::test]
async fn chat_follow_up_with_tool_result_returns_answer() {
    let (base_url, _) = fake_openai().await;
    let llm = provider(&base_url, "");

    let first = llm
        .chat(ChatRequest::new(vec![ChatMessage::user("영업시간?")]))
        .await
        .unwrap();
    let call = first.tool_calls()[0].clone();
    let history = vec![
        ChatMessage::user("영업시간?"),
        first,
        ChatMessage::tool(call.id, call.name, "영업시간은 평일 오전 9시부터 오후 6시까지입니다."),
    ];

    let answer = llm.chat(ChatRequest::new(history)).await.unwrap();
    assert!(answer.tool_calls().is_empty());
    assert_eq!(answer.content(), "영업시간은 9시부터입니다.");
}

#[tokio::test]
async fn embeddings_come_back_in_input_order() {
    let (base_url, _) = fake_openai().await;
    let embedder = provider(&base_url, "");

    let inputs: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
    let vectors = embedder.embed(&inputs).await.unwrap();
    assert_eq!(vectors, vec![vec![0.0, 1.0], vec![1.0, 1.0], vec![2.0, 1.0]]);
}

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let router = Router::new()
        .route("/v1/chat/completions", post(failing))
        .route("/v1/embeddings", post(failing));
    let base_url = spawn_server(router).await;
    let client = provider(&base_url, "");

    let err = client
        .chat(ChatRequest::new(vec![ChatMessage::user("hi")]))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Upstream(ref m) if m.contains("503") && m.contains("model loading")));

    let err = client.embed(&["x".to_string()]).await.unwrap_err();
    assert!(matches!(err, ApiError::Upstream(_)));
}

#[tokio::test]
async fn health_check_reflects_models_endpoint() {
    let (base_url, _) = fake_openai().await;
    assert!(provider(&base_url, "").health_check().await.unwrap());

    let bare = spawn_server(Router::new()).await;
    assert!(!provider(&bare, "").health_check().await.unwrap());
}
