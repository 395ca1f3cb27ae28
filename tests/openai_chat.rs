// OpenAiChat against a local stub of the chat-completions endpoint

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use g28_filler::error::Error;
use g28_filler::{ApplicantRecord, ChatModel, LlmConfig, LlmMapper, OpenAiChat, Section};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn chat_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

/// Replies with the request it received, plus the authorization header.
async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let seen = json!({
        "authorization": headers.get("authorization").and_then(|v| v.to_str().ok()),
        "request": body,
    });
    Json(chat_reply(&seen.to_string()))
}

fn config(base_url: String) -> LlmConfig {
    let mut config = LlmConfig::new("sk-test");
    config.base_url = base_url;
    config
}

#[tokio::test]
async fn sends_model_temperature_and_both_messages() {
    let base_url = serve(Router::new().route("/v1/chat/completions", post(echo))).await;
    let chat = OpenAiChat::new(config(base_url));

    let reply = chat.complete("system text", "user text").await.expect("request failed");
    let seen: Value = serde_json::from_str(&reply).unwrap();

    assert_eq!(seen["authorization"], "Bearer sk-test");
    assert_eq!(seen["request"]["model"], "gpt-4o");
    assert_eq!(seen["request"]["temperature"], 0.0);
    assert_eq!(
        seen["request"]["messages"],
        json!([
            { "role": "system", "content": "system text" },
            { "role": "user", "content": "user text" }
        ])
    );
}

#[tokio::test]
async fn error_status_becomes_model_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "rate limited") }),
    );
    let chat = OpenAiChat::new(config(serve(app).await));

    let err = chat.complete("s", "u").await.unwrap_err();

    match err {
        Error::ModelError(msg) => {
            assert!(msg.contains("429"), "{msg}");
            assert!(msg.contains("rate limited"), "{msg}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn empty_choices_is_an_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let chat = OpenAiChat::new(config(serve(app).await));

    assert!(matches!(chat.complete("s", "u").await, Err(Error::ModelError(_))));
}

#[tokio::test]
async fn mapper_parses_fenced_reply_from_endpoint() {
    let content = "```json\n[{\"section\": \"attorney\", \"label\": \"3. I am associated with\", \"value\": true}]\n```";
    let reply = chat_reply(content);
    let app = Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let reply = reply.clone();
            async move { Json(reply) }
        }),
    );
    let mapper = LlmMapper::new(OpenAiChat::new(config(serve(app).await)));

    let mappings = mapper
        .get_mapping("<form></form>", &ApplicantRecord::sample())
        .await;

    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].section, Section::Attorney);
    assert_eq!(mappings[0].value, "yes");
}

#[tokio::test]
async fn unreachable_endpoint_maps_to_nothing() {
    // nothing listens on the discard port
    let mapper = LlmMapper::new(OpenAiChat::new(config("http://127.0.0.1:9/v1".into())));

    let mappings = mapper
        .get_mapping("<form></form>", &ApplicantRecord::sample())
        .await;

    assert!(mappings.is_empty());
}
