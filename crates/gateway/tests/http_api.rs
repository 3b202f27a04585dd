//! Integration tests for the relay HTTP surface: webhook handshake and
//! ingestion, conversation queries, and the send endpoint with the
//! Cloud API simulated by mockito.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;

use {secrecy::Secret, serde_json::json, tokio::net::TcpListener};

use {
    wagate_config::WagateConfig,
    wagate_gateway::{AppState, build_app},
};

const VERIFY_TOKEN: &str = "vt-secret";

/// Start a test server whose Cloud API client points at `api_base`.
async fn start_server(api_base: &str) -> SocketAddr {
    let mut config = WagateConfig::default();
    config.whatsapp.access_token = Secret::new("test-token".into());
    config.whatsapp.phone_number_id = "10001".into();
    config.whatsapp.verify_token = VERIFY_TOKEN.into();
    config.whatsapp.api_base = api_base.into();

    let app = build_app(AppState::new(&config));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Server with no usable upstream; fine for tests that never send.
async fn start_isolated_server() -> SocketAddr {
    start_server("http://127.0.0.1:9").await
}

fn text_webhook(from: &str, id: &str, body: &str) -> serde_json::Value {
    json!({
        "object": "whatsapp_business_account",
        "entry": [{
            "changes": [{
                "field": "messages",
                "value": {
                    "messages": [{
                        "from": from,
                        "id": id,
                        "type": "text",
                        "text": { "body": body }
                    }]
                }
            }]
        }]
    })
}

#[tokio::test]
async fn verify_echoes_challenge_for_correct_token() {
    let addr = start_isolated_server().await;
    let resp = reqwest::get(format!(
        "http://{addr}/webhook?hub.mode=subscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=ch-42"
    ))
    .await
    .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "ch-42");
}

#[tokio::test]
async fn verify_rejects_wrong_token_and_mode() {
    let addr = start_isolated_server().await;

    let wrong_token = reqwest::get(format!(
        "http://{addr}/webhook?hub.mode=subscribe&hub.verify_token=guess&hub.challenge=ch"
    ))
    .await
    .unwrap();
    assert_eq!(wrong_token.status(), 401);

    let wrong_mode = reqwest::get(format!(
        "http://{addr}/webhook?hub.mode=unsubscribe&hub.verify_token={VERIFY_TOKEN}&hub.challenge=ch"
    ))
    .await
    .unwrap();
    assert_eq!(wrong_mode.status(), 401);

    let no_params = reqwest::get(format!("http://{addr}/webhook")).await.unwrap();
    assert_eq!(no_params.status(), 401);
}

#[tokio::test]
async fn webhook_text_message_lands_in_history() {
    let addr = start_isolated_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/webhook"))
        .body(text_webhook("5551234", "wamid.1", "hi").to_string())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let messages: serde_json::Value = client
        .get(format!("http://{addr}/api/messages/5551234"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["body"], "hi");
    assert_eq!(messages[0]["direction"], "in");
    assert_eq!(messages[0]["wa_id"], "5551234");
    assert_eq!(messages[0]["id"], "wamid.1");
}

#[tokio::test]
async fn webhook_interactive_messages_store_titles_or_placeholder() {
    let addr = start_isolated_server().await;
    let client = reqwest::Client::new();

    let payload = json!({
        "entry": [{
            "changes": [{
                "value": { "messages": [
                    {
                        "from": "5559999",
                        "id": "wamid.a",
                        "type": "interactive",
                        "interactive": { "button_reply": { "id": "y", "title": "Yes" } }
                    },
                    {
                        "from": "5559999",
                        "id": "wamid.b",
                        "type": "interactive",
                        "interactive": { "type": "nfm_reply" }
                    }
                ] }
            }]
        }]
    });
    client
        .post(format!("http://{addr}/webhook"))
        .body(payload.to_string())
        .send()
        .await
        .unwrap();

    let messages: serde_json::Value = client
        .get(format!("http://{addr}/api/messages/5559999"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let bodies: Vec<_> = messages
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["body"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(bodies, ["Yes", "(interactive)"]);
}

#[tokio::test]
async fn unparsable_webhook_still_returns_200_and_stores_nothing() {
    let addr = start_isolated_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/webhook"))
        .body("{this is not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let conversations: serde_json::Value = client
        .get(format!("http://{addr}/api/conversations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(conversations.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_contact_returns_empty_array() {
    let addr = start_isolated_server().await;
    let messages: serde_json::Value = reqwest::get(format!("http://{addr}/api/messages/7770000"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(messages.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn conversations_are_most_recent_first() {
    let addr = start_isolated_server().await;
    let client = reqwest::Client::new();

    client
        .post(format!("http://{addr}/webhook"))
        .body(text_webhook("111", "wamid.1", "older").to_string())
        .send()
        .await
        .unwrap();
    // Receipt timestamps are millisecond-resolution; space the deliveries.
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    client
        .post(format!("http://{addr}/webhook"))
        .body(text_webhook("222", "wamid.2", "newer").to_string())
        .send()
        .await
        .unwrap();

    let conversations: serde_json::Value = client
        .get(format!("http://{addr}/api/conversations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let conversations = conversations.as_array().unwrap();
    assert_eq!(conversations.len(), 2);
    assert_eq!(conversations[0]["waId"], "222");
    assert_eq!(conversations[0]["lastBody"], "newer");
    assert_eq!(conversations[1]["waId"], "111");
    assert!(conversations[0]["lastTs"].as_i64() >= conversations[1]["lastTs"].as_i64());
}

#[tokio::test]
async fn send_with_blank_to_is_rejected_and_stores_nothing() {
    let addr = start_isolated_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/send"))
        .json(&json!({ "to": "", "text": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("to"));

    let conversations: serde_json::Value = client
        .get(format!("http://{addr}/api/conversations"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(conversations.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn send_success_passes_body_through_and_logs_outbound_message() {
    let mut upstream = mockito::Server::new_async().await;
    let upstream_body = r#"{"messaging_product":"whatsapp","messages":[{"id":"wamid.SENT"}]}"#;
    let mock = upstream
        .mock("POST", "/v20.0/10001/messages")
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(upstream_body)
        .create_async()
        .await;

    let addr = start_server(&upstream.url()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/send"))
        .json(&json!({ "to": "5551234", "text": "hello there" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), upstream_body);
    mock.assert_async().await;

    let messages: serde_json::Value = client
        .get(format!("http://{addr}/api/messages/5551234"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let messages = messages.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["direction"], "out");
    assert_eq!(messages[0]["body"], "hello there");
    assert!(messages[0]["id"].as_str().unwrap().starts_with("out-"));
}

#[tokio::test]
async fn send_passes_reply_context_upstream() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("POST", "/v20.0/10001/messages")
        .match_body(mockito::Matcher::PartialJson(json!({
            "context": { "message_id": "wamid.QUOTED" }
        })))
        .with_status(200)
        .with_body(r#"{"messages":[{"id":"wamid.R"}]}"#)
        .create_async()
        .await;

    let addr = start_server(&upstream.url()).await;
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/send"))
        .json(&json!({ "to": "5551234", "text": "re: hi", "replyTo": "wamid.QUOTED" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    mock.assert_async().await;
}

#[tokio::test]
async fn upstream_failure_is_proxied_and_not_logged() {
    let mut upstream = mockito::Server::new_async().await;
    let error_body = r#"{"error":{"message":"(#131030) Recipient not in allowed list"}}"#;
    upstream
        .mock("POST", "/v20.0/10001/messages")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(error_body)
        .create_async()
        .await;

    let addr = start_server(&upstream.url()).await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/send"))
        .json(&json!({ "to": "5551234", "text": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(resp.text().await.unwrap(), error_body);

    let messages: serde_json::Value = client
        .get(format!("http://{addr}/api/messages/5551234"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(messages.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_upstream_surfaces_as_failed_send() {
    let addr = start_isolated_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("http://{addr}/api/send"))
        .json(&json!({ "to": "5551234", "text": "hello" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().is_some());

    let messages: serde_json::Value = client
        .get(format!("http://{addr}/api/messages/5551234"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(messages.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn health_reports_ok() {
    let addr = start_isolated_server().await;
    let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}
