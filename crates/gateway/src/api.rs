//! Read-only conversation views and the send endpoint.

use {
    axum::{
        Json,
        extract::{Path, State},
        http::{StatusCode, header},
        response::{IntoResponse, Response},
    },
    serde::Deserialize,
    serde_json::json,
    tracing::warn,
};

use {
    wagate_common::now_millis,
    wagate_store::{ChatMessage, ConversationSummary, Direction},
};

use crate::state::AppState;

/// `GET /api/conversations` — one summary per contact, most recent
/// first. The store has no ordering contract, so the sort lives here.
pub async fn conversations_handler(
    State(state): State<AppState>,
) -> Json<Vec<ConversationSummary>> {
    let mut conversations = state.store.list_conversations();
    conversations.sort_by_key(|c| std::cmp::Reverse(c.last_ts));
    Json(conversations)
}

/// `GET /api/messages/{wa_id}` — chronological history, empty array for
/// an unknown contact.
pub async fn messages_handler(
    State(state): State<AppState>,
    Path(wa_id): Path<String>,
) -> Json<Vec<ChatMessage>> {
    Json(state.store.get(&wa_id))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub reply_to: Option<String>,
}

/// `POST /api/send` — forward one text reply to the Cloud API and log
/// it as an outbound message on success. Upstream failures are proxied
/// through unchanged (status and body); nothing is appended for them.
pub async fn send_handler(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Response {
    let mut missing = Vec::new();
    if req.to.trim().is_empty() {
        missing.push("to");
    }
    if req.text.trim().is_empty() {
        missing.push("text");
    }
    if !missing.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": format!("missing required field(s): {}", missing.join(", ")),
            })),
        )
            .into_response();
    }

    let reply = match state
        .whatsapp
        .send_text(&req.to, &req.text, req.reply_to.as_deref())
        .await
    {
        Ok(reply) => reply,
        Err(e) => {
            warn!(to = %req.to, error = %e, "send failed before reaching the cloud api");
            return (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response();
        },
    };

    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    if !reply.is_success() {
        return (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            reply.body,
        )
            .into_response();
    }

    let ts = now_millis();
    state.store.append(
        &req.to,
        ChatMessage {
            // Local time-derived id; the wamid in the upstream body is
            // not parsed (known limitation).
            id: format!("out-{ts}"),
            wa_id: req.to.clone(),
            direction: Direction::Out,
            body: req.text.clone(),
            ts,
        },
    );

    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}
