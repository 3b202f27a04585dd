//! Webhook handshake (GET) and event ingestion (POST).

use {
    axum::{
        extract::{Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::Deserialize,
    tracing::{debug, info, warn},
};

use {
    wagate_common::now_millis,
    wagate_store::{ChatMessage, Direction},
    wagate_whatsapp::{extract_messages, verify_webhook_subscription},
};

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// `GET /webhook` — subscription handshake. Echoes the challenge as
/// plain text on a token match, 401 otherwise.
pub async fn verify_handler(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    match verify_webhook_subscription(
        params.mode.as_deref(),
        params.verify_token.as_deref(),
        params.challenge.as_deref(),
        &state.verify_token,
    ) {
        Some(challenge) => (StatusCode::OK, challenge).into_response(),
        None => {
            warn!(mode = ?params.mode, "webhook verification rejected");
            StatusCode::UNAUTHORIZED.into_response()
        },
    }
}

/// `POST /webhook` — event ingestion.
///
/// Always answers 200: the platform treats any other status as a failed
/// delivery and storms the endpoint with redeliveries, so parse failures
/// are logged and swallowed here.
pub async fn receive_handler(State(state): State<AppState>, body: String) -> StatusCode {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(payload) => {
            let messages = extract_messages(&payload);
            let count = messages.len();
            for msg in messages {
                let ts = now_millis();
                debug!(wa_id = %msg.wa_id, id = %msg.message_id, "storing inbound message");
                let wa_id = msg.wa_id;
                state.store.append(
                    &wa_id,
                    ChatMessage {
                        id: msg.message_id,
                        wa_id: wa_id.clone(),
                        direction: Direction::In,
                        body: msg.body,
                        ts,
                    },
                );
            }
            if count > 0 {
                info!(count, "webhook delivery processed");
            }
        },
        Err(e) => warn!(error = %e, "ignoring unparsable webhook body"),
    }
    StatusCode::OK
}
