//! Normalization of inbound webhook payloads.
//!
//! The event-notification body nests messages under
//! `entry[].changes[].value.messages[]`; anything malformed at any level
//! is skipped silently so one bad entry never fails the whole delivery.

use {serde_json::Value, tracing::debug, uuid::Uuid};

/// A flat chat message extracted from one webhook `messages[]` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMessage {
    pub wa_id: String,
    pub message_id: String,
    pub body: String,
}

/// Walk a full event-notification payload and normalize every message
/// found in it.
#[must_use]
pub fn extract_messages(payload: &Value) -> Vec<NormalizedMessage> {
    let mut normalized = Vec::new();
    let Some(entries) = payload.get("entry").and_then(Value::as_array) else {
        return normalized;
    };
    for entry in entries {
        let Some(changes) = entry.get("changes").and_then(Value::as_array) else {
            continue;
        };
        for change in changes {
            let messages = change
                .get("value")
                .and_then(|value| value.get("messages"))
                .and_then(Value::as_array);
            let Some(messages) = messages else {
                continue;
            };
            for message in messages {
                match normalize(message) {
                    Some(msg) => normalized.push(msg),
                    None => debug!("dropping inbound message without a sender"),
                }
            }
        }
    }
    normalized
}

/// Normalize one `messages[]` object, or `None` to drop it (no sender).
///
/// A missing platform message id gets a freshly generated one; an
/// unsupported `type` falls back to a bracketed type marker so the
/// conversation log still shows that something arrived.
#[must_use]
pub fn normalize(message: &Value) -> Option<NormalizedMessage> {
    let wa_id = message
        .get("from")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|from| !from.is_empty())?;

    let message_id = message
        .get("id")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().simple().to_string());

    let kind = message.get("type").and_then(Value::as_str).unwrap_or("unknown");
    let body = extract_body(message, kind).unwrap_or_else(|| format!("[{kind}]"));

    Some(NormalizedMessage {
        wa_id: wa_id.to_string(),
        message_id,
        body,
    })
}

fn extract_body(message: &Value, kind: &str) -> Option<String> {
    match kind {
        "text" => nested_str(message, &["text", "body"]).map(String::from),
        "button" => nested_str(message, &["button", "text"]).map(String::from),
        "interactive" => {
            let title = nested_str(message, &["interactive", "button_reply", "title"])
                .or_else(|| nested_str(message, &["interactive", "list_reply", "title"]));
            Some(title.map_or_else(|| "(interactive)".to_string(), String::from))
        },
        _ => None,
    }
}

/// Optional-chaining lookup: each missing level is an explicit absence,
/// never an error.
fn nested_str<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    current.as_str()
}
