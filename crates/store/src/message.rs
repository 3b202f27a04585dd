use serde::{Deserialize, Serialize};

/// Direction of a message relative to this gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Received from the contact via the webhook.
    In,
    /// Sent by us through the Cloud API.
    Out,
}

/// One message in a conversation.
///
/// `id` is the platform message id (wamid) for inbound messages, or a
/// locally synthesized `out-<millis>` id for outbound ones. Unique per
/// conversation, not system-wide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub wa_id: String,
    pub direction: Direction,
    pub body: String,
    /// Receipt/send time in unix milliseconds. Ordering key.
    pub ts: i64,
}

/// Derived per-contact view: the most recent message. Never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub wa_id: String,
    pub last_body: String,
    pub last_ts: i64,
}
