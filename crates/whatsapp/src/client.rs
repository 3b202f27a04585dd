//! Outbound send client for the Cloud API.

use std::time::Duration;

use {
    secrecy::ExposeSecret,
    serde_json::{Value, json},
    tracing::{debug, info, warn},
};

use wagate_config::WhatsAppConfig;

use crate::error::{Context, Result};

/// Raw upstream reply from one send call. The gateway trusts the status
/// and body verbatim and proxies them to its own caller.
#[derive(Debug, Clone)]
pub struct SendResponse {
    pub status: u16,
    pub body: String,
}

impl SendResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thin client for `POST /<version>/<phone_number_id>/messages`.
pub struct CloudApiClient {
    http: reqwest::Client,
    config: WhatsAppConfig,
}

impl CloudApiClient {
    #[must_use]
    pub fn new(config: WhatsAppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Send one plain-text message. No retry; a transport error or
    /// timeout surfaces as `Err`, an upstream rejection surfaces as a
    /// non-success [`SendResponse`].
    pub async fn send_text(
        &self,
        to: &str,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<SendResponse> {
        let payload = build_text_payload(to, text, reply_to);
        debug!(to, reply_to = ?reply_to, text_len = text.len(), "cloud api send start");

        let response = self
            .http
            .post(self.messages_url())
            .bearer_auth(self.config.access_token.expose_secret())
            .timeout(Duration::from_secs(self.config.send_timeout_secs))
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("reading cloud api response body")?;

        let reply = SendResponse { status, body };
        if reply.is_success() {
            info!(to, status, "cloud api send ok");
        } else {
            warn!(to, status, body = %reply.body, "cloud api send rejected");
        }
        Ok(reply)
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/messages",
            self.config.api_base.trim_end_matches('/'),
            self.config.api_version,
            self.config.phone_number_id,
        )
    }
}

/// Build the Cloud API text-message payload, with an optional
/// reply-context referencing the quoted message id.
fn build_text_payload(to: &str, text: &str, reply_to: Option<&str>) -> Value {
    let mut payload = json!({
        "messaging_product": "whatsapp",
        "to": to,
        "type": "text",
        "text": { "body": text },
    });
    if let Some(reply_to) = reply_to.filter(|id| !id.trim().is_empty()) {
        payload["context"] = json!({ "message_id": reply_to });
    }
    payload
}
