//! Webhook subscription handshake.

/// Verify a webhook subscription (GET request).
///
/// The platform sends `hub.mode=subscribe`, `hub.verify_token=<secret>`
/// and `hub.challenge=<random>`; returns `Some(challenge)` to echo back
/// when the mode and token match, `None` otherwise. The token is a
/// shared setup-time secret, so a plain equality check is sufficient.
#[must_use]
pub fn verify_webhook_subscription(
    mode: Option<&str>,
    token: Option<&str>,
    challenge: Option<&str>,
    expected_token: &str,
) -> Option<String> {
    let mode = mode?;
    let token = token?;
    let challenge = challenge?;

    if mode == "subscribe" && token == expected_token {
        Some(challenge.to_string())
    } else {
        None
    }
}
