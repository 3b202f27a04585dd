use secrecy::ExposeSecret;

use crate::schema::{DEFAULT_VERIFY_TOKEN, WagateConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One finding from config validation.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub field: &'static str,
    pub message: String,
}

impl Diagnostic {
    fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field,
            message: message.into(),
        }
    }
}

/// Check a loaded config for likely misconfiguration.
///
/// Everything here is a warning: the gateway still starts and serves
/// queries with incomplete credentials, only sends and the webhook
/// handshake degrade.
#[must_use]
pub fn validate(config: &WagateConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if config.whatsapp.verify_token == DEFAULT_VERIFY_TOKEN {
        diagnostics.push(Diagnostic::warning(
            "whatsapp.verify_token",
            "using the placeholder verify token; set your own before subscribing the webhook",
        ));
    }
    if config.whatsapp.access_token.expose_secret().is_empty() {
        diagnostics.push(Diagnostic::warning(
            "whatsapp.access_token",
            "no access token configured; outbound sends will be rejected by the Cloud API",
        ));
    }
    if config.whatsapp.phone_number_id.is_empty() {
        diagnostics.push(Diagnostic::warning(
            "whatsapp.phone_number_id",
            "no phone number id configured; outbound sends have no routing id",
        ));
    }

    diagnostics
}
