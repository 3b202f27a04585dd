use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Placeholder verify token used when none is configured. Kept working so a
/// fresh install can complete the webhook handshake, but flagged by
/// [`crate::validate`] so operators replace it.
pub const DEFAULT_VERIFY_TOKEN: &str = "my_verify_token";

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WagateConfig {
    pub server: ServerConfig,
    pub whatsapp: WhatsAppConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to. Defaults to "127.0.0.1".
    pub bind: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

/// WhatsApp Cloud API credentials and routing.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhatsAppConfig {
    /// Bearer token for the Cloud API send endpoint.
    #[serde(serialize_with = "serialize_secret")]
    pub access_token: Secret<String>,

    /// Business phone number id, the routing id for outbound sends.
    pub phone_number_id: String,

    /// Shared secret checked during the webhook subscription handshake.
    pub verify_token: String,

    /// Graph API origin. Overridable so tests can point at a local server.
    pub api_base: String,

    /// Graph API version path segment.
    pub api_version: String,

    /// Timeout for a single outbound send, in seconds.
    pub send_timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: Secret::new(String::new()),
            phone_number_id: String::new(),
            verify_token: DEFAULT_VERIFY_TOKEN.into(),
            api_base: "https://graph.facebook.com".into(),
            api_version: "v20.0".into(),
            send_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for WhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhatsAppConfig")
            .field("access_token", &"[REDACTED]")
            .field("phone_number_id", &self.phone_number_id)
            .field("api_base", &self.api_base)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

fn serialize_secret<S: serde::Serializer>(
    secret: &Secret<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}
