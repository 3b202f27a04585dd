use std::sync::Arc;

use {wagate_config::WagateConfig, wagate_store::ConversationStore, wagate_whatsapp::CloudApiClient};

/// Shared app state, constructed once at startup and cloned into every
/// handler. The store lives here rather than in a global so a persistent
/// backing store can be substituted without touching handler contracts.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConversationStore>,
    pub whatsapp: Arc<CloudApiClient>,
    pub verify_token: String,
}

impl AppState {
    #[must_use]
    pub fn new(config: &WagateConfig) -> Self {
        Self {
            store: Arc::new(ConversationStore::new()),
            whatsapp: Arc::new(CloudApiClient::new(config.whatsapp.clone())),
            verify_token: config.whatsapp.verify_token.clone(),
        }
    }
}
