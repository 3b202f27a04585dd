//! In-memory conversation log keyed by WhatsApp contact id.
//!
//! Process-lifetime only; data loss on restart is accepted behavior.
//! The store is constructed once at startup and injected into every
//! handler so a persistent backing store can be swapped in later.

pub mod message;
pub mod store;

pub use {
    message::{ChatMessage, ConversationSummary, Direction},
    store::ConversationStore,
};
