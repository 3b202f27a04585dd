use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

use crate::message::{ChatMessage, ConversationSummary};

type MessageList = Arc<Mutex<Vec<ChatMessage>>>;

/// Process-wide map of contact id to message history.
///
/// Two-level locking: the outer `RwLock` only guards the map structure
/// (creating a contact's list), each inner `Mutex` guards one contact's
/// messages. Appends to different contacts never contend beyond the
/// brief read of the outer map, and no lock is ever held across an
/// `.await` point — all operations here are synchronous snapshots or
/// pushes.
#[derive(Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, MessageList>>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` to the history for `wa_id`, creating the history
    /// if this is the first message from that contact. Never fails.
    pub fn append(&self, wa_id: &str, message: ChatMessage) {
        let list = self.list_for(wa_id);
        let mut messages = list.lock().unwrap_or_else(|e| e.into_inner());
        messages.push(message);
    }

    /// All messages for `wa_id`, ordered by timestamp ascending with ties
    /// in insertion order. Empty for an unknown contact.
    #[must_use]
    pub fn get(&self, wa_id: &str) -> Vec<ChatMessage> {
        let conversations = self.conversations.read().unwrap_or_else(|e| e.into_inner());
        let Some(list) = conversations.get(wa_id).map(Arc::clone) else {
            return Vec::new();
        };
        drop(conversations);

        let mut snapshot = {
            let messages = list.lock().unwrap_or_else(|e| e.into_inner());
            messages.clone()
        };
        // Appends arrive in insertion order, so a stable sort keeps ties
        // in that order.
        snapshot.sort_by_key(|m| m.ts);
        snapshot
    }

    /// One summary per known contact, in no particular order. A contact
    /// whose list is observed empty yields an empty body and `i64::MIN`
    /// rather than failing.
    #[must_use]
    pub fn list_conversations(&self) -> Vec<ConversationSummary> {
        let lists: Vec<(String, MessageList)> = {
            let conversations = self.conversations.read().unwrap_or_else(|e| e.into_inner());
            conversations
                .iter()
                .map(|(wa_id, list)| (wa_id.clone(), Arc::clone(list)))
                .collect()
        };

        lists
            .into_iter()
            .map(|(wa_id, list)| {
                let messages = list.lock().unwrap_or_else(|e| e.into_inner());
                let last = messages.iter().max_by_key(|m| m.ts);
                ConversationSummary {
                    wa_id,
                    last_body: last.map(|m| m.body.clone()).unwrap_or_default(),
                    last_ts: last.map_or(i64::MIN, |m| m.ts),
                }
            })
            .collect()
    }

    /// Fetch or create the message list for `wa_id`.
    fn list_for(&self, wa_id: &str) -> MessageList {
        {
            let conversations = self.conversations.read().unwrap_or_else(|e| e.into_inner());
            if let Some(list) = conversations.get(wa_id) {
                return Arc::clone(list);
            }
        }
        let mut conversations = self
            .conversations
            .write()
            .unwrap_or_else(|e| e.into_inner());
        Arc::clone(
            conversations
                .entry(wa_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Vec::new()))),
        )
    }
}
