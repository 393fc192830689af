use super::types::{ChatMessage, Role, Source};
use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

struct Inner {
    messages: Vec<ChatMessage>,
    /// Id of the single assistant message currently accumulating a stream.
    open: Option<Uuid>,
}

/// Thread-safe, append-only chat transcript.
///
/// At most one assistant message is "open" at a time: while a text stream is
/// in flight its accumulated content replaces the open message in place.
/// Consecutive voice transcript fragments of the same role grow one message
/// instead of creating an entry per fragment.
#[derive(Clone)]
pub struct MessageStorage {
    inner: Arc<RwLock<Inner>>,
}

impl MessageStorage {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                messages: Vec::new(),
                open: None,
            })),
        }
    }

    pub fn push(&self, message: ChatMessage) {
        self.inner.write().messages.push(message);
    }

    /// Open the streaming assistant slot. Any previously open message is
    /// closed first, preserving the at-most-one-open invariant.
    pub fn begin_assistant(&self) -> Uuid {
        let mut inner = self.inner.write();
        let message = ChatMessage::new(Role::Assistant, "");
        let id = message.id;
        inner.messages.push(message);
        inner.open = Some(id);
        id
    }

    /// Replace the open message's content with the accumulated text so far.
    /// A no-op when no message is open (e.g. a late fragment after clear).
    pub fn set_open_text(&self, text: &str) {
        let mut inner = self.inner.write();
        if let Some(id) = inner.open {
            if let Some(message) = inner.messages.iter_mut().find(|m| m.id == id) {
                message.content.clear();
                message.content.push_str(text);
            }
        }
    }

    /// Close the open slot, optionally replacing its content with a failure
    /// notice that the UI styles as an error.
    pub fn close_open(&self, failure: Option<&str>) {
        let mut inner = self.inner.write();
        if let Some(id) = inner.open.take() {
            if let Some(message) = inner.messages.iter_mut().find(|m| m.id == id) {
                if let Some(notice) = failure {
                    message.content = notice.to_string();
                    message.is_error = true;
                }
            }
        }
    }

    pub fn has_open(&self) -> bool {
        self.inner.read().open.is_some()
    }

    /// Append a voice transcript fragment, coalescing with the previous
    /// message when it has the same role and is itself a voice message.
    pub fn coalesce_voice(&self, role: Role, fragment: &str) {
        let mut inner = self.inner.write();
        match inner.messages.last_mut() {
            Some(last) if last.role == role && last.source == Source::Voice => {
                last.content.push_str(fragment);
            }
            _ => {
                inner.messages.push(ChatMessage::voice(role, fragment));
            }
        }
    }

    pub fn get_all(&self) -> Vec<ChatMessage> {
        self.inner.read().messages.clone()
    }

    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.messages.clear();
        inner.open = None;
    }

    pub fn len(&self) -> usize {
        self.inner.read().messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().messages.is_empty()
    }
}

impl Default for MessageStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_get() {
        let storage = MessageStorage::new();
        storage.push(ChatMessage::new(Role::User, "hello"));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get_all()[0].content, "hello");
    }

    #[test]
    fn test_open_slot_accumulates() {
        let storage = MessageStorage::new();
        storage.push(ChatMessage::new(Role::User, "hi"));
        storage.begin_assistant();
        assert!(storage.has_open());

        storage.set_open_text("Wel");
        storage.set_open_text("Welcome");
        let all = storage.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].content, "Welcome");

        storage.close_open(None);
        assert!(!storage.has_open());
        assert_eq!(storage.get_all()[1].content, "Welcome");
    }

    #[test]
    fn test_close_with_failure_marks_error() {
        let storage = MessageStorage::new();
        storage.begin_assistant();
        storage.close_open(Some("Error: Could not connect to the AI service."));
        let all = storage.get_all();
        assert!(all[0].is_error);
        assert_eq!(all[0].content, "Error: Could not connect to the AI service.");
    }

    #[test]
    fn test_voice_fragments_coalesce_by_role() {
        let storage = MessageStorage::new();
        storage.coalesce_voice(Role::User, "turn on ");
        storage.coalesce_voice(Role::User, "the aerator");
        storage.coalesce_voice(Role::Assistant, "Turning it on");
        storage.coalesce_voice(Role::Assistant, " now.");

        let all = storage.get_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].content, "turn on the aerator");
        assert_eq!(all[1].content, "Turning it on now.");
    }

    #[test]
    fn test_typed_message_breaks_coalescing() {
        let storage = MessageStorage::new();
        storage.coalesce_voice(Role::User, "first");
        storage.push(ChatMessage::new(Role::User, "typed"));
        storage.coalesce_voice(Role::User, "second");
        assert_eq!(storage.len(), 3);
    }

    #[test]
    fn test_clear_drops_open_slot() {
        let storage = MessageStorage::new();
        storage.begin_assistant();
        storage.clear();
        assert!(storage.is_empty());
        assert!(!storage.has_open());

        // A late fragment after clear must not resurrect anything.
        storage.set_open_text("stale");
        assert!(storage.is_empty());
    }
}
