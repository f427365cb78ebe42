use serde::{Deserialize, Serialize};

/// Role tag for a chat message, serialized the way the completion API
/// expects it (`"user"`, `"assistant"`, `"system"`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single role-tagged message. Insertion order in the transcript is the
/// only ordering guarantee; there are no timestamps.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Sentinel content for the transient assistant entry shown while a reply
/// is pending. The renderer draws this as an animated indicator and the
/// outbound request never includes it.
pub const PENDING_REPLY: &str = "Thinking...";

/// Ordered sequence of role-tagged messages for one conversation session.
///
/// The system prompt is *not* stored here; `for_gateway` prepends it when
/// building the outbound message list. All error paths resolve into regular
/// assistant messages, so the transcript stays the single source of
/// user-visible truth.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transcript {
    pub messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(content));
    }

    /// Appends the pending-reply placeholder.
    pub fn push_pending(&mut self) {
        self.messages.push(ChatMessage::assistant(PENDING_REPLY));
    }

    /// Removes the trailing placeholder, if present. Returns whether one was
    /// removed. Only the *last* entry is considered; an assistant reply that
    /// happens to contain the sentinel text elsewhere is left alone.
    pub fn take_pending(&mut self) -> bool {
        if self.has_pending() {
            self.messages.pop();
            return true;
        }
        false
    }

    /// True when the last entry is the pending-reply placeholder.
    pub fn has_pending(&self) -> bool {
        matches!(
            self.messages.last(),
            Some(msg) if msg.role == Role::Assistant && msg.content == PENDING_REPLY
        )
    }

    /// Content of the most recent user message, if any.
    pub fn last_user_content(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|msg| msg.role == Role::User)
            .map(|msg| msg.content.as_str())
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Builds the outbound message list: exactly one system entry followed by
    /// the accumulated user/assistant history in order, placeholder excluded.
    pub fn for_gateway(&self, system_prompt: &str) -> Vec<ChatMessage> {
        let mut out = Vec::with_capacity(self.messages.len() + 1);
        out.push(ChatMessage::system(system_prompt));
        out.extend(
            self.messages
                .iter()
                .filter(|msg| !(msg.role == Role::Assistant && msg.content == PENDING_REPLY))
                .cloned(),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_gateway_starts_with_system_prompt() {
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        transcript.push_assistant("hi");

        let out = transcript.for_gateway("be helpful");
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].role, Role::System);
        assert_eq!(out[0].content, "be helpful");
        assert_eq!(out[1].role, Role::User);
        assert_eq!(out[2].role, Role::Assistant);
    }

    #[test]
    fn test_for_gateway_excludes_placeholder() {
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        transcript.push_pending();

        let out = transcript.for_gateway("prompt");
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|msg| msg.content != PENDING_REPLY));
    }

    #[test]
    fn test_take_pending_removes_only_placeholder() {
        let mut transcript = Transcript::new();
        transcript.push_user("hello");
        assert!(!transcript.take_pending());
        assert_eq!(transcript.len(), 1);

        transcript.push_pending();
        assert!(transcript.take_pending());
        assert_eq!(transcript.len(), 1);
    }

    #[test]
    fn test_has_pending_ignores_user_sentinel_text() {
        let mut transcript = Transcript::new();
        transcript.push_user(PENDING_REPLY);
        assert!(!transcript.has_pending());
    }

    #[test]
    fn test_last_user_content() {
        let mut transcript = Transcript::new();
        assert!(transcript.last_user_content().is_none());
        transcript.push_user("first");
        transcript.push_assistant("reply");
        transcript.push_user("second");
        assert_eq!(transcript.last_user_content(), Some("second"));
    }
}
