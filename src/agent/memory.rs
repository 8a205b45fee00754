//! Conversation memory shared by every agent a session builds.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::types::ModelMessage;

/// Manages a conversation's message history.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<ModelMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user message.
    pub fn add_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(ModelMessage::user(text));
    }

    /// Add an assistant message.
    pub fn add_assistant_message(&mut self, text: impl Into<String>) {
        self.messages.push(ModelMessage::assistant(text));
    }

    /// Get all messages.
    pub fn messages(&self) -> &[ModelMessage] {
        &self.messages
    }

    /// Get the last N messages.
    pub fn last_n(&self, n: usize) -> &[ModelMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Clear all messages.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Cloneable handle to one [`Conversation`].
///
/// Clones share the same underlying conversation, so an agent rebuilt for a
/// new country keeps talking with the memory its predecessor accumulated.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    inner: Arc<Mutex<Conversation>>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages to send as context, optionally limited to the most recent
    /// `window_turns` exchanges. A turn is always sent whole: the question
    /// together with the answer it got.
    pub async fn context(&self, window_turns: Option<usize>) -> Vec<ModelMessage> {
        let conversation = self.inner.lock().await;
        match window_turns {
            Some(turns) => conversation.last_n(turns.saturating_mul(2)).to_vec(),
            None => conversation.messages().to_vec(),
        }
    }

    /// Record one completed exchange.
    pub async fn record_turn(&self, user: impl Into<String>, assistant: impl Into<String>) {
        let mut conversation = self.inner.lock().await;
        conversation.add_user_message(user);
        conversation.add_assistant_message(assistant);
    }

    pub async fn clear(&self) {
        self.inner.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }

    /// Whether two handles point at the same conversation.
    pub fn shares_with(&self, other: &ConversationMemory) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
