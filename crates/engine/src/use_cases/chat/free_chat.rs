//! Free-form chat: one client message, one model reply.

use std::sync::Arc;

use crate::infrastructure::ports::{LlmError, LlmPort};

use super::ChatSession;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Empty message")]
    EmptyMessage,
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Relays a user message to a fresh chat session.
pub struct FreeChat {
    llm: Arc<dyn LlmPort>,
}

impl FreeChat {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    /// Reply to `message`. Surrounding whitespace is stripped before sending;
    /// the reply is returned exactly as generated.
    pub async fn execute(&self, message: &str) -> Result<String, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let mut session = ChatSession::new(self.llm.clone());
        let reply = session.send(message).await?;
        tracing::debug!(reply_len = reply.len(), "Chat reply generated");
        Ok(reply)
    }
}
