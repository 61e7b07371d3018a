//! Multi-turn conversation with the text model.

use std::sync::Arc;

use crate::infrastructure::ports::{ChatMessage, LlmError, LlmPort, LlmRequest};

/// Conversation state for one request's worth of prompts.
///
/// Each `send` replays the whole history so later prompts see earlier answers.
/// Sessions are never shared between requests.
pub struct ChatSession {
    llm: Arc<dyn LlmPort>,
    history: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self {
            llm,
            history: Vec::new(),
        }
    }

    /// Send a user message and return the model's reply text.
    pub async fn send(&mut self, message: impl Into<String>) -> Result<String, LlmError> {
        self.history.push(ChatMessage::user(message));

        let request = LlmRequest::new(self.history.clone());

        let response = match self.llm.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                // Drop the unanswered turn.
                self.history.pop();
                return Err(e);
            }
        };

        self.history.push(ChatMessage::assistant(response.content.clone()));
        Ok(response.content)
    }
}

#[cfg(test)]
impl ChatSession {
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{LlmResponse, MessageRole, MockLlmPort};

    #[tokio::test]
    async fn send_replays_history() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .times(2)
            .returning(|request| {
                let turns = request.messages.len();
                Ok(LlmResponse::text(format!("reply after {turns} turns")))
            });

        let mut session = ChatSession::new(Arc::new(llm));
        assert_eq!(session.send("one").await.unwrap(), "reply after 1 turns");
        assert_eq!(session.send("two").await.unwrap(), "reply after 3 turns");

        let roles: Vec<MessageRole> = session.history().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                MessageRole::User,
                MessageRole::Assistant,
                MessageRole::User,
                MessageRole::Assistant
            ]
        );
    }

    #[tokio::test]
    async fn failed_turn_is_not_kept() {
        let mut llm = MockLlmPort::new();
        llm.expect_generate()
            .returning(|_| Err(LlmError::RequestFailed("boom".into())));

        let mut session = ChatSession::new(Arc::new(llm));
        assert!(session.send("hello").await.is_err());
        assert!(session.history().is_empty());
    }
}
