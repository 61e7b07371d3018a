//! Four-question advice session about a crop or pest.

use std::sync::Arc;

use cropwise_domain::{advice_prompt, AdviceSheet, AdviceTopic, LocalizedAdvice};

use crate::infrastructure::ports::{LlmError, LlmPort};
use crate::use_cases::chat::ChatSession;

/// Asks the text model about a subject, one topic at a time.
pub struct AdviceOps {
    llm: Arc<dyn LlmPort>,
}

impl AdviceOps {
    pub fn new(llm: Arc<dyn LlmPort>) -> Self {
        Self { llm }
    }

    /// English answers for every topic, whitespace-trimmed.
    ///
    /// All prompts share one session, so answers may refer back to the
    /// general name given first.
    pub async fn advise(&self, subject: &str) -> Result<AdviceSheet, LlmError> {
        let mut session = ChatSession::new(self.llm.clone());
        let mut sheet = AdviceSheet::default();

        for topic in AdviceTopic::ALL {
            let reply = session.send(advice_prompt(topic, subject)).await?;
            sheet.set(topic, reply.trim());
        }

        tracing::debug!(subject, ?sheet, "Advice generated");
        Ok(sheet)
    }

    /// `advise` followed by label localization.
    pub async fn advise_localized(&self, subject: &str) -> Result<LocalizedAdvice, LlmError> {
        Ok(self.advise(subject).await?.localize())
    }
}
