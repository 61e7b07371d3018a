//! Target languages for advice labels.
//!
//! Labels are a fixed lookup table rather than machine translation: the
//! English advice text is kept as-is and prefixed with the localized label.

use crate::advice::AdviceTopic;

/// Language a localized advice variant is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Hindi,
    Telugu,
}

impl Language {
    /// Label shown in front of the English advice for `topic`.
    pub fn label(self, topic: AdviceTopic) -> &'static str {
        match (self, topic) {
            (Language::Hindi, AdviceTopic::GeneralName) => "सामान्य नाम",
            (Language::Hindi, AdviceTopic::Soil) => "उपयुक्त मिट्टी",
            (Language::Hindi, AdviceTopic::Fertilizer) => "उर्वरक अनुशंसा",
            (Language::Hindi, AdviceTopic::Pesticide) => "कीटनाशक अनुशंसा",
            (Language::Telugu, AdviceTopic::GeneralName) => "సాధారణ పేరు",
            (Language::Telugu, AdviceTopic::Soil) => "భూడ్ సరైన రకం",
            (Language::Telugu, AdviceTopic::Fertilizer) => "ఎరువు సిఫార్సు",
            (Language::Telugu, AdviceTopic::Pesticide) => "పురుగు నాశక సూచనలు",
        }
    }

    /// Render `text` with this language's label for `topic`.
    pub fn annotate(self, topic: AdviceTopic, text: &str) -> String {
        format!("{}: {}", self.label(topic), text)
    }
}
