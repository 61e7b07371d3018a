//! Crop advice topics, prompts and the localized advice sheet.

use serde::Serialize;

use crate::language::Language;

/// Instruction prepended to every advice prompt.
pub const BRIEF_INSTRUCTION: &str = "Answer briefly and concisely.";

/// One of the four questions asked about a crop or pest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdviceTopic {
    GeneralName,
    Soil,
    Fertilizer,
    Pesticide,
}

impl AdviceTopic {
    /// Topics in the order they are asked within one session.
    pub const ALL: [AdviceTopic; 4] = [
        AdviceTopic::GeneralName,
        AdviceTopic::Soil,
        AdviceTopic::Fertilizer,
        AdviceTopic::Pesticide,
    ];

    fn question(self, subject: &str) -> String {
        match self {
            AdviceTopic::GeneralName => format!("General name of crop: {subject}"),
            AdviceTopic::Soil => format!("What soil is better suited for {subject}?"),
            AdviceTopic::Fertilizer => {
                format!("Type and amount of fertilizer recommended for {subject}")
            }
            AdviceTopic::Pesticide => {
                format!("Type and amount of pesticide recommended for controlling {subject}")
            }
        }
    }
}

/// Build the prompt sent to the text model for `topic` about `subject`.
pub fn advice_prompt(topic: AdviceTopic, subject: &str) -> String {
    format!("{} {}", BRIEF_INSTRUCTION, topic.question(subject))
}

/// English advice, one answer per topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdviceSheet {
    pub general_name: String,
    pub soil: String,
    pub fertilizer: String,
    pub pesticide: String,
}

impl AdviceSheet {
    pub fn get(&self, topic: AdviceTopic) -> &str {
        match topic {
            AdviceTopic::GeneralName => &self.general_name,
            AdviceTopic::Soil => &self.soil,
            AdviceTopic::Fertilizer => &self.fertilizer,
            AdviceTopic::Pesticide => &self.pesticide,
        }
    }

    pub fn set(&mut self, topic: AdviceTopic, answer: impl Into<String>) {
        let slot = match topic {
            AdviceTopic::GeneralName => &mut self.general_name,
            AdviceTopic::Soil => &mut self.soil,
            AdviceTopic::Fertilizer => &mut self.fertilizer,
            AdviceTopic::Pesticide => &mut self.pesticide,
        };
        *slot = answer.into();
    }

    /// Expand into the response shape: English fields plus labelled Hindi and
    /// Telugu variants of the same text.
    pub fn localize(&self) -> LocalizedAdvice {
        let hi = |topic| Language::Hindi.annotate(topic, self.get(topic));
        let te = |topic| Language::Telugu.annotate(topic, self.get(topic));

        LocalizedAdvice {
            general_name: self.general_name.clone(),
            soil: self.soil.clone(),
            fertilizer: self.fertilizer.clone(),
            pesticide: self.pesticide.clone(),
            general_name_hi: hi(AdviceTopic::GeneralName),
            soil_hi: hi(AdviceTopic::Soil),
            fertilizer_hi: hi(AdviceTopic::Fertilizer),
            pesticide_hi: hi(AdviceTopic::Pesticide),
            general_name_te: te(AdviceTopic::GeneralName),
            soil_te: te(AdviceTopic::Soil),
            fertilizer_te: te(AdviceTopic::Fertilizer),
            pesticide_te: te(AdviceTopic::Pesticide),
        }
    }
}

/// Advice as returned to clients. Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedAdvice {
    pub general_name: String,
    pub soil: String,
    pub fertilizer: String,
    pub pesticide: String,
    pub general_name_hi: String,
    pub soil_hi: String,
    pub fertilizer_hi: String,
    pub pesticide_hi: String,
    pub general_name_te: String,
    pub soil_te: String,
    pub fertilizer_te: String,
    pub pesticide_te: String,
}

#[cfg(test)]
impl AdviceTopic {
    /// JSON key of the English advice field.
    fn key(self) -> &'static str {
        match self {
            AdviceTopic::GeneralName => "general_name",
            AdviceTopic::Soil => "soil",
            AdviceTopic::Fertilizer => "fertilizer",
            AdviceTopic::Pesticide => "pesticide",
        }
    }
}
