//! Crop advice use cases.
//!
//! Both entry points end in the same four-question session:
//! 1. A subject is obtained (typed by the client, or identified from a photo)
//! 2. General name, soil, fertilizer and pesticide prompts are sent in order
//! 3. Answers are labelled for Hindi and Telugu readers

use std::sync::Arc;

mod advise;
mod identify;

pub use advise::AdviceOps;
pub use identify::{IdentifyError, IdentifyPest};

/// Container for advice use cases.
pub struct AdviceUseCases {
    pub advise: Arc<AdviceOps>,
    pub identify: Arc<IdentifyPest>,
}

impl AdviceUseCases {
    pub fn new(advise: Arc<AdviceOps>, identify: Arc<IdentifyPest>) -> Self {
        Self { advise, identify }
    }
}
