//! Chat use cases.
//!
//! A `ChatSession` is a short-lived conversation with the text model; every
//! advice and suggestion flow opens one, and `FreeChat` exposes a single-turn
//! session directly to clients.

use std::sync::Arc;

mod free_chat;
mod session;

pub use free_chat::{ChatError, FreeChat};
pub use session::ChatSession;

/// Container for chat use cases.
pub struct ChatUseCases {
    pub free_chat: Arc<FreeChat>,
}

impl ChatUseCases {
    pub fn new(free_chat: Arc<FreeChat>) -> Self {
        Self { free_chat }
    }
}
