//! Conversation message types
//!
//! These are the records that make up a conversation history. They are
//! serialized as-is into the state file and into completion requests, so the
//! wire shape is `{"role": "user"|"assistant", "content": "..."}`.

use serde::{Deserialize, Serialize};

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// The role of a chat message sender
///
/// Roles written by other tools (e.g. `system`) are kept as `Other` so a
/// loaded history is saved and sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    #[serde(untagged)]
    Other(String),
}
