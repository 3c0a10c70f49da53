pub mod ai;
pub mod config;
pub mod conversation;
pub mod error;
pub mod history;
pub mod state;

// Re-export main types for convenience
pub use ai::{CompletionService, GenerationParams, OpenAIClient};
pub use config::{Config, Settings};
pub use conversation::ConversationClient;
pub use error::{ChatError, Result, StoreError};
pub use history::HistoryStore;
pub use state::{ChatMessage, ChatRole};
