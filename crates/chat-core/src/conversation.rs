use crate::ai::{CompletionService, GenerationParams};
use crate::error::Result;
use crate::history::HistoryStore;
use crate::state::ChatMessage;

/// Mediates exchanges between the local history and a completion service.
pub struct ConversationClient<S> {
    service: S,
    store: HistoryStore,
    params: GenerationParams,
    history: Vec<ChatMessage>,
}

impl<S: CompletionService> ConversationClient<S> {
    /// Creates a client, loading whatever history the store holds.
    pub fn new(service: S, store: HistoryStore) -> Self {
        Self::with_params(service, store, GenerationParams::default())
    }

    pub fn with_params(service: S, store: HistoryStore, params: GenerationParams) -> Self {
        let history = store.load();
        Self {
            service,
            store,
            params,
            history,
        }
    }

    /// Sends `text` with the full history as context and returns the reply.
    ///
    /// The user message is appended before the request and is kept in memory
    /// even when the request fails. The history is only persisted after a
    /// successful reply.
    pub async fn send_message(&mut self, text: &str) -> Result<String> {
        self.history.push(ChatMessage::user(text));

        let reply = self.service.complete(&self.history, &self.params).await?;

        self.history.push(ChatMessage::assistant(reply.clone()));
        self.store.save(&self.history);
        Ok(reply)
    }

    /// Clears the history and persists the empty conversation.
    pub fn new_conversation(&mut self) {
        self.history.clear();
        self.store.save(&self.history);
        tracing::info!("started a new conversation");
    }

    pub fn conversation_length(&self) -> usize {
        self.history.len()
    }

    pub fn exchange_count(&self) -> usize {
        self.history.len() / 2
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }
}
