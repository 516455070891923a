//! Conversation session over an indexed codebase.

use codechat_index::{IndexError, Retriever, RetrieverConfig, VectorIndex, format_context};
use codechat_llm::{LlmError, LlmProvider};

use crate::prompt;

/// Reply prefix added to every successful chat response.
pub const RESPONSE_PREFIX: &str = "Chatbot: ";

/// Fixed reply for exit phrases, returned without calling the model.
pub const FAREWELL: &str = "Chatbot: Goodbye!";

/// Fixed reply when chat is attempted before any initialize succeeded.
pub const NOT_INITIALIZED_REPLY: &str =
    "Chatbot: No codebase is loaded yet. Initialize one with a directory path first.";

const EXIT_PHRASES: [&str; 3] = ["exit", "quit", "bye"];

/// True when the message, trimmed and lowercased, is an exit phrase.
#[must_use]
pub fn is_exit_phrase(message: &str) -> bool {
    let normalized = message.trim().to_lowercase();
    EXIT_PHRASES.contains(&normalized.as_str())
}

/// Rough token estimate, four characters per token.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),
}

/// One completed exchange.
#[derive(Clone, Debug)]
pub struct Turn {
    pub user: String,
    pub assistant: String,
}

impl Turn {
    fn estimated_tokens(&self) -> usize {
        estimate_tokens(&self.user) + estimate_tokens(&self.assistant)
    }
}

/// A live conversation bound to one vector index. Built by a successful
/// initialize; replaced wholesale by the next one.
#[derive(Debug)]
pub struct ChatSession<P> {
    provider: P,
    index: VectorIndex,
    retriever: Retriever,
    history: Vec<Turn>,
    history_budget_tokens: usize,
}

impl<P: LlmProvider> ChatSession<P> {
    #[must_use]
    pub fn new(
        provider: P,
        index: VectorIndex,
        retriever_config: RetrieverConfig,
        history_budget_tokens: usize,
    ) -> Self {
        Self {
            provider,
            index,
            retriever: Retriever::new(retriever_config),
            history: Vec::new(),
            history_budget_tokens,
        }
    }

    #[must_use]
    pub fn indexed_chunks(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Answer one question: retrieve context for the augmented query,
    /// assemble the prompt with windowed history, call the model, and on
    /// success record the turn. A failed call leaves history untouched.
    ///
    /// # Errors
    ///
    /// [`SessionError::Index`] when retrieval fails (question embedding),
    /// [`SessionError::Llm`] when the chat call fails.
    pub async fn ask(&mut self, question: &str) -> Result<String, SessionError> {
        let augmented = prompt::augment_question(question);
        let chunks = self
            .retriever
            .retrieve(&self.index, &self.provider, &augmented)
            .await?;
        let context = format_context(&chunks);

        self.trim_history();
        let messages = prompt::build_messages(&context, &self.history, &augmented);

        tracing::debug!(
            context_chunks = chunks.len(),
            history_turns = self.history.len(),
            "asking model"
        );
        let response = self.provider.chat(&messages).await?;

        self.history.push(Turn {
            user: question.to_string(),
            assistant: response.clone(),
        });
        Ok(response)
    }

    /// Drop oldest turns until the history estimate fits the budget.
    /// Trimming is permanent; dropped turns are never re-sent.
    fn trim_history(&mut self) {
        let mut total: usize = self.history.iter().map(Turn::estimated_tokens).sum();
        let mut dropped = 0;
        while total > self.history_budget_tokens && !self.history.is_empty() {
            let turn = self.history.remove(0);
            total -= turn.estimated_tokens();
            dropped += 1;
        }
        if dropped > 0 {
            tracing::debug!(dropped, remaining = self.history.len(), "trimmed history");
        }
    }
}
