//! Scriptable provider for tests. Enabled with the `mock` feature.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use std::sync::Mutex;

use crate::error::LlmError;
use crate::provider::{LlmProvider, Message};

const EMBEDDING_DIM: usize = 64;

/// Provider that replays scripted responses and produces deterministic
/// embeddings, so pipelines can be exercised without a live backend.
#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<String>>>,
    default_response: String,
    fail_chat: bool,
    chat_calls: Arc<AtomicUsize>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            default_response: "mock response".to_string(),
            fail_chat: false,
            chat_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue responses returned by `chat` in order. Once exhausted the
    /// default response is returned.
    #[must_use]
    pub fn with_responses<I, S>(self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        {
            let mut queue = self.responses.lock().unwrap_or_else(|e| e.into_inner());
            queue.extend(responses.into_iter().map(Into::into));
        }
        self
    }

    #[must_use]
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = response.into();
        self
    }

    /// Make every `chat` call fail.
    #[must_use]
    pub fn with_failing_chat(mut self) -> Self {
        self.fail_chat = true;
        self
    }

    /// Number of `chat` calls made so far, across clones.
    #[must_use]
    pub fn chat_call_count(&self) -> usize {
        self.chat_calls.load(Ordering::SeqCst)
    }
}

/// Deterministic unit-length embedding: characters are bucketed by
/// position so similar texts land near each other.
fn hash_embedding(text: &str) -> Vec<f32> {
    let mut buckets = vec![0.0_f32; EMBEDDING_DIM];
    for (i, byte) in text.bytes().enumerate() {
        buckets[(usize::from(byte) + i) % EMBEDDING_DIM] += 1.0;
    }
    let norm = buckets.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut buckets {
            *v /= norm;
        }
    }
    buckets
}

impl LlmProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn chat(&self, _messages: &[Message]) -> Result<String, LlmError> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_chat {
            return Err(LlmError::Other("mock chat failure".to_string()));
        }
        let next = {
            let mut queue = self.responses.lock().unwrap_or_else(|e| e.into_inner());
            queue.pop_front()
        };
        Ok(next.unwrap_or_else(|| self.default_response.clone()))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, LlmError> {
        Ok(hash_embedding(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Role;

    #[tokio::test]
    async fn scripted_responses_replay_in_order() {
        let provider = MockProvider::new().with_responses(["first", "second"]);
        let msgs = vec![Message::new(Role::User, "q")];
        assert_eq!(provider.chat(&msgs).await.unwrap(), "first");
        assert_eq!(provider.chat(&msgs).await.unwrap(), "second");
        assert_eq!(provider.chat(&msgs).await.unwrap(), "mock response");
    }

    #[tokio::test]
    async fn failing_chat_returns_error() {
        let provider = MockProvider::new().with_failing_chat();
        let msgs = vec![Message::new(Role::User, "q")];
        assert!(provider.chat(&msgs).await.is_err());
    }

    #[tokio::test]
    async fn chat_calls_are_counted_across_clones() {
        let provider = MockProvider::new();
        let clone = provider.clone();
        let msgs = vec![Message::new(Role::User, "q")];
        clone.chat(&msgs).await.unwrap();
        clone.chat(&msgs).await.unwrap();
        assert_eq!(provider.chat_call_count(), 2);
    }

    #[tokio::test]
    async fn embeddings_are_deterministic_and_normalized() {
        let provider = MockProvider::new();
        let a = provider.embed("fn main() {}").await.unwrap();
        let b = provider.embed("fn main() {}").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), EMBEDDING_DIM);
        let norm = a.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn different_texts_embed_differently() {
        let provider = MockProvider::new();
        let a = provider.embed("alpha").await.unwrap();
        let b = provider.embed("a completely different text").await.unwrap();
        assert_ne!(a, b);
    }
}
