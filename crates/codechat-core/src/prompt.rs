//! Prompt assembly for a retrieval turn.

use codechat_llm::provider::{Message, Role};

use crate::session::Turn;

/// Appended to every user question so answers stay grounded in the
/// retrieved context.
pub const GROUNDING_INSTRUCTION: &str = "Answer using only the provided context. \
If the context does not contain the answer, or you are not sure, say that you \
don't know instead of making something up.";

const SYSTEM_PREAMBLE: &str = "You are a helpful assistant answering questions \
about a codebase. Relevant excerpts from the codebase are provided below.";

/// Attach the grounding instruction to a raw user question.
#[must_use]
pub fn augment_question(question: &str) -> String {
    format!("{question}\n\n{GROUNDING_INSTRUCTION}")
}

/// Assemble the message list for one turn: a system message carrying the
/// retrieved context, the windowed history as alternating user/assistant
/// messages, then the augmented question.
#[must_use]
pub fn build_messages(context: &str, history: &[Turn], question: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(2 + history.len() * 2);
    messages.push(Message::new(
        Role::System,
        format!("{SYSTEM_PREAMBLE}\n\n{context}"),
    ));
    for turn in history {
        messages.push(Message::new(Role::User, turn.user.clone()));
        messages.push(Message::new(Role::Assistant, turn.assistant.clone()));
    }
    messages.push(Message::new(Role::User, question.to_string()));
    messages
}
