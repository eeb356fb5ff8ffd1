//! Conversation history for the chat loop.
//!
//! An explicit session object owned by the REPL; past turns live here,
//! not in ambient global state.

/// One question-and-answer exchange.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// The user's query.
    pub query: String,
    /// The full rendered answer, references included.
    pub answer: String,
}

/// Append-only log of the session's exchanges.
#[derive(Debug, Default)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    /// Start an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished exchange.
    pub fn record(&mut self, query: impl Into<String>, answer: impl Into<String>) {
        self.turns.push(ChatTurn { query: query.into(), answer: answer.into() });
    }

    /// All exchanges so far, oldest first.
    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }
}
