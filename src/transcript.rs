//! In-memory conversation transcript.
//!
//! The transcript is the literal `messages` payload sent to the model on
//! every turn, so insertion order matters. It only grows, except through
//! [`Transcript::clear`], rollback of a failed turn, and the turn bound.

use serde::Serialize;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single role-tagged message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    role: Role,
    content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered conversation history with a bound on retained turns.
///
/// A turn is one user message and the assistant reply that follows it.
/// The bound is enforced when a turn is committed: once more than
/// `max_turns` turns are held, the oldest are dropped as whole pairs, so
/// the transcript always starts with a user message. A pending user
/// message never evicts anything, which keeps rollback exact.
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    max_turns: usize,
}

impl Transcript {
    /// Creates an empty transcript keeping at most `max_turns` turns.
    ///
    /// A bound of zero is treated as one.
    pub fn new(max_turns: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_turns: max_turns.max(1),
        }
    }

    /// Appends a message. An assistant message completes a turn and drops
    /// the oldest turns if the bound is exceeded.
    pub fn append(&mut self, message: Message) {
        let completes_turn = message.role == Role::Assistant;
        self.messages.push(message);

        if completes_turn {
            let drop = self.overflow();
            if drop > 0 {
                self.messages.drain(..drop);
                tracing::debug!(dropped = drop, "transcript exceeded turn bound");
            }
        }
    }

    /// The messages for the next request: the history cut to the bound,
    /// including a pending user message.
    pub fn request_window(&self) -> &[Message] {
        &self.messages[self.overflow()..]
    }

    /// Leading messages beyond the bound, rounded up to a whole turn so
    /// what remains still opens with a user message.
    fn overflow(&self) -> usize {
        let excess = self.messages.len().saturating_sub(self.max_turns * 2);
        (excess + excess % 2).min(self.messages.len())
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Removes and returns the newest message, used to roll back a failed turn.
    pub fn discard_last(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    /// The full ordered history, as sent to the model.
    pub fn snapshot(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub const fn max_turns(&self) -> usize {
        self.max_turns
    }
}
