//! Interactive chat mode.
//!
//! A REPL that keeps the conversation in a [`Transcript`](crate::transcript::Transcript),
//! streams replies as they arrive and handles a small set of slash commands.

/// Reply assembly for a single turn.
pub mod assembler;
/// Slash command parsing and autocomplete.
pub mod command;
/// Line sources: interactive prompt or piped input.
pub mod input;
mod session;
mod ui;

pub use assembler::{ReplySettings, ResponseAssembler};
pub use input::{LineReader, PipedReader, PromptReader};
pub use session::{ChatSession, Flow, SessionConfig};
pub use ui::print_models;
