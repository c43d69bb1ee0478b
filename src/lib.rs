//! # chatter - Terminal Chat Client
//!
//! `chatter` is a command-line chat client for the Anthropic Messages API.
//! It keeps the conversation in memory, streams replies as they are
//! generated and offers a few slash commands.
//!
//! ## Quick Start
//!
//! ```bash
//! export ANTHROPIC_API_KEY=...
//!
//! # Interactive chat
//! chatter
//!
//! # One-shot question
//! chatter ask "What does the borrow checker do?"
//!
//! # Scripted session
//! printf 'hello\n/exit\n' | chatter chat
//! ```
//!
//! ## Slash Commands
//!
//! | Command   | Effect                              |
//! |-----------|-------------------------------------|
//! | `/clear`  | Forget the conversation so far      |
//! | `/models` | List model identifiers              |
//! | `/help`   | List commands                       |
//! | `/exit`   | End the session (`/quit` also works) |
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/chatter/config.toml`:
//!
//! ```toml
//! [chat]
//! model = "claude-sonnet-4-20250514"
//! max_turns = 100
//! partial_reply = "discard"
//!
//! [api]
//! api_key_env = "ANTHROPIC_API_KEY"
//! ```

/// Interactive chat mode.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and resolution.
pub mod config;

/// File system utilities.
pub mod fs;

/// Model API client and streaming decoder.
pub mod gateway;

/// Prompt input from arguments, files and stdin.
pub mod input;

/// Global output configuration and diagnostic logging.
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Ordered conversation history.
pub mod transcript;

/// Terminal UI components (spinner, colors).
pub mod ui;
