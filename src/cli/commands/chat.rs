use anyhow::Result;
use std::io::{self, IsTerminal};

use super::connect;
use crate::chat::{ChatSession, PipedReader, PromptReader, SessionConfig};
use crate::cli::ChatArgs;
use crate::config::{PartialReply, ResolveOptions};
use crate::output;

impl ChatArgs {
    /// CLI overrides carried by the chat flags. Unset flags defer to the config file.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            max_turns: self.max_turns,
            stream: self.no_stream.then_some(false),
            partial_reply: self.keep_partial.then_some(PartialReply::Keep),
        }
    }
}

/// Runs an interactive session until `/exit`, `/quit` or end of input.
///
/// Uses the autocompleting prompt when stdin is a terminal and plain line
/// reading otherwise, so piped scripts work.
pub async fn run_chat(args: &ChatArgs) -> Result<()> {
    let (resolved, client) = connect(&args.resolve_options())?;
    let interactive = io::stdin().is_terminal();
    let config = SessionConfig::from_resolved(&resolved, interactive, output::is_quiet());
    let stdout = io::stdout().lock();

    if interactive {
        let mut session = ChatSession::new(config, client, PromptReader::new(), stdout);
        session.run().await
    } else {
        let reader = PipedReader::new(io::stdin().lock());
        let mut session = ChatSession::new(config, client, reader, stdout);
        session.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_flags_defer_to_config() {
        let options = ChatArgs::default().resolve_options();
        assert!(options.model.is_none());
        assert!(options.stream.is_none());
        assert!(options.partial_reply.is_none());
    }

    #[test]
    fn test_flags_become_overrides() {
        let args = ChatArgs {
            model: Some("claude-x".to_string()),
            max_tokens: Some(10),
            max_turns: Some(3),
            no_stream: true,
            keep_partial: true,
        };
        let options = args.resolve_options();

        assert_eq!(options.model.as_deref(), Some("claude-x"));
        assert_eq!(options.max_tokens, Some(10));
        assert_eq!(options.max_turns, Some(3));
        assert_eq!(options.stream, Some(false));
        assert_eq!(options.partial_reply, Some(PartialReply::Keep));
    }
}
