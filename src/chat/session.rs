use anyhow::Result;
use std::io::Write;

use super::assembler::{ReplySettings, ResponseAssembler};
use super::command::{Input, SlashCommand, parse_input};
use super::input::LineReader;
use super::ui;
use crate::config::ResolvedConfig;
use crate::gateway::ModelGateway;
use crate::transcript::Transcript;

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Request parameters and reply handling for every turn.
    pub reply: ReplySettings,
    /// Turns kept in the transcript.
    pub max_turns: usize,
    /// Print the header and goodbye lines.
    pub show_banner: bool,
}

impl SessionConfig {
    pub fn from_resolved(resolved: &ResolvedConfig, interactive: bool, quiet: bool) -> Self {
        Self {
            reply: ReplySettings::from_resolved(resolved, interactive && !quiet),
            max_turns: resolved.max_turns,
            show_banner: !quiet,
        }
    }
}

/// What the loop does after handling a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// An interactive chat session.
///
/// Owns the transcript for its whole lifetime, reads lines from `R`,
/// talks to `G`, and writes replies and command output to `W`.
pub struct ChatSession<G, R, W> {
    config: SessionConfig,
    gateway: G,
    reader: R,
    out: W,
    transcript: Transcript,
}

impl<G: ModelGateway, R: LineReader, W: Write> ChatSession<G, R, W> {
    /// Creates a new chat session with an empty transcript.
    pub fn new(config: SessionConfig, gateway: G, reader: R, out: W) -> Self {
        let transcript = Transcript::new(config.max_turns);
        Self {
            config,
            gateway,
            reader,
            out,
            transcript,
        }
    }

    /// Reads and handles lines until `/exit`, `/quit` or end of input.
    ///
    /// A gateway error ends the session and is returned to the caller.
    pub async fn run(&mut self) -> Result<()> {
        if self.config.show_banner {
            ui::print_header(&mut self.out, &self.config)?;
        }

        while let Some(line) = self.reader.read_line()? {
            if self.handle_line(&line).await? == Flow::Exit {
                break;
            }
        }

        if self.config.show_banner {
            ui::print_goodbye(&mut self.out)?;
        }
        Ok(())
    }

    /// Handles one raw input line.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        match parse_input(line) {
            Input::Empty => Ok(Flow::Continue),
            Input::Command(cmd) => self.handle_command(cmd).await,
            Input::Text(text) => {
                ResponseAssembler::new(&self.gateway, &self.config.reply)
                    .respond(&mut self.transcript, &text, &mut self.out)
                    .await?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn handle_command(&mut self, cmd: SlashCommand) -> Result<Flow> {
        tracing::debug!(?cmd, "dispatching slash command");

        match cmd {
            SlashCommand::Clear => {
                self.transcript.clear();
                ui::print_cleared(&mut self.out)?;
            }
            SlashCommand::Models => {
                let models = self.gateway.list_models().await?;
                ui::print_models(&mut self.out, &models)?;
            }
            SlashCommand::Help => ui::print_help(&mut self.out)?,
            SlashCommand::Exit => return Ok(Flow::Exit),
            SlashCommand::Unknown(command) => {
                ui::print_unknown_command(&mut self.out, &command)?;
            }
        }
        Ok(Flow::Continue)
    }

    pub const fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Consumes the session and returns its output sink.
    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chat::input::PipedReader;
    use crate::config::PartialReply;
    use crate::gateway::fake::{Reply, ScriptedGateway};
    use std::io::{self, BufReader, Cursor};

    type TestSession = ChatSession<ScriptedGateway, PipedReader<Cursor<&'static str>>, Vec<u8>>;

    fn session_config(max_turns: usize) -> SessionConfig {
        SessionConfig {
            reply: ReplySettings {
                model: "claude-test".to_string(),
                system_prompt: "Be brief.".to_string(),
                max_tokens: 64,
                stream: true,
                partial_reply: PartialReply::Discard,
                show_progress: false,
            },
            max_turns,
            show_banner: false,
        }
    }

    fn session(gateway: ScriptedGateway, script: &'static str) -> TestSession {
        ChatSession::new(
            session_config(100),
            gateway,
            PipedReader::new(Cursor::new(script)),
            Vec::new(),
        )
    }

    fn output(session: TestSession) -> String {
        String::from_utf8(session.into_output()).unwrap()
    }

    #[tokio::test]
    async fn test_turns_alternate_in_submission_order() {
        let gateway = ScriptedGateway::new(vec![
            Reply::Text(vec!["a0"]),
            Reply::Text(vec!["a1"]),
            Reply::Text(vec!["a2"]),
        ]);
        let mut session = session(gateway, "q0\nq1\nq2\n");

        session.run().await.unwrap();

        let contents: Vec<&str> = session
            .transcript()
            .snapshot()
            .iter()
            .map(|m| m.content())
            .collect();
        assert_eq!(contents, vec!["q0", "a0", "q1", "a1", "q2", "a2"]);
    }

    #[tokio::test]
    async fn test_scenario_clear_between_turns() {
        let gateway = ScriptedGateway::new(vec![
            Reply::Text(vec!["hi!"]),
            Reply::Text(vec!["hello again"]),
        ]);
        let mut session = session(gateway, "");

        assert_eq!(session.handle_line("hello").await.unwrap(), Flow::Continue);
        assert_eq!(session.transcript().len(), 2);

        assert_eq!(session.handle_line("/clear").await.unwrap(), Flow::Continue);
        assert_eq!(session.transcript().len(), 0);

        assert_eq!(session.handle_line("hi again").await.unwrap(), Flow::Continue);
        assert_eq!(session.transcript().len(), 2);

        assert_eq!(session.handle_line("/exit").await.unwrap(), Flow::Exit);
        assert_eq!(session.gateway().chat_calls(), 2);
    }

    #[tokio::test]
    async fn test_exit_stops_reading() {
        let gateway = ScriptedGateway::new(vec![Reply::Text(vec!["a0"])]);
        let mut session = session(gateway, "q0\n/quit\nnever sent\n");

        session.run().await.unwrap();

        assert_eq!(session.gateway().chat_calls(), 1);
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_plain_exit_is_chat_text() {
        let gateway = ScriptedGateway::new(vec![Reply::Text(vec!["bye?"])]);
        let mut session = session(gateway, "exit\n");

        session.run().await.unwrap();

        assert_eq!(session.gateway().chat_calls(), 1);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let gateway = ScriptedGateway::new(vec![]);
        let mut session = session(gateway, "\n   \n\t\n");

        session.run().await.unwrap();

        assert!(session.transcript().is_empty());
        assert_eq!(session.gateway().chat_calls(), 0);
        assert_eq!(output(session), "");
    }

    #[tokio::test]
    async fn test_unknown_command_prints_token() {
        let gateway = ScriptedGateway::new(vec![Reply::Text(vec!["a0"])]);
        let mut session = session(gateway, "");
        session.handle_line("q0").await.unwrap();

        assert_eq!(session.handle_line("/foo").await.unwrap(), Flow::Continue);

        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.gateway().chat_calls(), 1);
        assert!(output(session).contains("/foo"));
    }

    #[tokio::test]
    async fn test_models_prints_ids_in_order() {
        let gateway = ScriptedGateway::new(vec![]).with_models(&["model-a", "model-b"]);
        let mut session = session(gateway, "");

        session.handle_line("/models").await.unwrap();

        assert!(session.transcript().is_empty());
        assert_eq!(session.gateway().model_calls(), 1);
        assert_eq!(output(session), "model-a\nmodel-b\n");
    }

    #[tokio::test]
    async fn test_help_lists_commands() {
        let mut session = session(ScriptedGateway::new(vec![]), "/help\n");

        session.run().await.unwrap();

        let out = output(session);
        for command in ["/clear", "/models", "/help", "/exit", "/quit"] {
            assert!(out.contains(command), "missing {command}");
        }
    }

    #[tokio::test]
    async fn test_gateway_error_ends_session() {
        let gateway = ScriptedGateway::new(vec![
            Reply::Text(vec!["a0"]),
            Reply::FailAfter(vec!["par"]),
        ]);
        let mut session = session(gateway, "q0\nq1\nq2\n");

        let result = session.run().await;

        assert!(result.is_err());
        assert_eq!(session.gateway().chat_calls(), 2);
        // The failed turn is discarded; the first one survives.
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_turn_bound_applies_to_session() {
        let gateway = ScriptedGateway::new(vec![
            Reply::Text(vec!["a0"]),
            Reply::Text(vec!["a1"]),
            Reply::Text(vec!["a2"]),
        ]);
        let mut session = ChatSession::new(
            session_config(2),
            gateway,
            PipedReader::new(Cursor::new("q0\nq1\nq2\n")),
            io::sink(),
        );

        session.run().await.unwrap();

        let requests = session.gateway().requests();
        assert_eq!(requests[2].len(), 3);
        assert_eq!(requests[2][0].content(), "q1");
        assert_eq!(session.transcript().len(), 4);
    }

    #[tokio::test]
    async fn test_banner_printed_when_enabled() {
        let mut config = session_config(10);
        config.show_banner = true;
        let mut session = ChatSession::new(
            config,
            ScriptedGateway::new(vec![]),
            PipedReader::new(BufReader::new(io::empty())),
            Vec::new(),
        );

        session.run().await.unwrap();

        let out = String::from_utf8(session.into_output()).unwrap();
        assert!(out.contains("claude-test"));
        assert!(out.contains("Goodbye!"));
    }
}
