#![allow(clippy::unwrap_used)]
//! End-to-end chat scenarios against an in-process gateway.
//!
//! The session is driven exactly as the binary drives it, through the public
//! `ModelGateway` and `LineReader` seams, without any network access.

use std::cell::RefCell;
use std::collections::VecDeque;

use anyhow::Result;
use futures_util::stream;

use chatter_cli::chat::{ChatSession, Flow, LineReader, ReplySettings, SessionConfig};
use chatter_cli::config::PartialReply;
use chatter_cli::gateway::{ChatRequest, FragmentStream, GatewayError, ModelGateway};
use chatter_cli::transcript::Role;

/// Echoes the last user message back in two fragments.
#[derive(Default)]
struct EchoGateway {
    calls: RefCell<Vec<usize>>,
}

impl EchoGateway {
    fn reply_for(&self, request: &ChatRequest<'_>) -> Vec<String> {
        self.calls.borrow_mut().push(request.messages.len());
        let last = request.messages.last().map_or("", |m| m.content());
        vec!["echo: ".to_string(), last.to_string()]
    }

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ModelGateway for EchoGateway {
    async fn complete(&self, request: &ChatRequest<'_>) -> Result<String, GatewayError> {
        Ok(self.reply_for(request).concat())
    }

    async fn stream(&self, request: &ChatRequest<'_>) -> Result<FragmentStream, GatewayError> {
        let fragments = self.reply_for(request);
        Ok(Box::pin(stream::iter(
            fragments.into_iter().map(Ok::<String, GatewayError>),
        )))
    }

    async fn list_models(&self) -> Result<Vec<String>, GatewayError> {
        Ok(vec!["model-a".to_string(), "model-b".to_string()])
    }
}

/// Feeds a fixed list of lines, then reports end of input.
struct ScriptReader(VecDeque<String>);

impl ScriptReader {
    fn new(lines: &[&str]) -> Self {
        Self(lines.iter().map(|l| (*l).to_string()).collect())
    }
}

impl LineReader for ScriptReader {
    fn read_line(&mut self) -> Result<Option<String>> {
        Ok(self.0.pop_front())
    }
}

fn config(stream: bool) -> SessionConfig {
    SessionConfig {
        reply: ReplySettings {
            model: "claude-test".to_string(),
            system_prompt: "Be brief.".to_string(),
            max_tokens: 32,
            stream,
            partial_reply: PartialReply::Discard,
            show_progress: false,
        },
        max_turns: 100,
        show_banner: false,
    }
}

#[tokio::test]
async fn test_hello_clear_hi_again_exit() {
    let mut session = ChatSession::new(
        config(true),
        EchoGateway::default(),
        ScriptReader::new(&[]),
        Vec::new(),
    );

    let mut lengths = Vec::new();
    let mut flows = Vec::new();
    for line in ["hello", "/clear", "hi again", "/exit"] {
        flows.push(session.handle_line(line).await.unwrap());
        lengths.push(session.transcript().len());
    }

    assert_eq!(lengths, vec![2, 0, 2, 2]);
    assert_eq!(flows.last(), Some(&Flow::Exit));
    assert_eq!(session.gateway().call_count(), 2);
}

#[tokio::test]
async fn test_streamed_and_blocking_sessions_agree() {
    let script = ["first question", "second question"];
    let mut streamed = ChatSession::new(
        config(true),
        EchoGateway::default(),
        ScriptReader::new(&script),
        Vec::new(),
    );
    let mut blocking = ChatSession::new(
        config(false),
        EchoGateway::default(),
        ScriptReader::new(&script),
        Vec::new(),
    );

    streamed.run().await.unwrap();
    blocking.run().await.unwrap();

    assert_eq!(
        streamed.transcript().snapshot(),
        blocking.transcript().snapshot()
    );
    assert_eq!(
        streamed.transcript().snapshot()[1].content(),
        "echo: first question"
    );

    let streamed_out = String::from_utf8(streamed.into_output()).unwrap();
    let blocking_out = String::from_utf8(blocking.into_output()).unwrap();
    assert_eq!(streamed_out, blocking_out);
}

#[tokio::test]
async fn test_roles_alternate_starting_with_user() {
    let mut session = ChatSession::new(
        config(true),
        EchoGateway::default(),
        ScriptReader::new(&["a", "  ", "/help", "b", "/nope", "c"]),
        std::io::sink(),
    );

    session.run().await.unwrap();

    let roles: Vec<Role> = session
        .transcript()
        .snapshot()
        .iter()
        .map(|m| m.role())
        .collect();
    assert_eq!(
        roles,
        vec![
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
            Role::User,
            Role::Assistant,
        ]
    );
    assert_eq!(session.gateway().call_count(), 3);
}

#[tokio::test]
async fn test_models_command_output() {
    let mut session = ChatSession::new(
        config(true),
        EchoGateway::default(),
        ScriptReader::new(&["/models", "/quit"]),
        Vec::new(),
    );

    session.run().await.unwrap();

    assert!(session.transcript().is_empty());
    assert_eq!(session.gateway().call_count(), 0);
    assert_eq!(
        String::from_utf8(session.into_output()).unwrap(),
        "model-a\nmodel-b\n"
    );
}

#[tokio::test]
async fn test_history_is_sent_with_each_turn() {
    let mut session = ChatSession::new(
        config(false),
        EchoGateway::default(),
        ScriptReader::new(&["one", "two", "three"]),
        std::io::sink(),
    );

    session.run().await.unwrap();

    assert_eq!(*session.gateway().calls.borrow(), vec![1, 3, 5]);
}
