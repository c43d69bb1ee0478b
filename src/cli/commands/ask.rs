use anyhow::Result;
use std::io::{self, IsTerminal};

use super::connect;
use crate::chat::{ReplySettings, ResponseAssembler};
use crate::config::ResolveOptions;
use crate::input::{InputReader, PromptSource};
use crate::output;
use crate::transcript::Transcript;

pub struct AskOptions {
    pub prompt: Vec<String>,
    pub file: Option<String>,
    pub stream: bool,
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
}

/// Sends one prompt with an empty history and prints the reply to stdout.
pub async fn run_ask(options: AskOptions) -> Result<()> {
    let source = PromptSource::from_cli(options.prompt, options.file);
    let prompt = InputReader::read(&source)?;

    let overrides = ResolveOptions {
        model: options.model,
        max_tokens: options.max_tokens,
        stream: Some(options.stream),
        ..ResolveOptions::default()
    };
    let (resolved, client) = connect(&overrides)?;

    let show_progress = io::stderr().is_terminal() && !output::is_quiet();
    let settings = ReplySettings::from_resolved(&resolved, show_progress);
    let mut transcript = Transcript::new(1);

    ResponseAssembler::new(&client, &settings)
        .respond(&mut transcript, &prompt, &mut io::stdout().lock())
        .await?;
    Ok(())
}
