//! Turns a user message into a committed assistant reply.
//!
//! The assembler appends the user turn, asks the gateway for a reply,
//! forwards it to the output and commits the assistant turn. On failure it
//! restores the transcript according to [`PartialReply`].

use anyhow::Result;
use futures_util::StreamExt;
use std::io::Write;

use crate::config::{PartialReply, ResolvedConfig};
use crate::gateway::{ChatRequest, FragmentStream, ModelGateway};
use crate::transcript::{Message, Transcript};
use crate::ui::Spinner;

/// Per-turn request parameters and reply handling.
#[derive(Debug, Clone)]
pub struct ReplySettings {
    pub model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    /// Print fragments as they arrive instead of waiting for the whole reply.
    pub stream: bool,
    pub partial_reply: PartialReply,
    /// Show a spinner on stderr until the reply starts.
    pub show_progress: bool,
}

impl ReplySettings {
    pub fn from_resolved(resolved: &ResolvedConfig, show_progress: bool) -> Self {
        Self {
            model: resolved.model.clone(),
            system_prompt: resolved.system_prompt.clone(),
            max_tokens: resolved.max_tokens,
            stream: resolved.stream,
            partial_reply: resolved.partial_reply,
            show_progress,
        }
    }
}

pub struct ResponseAssembler<'a, G> {
    gateway: &'a G,
    settings: &'a ReplySettings,
}

impl<'a, G: ModelGateway> ResponseAssembler<'a, G> {
    pub const fn new(gateway: &'a G, settings: &'a ReplySettings) -> Self {
        Self { gateway, settings }
    }

    /// Runs one chat turn and returns the committed reply text.
    ///
    /// On error the user turn is rolled back, unless a partial streamed
    /// reply is kept under [`PartialReply::Keep`].
    pub async fn respond<W: Write>(
        &self,
        transcript: &mut Transcript,
        text: &str,
        out: &mut W,
    ) -> Result<String> {
        transcript.append(Message::user(text));

        if self.settings.stream {
            self.respond_streamed(transcript, out).await
        } else {
            self.respond_complete(transcript, out).await
        }
    }

    fn request<'r>(&'r self, messages: &'r [Message]) -> ChatRequest<'r> {
        ChatRequest {
            model: &self.settings.model,
            system: &self.settings.system_prompt,
            max_tokens: self.settings.max_tokens,
            messages,
        }
    }

    async fn respond_complete<W: Write>(
        &self,
        transcript: &mut Transcript,
        out: &mut W,
    ) -> Result<String> {
        let spinner = Spinner::start("Thinking...", self.settings.show_progress);
        let result = self.gateway.complete(&self.request(transcript.request_window())).await;
        spinner.stop();

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                transcript.discard_last();
                return Err(e.into());
            }
        };

        transcript.append(Message::assistant(reply.clone()));

        writeln!(out, "{reply}")?;
        writeln!(out)?;
        out.flush()?;
        Ok(reply)
    }

    async fn respond_streamed<W: Write>(
        &self,
        transcript: &mut Transcript,
        out: &mut W,
    ) -> Result<String> {
        let spinner = Spinner::start("Thinking...", self.settings.show_progress);
        let stream = match self.gateway.stream(&self.request(transcript.request_window())).await {
            Ok(stream) => stream,
            Err(e) => {
                spinner.stop();
                transcript.discard_last();
                return Err(e.into());
            }
        };

        let mut reply = String::new();
        let drained = forward_fragments(stream, out, &mut reply, &spinner).await;
        spinner.stop();

        if let Err(e) = drained {
            // Leave the cursor on a fresh line under the partial output.
            if !reply.is_empty()
                && let Err(io_err) = writeln!(out)
            {
                tracing::debug!(error = %io_err, "failed to end partial reply line");
            }
            self.abandon_turn(transcript, reply);
            return Err(e);
        }

        transcript.append(Message::assistant(reply.clone()));

        writeln!(out)?;
        writeln!(out)?;
        out.flush()?;
        Ok(reply)
    }

    /// Restores the transcript after a failed streamed turn.
    fn abandon_turn(&self, transcript: &mut Transcript, partial: String) {
        match self.settings.partial_reply {
            PartialReply::Keep if !partial.is_empty() => {
                tracing::debug!(chars = partial.len(), "keeping partial reply");
                transcript.append(Message::assistant(partial));
            }
            _ => {
                tracing::debug!("discarding failed turn");
                transcript.discard_last();
            }
        }
    }
}

/// Writes each fragment as soon as it arrives and accumulates it into `reply`.
async fn forward_fragments<W: Write>(
    mut stream: FragmentStream,
    out: &mut W,
    reply: &mut String,
    spinner: &Spinner,
) -> Result<()> {
    while let Some(fragment) = stream.next().await {
        let fragment = fragment?;
        spinner.stop();

        write!(out, "{fragment}")?;
        out.flush()?;
        reply.push_str(&fragment);
    }
    Ok(())
}
