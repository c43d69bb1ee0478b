//! Line sources for the chat loop.

use anyhow::{Context, Result};
use inquire::Text;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use std::io::BufRead;

use super::command::SlashCommandCompleter;
use crate::ui::answered;

/// Something the chat loop can read user lines from.
pub trait LineReader {
    /// Blocks for the next line. `Ok(None)` means the user is done
    /// (end of input, Ctrl+C, Escape).
    fn read_line(&mut self) -> Result<Option<String>>;
}

/// Interactive terminal prompt with slash-command autocompletion.
pub struct PromptReader {
    render_config: RenderConfig<'static>,
}

impl PromptReader {
    pub fn new() -> Self {
        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        Self { render_config }
    }
}

impl Default for PromptReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LineReader for PromptReader {
    fn read_line(&mut self) -> Result<Option<String>> {
        let answer = Text::new("")
            .with_render_config(self.render_config)
            .with_autocomplete(SlashCommandCompleter)
            .with_help_message("Type a message, /help for commands, /exit to quit")
            .prompt();

        let line = answered(answer)?;
        if line.is_none() {
            println!(); // Clear line before goodbye message
        }
        Ok(line)
    }
}

/// Plain line reader for piped or redirected input. Shows no prompt.
pub struct PipedReader<R> {
    reader: R,
}

impl<R: BufRead> PipedReader<R> {
    pub const fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineReader for PipedReader<R> {
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_piped_reader_yields_lines_then_none() {
        let mut reader = PipedReader::new(Cursor::new("hello\n\n/exit\n"));

        assert_eq!(reader.read_line().unwrap().as_deref(), Some("hello\n"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("\n"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("/exit\n"));
        assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn test_piped_reader_last_line_without_newline() {
        let mut reader = PipedReader::new(Cursor::new("only"));
        assert_eq!(reader.read_line().unwrap().as_deref(), Some("only"));
        assert_eq!(reader.read_line().unwrap(), None);
    }
}
