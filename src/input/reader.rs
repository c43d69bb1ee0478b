use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, Read};

const MAX_PROMPT_SIZE: usize = 1024 * 1024; // 1MB

/// Where a one-shot prompt comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// Words given on the command line, joined with spaces.
    Args(Vec<String>),
    File(String),
    Stdin,
}

impl PromptSource {
    /// Picks the source: a file wins over arguments, stdin is the fallback.
    pub fn from_cli(words: Vec<String>, file: Option<String>) -> Self {
        match file {
            Some(path) => Self::File(path),
            None if !words.is_empty() => Self::Args(words),
            None => Self::Stdin,
        }
    }
}

pub struct InputReader;

impl InputReader {
    /// Reads the prompt and rejects it if it is blank.
    pub fn read(source: &PromptSource) -> Result<String> {
        let prompt = match source {
            PromptSource::Args(words) => words.join(" "),
            PromptSource::File(path) => Self::read_file(path)?,
            PromptSource::Stdin => Self::read_from(io::stdin().lock())?,
        };

        if prompt.trim().is_empty() {
            bail!("Prompt is empty");
        }
        Ok(prompt)
    }

    fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;

        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > MAX_PROMPT_SIZE {
            bail!(too_large(size));
        }

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    fn read_from<R: Read>(mut reader: R) -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];

        loop {
            let bytes_read = reader
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_PROMPT_SIZE {
                bail!(too_large(buffer.len()));
            }
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}

#[allow(clippy::cast_precision_loss)]
fn too_large(size: usize) -> String {
    format!(
        "Prompt size ({:.1} MB) exceeds maximum allowed size (1 MB)",
        size as f64 / 1024.0 / 1024.0
    )
}
