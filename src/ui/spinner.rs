use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A terminal spinner shown on stderr while a reply is pending.
///
/// Clears itself when dropped.
pub struct Spinner {
    progress_bar: ProgressBar,
}

impl Spinner {
    /// Starts a spinner with the given message, or a hidden one when `enabled` is false.
    pub fn start(message: &str, enabled: bool) -> Self {
        if !enabled {
            return Self {
                progress_bar: ProgressBar::hidden(),
            };
        }

        let style = ProgressStyle::with_template("{spinner} {msg}")
            .map_or_else(|_| ProgressStyle::default_spinner(), |s| s.tick_strings(TICKS));

        let progress_bar = ProgressBar::new_spinner().with_style(style);
        progress_bar.set_message(message.to_string());
        progress_bar.enable_steady_tick(Duration::from_millis(80));

        Self { progress_bar }
    }

    /// Stops the spinner and clears it from the terminal.
    pub fn stop(&self) {
        if !self.progress_bar.is_finished() {
            self.progress_bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_stops_cleanly() {
        let spinner = Spinner::start("Thinking...", false);
        spinner.stop();
        spinner.stop();
    }
}
