use inquire::autocompletion::{Autocomplete, Replacement};

/// Available slash commands: (command, description)
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/clear", "Clear the conversation history"),
    ("/models", "List available models"),
    ("/help", "Show available commands"),
    ("/exit", "Exit chat mode"),
    ("/quit", "Exit chat mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement = highlighted_suggestion
            .and_then(|s| s.split_whitespace().next().map(str::to_string));
        Ok(replacement)
    }
}

/// Slash command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Clear,
    Models,
    Help,
    Exit,
    /// Any other `/`-prefixed line, kept verbatim including the slash.
    Unknown(String),
}

/// Input types
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

/// Classifies one line of user input.
///
/// Commands match the whole trimmed line exactly and case-sensitively, so
/// `/Clear` or `/clear now` are unknown commands.
pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    if !input.starts_with('/') {
        return Input::Text(input.to_string());
    }

    let command = match input {
        "/clear" => SlashCommand::Clear,
        "/models" => SlashCommand::Models,
        "/help" => SlashCommand::Help,
        "/exit" | "/quit" => SlashCommand::Exit,
        other => SlashCommand::Unknown(other.to_string()),
    };
    Input::Command(command)
}
