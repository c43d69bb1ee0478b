//! Configure command handler for editing chat defaults.

use anyhow::{Result, bail};
use inquire::{Confirm, CustomType, Select, Text};

use crate::config::{
    ChatConfig, ConfigFile, ConfigManager, DEFAULT_MAX_TOKENS, DEFAULT_MAX_TURNS, DEFAULT_MODEL,
    DEFAULT_SYSTEM_PROMPT, PartialReply,
};
use crate::gateway::DEFAULT_BASE_URL;
use crate::ui::{Style, run_interactive};

/// Runs the configure command.
///
/// With `show`, prints the current configuration; otherwise prompts for each
/// `[chat]` default and saves the result.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        let manager = ConfigManager::new()?;
        print_config(&manager, &manager.load_or_default());
        return Ok(());
    }
    run_interactive(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();

    print_config(&manager, &config);

    let current = &config.chat;
    let model = prompt_model(current.model.as_deref().unwrap_or(DEFAULT_MODEL))?;
    let system_prompt = Text::new("System prompt:")
        .with_default(
            current
                .system_prompt
                .as_deref()
                .unwrap_or(DEFAULT_SYSTEM_PROMPT),
        )
        .prompt()?;
    let max_tokens = prompt_positive(
        "Max tokens per reply:",
        current.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
    )?;
    let max_turns = prompt_positive(
        "Max turns kept:",
        current.max_turns.unwrap_or(DEFAULT_MAX_TURNS),
    )?;
    let stream = Confirm::new("Stream replies as they arrive?")
        .with_default(current.stream.unwrap_or(true))
        .prompt()?;
    let partial_reply = select_partial_reply(current.partial_reply.unwrap_or_default())?;

    config.chat = ChatConfig {
        model: Some(model),
        system_prompt: Some(system_prompt),
        max_tokens: Some(max_tokens),
        max_turns: Some(max_turns),
        stream: Some(stream),
        partial_reply: Some(partial_reply),
    };

    manager.save(&config)?;

    crate::status!();
    crate::status!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display())
    );

    Ok(())
}

fn print_config(manager: &ConfigManager, config: &ConfigFile) {
    let chat = &config.chat;
    let api = &config.api;
    let not_set = || Style::secondary("(default)");

    println!(
        "{} {}",
        Style::header("Configuration"),
        Style::secondary(manager.config_path().display())
    );
    println!(
        "  {}          {}",
        Style::label("model"),
        chat.model.as_deref().map_or_else(not_set, Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("system_prompt"),
        chat.system_prompt.as_deref().map_or_else(not_set, Style::value)
    );
    println!(
        "  {}     {}",
        Style::label("max_tokens"),
        chat.max_tokens.map_or_else(not_set, Style::value)
    );
    println!(
        "  {}      {}",
        Style::label("max_turns"),
        chat.max_turns.map_or_else(not_set, Style::value)
    );
    println!(
        "  {}         {}",
        Style::label("stream"),
        chat.stream.map_or_else(not_set, Style::value)
    );
    println!(
        "  {}  {}",
        Style::label("partial_reply"),
        chat.partial_reply.map_or_else(not_set, Style::value)
    );
    println!(
        "  {}       {}",
        Style::label("base_url"),
        Style::value(api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))
    );
    let key_status = if api.get_api_key().is_some() {
        Style::success("set")
    } else {
        Style::error("missing")
    };
    println!(
        "  {}        {} ({})",
        Style::label("api_key"),
        key_status,
        Style::secondary(api.key_env())
    );
    println!();
}

fn prompt_model(default: &str) -> Result<String> {
    let model = Text::new("Default model:")
        .with_default(default)
        .with_help_message("Run 'chatter models' to see available identifiers")
        .prompt()?;

    if model.trim().is_empty() {
        bail!("Model name cannot be empty");
    }
    Ok(model.trim().to_string())
}

fn prompt_positive<T>(message: &str, default: T) -> Result<T>
where
    T: Copy + Default + PartialOrd + std::str::FromStr + std::fmt::Display,
{
    let value = CustomType::<T>::new(message)
        .with_default(default)
        .with_error_message("Please enter a whole number")
        .prompt()?;

    if value <= T::default() {
        bail!("{} must be at least 1", message.trim_end_matches(':'));
    }
    Ok(value)
}

fn select_partial_reply(default: PartialReply) -> Result<PartialReply> {
    let options = vec![PartialReply::Discard, PartialReply::Keep];
    let default_index = options.iter().position(|p| *p == default).unwrap_or(0);

    let selection = Select::new("When a streamed reply fails midway:", options)
        .with_starting_cursor(default_index)
        .with_help_message("discard: forget the turn, keep: save the partial reply")
        .prompt()?;

    Ok(selection)
}
