//! Chat mode UI components.

use std::io::{self, Write};

use super::command::SLASH_COMMANDS;
use super::session::SessionConfig;
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header<W: Write>(out: &mut W, config: &SessionConfig) -> io::Result<()> {
    writeln!(
        out,
        "{} {} - Interactive Chat",
        Style::header("chatter"),
        Style::version(format!("v{VERSION}"))
    )?;
    writeln!(
        out,
        "  {}  {}",
        Style::label("model"),
        Style::value(&config.reply.model)
    )?;
    writeln!(out, "{}", Style::hint("Type /help for commands"))?;
    writeln!(out)
}

pub fn print_goodbye<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", Style::success("Goodbye!"))
}

pub fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", Style::header("Available commands"))?;
    for (command, description) in SLASH_COMMANDS {
        writeln!(
            out,
            "  {}  {}",
            Style::command(format!("{command:<8}")),
            Style::secondary(description)
        )?;
    }
    writeln!(out)
}

pub fn print_cleared<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{} Conversation cleared", Style::success("✓"))?;
    writeln!(out)
}

/// One identifier per line, unstyled, in the order given.
pub fn print_models<W: Write>(out: &mut W, models: &[String]) -> io::Result<()> {
    for model in models {
        writeln!(out, "{model}")?;
    }
    out.flush()
}

pub fn print_unknown_command<W: Write>(out: &mut W, command: &str) -> io::Result<()> {
    writeln!(out, "{} Unknown command: {command}", Style::error("Error:"))?;
    writeln!(out, "{}", Style::hint("Type /help for available commands"))?;
    writeln!(out)
}
