use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use chatter_cli::cli::commands::{ask, chat, configure, models};
use chatter_cli::cli::{Args, ChatArgs, Command};
use chatter_cli::gateway::GatewayError;
use chatter_cli::output::{self, OutputConfig};
use chatter_cli::ui::Style;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let defaults = OutputConfig::default();
    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || defaults.no_color,
    });
    output::init_logging();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", Style::error("Error:"));
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        None => chat::run_chat(&ChatArgs::default()).await,
        Some(Command::Chat(chat_args)) => chat::run_chat(&chat_args).await,
        Some(Command::Ask {
            prompt,
            file,
            stream,
            model,
            max_tokens,
        }) => {
            let options = ask::AskOptions {
                prompt,
                file,
                stream,
                model,
                max_tokens,
            };
            ask::run_ask(options).await
        }
        Some(Command::Models) => models::run_models().await,
        Some(Command::Configure { show }) => configure::run_configure(show),
    }
}

/// Maps a failure to a sysexits code: API trouble, I/O trouble, or anything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    let code = if err.chain().any(|e| e.is::<GatewayError>()) {
        exitcode::UNAVAILABLE
    } else if err.chain().any(|e| e.is::<std::io::Error>()) {
        exitcode::IOERR
    } else {
        exitcode::SOFTWARE
    };
    u8::try_from(code).unwrap_or(1)
}
