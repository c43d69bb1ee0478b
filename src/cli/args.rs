use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chatter")]
#[command(about = "Terminal chat client for the Anthropic Messages API")]
#[command(version)]
pub struct Args {
    /// Suppress status output (banner, spinner)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat session (default)
    Chat(ChatArgs),
    /// Send a single prompt and print the reply
    Ask {
        /// Prompt text (reads from stdin if neither this nor --file is given)
        prompt: Vec<String>,

        /// Read the prompt from a file
        #[arg(short = 'f', long)]
        file: Option<String>,

        /// Print the reply as it is generated
        #[arg(long)]
        stream: bool,

        /// Model name
        #[arg(short = 'm', long)]
        model: Option<String>,

        /// Maximum tokens in the reply
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    /// List available model identifiers
    Models,
    /// Configure chat defaults
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct ChatArgs {
    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Maximum tokens per reply
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Turns kept in the conversation before the oldest are dropped
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Wait for each whole reply instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Keep partial text when a streamed reply fails midway
    #[arg(long)]
    pub keep_partial: bool,
}
