use anyhow::Result;
use std::io;

use super::connect;
use crate::config::ResolveOptions;
use crate::gateway::ModelGateway;
use crate::ui::Spinner;

/// Prints every model identifier the API offers, one per line.
pub async fn run_models() -> Result<()> {
    let (_, client) = connect(&ResolveOptions::default())?;

    let spinner = Spinner::start("Fetching models...", !crate::output::is_quiet());
    let models = client.list_models().await;
    spinner.stop();

    crate::chat::print_models(&mut io::stdout().lock(), &models?)?;
    Ok(())
}
