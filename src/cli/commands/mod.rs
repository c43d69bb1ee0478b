//! Subcommand implementations.

/// One-shot prompt command handler.
pub mod ask;

/// Chat mode command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Model listing command handler.
pub mod models;

use anyhow::Result;

use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};
use crate::gateway::AnthropicClient;

/// Loads the config file, applies CLI overrides and builds the API client.
pub(crate) fn connect(options: &ResolveOptions) -> Result<(ResolvedConfig, AnthropicClient)> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default();
    let resolved = resolve_config(options, &file_config)?;

    tracing::debug!(
        model = %resolved.model,
        base_url = %resolved.base_url,
        stream = resolved.stream,
        "resolved configuration"
    );

    let client = AnthropicClient::new(resolved.api_key.clone()).with_base_url(&resolved.base_url);
    Ok((resolved, client))
}
