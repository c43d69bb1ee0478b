mod manager;

pub use manager::{
    ApiConfig, ChatConfig, ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_MAX_TOKENS,
    DEFAULT_MAX_TURNS, DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, PartialReply, ResolveOptions,
    ResolvedConfig, resolve_config,
};
