//! Configuration file management and resolution of CLI overrides.

mod manager;

pub use manager::{
    ConfigFile, ConfigManager, DEFAULT_ENDPOINT, FeedbackConfig, ParleyConfig, ResolveOptions,
    ResolvedConfig, resolve_config,
};
