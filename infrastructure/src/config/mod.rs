//! Configuration file loading for legal-clarity
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LEGAL_CLARITY_*` environment variables (`__` separates sections)
//! 2. `--config <path>` specified file
//! 3. Project root: `./legal-clarity.toml` or `./.legal-clarity.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/legal-clarity/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAudioConfig, FileConfig, FileLoggingConfig, FileModelConfig,
    FileSessionConfig, expand_home,
};
pub use loader::ConfigLoader;
