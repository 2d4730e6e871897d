//! Configuration file loading for palaver
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `PALAVER_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./palaver.toml` or `./.palaver.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/palaver/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileBackendConfig, FileConfig, FileDebateConfig, FileDispatchConfig,
    FileLoggingConfig, FileModelsConfig, FileOutputConfig, FileOutputFormat,
};
pub use loader::ConfigLoader;
