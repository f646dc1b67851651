//! Runtime settings for the icosphere tools, persisted as `config.ron`.
//!
//! Missing sections and fields fall back to defaults, unknown fields are
//! ignored, and command-line arguments override file values.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, MeshConfig, PathConfig, RegistryConfig};
pub use error::ConfigError;
