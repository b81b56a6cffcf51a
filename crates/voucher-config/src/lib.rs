//! Configuration loading and CLI definitions.

mod cli;
mod defaults;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use loader::{ConfigError, ConfigFormat, load_config, parse_config};
pub use types::*;
pub use validate::validate_config;
