//! Configuration loading and parsing for clipmark.
//!
//! This module handles:
//! - TOML config file parsing
//! - Config file discovery (working directory, then home)
//! - Validation of field values

pub mod discover;
pub mod parser;
pub mod types;

pub use discover::{CONFIG_FILE_NAME, CONFIG_TEMPLATE, load_config, user_config_path};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{Config, ResolvedConfig};
