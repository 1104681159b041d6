use std::path::PathBuf;

/// Library-level structured errors for clipmark.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ClipmarkError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid link pattern: {pattern}")]
	InvalidPattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Unknown rewrite mode: {value} (expected \"grouped\" or \"global\")")]
	InvalidMode { value: String },

	#[error("Poll interval must be greater than zero")]
	InvalidPollInterval,

	#[error("Clipboard access failed")]
	Clipboard {
		#[source]
		source: arboard::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using ClipmarkError.
pub type Result<T> = std::result::Result<T, ClipmarkError>;
