use crate::error::{ClipmarkError, Result};
use crate::rewrite::RewriteMode;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration from a `.clipmark.toml` file.
///
/// The marker and the link pattern are fixed constants and deliberately not
/// configurable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// How often to poll the clipboard, in milliseconds.
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,

	/// Whether monitoring starts enabled.
	#[serde(default = "default_enabled")]
	pub enabled: bool,

	/// Rewrite policy: "grouped" (default) or "global".
	#[serde(default)]
	pub mode: RewriteMode,
}

fn default_poll_interval_ms() -> u64 {
	500
}

fn default_enabled() -> bool {
	true
}

impl Default for Config {
	fn default() -> Self {
		Config {
			poll_interval_ms: default_poll_interval_ms(),
			enabled: default_enabled(),
			mode: RewriteMode::default(),
		}
	}
}

impl Config {
	/// Validate field values beyond what deserialization enforces.
	pub fn validate(&self) -> Result<()> {
		if self.poll_interval_ms == 0 {
			return Err(ClipmarkError::InvalidPollInterval);
		}
		Ok(())
	}

	/// The poll interval as a `Duration`.
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}
}

/// A configuration together with where it came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
	/// The effective configuration.
	pub config: Config,

	/// The file the config was loaded from; `None` means built-in defaults.
	pub source: Option<PathBuf>,
}
