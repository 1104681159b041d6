use crate::config::parser::parse_config_file;
use crate::config::types::{Config, ResolvedConfig};
use crate::error::{ClipmarkError, Result};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".clipmark.toml";

/// Template written by `clipmark init`.
pub const CONFIG_TEMPLATE: &str = r#"# clipmark configuration

# How often to poll the clipboard, in milliseconds.
poll-interval-ms = 500

# Whether monitoring starts enabled.
enabled = true

# Rewrite policy: "grouped" marks each link group once at its first link,
# "global" prefixes the whole text once when a Figma link is present.
mode = "grouped"
"#;

/// Resolve the effective configuration.
///
/// Precedence:
/// 1. An explicit path (must exist)
/// 2. `.clipmark.toml` in `start_dir`
/// 3. `~/.clipmark.toml`
/// 4. Built-in defaults
pub fn load_config(explicit: Option<&Path>, start_dir: &Path) -> Result<ResolvedConfig> {
	if let Some(path) = explicit {
		if !path.exists() {
			return Err(ClipmarkError::ConfigNotFound {
				path: path.to_path_buf(),
			});
		}
		return Ok(ResolvedConfig {
			config: parse_config_file(path)?,
			source: Some(path.to_path_buf()),
		});
	}

	let local = start_dir.join(CONFIG_FILE_NAME);
	if local.exists() {
		return Ok(ResolvedConfig {
			config: parse_config_file(&local)?,
			source: Some(local),
		});
	}

	let user = user_config_path()?;
	if user.exists() {
		return Ok(ResolvedConfig {
			config: parse_config_file(&user)?,
			source: Some(user),
		});
	}

	Ok(ResolvedConfig {
		config: Config::default(),
		source: None,
	})
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(ClipmarkError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_config_path() {
		let path = user_config_path();
		assert!(path.is_ok());
		assert!(path.unwrap().ends_with(".clipmark.toml"));
	}

	#[test]
	fn test_explicit_path_must_exist() {
		let dir = tempfile::tempdir().unwrap();
		let missing = dir.path().join("nope.toml");
		let result = load_config(Some(&missing), dir.path());

		assert!(matches!(
			result.unwrap_err(),
			ClipmarkError::ConfigNotFound { .. }
		));
	}

	#[test]
	fn test_explicit_path_wins_over_local() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join(CONFIG_FILE_NAME), "poll-interval-ms = 100").unwrap();
		let explicit = dir.path().join("other.toml");
		std::fs::write(&explicit, "poll-interval-ms = 250").unwrap();

		let resolved = load_config(Some(&explicit), dir.path()).unwrap();
		assert_eq!(resolved.config.poll_interval_ms, 250);
		assert_eq!(resolved.source, Some(explicit));
	}

	#[test]
	fn test_local_file_discovered() {
		let dir = tempfile::tempdir().unwrap();
		let local = dir.path().join(CONFIG_FILE_NAME);
		std::fs::write(&local, "enabled = false").unwrap();

		let resolved = load_config(None, dir.path()).unwrap();
		assert!(!resolved.config.enabled);
		assert_eq!(resolved.source, Some(local));
	}

	#[test]
	fn test_template_parses() {
		let config =
			crate::config::parse_config_str(CONFIG_TEMPLATE, Path::new("template.toml")).unwrap();
		assert_eq!(config.poll_interval_ms, 500);
	}
}
