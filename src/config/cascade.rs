use crate::config::parser::parse_config_file;
use crate::config::types::{LoadedConfig, Settings};
use crate::error::{Result, TriageError};
use std::path::{Path, PathBuf};

/// Config file name looked up in each directory.
pub const CONFIG_FILE_NAME: &str = ".triage.toml";

/// Environment variable that, if truthy, skips `~/.triage.toml`.
pub const NO_USER_CONFIG_ENV: &str = "TRIAGE_NO_USER_CONFIG";

/// Discover and load all config files in the cascade.
///
/// The cascade order is:
/// 1. Start from `start_dir` and look for `.triage.toml`
/// 2. If found and `root = true`, stop walking up
/// 3. Otherwise, continue up the directory tree
/// 4. Finally, check ~/.triage.toml (unless disabled)
///
/// Returns configs in cascade order (most specific first).
pub fn discover_configs(start_dir: &Path) -> Result<Vec<LoadedConfig>> {
	let mut configs = Vec::new();
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let config_path = dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			let config = parse_config_file(&config_path)?;
			let root = config.root;
			tracing::debug!(path = %config_path.display(), root, "found config");

			configs.push(LoadedConfig {
				config,
				path: config_path,
			});

			if root {
				break;
			}
		}

		current_dir = dir.parent();
	}

	if let Some(user_config) = load_user_config(&configs)? {
		configs.push(user_config);
	}

	Ok(configs)
}

/// Load the user's ~/.triage.toml if it exists and isn't disabled.
fn load_user_config(existing_configs: &[LoadedConfig]) -> Result<Option<LoadedConfig>> {
	if is_env_truthy(NO_USER_CONFIG_ENV) {
		return Ok(None);
	}

	let user_config_path = user_config_path()?;

	// Already picked up while walking a directory under $HOME
	if existing_configs.iter().any(|c| c.path == user_config_path) {
		return Ok(None);
	}

	if user_config_path.is_file() {
		let config = parse_config_file(&user_config_path)?;
		Ok(Some(LoadedConfig {
			config,
			path: user_config_path,
		}))
	} else {
		Ok(None)
	}
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

/// Merge configs into effective settings.
///
/// For each setting the most specific config that sets it wins.
pub fn merge_configs(configs: &[LoadedConfig]) -> Settings {
	let mut settings = Settings::default();
	let mut strict = None;

	for loaded in configs {
		if settings.rules.is_none() {
			settings.rules = loaded.config.rules.clone();
		}
		if settings.output.is_none() {
			settings.output = loaded.config.output.clone();
		}
		if strict.is_none() {
			strict = loaded.config.strict;
		}
		settings.sources.push(loaded.path.clone());
	}

	settings.strict = strict.unwrap_or(false);
	settings
}

/// Convenience function to discover, load, and merge configs from a directory.
pub fn load_settings(start_dir: &Path) -> Result<Settings> {
	let configs = discover_configs(start_dir)?;
	Ok(merge_configs(&configs))
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(TriageError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(CONFIG_FILE_NAME))
}
