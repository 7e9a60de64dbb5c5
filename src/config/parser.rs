use crate::config::types::Config;
use crate::error::{Result, TriageError};
use std::path::Path;

/// Parse a config file from the given path.
///
/// Relative paths inside the file are resolved against its directory.
pub fn parse_config_file(path: &Path) -> Result<Config> {
	let content = std::fs::read_to_string(path).map_err(|source| TriageError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	let config = parse_config_str(&content, path)?;
	let base_dir = path.parent().unwrap_or(Path::new("."));
	Ok(config.resolve_paths(base_dir))
}

/// Parse a config from a string (useful for testing).
pub fn parse_config_str(content: &str, path: &Path) -> Result<Config> {
	toml::from_str(content).map_err(|source| TriageError::ConfigParseError {
		path: path.to_path_buf(),
		source,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::path::PathBuf;

	#[test]
	fn test_parse_empty_config() {
		let path = PathBuf::from("test.toml");
		let config = parse_config_str("", &path).unwrap();

		assert!(!config.root);
		assert!(config.rules.is_none());
		assert!(config.strict.is_none());
		assert!(config.output.is_none());
	}

	#[test]
	fn test_parse_full_config() {
		let content = r#"
root = true
rules = "triage.ini"
strict = true
output = "out/report.txt"
"#;
		let path = PathBuf::from("test.toml");
		let config = parse_config_str(content, &path).unwrap();

		assert!(config.root);
		assert_eq!(config.rules, Some(PathBuf::from("triage.ini")));
		assert_eq!(config.strict, Some(true));
		assert_eq!(config.output, Some(PathBuf::from("out/report.txt")));
	}

	#[test]
	fn test_parse_invalid_config() {
		let path = PathBuf::from("test.toml");
		let result = parse_config_str("strict = \"yes\"", &path);

		match result.unwrap_err() {
			TriageError::ConfigParseError { path, .. } => {
				assert_eq!(path, PathBuf::from("test.toml"));
			}
			other => panic!("Expected ConfigParseError, got {other:?}"),
		}
	}

	#[test]
	fn test_parse_file_resolves_relative_paths() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join(".triage.toml");
		std::fs::write(&path, "rules = \"rules/triage.ini\"\noutput = \"/tmp/abs.txt\"\n").unwrap();

		let config = parse_config_file(&path).unwrap();
		assert_eq!(config.rules, Some(dir.path().join("rules/triage.ini")));
		assert_eq!(config.output, Some(PathBuf::from("/tmp/abs.txt")));
	}
}
