use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Top-level configuration from a `.triage.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// If true, stop the directory cascade at this file.
	#[serde(default)]
	pub root: bool,

	/// Rule file to load. Relative paths are resolved against the
	/// directory holding the config file.
	pub rules: Option<PathBuf>,

	/// Reject duplicate exact-frame rules instead of letting the last one win.
	pub strict: Option<bool>,

	/// File the analysis report is written to, in addition to stdout.
	pub output: Option<PathBuf>,
}

impl Config {
	/// Resolve relative paths in this config against `base_dir`.
	pub fn resolve_paths(mut self, base_dir: &Path) -> Self {
		self.rules = self.rules.map(|p| base_dir.join(p));
		self.output = self.output.map(|p| base_dir.join(p));
		self
	}
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration, with paths already resolved.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

/// Effective settings after merging the cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
	/// Rule file, if any config named one.
	pub rules: Option<PathBuf>,

	/// Strict duplicate checking.
	pub strict: bool,

	/// Report output file.
	pub output: Option<PathBuf>,

	/// Config files that contributed, most specific first.
	pub sources: Vec<PathBuf>,
}
