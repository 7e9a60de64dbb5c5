use std::path::PathBuf;

/// Library-level structured errors for stack triage.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
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

	#[error("Failed to read rules file: {path}")]
	RulesReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Malformed rule: {text:?} (expected <frame>=<followup>)")]
	MalformedRule { text: String },

	#[error("Duplicate exact-frame rule: {label} (strict mode)")]
	DuplicateFrameRule { label: String },

	#[error("Failed to read stack: {source_name}")]
	StackReadError {
		source_name: String,
		#[source]
		source: std::io::Error,
	},

	#[error("Invalid frame pattern: {pattern}")]
	InvalidFramePattern {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Failed to write report: {path}")]
	ReportWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,
}

/// Result type alias using TriageError.
pub type Result<T> = std::result::Result<T, TriageError>;
