use crate::error::{Result, TriageError};
use std::fmt;
use std::path::Path;

/// Property holding the full stack, one label per line.
pub const FAULT_STACK: &str = "FAULT_STACK";

/// Property holding the blamed frame label.
pub const FAULT_SYMBOL: &str = "FAULT_SYMBOL";

/// Property holding the follow-up of the matched rule.
pub const FOLLOW_UP: &str = "FOLLOW_UP";

/// Named results collected by analyzers, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
	properties: Vec<(String, String)>,
}

impl Report {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set a property. An existing key keeps its position.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		let key = key.into();
		let value = value.into();
		match self.properties.iter_mut().find(|(k, _)| *k == key) {
			Some((_, existing)) => *existing = value,
			None => self.properties.push((key, value)),
		}
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.properties
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.properties
			.iter()
			.map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn is_empty(&self) -> bool {
		self.properties.is_empty()
	}

	/// Write the rendered report to a file.
	pub fn write_to(&self, path: &Path) -> Result<()> {
		std::fs::write(path, self.to_string()).map_err(|source| TriageError::ReportWriteError {
			path: path.to_path_buf(),
			source,
		})
	}
}

impl fmt::Display for Report {
	/// Each property renders as `KEY:` followed by its value and a blank line.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (key, value) in self.iter() {
			write!(f, "{key}:\n{value}\n\n")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_set_keeps_insertion_order() {
		let mut report = Report::new();
		report.set(FAULT_STACK, "a!b");
		report.set(FAULT_SYMBOL, "a!b");
		report.set(FAULT_STACK, "c!d");

		let keys: Vec<&str> = report.iter().map(|(k, _)| k).collect();
		assert_eq!(keys, vec![FAULT_STACK, FAULT_SYMBOL]);
		assert_eq!(report.get(FAULT_STACK), Some("c!d"));
		assert_eq!(report.get(FOLLOW_UP), None);
	}

	#[test]
	fn test_render() {
		let mut report = Report::new();
		report.set(FAULT_SYMBOL, "MyApp!Crash");
		report.set(FOLLOW_UP, "bug42");

		assert_eq!(
			report.to_string(),
			"FAULT_SYMBOL:\nMyApp!Crash\n\nFOLLOW_UP:\nbug42\n\n"
		);
	}

	#[test]
	fn test_write_to_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("report.txt");

		let mut report = Report::new();
		report.set(FAULT_SYMBOL, "UNKNOWN!UNKNOWN");
		report.write_to(&path).unwrap();

		let written = std::fs::read_to_string(&path).unwrap();
		assert_eq!(written, "FAULT_SYMBOL:\nUNKNOWN!UNKNOWN\n\n");
	}

	#[test]
	fn test_write_to_missing_directory() {
		let report = Report::new();
		let result = report.write_to(Path::new("/nonexistent/dir/report.txt"));
		assert!(matches!(
			result.unwrap_err(),
			TriageError::ReportWriteError { .. }
		));
	}
}
