use crate::error::{Result, TriageError};
use crate::rules::rule::Rule;
use std::path::Path;

/// Lines starting with this character are comments.
pub const COMMENT_MARKER: char = ';';

/// A rule definition line with its 1-based position in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleLine<'a> {
	pub number: usize,
	pub text: &'a str,
}

/// Select the lines of an INI-style rule file that define rules.
///
/// A line is a candidate if it is non-empty, does not start with `;`
/// and contains `=`. Everything else (blank lines, comments, section
/// headers) is skipped.
pub fn candidate_lines(content: &str) -> impl Iterator<Item = RuleLine<'_>> {
	content
		.lines()
		.enumerate()
		.map(|(i, text)| RuleLine {
			number: i + 1,
			text: text.trim_end_matches('\r'),
		})
		.filter(|line| {
			!line.text.is_empty()
				&& !line.text.starts_with(COMMENT_MARKER)
				&& line.text.contains('=')
		})
}

/// Parse rules from rule-file text.
///
/// Lines that fail to parse are dropped with a warning; the rest still load.
pub fn parse_rules_str(content: &str) -> Vec<Rule> {
	candidate_lines(content)
		.filter_map(|line| match Rule::parse(line.text) {
			Ok(rule) => Some(rule),
			Err(e) => {
				tracing::warn!(line = line.number, error = %e, "dropping rule");
				None
			}
		})
		.collect()
}

/// Read and parse a rule file.
pub fn load_rules_file(path: &Path) -> Result<Vec<Rule>> {
	let content = std::fs::read_to_string(path).map_err(|source| TriageError::RulesReadError {
		path: path.to_path_buf(),
		source,
	})?;

	let rules = parse_rules_str(&content);
	tracing::info!(path = %path.display(), count = rules.len(), "loaded triage rules");
	Ok(rules)
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = "\
; triage rules
[Rules]
ntdll!RtlUserThreadStart=ignore

kernel32*=ignore
; libc!abort=ignore
*__cxa_throw=ignore
MyApp!Parser::Parse=bug-1234
this line has no equals
";

	#[test]
	fn test_candidate_lines_skip_comments_and_blanks() {
		let lines: Vec<RuleLine> = candidate_lines(SAMPLE).collect();
		let numbers: Vec<usize> = lines.iter().map(|l| l.number).collect();
		assert_eq!(numbers, vec![3, 5, 7, 8]);
		assert_eq!(lines[0].text, "ntdll!RtlUserThreadStart=ignore");
	}

	#[test]
	fn test_parse_rules_str() {
		let rules = parse_rules_str(SAMPLE);
		assert_eq!(rules.len(), 4);
		assert_eq!(rules[3].followup(), "bug-1234");
		assert_eq!(rules[3].routine_pattern(), "Parser::Parse");
	}

	#[test]
	fn test_crlf_line_endings() {
		let rules = parse_rules_str("M!R=bug1\r\n\r\n;c\r\nN*=bug2\r\n");
		assert_eq!(rules.len(), 2);
		assert_eq!(rules[0].followup(), "bug1");
		assert_eq!(rules[1].followup(), "bug2");
	}

	#[test]
	fn test_trailing_text_stays_in_followup() {
		// Only column-0 `;` starts a comment
		let rules = parse_rules_str("ntdll*=ignore ; any routine in ntdll\n");
		assert_eq!(rules[0].followup(), "ignore ; any routine in ntdll");
		assert!(!rules[0].is_ignore());
	}

	#[test]
	fn test_empty_content() {
		assert!(parse_rules_str("").is_empty());
		assert!(parse_rules_str("; only a comment\n\n").is_empty());
	}

	#[test]
	fn test_load_rules_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("triage.ini");
		std::fs::write(&path, SAMPLE).unwrap();

		let rules = load_rules_file(&path).unwrap();
		assert_eq!(rules.len(), 4);
	}

	#[test]
	fn test_load_missing_rules_file() {
		let result = load_rules_file(Path::new("/nonexistent/triage.ini"));
		match result.unwrap_err() {
			TriageError::RulesReadError { path, .. } => {
				assert_eq!(path, Path::new("/nonexistent/triage.ini"));
			}
			other => panic!("Expected RulesReadError, got {other:?}"),
		}
	}
}
