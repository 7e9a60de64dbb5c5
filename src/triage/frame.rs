use crate::error::{Result, TriageError};
use regex::Regex;
use std::fmt;
use std::io::Read;
use std::path::Path;

/// Placeholder for a module or routine that could not be resolved.
pub const UNKNOWN: &str = "UNKNOWN";

/// Separator between module and routine in a frame label.
pub const FRAME_SEPARATOR: char = '!';

/// One resolved entry of a call stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
	module: String,
	routine: String,
	label: String,
	ip: Option<u64>,
}

impl Frame {
	/// Build a frame from resolved names.
	///
	/// The routine is cut at the first `(` to drop any parameter list, and
	/// empty names are replaced with [`UNKNOWN`].
	pub fn new(module: &str, routine: &str) -> Self {
		let routine = routine.split('(').next().unwrap_or_default().trim();
		let module = normalize(module.trim());
		let routine = normalize(routine);
		let label = format!("{module}{FRAME_SEPARATOR}{routine}");

		Frame {
			module,
			routine,
			label,
			ip: None,
		}
	}

	/// A frame with neither module nor routine resolved.
	pub fn unknown() -> Self {
		Frame::new(UNKNOWN, UNKNOWN)
	}

	/// Attach the instruction pointer the frame was captured at.
	pub fn with_ip(mut self, ip: u64) -> Self {
		self.ip = Some(ip);
		self
	}

	pub fn module(&self) -> &str {
		&self.module
	}

	pub fn routine(&self) -> &str {
		&self.routine
	}

	/// `module!routine`, the key used for exact-frame rules.
	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn ip(&self) -> Option<u64> {
		self.ip
	}
}

fn normalize(name: &str) -> String {
	if name.is_empty() {
		UNKNOWN.to_string()
	} else {
		name.to_string()
	}
}

impl fmt::Display for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.label)
	}
}

/// Supplies the faulting thread's stack, innermost frame first.
///
/// Symbol resolution happens behind this trait; the triage engine only
/// ever sees resolved frames.
pub trait FrameProvider {
	fn frames(&self) -> Result<Vec<Frame>>;
}

impl FrameProvider for Vec<Frame> {
	fn frames(&self) -> Result<Vec<Frame>> {
		Ok(self.clone())
	}
}

/// Line shape of a textual stack dump: `[index] [0xIP] [module!routine]`.
const FRAME_LINE_PATTERN: &str =
	r"^(?:\d+\s+)?(?:0[xX](?P<ip>[0-9a-fA-F]+)(?:\s+|$))?(?P<label>.*)$";

/// A stack captured as text, one frame per line.
///
/// Accepts the listing printed by `triage frames` as well as bare
/// `module!routine` lines. Blank lines and `#` comments are skipped.
#[derive(Debug)]
pub struct TextStack {
	text: String,
	line_pattern: Regex,
}

impl TextStack {
	pub fn new(text: impl Into<String>) -> Result<Self> {
		let line_pattern =
			Regex::new(FRAME_LINE_PATTERN).map_err(|source| TriageError::InvalidFramePattern {
				pattern: FRAME_LINE_PATTERN.to_string(),
				source,
			})?;

		Ok(TextStack {
			text: text.into(),
			line_pattern,
		})
	}

	/// Read a stack dump from any reader. `name` is used in error messages.
	pub fn from_reader(name: &str, mut reader: impl Read) -> Result<Self> {
		let mut text = String::new();
		reader
			.read_to_string(&mut text)
			.map_err(|source| TriageError::StackReadError {
				source_name: name.to_string(),
				source,
			})?;
		TextStack::new(text)
	}

	/// Read a stack dump from a file.
	pub fn from_path(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|source| TriageError::StackReadError {
			source_name: path.display().to_string(),
			source,
		})?;
		TextStack::new(text)
	}

	fn parse_line(&self, line: &str) -> Option<Frame> {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			return None;
		}

		let caps = self.line_pattern.captures(line)?;
		let label = caps.name("label").map_or("", |m| m.as_str().trim());
		let frame = match label.split_once(FRAME_SEPARATOR) {
			Some((module, routine)) => Frame::new(module, routine),
			None => Frame::new(label, UNKNOWN),
		};

		let ip = caps.name("ip").and_then(|m| parse_ip(m.as_str(), &frame));
		Some(match ip {
			Some(ip) => frame.with_ip(ip),
			None => frame,
		})
	}
}

/// Parse a hex instruction pointer, logging and dropping values that overflow.
fn parse_ip(digits: &str, frame: &Frame) -> Option<u64> {
	match u64::from_str_radix(digits, 16) {
		Ok(ip) => Some(ip),
		Err(e) => {
			tracing::debug!(
				ip = digits,
				error = %e,
				frame = %frame,
				"dropping instruction pointer"
			);
			None
		}
	}
}

impl FrameProvider for TextStack {
	fn frames(&self) -> Result<Vec<Frame>> {
		Ok(self
			.text
			.lines()
			.filter_map(|line| self.parse_line(line))
			.collect())
	}
}
