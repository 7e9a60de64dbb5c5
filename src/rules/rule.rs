use crate::error::{Result, TriageError};
use crate::rules::pattern::{WILDCARD, is_wildcard};
use std::fmt;
use std::str::FromStr;

/// Follow-up text reserved for "skip this frame and keep walking".
pub const IGNORE_FOLLOWUP: &str = "ignore";

/// Which index tier a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
	/// Both module and routine are literal.
	ExactFrame,
	/// Literal module, wildcard routine.
	ExactModule,
	/// Literal routine, wildcard module.
	ExactRoutine,
	/// Both fields contain a wildcard.
	Wildcard,
}

impl RuleKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			RuleKind::ExactFrame => "exact-frame",
			RuleKind::ExactModule => "exact-module",
			RuleKind::ExactRoutine => "exact-routine",
			RuleKind::Wildcard => "wildcard",
		}
	}
}

/// A parsed triage rule of the form `<frame>=<followup>`.
///
/// The frame side is split into a module pattern and a routine pattern:
///
/// - `module!routine` sets both
/// - `prefix*` is a module-only rule, the trailing `*` is dropped
/// - `*routine` is a routine-only rule, the leading `*` is dropped
/// - anything else is a module name with any routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
	raw_frame: String,
	followup: String,
	module: String,
	routine: String,
	exact_module: bool,
	exact_routine: bool,
}

impl Rule {
	/// Parse a single rule definition.
	///
	/// Only the first `=` separates frame from follow-up, so follow-up text
	/// may itself contain `=`. Whitespace around either side is trimmed.
	pub fn parse(definition: &str) -> Result<Self> {
		let (raw_frame, followup) = definition.split_once('=').ok_or_else(|| {
			TriageError::MalformedRule {
				text: definition.to_string(),
			}
		})?;
		let raw_frame = raw_frame.trim();
		let followup = followup.trim();

		let wildcard = WILDCARD.to_string();
		let (module, routine) = if let Some((module, routine)) = raw_frame.split_once('!') {
			(module.to_string(), routine.to_string())
		} else if raw_frame.ends_with(WILDCARD) {
			(raw_frame.trim_end_matches(WILDCARD).to_string(), wildcard)
		} else if raw_frame.starts_with(WILDCARD) {
			(wildcard, raw_frame.trim_start_matches(WILDCARD).to_string())
		} else {
			(raw_frame.to_string(), wildcard)
		};

		Ok(Rule {
			raw_frame: raw_frame.to_string(),
			followup: followup.to_string(),
			exact_module: !is_wildcard(&module),
			exact_routine: !is_wildcard(&routine),
			module,
			routine,
		})
	}

	/// The frame side of the definition as written.
	pub fn raw_frame(&self) -> &str {
		&self.raw_frame
	}

	/// The disposition attached to this rule.
	pub fn followup(&self) -> &str {
		&self.followup
	}

	pub fn module_pattern(&self) -> &str {
		&self.module
	}

	pub fn routine_pattern(&self) -> &str {
		&self.routine
	}

	pub fn is_exact_module(&self) -> bool {
		self.exact_module
	}

	pub fn is_exact_routine(&self) -> bool {
		self.exact_routine
	}

	pub fn is_exact_frame(&self) -> bool {
		self.exact_module && self.exact_routine
	}

	/// True if the follow-up is the reserved `ignore` disposition.
	pub fn is_ignore(&self) -> bool {
		self.followup.trim().eq_ignore_ascii_case(IGNORE_FOLLOWUP)
	}

	/// The `module!routine` key of this rule.
	pub fn frame_pattern(&self) -> String {
		format!("{}!{}", self.module, self.routine)
	}

	pub fn kind(&self) -> RuleKind {
		match (self.exact_module, self.exact_routine) {
			(true, true) => RuleKind::ExactFrame,
			(true, false) => RuleKind::ExactModule,
			(false, true) => RuleKind::ExactRoutine,
			(false, false) => RuleKind::Wildcard,
		}
	}
}

impl FromStr for Rule {
	type Err = TriageError;

	fn from_str(s: &str) -> Result<Self> {
		Rule::parse(s)
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}!{}={}", self.module, self.routine, self.followup)
	}
}
