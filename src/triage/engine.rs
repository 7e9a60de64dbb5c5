use crate::rules::index::RuleIndex;
use crate::rules::pattern::matches;
use crate::rules::rule::Rule;
use crate::triage::frame::Frame;

/// The frame an analysis settled on, and the rule that matched it if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blame<'a> {
	pub frame: &'a Frame,
	pub rule: Option<&'a Rule>,
}

impl Blame<'_> {
	/// Follow-up of the matched rule, if one matched.
	pub fn followup(&self) -> Option<&str> {
		self.rule.map(Rule::followup)
	}
}

/// Walks stacks against a loaded [`RuleIndex`].
#[derive(Debug, Clone, Default)]
pub struct TriageEngine {
	index: RuleIndex,
}

impl TriageEngine {
	pub fn new(index: RuleIndex) -> Self {
		TriageEngine { index }
	}

	pub fn index(&self) -> &RuleIndex {
		&self.index
	}

	/// Find the rule governing a single frame.
	///
	/// Tiers are tried from most to least specific: exact frame, exact
	/// module, exact routine, then fully wildcard rules.
	pub fn find_matching_rule(&self, frame: &Frame) -> Option<&Rule> {
		if let Some(rule) = self.index.exact_frame(frame.label()) {
			tracing::debug!(frame = %frame, "matched exact-frame rule");
			return Some(rule);
		}

		if let Some(rule) = self
			.index
			.module_rules(frame.module())
			.iter()
			.find(|rule| matches(frame.routine(), rule.routine_pattern()))
		{
			tracing::debug!(frame = %frame, rule = %rule, "matched exact-module rule");
			return Some(rule);
		}

		if let Some(rule) = self
			.index
			.routine_rules(frame.routine())
			.iter()
			.find(|rule| matches(frame.module(), rule.module_pattern()))
		{
			tracing::debug!(frame = %frame, rule = %rule, "matched exact-routine rule");
			return Some(rule);
		}

		let rule = self.index.wildcard_rules().iter().find(|rule| {
			matches(frame.module(), rule.module_pattern())
				&& matches(frame.routine(), rule.routine_pattern())
		});
		if let Some(rule) = rule {
			tracing::debug!(frame = %frame, rule = %rule, "matched wildcard rule");
		}
		rule
	}

	/// Pick the blame frame of a stack, innermost frame first.
	///
	/// The first frame that is unmatched, or matched by a rule other than
	/// `ignore`, is blamed. Returns `None` when the stack is empty or every
	/// frame is ignored.
	pub fn triage_stack<'a>(&'a self, frames: &'a [Frame]) -> Option<Blame<'a>> {
		for frame in frames {
			let rule = self.find_matching_rule(frame);
			match rule {
				Some(rule) if rule.is_ignore() => {
					tracing::debug!(frame = %frame, "skipping ignored frame");
				}
				_ => {
					tracing::debug!(
						frame = %frame,
						followup = ?rule.map(Rule::followup),
						"blamed frame"
					);
					return Some(Blame { frame, rule });
				}
			}
		}

		tracing::debug!(frames = frames.len(), "no blame frame determined");
		None
	}
}
