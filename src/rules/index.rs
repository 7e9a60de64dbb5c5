use crate::error::{Result, TriageError};
use crate::rules::pattern::literal_len;
use crate::rules::rule::{Rule, RuleKind};
use std::collections::HashMap;

/// Loaded rule set, split into tiers by specificity.
///
/// Every rule lives in exactly one tier. Within the module, routine and
/// wildcard tiers, rules are ordered by ascending literal length of the
/// wildcard field, ties keeping load order. The index is built once and
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
	exact_frame: HashMap<String, Rule>,
	by_module: HashMap<String, Vec<Rule>>,
	by_routine: HashMap<String, Vec<Rule>>,
	wildcard: Vec<Rule>,
}

impl RuleIndex {
	/// Build an index. A later exact-frame rule replaces an earlier one
	/// with the same `module!routine` key.
	pub fn load(rules: impl IntoIterator<Item = Rule>) -> Self {
		let mut index = RuleIndex::default();
		for rule in rules {
			if let Some(shadowed) = index.insert(rule) {
				tracing::warn!(
					frame = %shadowed.frame_pattern(),
					followup = %shadowed.followup(),
					"exact-frame rule shadowed by a later definition"
				);
			}
		}
		index.sort_tiers();
		index
	}

	/// Build an index, rejecting duplicate exact-frame rules.
	pub fn load_strict(rules: impl IntoIterator<Item = Rule>) -> Result<Self> {
		let mut index = RuleIndex::default();
		for rule in rules {
			if let Some(shadowed) = index.insert(rule) {
				return Err(TriageError::DuplicateFrameRule {
					label: shadowed.frame_pattern(),
				});
			}
		}
		index.sort_tiers();
		Ok(index)
	}

	/// Place a rule in its tier, returning any exact-frame rule it displaced.
	fn insert(&mut self, rule: Rule) -> Option<Rule> {
		match rule.kind() {
			RuleKind::ExactFrame => self.exact_frame.insert(rule.frame_pattern(), rule),
			RuleKind::ExactModule => {
				self.by_module
					.entry(rule.module_pattern().to_string())
					.or_default()
					.push(rule);
				None
			}
			RuleKind::ExactRoutine => {
				self.by_routine
					.entry(rule.routine_pattern().to_string())
					.or_default()
					.push(rule);
				None
			}
			RuleKind::Wildcard => {
				self.wildcard.push(rule);
				None
			}
		}
	}

	fn sort_tiers(&mut self) {
		// Shorter literal remainder first. `sort_by_key` is stable.
		for rules in self.by_module.values_mut() {
			rules.sort_by_key(|rule| literal_len(rule.routine_pattern()));
		}
		for rules in self.by_routine.values_mut() {
			rules.sort_by_key(|rule| literal_len(rule.module_pattern()));
		}
		self.wildcard.sort_by_key(|rule| literal_len(rule.module_pattern()));
	}

	/// The exact-frame rule for a `module!routine` label.
	pub fn exact_frame(&self, label: &str) -> Option<&Rule> {
		self.exact_frame.get(label)
	}

	/// Rules for an exact module, in match order.
	pub fn module_rules(&self, module: &str) -> &[Rule] {
		self.by_module.get(module).map(Vec::as_slice).unwrap_or_default()
	}

	/// Rules for an exact routine, in match order.
	pub fn routine_rules(&self, routine: &str) -> &[Rule] {
		self.by_routine
			.get(routine)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}

	/// Fully wildcard rules, in match order.
	pub fn wildcard_rules(&self) -> &[Rule] {
		&self.wildcard
	}

	/// Every rule grouped by tier, in tier priority order.
	///
	/// Keyed tiers are listed by key so the output is stable.
	pub fn tiers(&self) -> Vec<(RuleKind, Vec<&Rule>)> {
		let mut exact: Vec<&Rule> = self.exact_frame.values().collect();
		exact.sort_by(|a, b| a.raw_frame().cmp(b.raw_frame()));

		vec![
			(RuleKind::ExactFrame, exact),
			(RuleKind::ExactModule, flatten_sorted(&self.by_module)),
			(RuleKind::ExactRoutine, flatten_sorted(&self.by_routine)),
			(RuleKind::Wildcard, self.wildcard.iter().collect()),
		]
	}

	/// Total number of indexed rules.
	pub fn len(&self) -> usize {
		self.exact_frame.len()
			+ self.by_module.values().map(Vec::len).sum::<usize>()
			+ self.by_routine.values().map(Vec::len).sum::<usize>()
			+ self.wildcard.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

fn flatten_sorted(tier: &HashMap<String, Vec<Rule>>) -> Vec<&Rule> {
	let mut keys: Vec<&String> = tier.keys().collect();
	keys.sort();
	keys.into_iter()
		.flat_map(|key| tier[key].iter())
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rules(definitions: &[&str]) -> Vec<Rule> {
		definitions
			.iter()
			.map(|d| Rule::parse(d).unwrap())
			.collect()
	}

	fn followups(rules: &[Rule]) -> Vec<&str> {
		rules.iter().map(Rule::followup).collect()
	}

	#[test]
	fn test_each_rule_lands_in_one_tier() {
		let index = RuleIndex::load(rules(&[
			"M!R=frame",
			"M*=module",
			"*R=routine",
			"*!*=wild",
		]));

		assert_eq!(index.len(), 4);
		assert_eq!(index.exact_frame("M!R").unwrap().followup(), "frame");
		assert_eq!(followups(index.module_rules("M")), vec!["module"]);
		assert_eq!(followups(index.routine_rules("R")), vec!["routine"]);
		assert_eq!(followups(index.wildcard_rules()), vec!["wild"]);
	}

	#[test]
	fn test_module_tier_sorted_by_routine_literal_length() {
		let index = RuleIndex::load(rules(&[
			"M!Get*Value*=long",
			"M!*=any",
			"M!Get*=short",
		]));
		assert_eq!(
			followups(index.module_rules("M")),
			vec!["any", "short", "long"]
		);
	}

	#[test]
	fn test_routine_tier_sorted_by_module_literal_length() {
		let index = RuleIndex::load(rules(&["libfoo*!R=long", "*!R=any", "lib*!R=short"]));
		assert_eq!(
			followups(index.routine_rules("R")),
			vec!["any", "short", "long"]
		);
	}

	#[test]
	fn test_wildcard_tier_sorted_by_module_literal_length() {
		let index = RuleIndex::load(rules(&["core*!*x=long", "*!*=any", "c*!*y=short"]));
		assert_eq!(
			followups(index.wildcard_rules()),
			vec!["any", "short", "long"]
		);
	}

	#[test]
	fn test_ties_keep_load_order() {
		let index = RuleIndex::load(rules(&["M!ab*=first", "M!*cd=second", "M!e*f=third"]));
		assert_eq!(
			followups(index.module_rules("M")),
			vec!["first", "second", "third"]
		);
	}

	#[test]
	fn test_duplicate_exact_frame_last_wins() {
		let index = RuleIndex::load(rules(&["M!R=first", "M!R=second"]));
		assert_eq!(index.len(), 1);
		assert_eq!(index.exact_frame("M!R").unwrap().followup(), "second");
	}

	#[test]
	fn test_strict_rejects_duplicate_exact_frame() {
		let result = RuleIndex::load_strict(rules(&["M!R=first", "X*=ok", "M!R=second"]));
		match result.unwrap_err() {
			TriageError::DuplicateFrameRule { label } => assert_eq!(label, "M!R"),
			other => panic!("Expected DuplicateFrameRule error, got {other:?}"),
		}
	}

	#[test]
	fn test_strict_accepts_distinct_rules() {
		let index = RuleIndex::load_strict(rules(&["M!R=a", "M!S=b", "M*=c", "M*=d"])).unwrap();
		assert_eq!(index.len(), 4);
	}

	#[test]
	fn test_unknown_keys_yield_empty_tiers() {
		let index = RuleIndex::load(Vec::new());
		assert!(index.is_empty());
		assert!(index.exact_frame("M!R").is_none());
		assert!(index.module_rules("M").is_empty());
		assert!(index.routine_rules("R").is_empty());
		assert!(index.wildcard_rules().is_empty());
	}

	#[test]
	fn test_tiers_in_priority_order() {
		let index = RuleIndex::load(rules(&["*!*=w", "b*=mb", "a*=ma", "*R=r", "M!R=f"]));
		let tiers = index.tiers();
		let kinds: Vec<RuleKind> = tiers.iter().map(|(kind, _)| *kind).collect();
		assert_eq!(
			kinds,
			vec![
				RuleKind::ExactFrame,
				RuleKind::ExactModule,
				RuleKind::ExactRoutine,
				RuleKind::Wildcard
			]
		);
		let module_tier: Vec<&str> = tiers[1].1.iter().map(|r| r.followup()).collect();
		assert_eq!(module_tier, vec!["ma", "mb"]);
	}

	#[test]
	fn test_index_is_shareable_across_threads() {
		fn assert_send_sync<T: Send + Sync>() {}
		assert_send_sync::<RuleIndex>();
	}
}
