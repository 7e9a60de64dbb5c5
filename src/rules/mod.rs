//! Triage rules.
//!
//! This module handles:
//! - Wildcard pattern matching for module and routine names
//! - Parsing `<frame>=<followup>` rule definitions
//! - Reading rule files and filtering comment lines
//! - Indexing rules into priority tiers

pub mod index;
pub mod pattern;
pub mod rule;
pub mod source;

pub use index::RuleIndex;
pub use pattern::matches;
pub use rule::{IGNORE_FOLLOWUP, Rule, RuleKind};
pub use source::{load_rules_file, parse_rules_str};
