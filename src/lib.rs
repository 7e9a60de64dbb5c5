//! Stack triage - pick the frame to blame for a crash.
//!
//! This library provides the core functionality for triage, including:
//! - Wildcard rule parsing and tiered rule indexing
//! - Walking a resolved stack to find the blame frame and its follow-up
//! - Configuration file parsing and cascade discovery
//! - Analysis reports for the faulting stack
//!
//! # Example
//!
//! ```no_run
//! use stack_triage::rules::{RuleIndex, load_rules_file};
//! use stack_triage::triage::{Frame, TriageEngine};
//! use std::path::Path;
//!
//! let rules = load_rules_file(Path::new("triage.ini")).unwrap();
//! let engine = TriageEngine::new(RuleIndex::load(rules));
//!
//! let stack = vec![
//!     Frame::new("ntdll", "KiUserExceptionDispatcher"),
//!     Frame::new("MyApp", "Parser::Parse(char const*)"),
//! ];
//!
//! if let Some(blame) = engine.triage_stack(&stack) {
//!     println!("blame {} -> {:?}", blame.frame, blame.followup());
//! }
//! ```

pub mod config;
pub mod error;
pub mod rules;
pub mod triage;

pub use error::{Result, TriageError};
