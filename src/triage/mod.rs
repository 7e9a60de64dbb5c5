//! Stack triage.
//!
//! This module handles:
//! - Resolved stack frames and the providers that supply them
//! - Walking a stack against the rule index to pick a blame frame
//! - Running analyzers and collecting their report properties

pub mod analysis;
pub mod engine;
pub mod frame;
pub mod report;

pub use analysis::{AnalysisEngine, Analyzer, StackTriageAnalyzer, UNKNOWN_SYMBOL};
pub use engine::{Blame, TriageEngine};
pub use frame::{Frame, FrameProvider, TextStack, UNKNOWN};
pub use report::{FAULT_STACK, FAULT_SYMBOL, FOLLOW_UP, Report};
