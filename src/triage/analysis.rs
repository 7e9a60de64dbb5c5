use crate::error::Result;
use crate::rules::index::RuleIndex;
use crate::triage::engine::TriageEngine;
use crate::triage::frame::{Frame, FrameProvider};
use crate::triage::report::{FAULT_STACK, FAULT_SYMBOL, FOLLOW_UP, Report};

/// Label reported when no blame frame could be determined.
pub const UNKNOWN_SYMBOL: &str = "UNKNOWN!UNKNOWN";

/// One step of a crash analysis. Analyzers add properties to the report.
pub trait Analyzer {
	fn analyze(&self, stack: &[Frame], report: &mut Report) -> Result<()>;
}

/// Runs a sequence of analyzers over the same stack.
#[derive(Default)]
pub struct AnalysisEngine {
	analyzers: Vec<Box<dyn Analyzer>>,
}

impl AnalysisEngine {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append an analyzer. Analyzers run in the order they were added.
	pub fn add_analyzer(&mut self, analyzer: impl Analyzer + 'static) {
		self.analyzers.push(Box::new(analyzer));
	}

	/// Analyze a stack that has already been captured.
	pub fn analyze(&self, stack: &[Frame]) -> Result<Report> {
		let mut report = Report::new();
		for analyzer in &self.analyzers {
			analyzer.analyze(stack, &mut report)?;
		}
		Ok(report)
	}

	/// Capture a stack from the provider and analyze it.
	pub fn analyze_from(&self, provider: &dyn FrameProvider) -> Result<Report> {
		let stack = provider.frames()?;
		self.analyze(&stack)
	}
}

/// Records the fault stack, the blamed symbol and its follow-up.
#[derive(Debug, Clone, Default)]
pub struct StackTriageAnalyzer {
	engine: TriageEngine,
}

impl StackTriageAnalyzer {
	pub fn new(index: RuleIndex) -> Self {
		StackTriageAnalyzer {
			engine: TriageEngine::new(index),
		}
	}

	pub fn engine(&self) -> &TriageEngine {
		&self.engine
	}
}

impl Analyzer for StackTriageAnalyzer {
	fn analyze(&self, stack: &[Frame], report: &mut Report) -> Result<()> {
		let labels: Vec<&str> = stack.iter().map(Frame::label).collect();
		report.set(FAULT_STACK, labels.join("\n"));

		match self.engine.triage_stack(stack) {
			Some(blame) => {
				report.set(FAULT_SYMBOL, blame.frame.label());
				if let Some(followup) = blame.followup() {
					report.set(FOLLOW_UP, followup);
				}
			}
			None => report.set(FAULT_SYMBOL, UNKNOWN_SYMBOL),
		}

		Ok(())
	}
}
