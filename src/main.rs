use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use stack_triage::config::{CONFIG_FILE_NAME, generate_init_template, load_settings};
use stack_triage::rules::{RuleIndex, load_rules_file};
use stack_triage::triage::{AnalysisEngine, FrameProvider, StackTriageAnalyzer, TextStack};

/// Rule file used when neither the command line nor a config names one.
const DEFAULT_RULES_FILE: &str = "triage.ini";

#[derive(Parser)]
#[command(name = "triage")]
#[command(
	author,
	version,
	about = "Crash stack triage: blame the faulting frame using wildcard follow-up rules"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Create a template .triage.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .triage.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Increase log output (-v info, -vv debug); RUST_LOG is used otherwise
	#[arg(short, long, action = ArgAction::Count, global = true)]
	verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
	/// Triage a stack dump and report the blamed frame
	Analyze {
		#[command(flatten)]
		rules: RuleArgs,

		/// Also write the report to this file
		#[arg(short, long, value_name = "PATH")]
		output: Option<PathBuf>,

		/// Stack dump, innermost frame first ('-' or omitted reads stdin)
		stack: Option<PathBuf>,
	},
	/// List the frames of a stack dump as they will be triaged
	Frames {
		/// Stack dump ('-' or omitted reads stdin)
		stack: Option<PathBuf>,
	},
	/// Rule file commands
	Rules {
		#[command(subcommand)]
		action: RulesAction,
	},
}

#[derive(Subcommand)]
enum RulesAction {
	/// Print the loaded rules tier by tier, in match order
	Show {
		#[command(flatten)]
		rules: RuleArgs,
	},
	/// Check a rule file without analyzing anything
	Validate {
		#[command(flatten)]
		rules: RuleArgs,
	},
}

#[derive(Args)]
struct RuleArgs {
	/// Rule file (defaults to the configured file, then ./triage.ini)
	#[arg(short = 'i', long = "rules", value_name = "PATH")]
	rules: Option<PathBuf>,

	/// Reject duplicate exact-frame rules
	#[arg(long)]
	strict: bool,
}

/// Rule loading options after applying config defaults.
struct RuleOptions {
	path: PathBuf,
	strict: bool,
	output: Option<PathBuf>,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_logging(verbose: u8) {
	let filter = match verbose {
		0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		1 => EnvFilter::new("info"),
		_ => EnvFilter::new("debug"),
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	match cli.command {
		Some(Commands::Analyze {
			rules,
			output,
			stack,
		}) => handle_analyze(&rules, output, stack.as_deref()),
		Some(Commands::Frames { stack }) => handle_frames(stack.as_deref()),
		Some(Commands::Rules { action }) => match action {
			RulesAction::Show { rules } => handle_rules_show(&rules),
			RulesAction::Validate { rules } => handle_rules_validate(&rules),
		},
		// No command specified - this shouldn't happen due to arg_required_else_help
		None => Ok(ExitCode::SUCCESS),
	}
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

/// Merge command-line rule options with the config cascade.
fn resolve_options(args: &RuleArgs, output: Option<PathBuf>) -> Result<RuleOptions> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	let settings = load_settings(&cwd).context("Failed to load configuration")?;

	Ok(RuleOptions {
		path: args
			.rules
			.clone()
			.or(settings.rules)
			.unwrap_or_else(|| cwd.join(DEFAULT_RULES_FILE)),
		strict: args.strict || settings.strict,
		output: output.or(settings.output),
	})
}

fn load_index(options: &RuleOptions) -> Result<RuleIndex> {
	let rules = load_rules_file(&options.path)
		.with_context(|| format!("Failed to load rules from {}", options.path.display()))?;

	if options.strict {
		RuleIndex::load_strict(rules)
			.with_context(|| format!("Invalid rules in {}", options.path.display()))
	} else {
		Ok(RuleIndex::load(rules))
	}
}

fn read_stack(stack: Option<&Path>) -> Result<TextStack> {
	match stack {
		Some(path) if path != Path::new("-") => TextStack::from_path(path)
			.with_context(|| format!("Failed to read stack from {}", path.display())),
		_ => TextStack::from_reader("stdin", std::io::stdin().lock())
			.context("Failed to read stack from stdin"),
	}
}

fn handle_analyze(
	args: &RuleArgs,
	output: Option<PathBuf>,
	stack: Option<&Path>,
) -> Result<ExitCode> {
	let options = resolve_options(args, output)?;
	let index = load_index(&options)?;
	let stack = read_stack(stack)?;

	let mut engine = AnalysisEngine::new();
	engine.add_analyzer(StackTriageAnalyzer::new(index));

	let report = engine.analyze_from(&stack).context("Analysis failed")?;
	print!("{report}");

	if let Some(ref path) = options.output {
		report
			.write_to(path)
			.with_context(|| format!("Failed to write report to {}", path.display()))?;
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_frames(stack: Option<&Path>) -> Result<ExitCode> {
	let frames = read_stack(stack)?.frames()?;

	for (i, frame) in frames.iter().enumerate() {
		match frame.ip() {
			Some(ip) => println!("{i}\t{ip:#x} {frame}"),
			None => println!("{i}\t{frame}"),
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_rules_show(args: &RuleArgs) -> Result<ExitCode> {
	let options = resolve_options(args, None)?;
	let index = load_index(&options)?;

	if index.is_empty() {
		println!("No rules loaded from {}", options.path.display());
		return Ok(ExitCode::SUCCESS);
	}

	println!("# Source: {}\n", options.path.display());
	for (kind, rules) in index.tiers() {
		if rules.is_empty() {
			continue;
		}
		println!("[{}] ({} rules)", kind.as_str(), rules.len());
		for rule in rules {
			println!("  {rule}");
		}
		println!();
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_rules_validate(args: &RuleArgs) -> Result<ExitCode> {
	let options = resolve_options(args, None)?;

	match load_index(&options) {
		Ok(index) => {
			let counts: Vec<String> = index
				.tiers()
				.iter()
				.map(|(kind, rules)| format!("{} {}", kind.as_str(), rules.len()))
				.collect();
			println!(
				"{} is valid: {} rules ({})",
				options.path.display(),
				index.len(),
				counts.join(", ")
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Rule error: {e:#}");
			Ok(ExitCode::FAILURE)
		}
	}
}
