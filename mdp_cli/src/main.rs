use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use mdp_cli::Commands;
use mdp_cli::MdpCli;
use mdp_cli::OutputFormat;
use mdp_core::MarkdownParser;
use mdp_core::MdpConfig;
use mdp_core::MdpError;
use mdp_core::MdpResult;
use mdp_core::ParseOptions;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = MdpCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Render {
			file,
			format,
			output,
		}) => run_render(&args, file, *format, output.as_deref()),
		Some(Commands::Watch { file, output }) => run_watch(&args, file, output.as_deref()),
		Some(Commands::Check {
			file,
			against,
			diff,
		}) => run_check(&args, file, against, *diff),
		None => {
			eprintln!("No subcommand specified. Run `mdp --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<MdpError>() {
			Ok(mdp_err) => {
				let report: miette::Report = (*mdp_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so rendered output on stdout stays clean. `RUST_LOG`
/// applies unless `--verbose` is set.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = if verbose {
		EnvFilter::new("mdp_core=debug,mdp=debug")
	} else {
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
	};

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.try_init()
		.ok();
}

fn resolve_root(args: &MdpCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Parser options from the discovered config file, or the defaults when
/// there is none.
fn load_options(args: &MdpCli) -> MdpResult<ParseOptions> {
	let root = resolve_root(args);
	let config = MdpConfig::load(&root)?.unwrap_or_default();

	Ok(config.parse_options())
}

fn read_input(path: &Path) -> MdpResult<String> {
	if !path.is_file() {
		return Err(MdpError::MissingInput {
			path: path.display().to_string(),
		});
	}

	Ok(std::fs::read_to_string(path)?)
}

fn render_document(
	parser: &mut MarkdownParser,
	markdown: &str,
	format: OutputFormat,
) -> Result<String, Box<dyn std::error::Error>> {
	let mut rendered = match format {
		OutputFormat::Html => parser.to_html(markdown),
		OutputFormat::Json => serde_json::to_string_pretty(&parser.parse(markdown))?,
	};
	rendered.push('\n');

	Ok(rendered)
}

fn write_output(rendered: &str, output: Option<&Path>) -> MdpResult<()> {
	match output {
		Some(path) => {
			std::fs::write(path, rendered)?;
			println!("{} {}", colored!("Wrote", green), path.display());
		}
		None => print!("{rendered}"),
	}

	Ok(())
}

fn run_render(
	args: &MdpCli,
	file: &Path,
	format: OutputFormat,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = load_options(args)?;
	let markdown = read_input(file)?;
	let mut parser = MarkdownParser::new(options);

	let rendered = render_document(&mut parser, &markdown, format)?;
	write_output(&rendered, output)?;

	Ok(())
}

fn run_watch(
	args: &MdpCli,
	file: &Path,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = load_options(args)?;
	let mut parser = MarkdownParser::new(options);
	render_once(&mut parser, file, output)?;

	println!(
		"\nWatching {} for changes... (press Ctrl+C to stop)",
		colored!(file.display(), bold)
	);

	// Editors often replace a file instead of writing to it, so watch the
	// parent directory and filter by file name.
	let target = file.canonicalize()?;
	let directory = target
		.parent()
		.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
	let file_name = target.file_name().map(std::ffi::OsStr::to_os_string);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				let touches_target = event
					.paths
					.iter()
					.any(|path| path.file_name().map(std::ffi::OsStr::to_os_string) == file_name);
				if touches_target
					&& matches!(
						event.kind,
						notify::EventKind::Modify(_) | notify::EventKind::Create(_)
					) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&directory, notify::RecursiveMode::NonRecursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, re-rendering...");
		if let Err(e) = render_once(&mut parser, file, output) {
			eprintln!("{} {e}", colored!("error:", red));
		}

		let stats = parser.cache_stats();
		tracing::info!(
			hits = stats.hits,
			misses = stats.misses,
			"list cache after render"
		);
	}
}

/// Read and render the file with a long-lived parser.
fn render_once(
	parser: &mut MarkdownParser,
	file: &Path,
	output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
	let markdown = read_input(file)?;
	let rendered = render_document(parser, &markdown, OutputFormat::Html)?;
	write_output(&rendered, output)?;

	Ok(())
}

fn run_check(
	args: &MdpCli,
	file: &Path,
	against: &Path,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = load_options(args)?;
	let markdown = read_input(file)?;
	let current = read_input(against)?;
	let expected = MarkdownParser::new(options).to_html(&markdown);

	if current.trim_end() == expected.trim_end() {
		println!(
			"Check passed: {} is up to date.",
			colored!(against.display(), bold)
		);
		return Ok(());
	}

	eprintln!("Check failed: {} is out of date.", against.display());
	if show_diff {
		eprintln!();
		print_diff(
			&format!("{}\n", current.trim_end()),
			&format!("{}\n", expected.trim_end()),
		);
	}
	eprintln!(
		"\nRun `mdp render {} --output {}` to update it.",
		file.display(),
		against.display()
	);

	process::exit(1);
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}
