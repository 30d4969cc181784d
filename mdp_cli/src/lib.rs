use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render markdown to HTML previews, re-rendering on every edit.",
	long_about = "mdp (markdown preview) renders a markdown document to HTML fragments tagged with \
	              the source block each one came from.\n\nThe whole document is re-parsed on \
	              every render, and runs of list items are cached between renders in watch \
	              mode.\n\nQuick start:\n  mdp render notes.md     Print the HTML\n  mdp watch \
	              notes.md      Re-render on every save\n  mdp check notes.md --against \
	              notes.html  Verify a rendered file"
)]
pub struct MdpCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory searched for an `mdp.toml` config file. Defaults to the
	/// current directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output. Logs list flushes and cache activity to stderr.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Render a markdown file.
	///
	/// Prints the rendered fragments to stdout, one per line, or writes them
	/// to `--output`. Use `--format json` to emit the generic element tree
	/// instead of markup.
	Render {
		/// The markdown file to render.
		file: PathBuf,

		/// Output format. Use `html` for markup or `json` for the element
		/// tree.
		#[arg(long, value_enum, default_value_t = OutputFormat::Html)]
		format: OutputFormat,

		/// Write the output to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Re-render a markdown file every time it changes.
	///
	/// Keeps one parser alive for the whole session so unchanged runs of list
	/// items are served from the cache.
	Watch {
		/// The markdown file to watch.
		file: PathBuf,

		/// Write the output to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Check that a rendered HTML file matches its markdown source.
	///
	/// Exits with status code 1 when the file is out of date. Ideal for CI
	/// pipelines that commit rendered output.
	Check {
		/// The markdown source.
		file: PathBuf,

		/// The previously rendered HTML file.
		#[arg(long)]
		against: PathBuf,

		/// Show a line diff between the rendered file and the fresh output.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Markup fragments joined by line breaks.
	Html,
	/// The element tree as JSON, for programmatic consumption.
	Json,
}
