use serde::Deserialize;
use serde::Serialize;

/// Switches deciding which block constructs get special treatment.
///
/// A disabled construct is not an error: its lines fall through to paragraph
/// handling.
///
/// ```toml
/// [features]
/// code_blocks = true
/// ordered_lists = true
/// unordered_lists = true
/// headings = true
/// blockquotes = true
/// horizontal_rules = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
	/// Protect fenced code blocks from splitting and render them as
	/// `<pre><code>`.
	pub code_blocks: bool,
	pub ordered_lists: bool,
	pub unordered_lists: bool,
	/// `#`, `##` and `###` headings.
	pub headings: bool,
	pub blockquotes: bool,
	pub horizontal_rules: bool,
}

impl Default for Features {
	fn default() -> Self {
		Self {
			code_blocks: true,
			ordered_lists: true,
			unordered_lists: true,
			headings: true,
			blockquotes: true,
			horizontal_rules: true,
		}
	}
}

/// Options for nested list construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
	/// When `true`, an item indented exactly one column deeper than the item
	/// before it becomes that item's child. When `false` (the default) such an
	/// item is left out of the list.
	pub nest_single_space: bool,
}

/// Everything that influences the output of a
/// [`MarkdownParser`](crate::MarkdownParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
	pub features: Features,
	pub lists: ListOptions,
	/// Write `data-line` attributes on every emitted element.
	pub line_markers: bool,
	/// Reuse built list trees across calls for identical runs of items.
	pub cache: bool,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self {
			features: Features::default(),
			lists: ListOptions::default(),
			line_markers: true,
			cache: true,
		}
	}
}
