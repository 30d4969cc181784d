//! Inline span formatting: images, code spans, bold, italic and links.
//!
//! Rules run in a fixed order, each as a global substitution over the text
//! left by the previous rule. Images and code spans are literal: their output
//! is set aside before the emphasis and link rules run so that `**` inside a
//! code span stays untouched.

use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

const STASH_OPEN: char = '\u{2}';
const STASH_CLOSE: char = '\u{3}';

static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"!\[(.+?)\]\((.+?)\)(?:\{width=(\d+) height=(\d+)\})?").expect("image pattern")
});

static TRIPLE_CODE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("triple code pattern"));

static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").expect("code pattern"));

static BOLD: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern"));

static ITALIC: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("italic pattern"));

static LINK: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\[(.+?)\]\((.+?)\)").expect("link pattern"));

static STASHED: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\x02(\d+)\x03").expect("stash pattern"));

/// Format the inline spans of a single piece of text.
pub fn format_inline(text: &str) -> String {
	let mut literals = Literals::default();

	let text = IMAGE.replace_all(text, |captures: &Captures<'_>| {
		let size = match (captures.get(3), captures.get(4)) {
			(Some(width), Some(height)) => {
				format!(" width='{}' height='{}'", width.as_str(), height.as_str())
			}
			_ => String::new(),
		};
		literals.stash(format!(
			"<img src='{}' alt='{}'{size} />",
			&captures[2], &captures[1]
		))
	});
	let text = TRIPLE_CODE.replace_all(&text, |captures: &Captures<'_>| {
		literals.stash(format!("<code>{}</code>", &captures[1]))
	});
	let text = CODE.replace_all(&text, |captures: &Captures<'_>| {
		literals.stash(format!("<code>{}</code>", &captures[1]))
	});
	let text = BOLD.replace_all(&text, "<strong>${1}</strong>");
	let text = ITALIC.replace_all(&text, "<em>${1}</em>");
	let text = LINK.replace_all(&text, r#"<a href="${2}">${1}</a>"#);

	literals.restore(&text)
}

/// Format several segments of one element, such as the lines of a heading.
///
/// A single space is inserted before the final segment when there is more
/// than one, so the last line does not run into the text before it.
pub fn format_segments<S: AsRef<str>>(segments: &[S]) -> String {
	let last = segments.len().saturating_sub(1);
	let mut joined = String::new();

	for (position, segment) in segments.iter().enumerate() {
		if segments.len() > 1 && position == last {
			joined.push(' ');
		}
		joined.push_str(&format_inline(segment.as_ref()));
	}

	joined
}

/// Output of literal rules, held back from the later rules.
#[derive(Default)]
struct Literals {
	entries: Vec<String>,
}

impl Literals {
	fn stash(&mut self, markup: String) -> String {
		let key = format!("{STASH_OPEN}{}{STASH_CLOSE}", self.entries.len());
		self.entries.push(markup);
		key
	}

	/// Entries only ever refer to earlier entries, so nested keys resolve.
	fn restore(&self, text: &str) -> String {
		if self.entries.is_empty() {
			return text.to_string();
		}

		STASHED
			.replace_all(text, |captures: &Captures<'_>| {
				captures[1]
					.parse::<usize>()
					.ok()
					.and_then(|index| self.entries.get(index))
					.map(|entry| self.restore(entry))
					.unwrap_or_else(|| captures[0].to_string())
			})
			.into_owned()
	}
}
