//! Compiled grammar for block-level constructs.
//!
//! Every function here is a pure function of the slice it is given. The
//! regular expressions are compiled once and never carry match state between
//! calls.

use std::sync::LazyLock;

use regex::Regex;

/// Sentinel wrapped around the index of an extracted fenced code block.
pub(crate) const PLACEHOLDER_MARK: char = '\u{1}';

/// A fenced code block anywhere in the text, across lines, non-greedy.
pub(crate) static FENCED_SPAN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("fenced span pattern"));

/// A single-line back-tick span whose content is escaped before splitting.
pub(crate) static BACKTICK_SPAN: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"`.+?`").expect("back-tick span pattern"));

/// A code block placeholder left behind by the tokenizer.
pub(crate) static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\x01CODEBLOCK(\d+)\x01").expect("placeholder pattern"));

/// Combined block boundary pattern. Alternatives are listed in priority
/// order: heading, blockquote, rule, unordered item, ordered item, blank line,
/// code block placeholder.
pub(crate) static BLOCK_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(concat!(
		r"(?m)^(?:",
		r"#{1,3} .+$",
		r"|> *.+$",
		r"|[ \t]*[-*_]{3,}[ \t]*$",
		r"|[ \t]*[-*+] +.+$",
		r"|[ \t]*\d+\. .+$",
		r"|[ \t]*\n",
		r"|\x01CODEBLOCK\d+\x01$",
		r")"
	))
	.expect("block boundary pattern")
});

static CODE_BLOCK: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)\A```(.*?)```\z").expect("code block pattern"));

static ORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\A([ \t]*)\d+\. +(?:\[([ xX])\] )?(.+)\z").expect("ordered item pattern")
});

static UNORDERED_ITEM: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\A([ \t]*)[-*+] +(?:\[([ xX])\] )?(.+)\z").expect("unordered item pattern")
});

static HEADING: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\A(#{1,3}) (.+)\z").expect("heading pattern"));

static BLOCKQUOTE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\A> (.+)\z").expect("blockquote pattern"));

static RULE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\A[ \t]*[-*_]{3,}[ \t]*\z").expect("rule pattern"));

static HTML_OPEN_TAG: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\A<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*>").expect("html open tag pattern")
});

/// The container kind a list item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
	/// `1. item`, rendered inside `<ol>`.
	Ordered,
	/// `- item`, `* item` or `+ item`, rendered inside `<ul>`.
	Unordered,
}

impl ListKind {
	pub fn tag(self) -> &'static str {
		match self {
			Self::Ordered => "ol",
			Self::Unordered => "ul",
		}
	}
}

/// A task-list checkbox at the start of a list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkbox {
	/// `[x]`
	Checked,
	/// `[ ]`
	Unchecked,
}

/// The fields extracted from a line that matches the list item grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListItemMatch<'a> {
	pub kind: ListKind,
	/// Count of leading whitespace characters on the line.
	pub indent: usize,
	pub checkbox: Option<Checkbox>,
	pub content: &'a str,
}

/// Inner text of a token that is exactly one fenced code block.
pub fn code_block(token: &str) -> Option<&str> {
	CODE_BLOCK
		.captures(token)
		.and_then(|captures| captures.get(1))
		.map(|inner| inner.as_str())
}

/// Match a list item line, ordered items first.
pub fn list_item(token: &str) -> Option<ListItemMatch<'_>> {
	ordered_item(token).or_else(|| unordered_item(token))
}

pub fn ordered_item(token: &str) -> Option<ListItemMatch<'_>> {
	capture_item(&ORDERED_ITEM, ListKind::Ordered, token)
}

pub fn unordered_item(token: &str) -> Option<ListItemMatch<'_>> {
	capture_item(&UNORDERED_ITEM, ListKind::Unordered, token)
}

fn capture_item<'a>(pattern: &Regex, kind: ListKind, token: &'a str) -> Option<ListItemMatch<'a>> {
	let captures = pattern.captures(token)?;
	let indent = captures.get(1).map_or(0, |m| m.as_str().chars().count());
	let checkbox = captures.get(2).map(|m| {
		if m.as_str() == " " {
			Checkbox::Unchecked
		} else {
			Checkbox::Checked
		}
	});
	let content = captures.get(3)?.as_str().trim_end();

	Some(ListItemMatch {
		kind,
		indent,
		checkbox,
		content,
	})
}

/// Heading depth (1 to 3) and text.
pub fn heading(token: &str) -> Option<(u8, &str)> {
	let captures = HEADING.captures(token)?;
	let level = u8::try_from(captures.get(1)?.as_str().len()).ok()?;
	Some((level, captures.get(2)?.as_str()))
}

pub fn blockquote(token: &str) -> Option<&str> {
	BLOCKQUOTE
		.captures(token)
		.and_then(|captures| captures.get(1))
		.map(|text| text.as_str())
}

pub fn is_rule(token: &str) -> bool {
	RULE.is_match(token)
}

/// Whether a paragraph section is one complete `<tag …>…</tag>` element.
pub fn html_element(section: &str) -> bool {
	let Some(captures) = HTML_OPEN_TAG.captures(section) else {
		return false;
	};
	let (Some(open), Some(name)) = (captures.get(0), captures.get(1)) else {
		return false;
	};
	let closing = format!("</{}>", name.as_str());

	section.len() >= open.end() + closing.len() && section.ends_with(&closing)
}
