use std::borrow::Cow;

use regex::Captures;

use crate::options::Features;
use crate::patterns::BACKTICK_SPAN;
use crate::patterns::BLOCK_BOUNDARY;
use crate::patterns::FENCED_SPAN;
use crate::patterns::PLACEHOLDER;
use crate::patterns::PLACEHOLDER_MARK;
use crate::tokens::BlockToken;

/// Split raw markdown into block tokens in document order.
///
/// Fenced code blocks are swapped for placeholders before splitting and put
/// back afterwards, so nothing inside a fence is ever split or classified on
/// its own.
#[tracing::instrument(level = "trace", skip_all, fields(bytes = markdown.len()))]
pub fn tokenize(markdown: &str, features: &Features) -> Vec<BlockToken> {
	let markdown = normalize_line_endings(markdown);

	let mut code_blocks: Vec<String> = vec![];
	let protected = if features.code_blocks {
		FENCED_SPAN.replace_all(&markdown, |captures: &Captures<'_>| {
			code_blocks.push(captures[0].to_string());
			format!(
				"{PLACEHOLDER_MARK}CODEBLOCK{}{PLACEHOLDER_MARK}",
				code_blocks.len() - 1
			)
		})
	} else {
		Cow::Borrowed(&*markdown)
	};

	let escaped = BACKTICK_SPAN.replace_all(&protected, |captures: &Captures<'_>| {
		html_escape::encode_text(&captures[0]).into_owned()
	});

	let tokens: Vec<BlockToken> = split_keeping_boundaries(&escaped)
		.into_iter()
		.filter(|piece| !piece.trim().is_empty())
		.enumerate()
		.map(|(index, piece)| BlockToken::new(index, restore_code_blocks(piece, &code_blocks)))
		.collect();

	tracing::trace!(
		tokens = tokens.len(),
		code_blocks = code_blocks.len(),
		"tokenized document"
	);

	tokens
}

fn normalize_line_endings(markdown: &str) -> Cow<'_, str> {
	if markdown.contains('\r') {
		Cow::Owned(markdown.replace("\r\n", "\n").replace('\r', "\n"))
	} else {
		Cow::Borrowed(markdown)
	}
}

/// Split on every block boundary, keeping the boundaries themselves as
/// pieces alongside the text between them.
fn split_keeping_boundaries(text: &str) -> Vec<&str> {
	let mut pieces = vec![];
	let mut last_end = 0;

	for boundary in BLOCK_BOUNDARY.find_iter(text) {
		pieces.push(&text[last_end..boundary.start()]);
		pieces.push(boundary.as_str());
		last_end = boundary.end();
	}
	pieces.push(&text[last_end..]);

	pieces
}

fn restore_code_blocks(piece: &str, code_blocks: &[String]) -> String {
	if code_blocks.is_empty() || !piece.contains(PLACEHOLDER_MARK) {
		return piece.to_string();
	}

	// A token that is exactly one code block is escaped when its `<pre>` is
	// written. Spans inside other text are escaped here.
	let whole_block = PLACEHOLDER
		.find(piece)
		.is_some_and(|found| found.as_str() == piece.trim());

	PLACEHOLDER
		.replace_all(piece, |captures: &Captures<'_>| {
			let Some(block) = captures[1]
				.parse::<usize>()
				.ok()
				.and_then(|index| code_blocks.get(index))
			else {
				return captures[0].to_string();
			};

			if whole_block {
				block.clone()
			} else {
				html_escape::encode_text(block).into_owned()
			}
		})
		.into_owned()
}
