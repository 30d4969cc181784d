use crate::options::Features;
use crate::patterns;
use crate::patterns::ListItemMatch;
use crate::patterns::ListKind;

/// What a block token turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind<'a> {
	/// A whole fenced code block and its verbatim inner text.
	CodeBlock { content: &'a str },
	ListItem(ListItemMatch<'a>),
	Heading { level: u8, text: &'a str },
	Blockquote { text: &'a str },
	Rule,
	/// Anything else, possibly holding several paragraphs.
	Paragraph,
}

/// Classify a token. Precedence runs code block, list item, heading,
/// blockquote, rule and finally paragraph; a construct switched off in
/// `features` is skipped.
pub fn classify<'a>(token: &'a str, features: &Features) -> BlockKind<'a> {
	if features.code_blocks {
		if let Some(content) = patterns::code_block(token) {
			return BlockKind::CodeBlock { content };
		}
	}

	if let Some(item) = list_item(token, features) {
		return BlockKind::ListItem(item);
	}

	if features.headings {
		if let Some((level, text)) = patterns::heading(token) {
			return BlockKind::Heading { level, text };
		}
	}

	if features.blockquotes {
		if let Some(text) = patterns::blockquote(token) {
			return BlockKind::Blockquote { text };
		}
	}

	if features.horizontal_rules && patterns::is_rule(token) {
		return BlockKind::Rule;
	}

	BlockKind::Paragraph
}

/// Match a list item whose kind is enabled.
pub fn list_item<'a>(token: &'a str, features: &Features) -> Option<ListItemMatch<'a>> {
	patterns::list_item(token).filter(|item| {
		match item.kind {
			ListKind::Ordered => features.ordered_lists,
			ListKind::Unordered => features.unordered_lists,
		}
	})
}
