use std::borrow::Cow;
use std::fmt::Display;

use derive_more::Deref;
use derive_more::DerefMut;

/// One block-level unit of the source document.
///
/// A token is a heading line, a blockquote line, a horizontal rule, a whole
/// fenced code block, a single list item line or a run of paragraph text.
/// Tokens are produced by [`tokenize`](crate::tokenize) in document order and
/// dereference to their text.
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct BlockToken {
	/// Zero-based position of the token in the document. This is the value
	/// written to the `data-line` attribute of every element built from it.
	pub index: usize,
	/// The token text, with fenced code blocks restored verbatim.
	#[deref]
	pub text: String,
}

impl BlockToken {
	pub fn new(index: usize, text: impl Into<String>) -> Self {
		Self {
			index,
			text: text.into(),
		}
	}
}

/// A finished piece of markup for one block or one list structure.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deref, DerefMut)]
pub struct HtmlFragment(String);

impl HtmlFragment {
	pub fn new(markup: impl Into<String>) -> Self {
		Self(markup.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn into_inner(self) -> String {
		self.0
	}
}

impl AsRef<str> for HtmlFragment {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl Display for HtmlFragment {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<HtmlFragment> for String {
	fn from(fragment: HtmlFragment) -> Self {
		fragment.0
	}
}

/// The ` data-line='N'` attribute, or nothing when line markers are off.
pub(crate) fn data_line(index: usize, enabled: bool) -> Cow<'static, str> {
	if enabled {
		Cow::Owned(format!(" data-line='{index}'"))
	} else {
		Cow::Borrowed("")
	}
}
