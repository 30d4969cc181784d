use crate::block::BlockKind;
use crate::block::classify;
use crate::cache::ListCache;
use crate::inline::format_inline;
use crate::inline::format_segments;
use crate::list::ListTree;
use crate::options::ParseOptions;
use crate::patterns;
use crate::tokens::BlockToken;
use crate::tokens::HtmlFragment;
use crate::tokens::data_line;

/// Whether consecutive list items are being collected.
#[derive(Debug, Default)]
enum DispatchState {
	#[default]
	Idle,
	Buffering {
		/// Index of the first buffered token.
		start: usize,
		items: Vec<String>,
	},
}

/// Turns block tokens into markup fragments in document order.
///
/// Every token except list items is emitted as soon as it is seen. List items
/// are buffered until the run ends and then built into one nested fragment.
pub struct Dispatcher<'a> {
	options: ParseOptions,
	cache: &'a mut ListCache,
	state: DispatchState,
	fragments: Vec<HtmlFragment>,
}

impl<'a> Dispatcher<'a> {
	pub fn new(options: ParseOptions, cache: &'a mut ListCache) -> Self {
		Self {
			options,
			cache,
			state: DispatchState::Idle,
			fragments: vec![],
		}
	}

	pub fn push(&mut self, token: &BlockToken) {
		let kind = classify(token, &self.options.features);
		tracing::trace!(index = token.index, ?kind, "classified token");

		let marker = data_line(token.index, self.options.line_markers);
		let markup = match kind {
			BlockKind::ListItem(_) => {
				self.buffer(token);
				return;
			}
			BlockKind::Paragraph => {
				self.flush();
				self.push_paragraphs(token);
				return;
			}
			BlockKind::CodeBlock { content } => {
				format!(
					"<pre{marker}><code>{}</code></pre>",
					html_escape::encode_text(content)
				)
			}
			BlockKind::Heading { level, text } => {
				format!("<h{level}{marker}>{}</h{level}>", format_inline(text))
			}
			BlockKind::Blockquote { text } => {
				format!("<blockquote{marker}>{}</blockquote>", format_inline(text))
			}
			BlockKind::Rule => format!("<hr{marker}/>"),
		};

		self.flush();
		self.fragments.push(HtmlFragment::new(markup));
	}

	/// Flush any open list run and return every fragment in order.
	pub fn finish(mut self) -> Vec<HtmlFragment> {
		self.flush();
		self.fragments
	}

	fn buffer(&mut self, token: &BlockToken) {
		if let DispatchState::Buffering { items, .. } = &mut self.state {
			items.push(token.text.clone());
		} else {
			self.state = DispatchState::Buffering {
				start: token.index,
				items: vec![token.text.clone()],
			};
		}
	}

	/// Build the buffered run into one list fragment and go back to idle.
	fn flush(&mut self) {
		let DispatchState::Buffering { start, items } = std::mem::take(&mut self.state) else {
			return;
		};
		tracing::debug!(start, items = items.len(), "flushing list run");

		let ParseOptions {
			lists,
			line_markers,
			cache,
			..
		} = self.options;
		let fragment = if cache {
			self.cache
				.get_or_build(&items, &lists)
				.render(start, line_markers)
		} else {
			ListTree::build(&items, &lists).render(start, line_markers)
		};

		if let Some(fragment) = fragment {
			self.fragments.push(fragment);
		}
	}

	/// A paragraph token may hold several paragraphs separated by a blank
	/// line. Sections that are already one complete HTML element pass through
	/// unchanged. The lines of any other section are formatted one by one and
	/// joined with [`format_segments`].
	fn push_paragraphs(&mut self, token: &BlockToken) {
		for section in token.split("\n\n") {
			let section = section.trim();
			if section.is_empty() {
				continue;
			}

			let markup = if patterns::html_element(section) {
				section.to_string()
			} else {
				format!(
					"<p{}>{}</p>",
					data_line(token.index, self.options.line_markers),
					format_segments(&section.lines().collect::<Vec<_>>())
				)
			};
			self.fragments.push(HtmlFragment::new(markup));
		}
	}
}
