use crate::cache::CacheStats;
use crate::cache::ListCache;
use crate::dispatcher::Dispatcher;
use crate::element::Node;
use crate::element::read_fragment;
use crate::options::ParseOptions;
use crate::tokenizer::tokenize;
use crate::tokens::HtmlFragment;

/// Converts markdown into markup fragments.
///
/// Every call re-parses the whole document. The only state carried between
/// calls is the list cache, so one parser should be kept for the lifetime of
/// an editing session.
#[derive(Debug, Default)]
pub struct MarkdownParser {
	options: ParseOptions,
	cache: ListCache,
}

impl MarkdownParser {
	pub fn new(options: ParseOptions) -> Self {
		Self {
			options,
			cache: ListCache::new(),
		}
	}

	pub fn options(&self) -> &ParseOptions {
		&self.options
	}

	/// One fragment per emitted block, in document order. A run of list items
	/// produces a single fragment.
	#[tracing::instrument(level = "debug", skip_all, fields(bytes = markdown.len()))]
	pub fn render(&mut self, markdown: &str) -> Vec<HtmlFragment> {
		let tokens = tokenize(markdown, &self.options.features);
		let mut dispatcher = Dispatcher::new(self.options, &mut self.cache);

		for token in &tokens {
			dispatcher.push(token);
		}

		let fragments = dispatcher.finish();
		tracing::debug!(
			tokens = tokens.len(),
			fragments = fragments.len(),
			"rendered document"
		);

		fragments
	}

	/// The rendered fragments joined with line breaks.
	pub fn to_html(&mut self, markdown: &str) -> String {
		self.render(markdown)
			.iter()
			.map(HtmlFragment::as_str)
			.collect::<Vec<_>>()
			.join("\n")
	}

	/// The document as a sequence of block-level elements.
	pub fn parse(&mut self, markdown: &str) -> Vec<Node> {
		self.render(markdown)
			.iter()
			.flat_map(|fragment| read_fragment(fragment.as_str()))
			.collect()
	}

	pub fn cache_stats(&self) -> CacheStats {
		self.cache.stats()
	}

	pub fn clear_cache(&mut self) {
		self.cache.clear();
	}
}

/// Parse `markdown` into block-level elements with the default options.
pub fn parse(markdown: &str) -> Vec<Node> {
	MarkdownParser::default().parse(markdown)
}

/// Render `markdown` to markup with the default options.
pub fn to_html(markdown: &str) -> String {
	MarkdownParser::default().to_html(markdown)
}
