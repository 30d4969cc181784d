use std::collections::HashMap;

use crate::list::ListTree;
use crate::options::ListOptions;

/// Separates item texts in a cache key. List item tokens are single lines,
/// so a line break never occurs inside one.
const KEY_SEPARATOR: char = '\n';

/// Hit and miss counters for a [`ListCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
	pub hits: u64,
	pub misses: u64,
}

impl CacheStats {
	pub fn lookups(&self) -> u64 {
		self.hits.saturating_add(self.misses)
	}
}

/// Memoized list trees keyed by the exact text of a run of list items and
/// the [`ListOptions`] the tree was built with.
///
/// Keys ignore where a run sits in the document: the same items at another
/// offset share an entry. Trees hold run-relative line markers, so a reused
/// tree still renders the right `data-line` values. Entries are never
/// evicted; the cache grows with the number of distinct runs seen.
#[derive(Debug, Default)]
pub struct ListCache {
	entries: HashMap<(ListOptions, String), ListTree>,
	stats: CacheStats,
}

impl ListCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stable key for an ordered run of item texts.
	pub fn key<S: AsRef<str>>(items: &[S]) -> String {
		let mut key = String::new();
		for (position, item) in items.iter().enumerate() {
			if position > 0 {
				key.push(KEY_SEPARATOR);
			}
			key.push_str(item.as_ref());
		}
		key
	}

	/// Return the cached tree for `items`, building and storing it on a miss.
	pub fn get_or_build<S: AsRef<str>>(&mut self, items: &[S], options: &ListOptions) -> &ListTree {
		let key = (*options, Self::key(items));

		if self.entries.contains_key(&key) {
			self.stats.hits = self.stats.hits.saturating_add(1);
			tracing::debug!(items = items.len(), "list cache hit");
		} else {
			self.stats.misses = self.stats.misses.saturating_add(1);
			tracing::debug!(items = items.len(), "list cache miss");
		}

		self.entries
			.entry(key)
			.or_insert_with(|| ListTree::build(items, options))
	}

	/// Look up the tree stored for a [`ListCache::key`] under `options`.
	pub fn get(&self, key: &str, options: &ListOptions) -> Option<&ListTree> {
		self.entries.get(&(*options, key.to_string()))
	}

	pub fn stats(&self) -> CacheStats {
		self.stats
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Drop every entry and reset the counters.
	pub fn clear(&mut self) {
		self.entries.clear();
		self.stats = CacheStats::default();
	}
}
