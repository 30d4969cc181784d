//! `mdp_core` is the core library for [mdp](https://github.com/ifiokjr/mdp), a small markdown to HTML engine built for live previews. The whole document is re-parsed on every edit, so the engine favors predictable, lenient output over full CommonMark compliance: anything it does not recognize becomes paragraph text, and parsing never fails.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Markdown text
//!   → Tokenizer (protects fenced code, splits into block tokens)
//!   → Dispatcher (classifies each token, buffers runs of list items)
//!   → List tree builder (recovers nesting from indentation, renders ol/ul)
//!   → Inline formatter (images, code spans, bold, italic, links)
//!   → Markup fragments, or a generic element tree
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `mdp.toml`: feature flags, line markers, list nesting and caching.
//!
//! ## Key Types
//!
//! - [`MarkdownParser`]: The entry point. Owns the parse options and the list cache.
//! - [`BlockToken`]: One block-level unit of the source with its line marker index.
//! - [`BlockKind`]: The classification of a token.
//! - [`ListTree`]: The nested structure of one run of list items.
//! - [`ListCache`]: Memoized list trees keyed by item text.
//! - [`Node`]: The generic element tree handed to a rendering layer.
//! - [`MdpConfig`]: Configuration loaded from `mdp.toml`.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdp_core::MarkdownParser;
//! use mdp_core::ParseOptions;
//!
//! let mut parser = MarkdownParser::new(ParseOptions::default());
//! let html = parser.to_html("# Title\n\nHello **world**");
//!
//! assert_eq!(
//! 	html,
//! 	"<h1 data-line='0'>Title</h1>\n<p data-line='1'>Hello <strong>world</strong></p>"
//! );
//! ```

pub use block::*;
pub use cache::*;
pub use config::*;
pub use dispatcher::*;
pub use element::*;
pub use error::*;
pub use inline::*;
pub use list::*;
pub use options::*;
pub use parser::*;
pub use patterns::Checkbox;
pub use patterns::ListItemMatch;
pub use patterns::ListKind;
pub use tokenizer::*;
pub use tokens::*;

mod block;
mod cache;
pub mod config;
mod dispatcher;
mod element;
#[allow(unused_assignments)]
mod error;
mod inline;
mod list;
mod options;
mod parser;
pub(crate) mod patterns;
mod tokenizer;
pub(crate) mod tokens;

#[cfg(test)]
mod __tests;
