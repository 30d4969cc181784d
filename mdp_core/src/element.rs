//! A generic element tree for handing rendered markup to a UI layer.
//!
//! [`read_fragment`] parses the markup produced by this crate (and the HTML
//! that paragraphs pass through) with an HTML5 parser and maps the resulting
//! DOM into plain [`Node`] values. Malformed markup is recovered the way a
//! browser would recover it, so nothing fails.

use html5ever::LocalName;
use html5ever::Namespace;
use html5ever::ParseOpts;
use html5ever::QualName;
use html5ever::parse_fragment;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::Handle;
use markup5ever_rcdom::NodeData;
use markup5ever_rcdom::RcDom;
use serde::Serialize;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Elements dropped from the tree together with their content.
const DROPPED_ELEMENTS: [&str; 1] = ["script"];

/// A node of the element tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
	Text(String),
	Element(Element),
}

impl Node {
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(value.into())
	}

	pub fn as_element(&self) -> Option<&Element> {
		match self {
			Self::Element(element) => Some(element),
			Self::Text(_) => None,
		}
	}

	/// Concatenated text of this node and all its descendants.
	pub fn text_content(&self) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::Element(element) => element.children.iter().map(Self::text_content).collect(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
	/// Lower-case tag name.
	pub tag: String,
	pub attributes: Vec<Attribute>,
	pub children: Vec<Node>,
}

impl Element {
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attributes: vec![],
			children: vec![],
		}
	}

	/// Value of an attribute. Boolean attributes such as `checked` have the
	/// value `Some("")`.
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes
			.iter()
			.find(|attribute| attribute.name == name)
			.map(|attribute| attribute.value.as_str())
	}

	/// The `data-line` marker of the element, when present.
	pub fn line(&self) -> Option<usize> {
		self.attribute("data-line")?.parse().ok()
	}

	pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
		self.children.iter().filter_map(Node::as_element)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
	pub name: String,
	/// Empty for boolean attributes written without a value.
	pub value: String,
}

/// Read a markup fragment into a sequence of top-level nodes.
///
/// The fragment is parsed in a `body` context. `script` elements and `on*`
/// event attributes are dropped, as are comments. Text nodes that consist of
/// a single line break, such as the separators between block fragments, are
/// skipped.
pub fn read_fragment(markup: &str) -> Vec<Node> {
	let context = QualName::new(
		None,
		Namespace::from(HTML_NAMESPACE),
		LocalName::from("body"),
	);
	let dom = parse_fragment(RcDom::default(), ParseOpts::default(), context, vec![]).one(markup);

	// The fragment parser wraps the parsed nodes in a synthetic `html` root.
	let document_children = dom.document.children.borrow();
	let Some(root) = document_children
		.iter()
		.find(|node| matches!(node.data, NodeData::Element { .. }))
	else {
		return vec![];
	};

	convert_children(root)
}

fn convert_children(handle: &Handle) -> Vec<Node> {
	handle
		.children
		.borrow()
		.iter()
		.filter_map(convert_node)
		.collect()
}

fn convert_node(handle: &Handle) -> Option<Node> {
	match &handle.data {
		NodeData::Text { contents } => {
			let text = contents.borrow().to_string();
			(text != "\n").then_some(Node::Text(text))
		}
		NodeData::Element { name, attrs, .. } => {
			let tag = name.local.to_string();
			if DROPPED_ELEMENTS.contains(&tag.as_str()) {
				return None;
			}

			let attributes = attrs
				.borrow()
				.iter()
				.map(|attribute| Attribute {
					name: attribute.name.local.to_string(),
					value: attribute.value.to_string(),
				})
				.filter(|attribute| !attribute.name.starts_with("on"))
				.collect();

			Some(Node::Element(Element {
				tag,
				attributes,
				children: convert_children(handle),
			}))
		}
		NodeData::Document
		| NodeData::Doctype { .. }
		| NodeData::Comment { .. }
		| NodeData::ProcessingInstruction { .. } => None,
	}
}
