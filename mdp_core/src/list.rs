//! Nested list construction from a flat run of list item lines.
//!
//! Nesting is recovered from indentation alone. Each new item is placed by
//! comparing its indentation width with the item inserted just before it:
//!
//! | width compared to previous level | placement                          |
//! |----------------------------------|------------------------------------|
//! | `0`, or no previous item         | top level                          |
//! | equal                            | sibling of the previous item       |
//! | smaller                          | child of the nearest shallower ancestor |
//! | at least two columns deeper      | child of the previous item         |
//! | exactly one column deeper        | left out (unless `nest_single_space`) |
//!
//! Items live in an arena owned by a single [`ListTree`]; parent and child
//! links are arena indices.

use std::collections::VecDeque;
use std::fmt::Write;

use crate::inline::format_inline;
use crate::options::ListOptions;
use crate::patterns;
use crate::patterns::Checkbox;
use crate::patterns::ListKind;
use crate::tokens::HtmlFragment;
use crate::tokens::data_line;

/// Where a list item hangs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
	/// The sentinel above all top-level items.
	Root,
	/// An arena index into [`ListTree::nodes`].
	Item(usize),
}

/// One list item placed in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
	/// 1-based position of the item in its run. Items left out of the tree
	/// still consume an id.
	pub id: usize,
	pub parent: ParentRef,
	/// Kind of the container this item must sit in.
	pub kind: ListKind,
	/// The `li` payload: inline formatted content, with a checkbox in front
	/// for task items.
	pub content: String,
	/// Recorded indentation width used to place later items.
	pub level: usize,
	/// Line marker relative to the start of the run.
	pub offset: usize,
	/// Arena indices of child items in insertion order.
	pub children: Vec<usize>,
	/// Containers rendered inside this item's `li`.
	sublists: Vec<usize>,
}

/// An `ol` or `ul` element holding sibling items of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Container {
	kind: ListKind,
	/// Offset of the first item placed in the container.
	offset: usize,
	items: Vec<usize>,
}

/// The nested structure of one run of list items.
///
/// Line markers are stored relative to the start of the run and only turned
/// into document positions by [`ListTree::render`], so one tree can be
/// rendered at any offset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListTree {
	nodes: Vec<ListNode>,
	roots: Vec<usize>,
	containers: Vec<Container>,
	root_containers: Vec<usize>,
}

impl ListTree {
	/// Build the tree for a run of list item lines. Lines that do not match
	/// the list item grammar are skipped without consuming a line marker.
	#[tracing::instrument(level = "debug", skip_all, fields(items = items.len()))]
	pub fn build<S: AsRef<str>>(items: &[S], options: &ListOptions) -> Self {
		let mut tree = Self::default();
		let mut previous: Option<usize> = None;
		let mut position = 0;

		for item in items {
			let line = item.as_ref();
			let Some(item) = patterns::list_item(line) else {
				continue;
			};

			let id = position + 1;
			let offset = position;
			position += 1;

			let Some((parent, level)) = tree.resolve_parent(previous, item.indent, options) else {
				tracing::debug!(
					id,
					indent = item.indent,
					"dropping list item indented one column past the previous item"
				);
				continue;
			};

			let content = item_payload(item.checkbox, item.content);
			let index = tree.nodes.len();
			tree.nodes.push(ListNode {
				id,
				parent,
				kind: item.kind,
				content,
				level,
				offset,
				children: vec![],
				sublists: vec![],
			});

			match parent {
				ParentRef::Root => tree.roots.push(index),
				ParentRef::Item(parent) => tree.nodes[parent].children.push(index),
			}
			previous = Some(index);
		}

		tree.assemble();
		tree
	}

	/// Resolve the parent and recorded level of an item from its indentation
	/// width and the previously inserted item. Returns `None` when the item
	/// has no place in the tree.
	fn resolve_parent(
		&self,
		previous: Option<usize>,
		width: usize,
		options: &ListOptions,
	) -> Option<(ParentRef, usize)> {
		let Some(previous) = previous else {
			return Some((ParentRef::Root, 0));
		};
		if width == 0 {
			return Some((ParentRef::Root, 0));
		}

		let previous_node = &self.nodes[previous];
		let previous_level = previous_node.level;
		let child_threshold = if options.nest_single_space { 1 } else { 2 };

		if width == previous_level {
			Some((previous_node.parent, width))
		} else if width < previous_level {
			Some((self.shallower_ancestor(previous, width), width))
		} else if width >= previous_level + child_threshold {
			Some((ParentRef::Item(previous), width))
		} else {
			None
		}
	}

	/// Walk up from `start` to the first item whose level is below `width`.
	fn shallower_ancestor(&self, start: usize, width: usize) -> ParentRef {
		let mut cursor = ParentRef::Item(start);

		while let ParentRef::Item(index) = cursor {
			let node = &self.nodes[index];
			if node.level < width {
				return cursor;
			}
			cursor = node.parent;
		}

		ParentRef::Root
	}

	/// Group items into containers breadth-first from the top level. A new
	/// container starts whenever the parent or the list kind changes.
	fn assemble(&mut self) {
		let mut pending: VecDeque<usize> = self.roots.iter().copied().collect();
		let mut current: Option<(usize, ParentRef)> = None;

		while let Some(index) = pending.pop_front() {
			let ListNode {
				parent,
				kind,
				offset,
				..
			} = self.nodes[index];

			let container = match current {
				Some((container, container_parent))
					if container_parent == parent && self.containers[container].kind == kind =>
				{
					container
				}
				_ => {
					let container = self.containers.len();
					self.containers.push(Container {
						kind,
						offset,
						items: vec![],
					});
					match parent {
						ParentRef::Root => self.root_containers.push(container),
						ParentRef::Item(parent) => self.nodes[parent].sublists.push(container),
					}
					current = Some((container, parent));
					container
				}
			};

			self.containers[container].items.push(index);
			pending.extend(self.nodes[index].children.iter().copied());
		}
	}

	/// Render the tree with line markers counted from `start`. An empty tree
	/// renders nothing.
	pub fn render(&self, start: usize, line_markers: bool) -> Option<HtmlFragment> {
		if self.root_containers.is_empty() {
			return None;
		}

		let mut markup = String::new();
		for &container in &self.root_containers {
			self.write_container(&mut markup, container, start, line_markers);
		}

		Some(HtmlFragment::new(markup))
	}

	fn write_container(&self, out: &mut String, container: usize, start: usize, line_markers: bool) {
		let Container {
			kind,
			offset,
			ref items,
		} = self.containers[container];
		let tag = kind.tag();

		write!(out, "<{tag}{}>", data_line(start + offset, line_markers)).ok();
		for &index in items {
			let node = &self.nodes[index];
			write!(
				out,
				"<li{}>{}",
				data_line(start + node.offset, line_markers),
				node.content
			)
			.ok();
			for &sublist in &node.sublists {
				self.write_container(out, sublist, start, line_markers);
			}
			out.push_str("</li>");
		}
		write!(out, "</{tag}>").ok();
	}

	pub fn nodes(&self) -> &[ListNode] {
		&self.nodes
	}

	/// Arena indices of the top-level items.
	pub fn roots(&self) -> &[usize] {
		&self.roots
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

fn item_payload(checkbox: Option<Checkbox>, content: &str) -> String {
	let content = format_inline(content);

	match checkbox {
		None => content,
		Some(Checkbox::Checked) => format!("<input type='checkbox' checked /> {content}"),
		Some(Checkbox::Unchecked) => format!("<input type='checkbox' /> {content}"),
	}
}
