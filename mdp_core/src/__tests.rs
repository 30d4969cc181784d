use rstest::rstest;
use similar_asserts::assert_eq;
use tracing_test::traced_test;

use super::*;

fn parser_with(options: ParseOptions) -> MarkdownParser {
	MarkdownParser::new(options)
}

fn fragments(markdown: &str) -> Vec<String> {
	MarkdownParser::default()
		.render(markdown)
		.into_iter()
		.map(String::from)
		.collect()
}

#[test]
fn tokenize_heading_and_paragraph() {
	let tokens = tokenize("# Title\n\nHello **world**", &Features::default());
	assert_eq!(
		tokens,
		vec![
			BlockToken::new(0, "# Title"),
			BlockToken::new(1, "Hello **world**"),
		]
	);
}

#[test]
fn tokenize_normalizes_crlf() {
	let unix = tokenize("# A\n\nb", &Features::default());
	let windows = tokenize("# A\r\n\r\nb", &Features::default());
	assert_eq!(unix, windows);
}

#[test]
fn tokenize_keeps_fenced_code_whole() {
	let tokens = tokenize("```\na\n\nb\n```\n\ntext", &Features::default());
	assert_eq!(
		tokens,
		vec![
			BlockToken::new(0, "```\na\n\nb\n```"),
			BlockToken::new(1, "text"),
		]
	);
}

#[test]
fn tokenize_splits_list_items_per_line() {
	let tokens = tokenize("- a\n  - b\n1. c", &Features::default());
	let texts: Vec<&str> = tokens.iter().map(|token| token.text.as_str()).collect();
	assert_eq!(texts, vec!["- a", "  - b", "1. c"]);
	assert_eq!(
		tokens.iter().map(|token| token.index).collect::<Vec<_>>(),
		vec![0, 1, 2]
	);
}

#[test]
fn tokenize_empty_document() {
	assert!(tokenize("", &Features::default()).is_empty());
	assert!(tokenize("\n\n  \n", &Features::default()).is_empty());
}

#[rstest]
#[case::code_block("```\nx\n```", BlockKind::CodeBlock { content: "\nx\n" })]
#[case::heading("## b", BlockKind::Heading { level: 2, text: "b" })]
#[case::blockquote("> q", BlockKind::Blockquote { text: "q" })]
#[case::rule("***", BlockKind::Rule)]
#[case::rule_with_underscores("___", BlockKind::Rule)]
#[case::paragraph("just text", BlockKind::Paragraph)]
#[case::four_hashes("#### deep", BlockKind::Paragraph)]
fn classify_tokens(#[case] token: &str, #[case] expected: BlockKind<'_>) {
	assert_eq!(classify(token, &Features::default()), expected);
}

#[rstest]
#[case::unordered("- a", ListKind::Unordered, 0, None, "a")]
#[case::star("* a", ListKind::Unordered, 0, None, "a")]
#[case::plus("+ a", ListKind::Unordered, 0, None, "a")]
#[case::ordered("12. a", ListKind::Ordered, 0, None, "a")]
#[case::indented("    - a", ListKind::Unordered, 4, None, "a")]
#[case::checked("- [x] done", ListKind::Unordered, 0, Some(Checkbox::Checked), "done")]
#[case::checked_upper("1. [X] done", ListKind::Ordered, 0, Some(Checkbox::Checked), "done")]
#[case::unchecked("- [ ] todo", ListKind::Unordered, 0, Some(Checkbox::Unchecked), "todo")]
#[case::trailing_space("- a  ", ListKind::Unordered, 0, None, "a")]
fn classify_list_items(
	#[case] token: &str,
	#[case] kind: ListKind,
	#[case] indent: usize,
	#[case] checkbox: Option<Checkbox>,
	#[case] content: &str,
) {
	let BlockKind::ListItem(item) = classify(token, &Features::default()) else {
		panic!("expected a list item for {token:?}");
	};
	assert_eq!(
		item,
		ListItemMatch {
			kind,
			indent,
			checkbox,
			content,
		}
	);
}

#[rstest]
#[case::h1("# Title", "<h1 data-line='0'>Title</h1>")]
#[case::h2("## Sub", "<h2 data-line='0'>Sub</h2>")]
#[case::h3("### Deep", "<h3 data-line='0'>Deep</h3>")]
#[case::too_deep("#### Four", "<p data-line='0'>#### Four</p>")]
#[case::no_space("#Title", "<p data-line='0'>#Title</p>")]
#[case::formatted("# A *b*", "<h1 data-line='0'>A <em>b</em></h1>")]
fn render_headings(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(to_html(input), expected);
}

#[test]
fn render_code_block_verbatim() {
	let html = to_html("```\nlet a = 1;\n# not heading\n```");
	assert_eq!(
		html,
		"<pre data-line='0'><code>\nlet a = 1;\n# not heading\n</code></pre>"
	);
}

#[test]
fn render_code_block_escapes_markup() {
	let html = to_html("```\n<b>&</b>\n```");
	assert_eq!(
		html,
		"<pre data-line='0'><code>\n&lt;b&gt;&amp;&lt;/b&gt;\n</code></pre>"
	);
}

#[test]
fn render_code_block_between_blocks() {
	let html = to_html("# Code\n\n```\n- not a list\n```\n\nafter");
	assert_eq!(
		html,
		"<h1 data-line='0'>Code</h1>\n<pre data-line='1'><code>\n- not a list\n</code></pre>\n<p \
		 data-line='2'>after</p>"
	);
}

#[test]
fn render_nested_list() {
	assert_eq!(
		fragments("- a\n  - b\n- c"),
		vec![
			"<ul data-line='0'><li data-line='0'>a<ul data-line='1'><li \
			 data-line='1'>b</li></ul></li><li data-line='2'>c</li></ul>"
		]
	);
}

#[test]
fn render_mixed_kinds_as_one_fragment() {
	assert_eq!(
		fragments("- a\n1. b"),
		vec![
			"<ul data-line='0'><li data-line='0'>a</li></ul><ol data-line='1'><li \
			 data-line='1'>b</li></ol>"
		]
	);
}

#[test]
fn render_kind_change_under_same_parent() {
	assert_eq!(
		fragments("- a\n  - b\n  1. c"),
		vec![
			"<ul data-line='0'><li data-line='0'>a<ul data-line='1'><li \
			 data-line='1'>b</li></ul><ol data-line='2'><li data-line='2'>c</li></ol></li></ul>"
		]
	);
}

#[test]
fn render_walks_up_to_shallower_ancestor() {
	assert_eq!(
		fragments("- a\n  - b\n    - c\n  - d"),
		vec![
			"<ul data-line='0'><li data-line='0'>a<ul data-line='1'><li data-line='1'>b<ul \
			 data-line='2'><li data-line='2'>c</li></ul></li><li \
			 data-line='3'>d</li></ul></li></ul>"
		]
	);
}

#[test]
fn render_checkboxes() {
	assert_eq!(
		fragments("- [x] done\n- [ ] todo"),
		vec![
			"<ul data-line='0'><li data-line='0'><input type='checkbox' checked /> done</li><li \
			 data-line='1'><input type='checkbox' /> todo</li></ul>"
		]
	);
}

#[test]
fn render_list_item_inline_formatting() {
	insta::assert_snapshot!(
		to_html("1. **bold** item"),
		@"<ol data-line='0'><li data-line='0'><strong>bold</strong> item</li></ol>"
	);
}

#[test]
#[traced_test]
fn single_column_indent_is_dropped_by_default() {
	assert_eq!(
		fragments("- a\n - b\n- c"),
		vec!["<ul data-line='0'><li data-line='0'>a</li><li data-line='2'>c</li></ul>"]
	);
	assert!(logs_contain("dropping list item"));
}

#[test]
fn single_column_indent_nests_when_enabled() {
	let mut parser = parser_with(ParseOptions {
		lists: ListOptions {
			nest_single_space: true,
		},
		..ParseOptions::default()
	});

	assert_eq!(
		parser.to_html("- a\n - b\n- c"),
		"<ul data-line='0'><li data-line='0'>a<ul data-line='1'><li \
		 data-line='1'>b</li></ul></li><li data-line='2'>c</li></ul>"
	);
}

#[test]
fn list_tree_structure() {
	let tree = ListTree::build(&["- a", "  - b", "- c"], &ListOptions::default());
	let nodes = tree.nodes();

	assert_eq!(nodes.len(), 3);
	assert_eq!(
		nodes.iter().map(|node| node.id).collect::<Vec<_>>(),
		vec![1, 2, 3]
	);
	assert_eq!(tree.roots().to_vec(), vec![0, 2]);
	assert_eq!(nodes[0].children, vec![1]);
	assert_eq!(nodes[1].parent, ParentRef::Item(0));
	assert_eq!(nodes[1].level, 2);
	assert_eq!(nodes[2].parent, ParentRef::Root);
}

#[test]
fn list_tree_renders_at_any_start() {
	let tree = ListTree::build(&["- a", "- b"], &ListOptions::default());
	let rendered = tree.render(7, true).map(HtmlFragment::into_inner);

	assert_eq!(
		rendered.as_deref(),
		Some("<ul data-line='7'><li data-line='7'>a</li><li data-line='8'>b</li></ul>")
	);
}

#[test]
fn empty_list_tree_renders_nothing() {
	let tree = ListTree::build::<&str>(&[], &ListOptions::default());
	assert!(tree.is_empty());
	assert_eq!(tree.render(0, true), None);

	let unmatched = ListTree::build(&["not an item"], &ListOptions::default());
	assert!(unmatched.is_empty());
}

#[test]
#[traced_test]
fn cache_reuses_identical_runs() {
	let mut parser = MarkdownParser::default();
	let html = parser.to_html("- a\n- b\n\nparagraph\n\n- a\n- b");

	assert_eq!(
		html,
		"<ul data-line='0'><li data-line='0'>a</li><li data-line='1'>b</li></ul>\n<p \
		 data-line='2'>paragraph</p>\n<ul data-line='3'><li data-line='3'>a</li><li \
		 data-line='4'>b</li></ul>"
	);
	assert_eq!(parser.cache_stats(), CacheStats { hits: 1, misses: 1 });
	assert!(logs_contain("list cache hit"));
}

#[test]
fn cache_survives_across_calls() {
	let mut parser = MarkdownParser::default();
	let markdown = "- one\n  - two\n\n# Heading\n\n1. three";

	let first = parser.to_html(markdown);
	let second = parser.to_html(markdown);

	assert_eq!(first, second);
	assert_eq!(parser.cache_stats(), CacheStats { hits: 2, misses: 2 });

	parser.clear_cache();
	assert_eq!(parser.cache_stats().lookups(), 0);
}

#[test]
fn cache_disabled_builds_every_time() {
	let mut parser = parser_with(ParseOptions {
		cache: false,
		..ParseOptions::default()
	});
	parser.to_html("- a\n\ntext\n\n- a");

	assert_eq!(parser.cache_stats().lookups(), 0);
}

#[test]
fn cache_key_joins_items() {
	assert_eq!(ListCache::key(&["- a", "  - b"]), "- a\n  - b");

	let mut cache = ListCache::new();
	cache.get_or_build(&["- a"], &ListOptions::default());
	assert_eq!(cache.len(), 1);
	assert!(cache.get("- a", &ListOptions::default()).is_some());
	assert!(cache.get("- b", &ListOptions::default()).is_none());
	assert!(
		cache
			.get("- a", &ListOptions {
				nest_single_space: true,
			})
			.is_none()
	);
}

#[test]
fn cache_entries_are_tied_to_list_options() {
	let items = ["- a", " - b"];
	let nested = ListOptions {
		nest_single_space: true,
	};
	let mut cache = ListCache::new();

	let dropped = cache
		.get_or_build(&items, &ListOptions::default())
		.render(0, false)
		.map(HtmlFragment::into_inner);
	let kept = cache
		.get_or_build(&items, &nested)
		.render(0, false)
		.map(HtmlFragment::into_inner);

	assert_eq!(dropped, Some("<ul><li>a</li></ul>".to_string()));
	assert_eq!(kept, Some("<ul><li>a<ul><li>b</li></ul></li></ul>".to_string()));
	assert_eq!(cache.len(), 2);
	assert_eq!(cache.stats().misses, 2);
	assert_eq!(cache.stats().hits, 0);
}

#[test]
fn render_inline_scenario() {
	assert_eq!(
		to_html("**bold** and *italic* and `code`"),
		"<p data-line='0'><strong>bold</strong> and <em>italic</em> and <code>code</code></p>"
	);
}

#[rstest]
#[case::link("[site](https://x.io)", r#"<a href="https://x.io">site</a>"#)]
#[case::image("![alt](a.png)", "<img src='a.png' alt='alt' />")]
#[case::sized_image(
	"![alt](a.png){width=10 height=20}",
	"<img src='a.png' alt='alt' width='10' height='20' />"
)]
#[case::code_keeps_stars("`**x**`", "<code>**x**</code>")]
#[case::triple_code("```x```", "<code>x</code>")]
#[case::plain("nothing here", "nothing here")]
fn format_inline_spans(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(format_inline(input), expected);
}

#[rstest]
#[case::single(&["a"], "a")]
#[case::two(&["a", "b"], "a b")]
#[case::three(&["a", "b", "c"], "ab c")]
#[case::empty(&[], "")]
fn format_segments_spacing(#[case] segments: &[&str], #[case] expected: &str) {
	assert_eq!(format_segments(segments), expected);
}

#[test]
fn render_escapes_backtick_spans() {
	insta::assert_snapshot!(
		to_html("use `<div>` here"),
		@"<p data-line='0'>use <code>&lt;div&gt;</code> here</p>"
	);
}

#[test]
fn render_escapes_inline_triple_backtick_spans() {
	let markdown = "Use ```<div>``` here";
	insta::assert_snapshot!(
		to_html(markdown),
		@"<p data-line='0'>Use <code>&lt;div&gt;</code> here</p>"
	);

	let nodes = parse(markdown);
	let paragraph = nodes[0].as_element().expect("paragraph");
	let code = paragraph.child_elements().next().expect("code span");
	assert_eq!(code.tag, "code");
	assert_eq!(code.children, vec![Node::text("<div>")]);
}

#[rstest]
#[case::inline_triple_span(
	"a ```x & y``` b",
	"<p data-line='0'>a <code>x &amp; y</code> b</p>"
)]
#[case::unterminated_fence("```\nx", "<p data-line='0'><code>`</code> x</p>")]
#[case::blockquote_before_rule("> ---", "<blockquote data-line='0'>---</blockquote>")]
#[case::rule_without_quote("---", "<hr data-line='0'/>")]
fn render_block_edge_cases(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(to_html(input), expected);
}

#[test]
fn render_blockquote() {
	insta::assert_snapshot!(
		to_html("> quoted **text**"),
		@"<blockquote data-line='0'>quoted <strong>text</strong></blockquote>"
	);
}

#[test]
fn render_horizontal_rule() {
	assert_eq!(
		fragments("a\n\n---\n\nb"),
		vec![
			"<p data-line='0'>a</p>",
			"<hr data-line='1'/>",
			"<p data-line='2'>b</p>",
		]
	);
}

#[test]
fn render_multiline_paragraph() {
	assert_eq!(
		to_html("line one\nline two"),
		"<p data-line='0'>line one line two</p>"
	);
	assert_eq!(
		to_html("one\n**two**\nthree"),
		"<p data-line='0'>one<strong>two</strong> three</p>"
	);
}

#[rstest]
#[case::element("<div class='x'>hi</div>", "<div class='x'>hi</div>")]
#[case::not_whole_element("<b>bold</b> text", "<p data-line='0'><b>bold</b> text</p>")]
#[case::mismatched("<div>hi</span>", "<p data-line='0'><div>hi</span></p>")]
fn render_html_passthrough(#[case] input: &str, #[case] expected: &str) {
	assert_eq!(to_html(input), expected);
}

#[test]
fn render_without_line_markers() {
	let mut parser = parser_with(ParseOptions {
		line_markers: false,
		..ParseOptions::default()
	});

	assert_eq!(parser.to_html("# A\n\n- x"), "<h1>A</h1>\n<ul><li>x</li></ul>");
}

#[rstest]
#[case::headings(
	Features { headings: false, ..Features::default() },
	"# Title",
	"<p data-line='0'># Title</p>"
)]
#[case::ordered_lists(
	Features { ordered_lists: false, ..Features::default() },
	"1. a",
	"<p data-line='0'>1. a</p>"
)]
#[case::unordered_lists(
	Features { unordered_lists: false, ..Features::default() },
	"- a",
	"<p data-line='0'>- a</p>"
)]
#[case::blockquotes(
	Features { blockquotes: false, ..Features::default() },
	"> q",
	"<p data-line='0'>> q</p>"
)]
#[case::code_blocks(
	Features { code_blocks: false, ..Features::default() },
	"```\ncode\n```",
	"<p data-line='0'><code>`</code>code <code>`</code></p>"
)]
fn disabled_features_fall_through(
	#[case] features: Features,
	#[case] input: &str,
	#[case] expected: &str,
) {
	let mut parser = parser_with(ParseOptions {
		features,
		..ParseOptions::default()
	});
	assert_eq!(parser.to_html(input), expected);
}

#[test]
fn disabled_rule_becomes_paragraph() {
	let mut parser = parser_with(ParseOptions {
		features: Features {
			horizontal_rules: false,
			..Features::default()
		},
		..ParseOptions::default()
	});
	assert_eq!(parser.to_html("***"), "<p data-line='0'><em>*</em></p>");
}

#[test]
fn render_is_idempotent() {
	let markdown = "# T\n\n- a\n  - [x] b\n\n> q\n\n```\ncode\n```\n\n---\n\ntext";
	let mut parser = MarkdownParser::default();

	let first = parser.to_html(markdown);
	let second = parser.to_html(markdown);

	assert_eq!(first, second);
	assert_eq!(to_html(markdown), first);
}

#[test]
fn parse_builds_element_tree() {
	let nodes = parse("# Hi\n\n- [x] done");
	assert_eq!(nodes.len(), 2);

	let heading = nodes[0].as_element().expect("heading element");
	assert_eq!(heading.tag, "h1");
	assert_eq!(heading.line(), Some(0));
	assert_eq!(heading.children, vec![Node::text("Hi")]);

	let list = nodes[1].as_element().expect("list element");
	assert_eq!(list.tag, "ul");
	let item = list.child_elements().next().expect("list item");
	assert_eq!(item.tag, "li");
	assert_eq!(item.line(), Some(1));

	let checkbox = item.child_elements().next().expect("checkbox");
	assert_eq!(checkbox.tag, "input");
	assert_eq!(checkbox.attribute("type"), Some("checkbox"));
	assert_eq!(checkbox.attribute("checked"), Some(""));
	assert!(checkbox.children.is_empty());
	assert_eq!(nodes[1].text_content(), " done");
}

#[test]
fn read_fragment_drops_scripts_and_handlers() {
	let nodes = read_fragment("<p onclick=\"x()\">a &amp; b<script>alert(1)</script></p>");
	let mut paragraph = Element::new("p");
	paragraph.children.push(Node::text("a & b"));

	assert_eq!(nodes, vec![Node::Element(paragraph)]);
}

#[test]
fn read_fragment_attribute_forms() {
	let nodes = read_fragment("<input type=checkbox checked><img src='a.png' alt=\"x\"/>");
	assert_eq!(nodes.len(), 2);

	let input = nodes[0].as_element().expect("input");
	assert_eq!(
		input.attributes,
		vec![
			Attribute {
				name: "type".into(),
				value: "checkbox".into(),
			},
			Attribute {
				name: "checked".into(),
				value: String::new(),
			},
		]
	);

	let image = nodes[1].as_element().expect("image");
	assert_eq!(image.attribute("src"), Some("a.png"));
	assert_eq!(image.attribute("alt"), Some("x"));
}

#[rstest]
#[case::unmatched_close("</div>text", vec![Node::text("text")])]
#[case::newline_separator("<br>\n<br>", vec![Node::Element(Element::new("br")), Node::Element(Element::new("br"))])]
#[case::comment("<!-- note -->after", vec![Node::text("after")])]
#[case::stray_angle("a < b", vec![Node::text("a < b")])]
fn read_fragment_leniency(#[case] markup: &str, #[case] expected: Vec<Node>) {
	assert_eq!(read_fragment(markup), expected);
}

#[test]
fn read_fragment_closes_open_elements() {
	let nodes = read_fragment("<em>open");
	let mut emphasis = Element::new("em");
	emphasis.children.push(Node::text("open"));

	assert_eq!(nodes, vec![Node::Element(emphasis)]);
}

#[test]
fn element_tree_serializes_to_json() -> AnyEmptyResult {
	let nodes = parse("text");
	let json = serde_json::to_string(&nodes)?;

	assert_eq!(
		json,
		r#"[{"tag":"p","attributes":[{"name":"data-line","value":"0"}],"children":["text"]}]"#
	);

	Ok(())
}

#[test]
fn config_defaults_match_parse_options() {
	assert_eq!(MdpConfig::default().parse_options(), ParseOptions::default());
}

#[test]
fn config_load_from_file() -> MdpResult<()> {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("mdp.toml"),
		"[features]\nheadings = false\n\n[render]\nline_markers = false\n\n[lists]\nnest_single_space \
		 = true\n\n[cache]\nenabled = false\n",
	)?;

	let config = MdpConfig::load(tmp.path())?.expect("config should exist");
	let options = config.parse_options();

	assert!(!options.features.headings);
	assert!(options.features.ordered_lists);
	assert!(!options.line_markers);
	assert!(options.lists.nest_single_space);
	assert!(!options.cache);

	Ok(())
}

#[test]
fn config_discovery_order() -> MdpResult<()> {
	let tmp = tempfile::tempdir()?;
	assert!(MdpConfig::load(tmp.path())?.is_none());

	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(tmp.path().join(".config/mdp.toml"), "")?;
	assert_eq!(
		MdpConfig::resolve_path(tmp.path()),
		Some(tmp.path().join(".config/mdp.toml"))
	);

	std::fs::write(tmp.path().join("mdp.toml"), "")?;
	assert_eq!(
		MdpConfig::resolve_path(tmp.path()),
		Some(tmp.path().join("mdp.toml"))
	);

	Ok(())
}

#[test]
fn config_parse_error() {
	let result = MdpConfig::from_toml("[features\nheadings = ");
	assert!(matches!(result, Err(MdpError::ConfigParse(_))));
}
