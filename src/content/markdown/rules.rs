//! Rule table mapping content-node kinds to output nodes

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::highlight::{language_from_class, Highlighter};
use super::node::{ContentNode, Element, NodeTag};
use super::render::RenderNode;
use crate::helpers::url::{is_external, safe_url};

/// What a rule receives: the source node and its already rendered children
pub struct RuleInput<'a> {
    pub element: &'a Element,
    pub children: Vec<RenderNode>,
}

/// A rendering rule
pub type Rule = Arc<dyn Fn(RuleInput<'_>) -> RenderNode + Send + Sync>;

/// Style of inline code and of code blocks that are not highlighted
const INLINE_CODE_STYLE: &str = "font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; \
background-color: #f3f4f6; padding: 0.125rem 0.25rem; border-radius: 0.25rem;";

/// One rule per node kind; kinds without a rule pass through
#[derive(Clone, Default)]
pub struct RuleTable {
    rules: HashMap<NodeTag, Rule>,
}

impl RuleTable {
    /// An empty table: every node passes through
    pub fn new() -> Self {
        Self::default()
    }

    /// The blog's rules, with code blocks highlighted by `highlighter`
    pub fn standard(highlighter: Highlighter) -> Self {
        let mut table = Self::new();
        table.insert(NodeTag::Paragraph, |input| {
            RenderNode::element("p", input.children)
        });
        for level in 1..=6u8 {
            table.insert(NodeTag::Heading(level), heading);
        }
        table.insert(NodeTag::List, list);
        table.insert(NodeTag::ListItem, list_item);
        table.insert(NodeTag::TaskMarker, task_marker);
        table.insert(NodeTag::BlockQuote, |input| {
            RenderNode::element("blockquote", input.children)
        });
        table.insert(NodeTag::Link, link);
        table.insert(NodeTag::Table, |input| {
            RenderNode::element("div", vec![RenderNode::element("table", input.children)])
                .with_attr("class", "table-wrapper")
        });
        table.insert(NodeTag::TableHead, |input| {
            RenderNode::element("thead", vec![RenderNode::element("tr", input.children)])
        });
        table.insert(NodeTag::TableRow, |input| {
            RenderNode::element("tr", input.children)
        });
        table.insert(NodeTag::TableCell, table_cell);
        table.insert(NodeTag::InlineCode, |input| inline_code(input.children));
        table.insert(NodeTag::CodeBlock, move |input| {
            code_block(&highlighter, input)
        });
        table.insert(NodeTag::Image, image);
        table.insert(NodeTag::Rule, |_| RenderNode::element("hr", Vec::new()));
        table
    }

    /// Set the rule for `tag`, returning the rule it replaces
    pub fn insert<F>(&mut self, tag: NodeTag, rule: F) -> Option<Rule>
    where
        F: Fn(RuleInput<'_>) -> RenderNode + Send + Sync + 'static,
    {
        self.rules.insert(tag, Arc::new(rule))
    }

    /// Builder form of [`RuleTable::insert`]
    pub fn with<F>(mut self, tag: NodeTag, rule: F) -> Self
    where
        F: Fn(RuleInput<'_>) -> RenderNode + Send + Sync + 'static,
    {
        self.insert(tag, rule);
        self
    }

    /// Render a content node and its subtree
    pub fn apply(&self, element: &Element) -> RenderNode {
        let children = element
            .children
            .iter()
            .map(|child| match child {
                ContentNode::Text(text) => RenderNode::text(text.as_str()),
                ContentNode::Element(el) => self.apply(el),
            })
            .collect();

        match self.rules.get(&element.tag) {
            Some(rule) => rule(RuleInput { element, children }),
            None => passthrough(element.tag, children),
        }
    }
}

impl fmt::Debug for RuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<String> = self.rules.keys().map(|t| format!("{:?}", t)).collect();
        tags.sort();
        f.debug_struct("RuleTable").field("tags", &tags).finish()
    }
}

/// Default rendering for kinds without a rule
fn passthrough(tag: NodeTag, children: Vec<RenderNode>) -> RenderNode {
    match tag {
        NodeTag::Fragment => RenderNode::Fragment(children),
        _ => RenderNode::element(tag.element_name(), children),
    }
}

fn heading(input: RuleInput<'_>) -> RenderNode {
    let node = RenderNode::element(input.element.tag.element_name(), input.children);
    let id = slug::slugify(input.element.text_content());
    if id.is_empty() {
        node
    } else {
        node.with_attr("id", id)
    }
}

fn list(input: RuleInput<'_>) -> RenderNode {
    let attrs = &input.element.attrs;
    if !attrs.ordered {
        return RenderNode::element("ul", input.children);
    }
    let node = RenderNode::element("ol", input.children);
    match attrs.start {
        Some(start) if start != 1 => node.with_attr("start", start.to_string()),
        _ => node,
    }
}

fn list_item(input: RuleInput<'_>) -> RenderNode {
    let node = RenderNode::element("li", input.children);
    if input.element.attrs.checked.is_some() {
        node.with_attr("class", "task-list-item")
    } else {
        node
    }
}

fn task_marker(input: RuleInput<'_>) -> RenderNode {
    let node = RenderNode::element("input", Vec::new())
        .with_attr("type", "checkbox")
        .with_attr("disabled", "");
    if input.element.attrs.checked == Some(true) {
        node.with_attr("checked", "")
    } else {
        node
    }
}

fn link(input: RuleInput<'_>) -> RenderNode {
    let attrs = &input.element.attrs;
    let href = safe_url(attrs.url.as_deref().unwrap_or_default());
    let external = is_external(&href);
    let mut node = RenderNode::element("a", input.children).with_attr("href", href);
    if let Some(title) = &attrs.title {
        node = node.with_attr("title", title.as_str());
    }
    if external {
        node = node
            .with_attr("target", "_blank")
            .with_attr("rel", "noopener noreferrer");
    }
    node
}

fn table_cell(input: RuleInput<'_>) -> RenderNode {
    let attrs = &input.element.attrs;
    let name = if attrs.header { "th" } else { "td" };
    let node = RenderNode::element(name, input.children);
    match attrs.align {
        Some(align) => node.with_attr("style", format!("text-align: {}", align.as_css())),
        None => node,
    }
}

fn image(input: RuleInput<'_>) -> RenderNode {
    let attrs = &input.element.attrs;
    let mut node = RenderNode::element("img", Vec::new())
        .with_attr("src", safe_url(attrs.url.as_deref().unwrap_or_default()))
        .with_attr("alt", input.element.text_content());
    if let Some(title) = &attrs.title {
        node = node.with_attr("title", title.as_str());
    }
    node.with_attr("loading", "lazy")
}

/// Inline-code rendering: fixed-width font, light background, no highlighting
pub fn inline_code(children: Vec<RenderNode>) -> RenderNode {
    RenderNode::element("code", children)
        .with_attr("class", "inline-code")
        .with_attr("style", INLINE_CODE_STYLE)
}

/// Highlight blocks with a supported language tag; everything else is inline code in a `pre`
fn code_block(highlighter: &Highlighter, input: RuleInput<'_>) -> RenderNode {
    let code = input.element.text_content();
    let highlighted = input
        .element
        .attrs
        .class
        .as_deref()
        .and_then(language_from_class)
        .filter(|language| highlighter.supports(language))
        .and_then(|language| highlighter.highlight(language, &code));

    match highlighted {
        Some(block) => RenderNode::Highlighted(block),
        None => RenderNode::element("pre", vec![inline_code(vec![RenderNode::text(code)])]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::markdown::node::parse;

    fn render(table: &RuleTable, markdown: &str) -> RenderNode {
        table.apply(&parse(markdown))
    }

    #[test]
    fn test_empty_table_passes_through() {
        let table = RuleTable::new();
        let html = render(&table, "# Title\n\nSome *text*.").to_html();
        assert_eq!(html, "<h1>Title</h1><p>Some <em>text</em>.</p>");
    }

    #[test]
    fn test_insert_replaces_rule() {
        let mut table = RuleTable::standard(Highlighter::default());
        let old = table.insert(NodeTag::Paragraph, |input| {
            RenderNode::element("section", input.children)
        });
        assert!(old.is_some());
        assert_eq!(render(&table, "hi").to_html(), "<section>hi</section>");
    }

    #[test]
    fn test_heading_gets_slug_id() {
        let table = RuleTable::standard(Highlighter::default());
        let html = render(&table, "## Hello World").to_html();
        assert_eq!(html, r#"<h2 id="hello-world">Hello World</h2>"#);
    }

    #[test]
    fn test_ordered_list_start() {
        let table = RuleTable::standard(Highlighter::default());
        let html = render(&table, "3. three\n4. four\n").to_html();
        assert!(html.starts_with(r#"<ol start="3">"#));
        let html = render(&table, "1. one\n").to_html();
        assert!(html.starts_with("<ol><li>"));
    }

    #[test]
    fn test_link_schemes_are_filtered() {
        let table = RuleTable::standard(Highlighter::default());
        let html = render(&table, "[x](javascript:alert(1))").to_html();
        assert!(html.contains(r#"<a href="">x</a>"#), "{}", html);

        let html = render(&table, "[x](https://example.com \"T\")").to_html();
        assert!(html.contains(r#"href="https://example.com""#));
        assert!(html.contains(r#"title="T""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));

        let html = render(&table, "[x](/blog/2)").to_html();
        assert_eq!(html, r#"<p><a href="/blog/2">x</a></p>"#);
    }

    #[test]
    fn test_image_alt_and_lazy_loading() {
        let table = RuleTable::standard(Highlighter::default());
        let html = render(&table, "![a cat](/cat.png)").to_html();
        assert_eq!(
            html,
            r#"<p><img src="/cat.png" alt="a cat" loading="lazy"></p>"#
        );
    }

    #[test]
    fn test_table_structure() {
        let table = RuleTable::standard(Highlighter::default());
        let html = render(&table, "| a | b |\n|---|:-:|\n| 1 | 2 |\n").to_html();
        assert!(html.starts_with(r#"<div class="table-wrapper"><table><thead><tr><th>a</th>"#));
        assert!(html.contains(r#"<th style="text-align: center">b</th>"#));
        assert!(html.contains("<tr><td>1</td>"));
    }

    #[test]
    fn test_task_list() {
        let table = RuleTable::standard(Highlighter::default());
        let html = render(&table, "- [x] done\n- [ ] todo\n").to_html();
        assert!(html.starts_with(r#"<ul><li class="task-list-item"><input type="checkbox" disabled checked>"#));
        assert!(html.contains(r#"<input type="checkbox" disabled>"#));
        assert!(html.contains("done"));
    }

    #[test]
    fn test_horizontal_rule() {
        let table = RuleTable::standard(Highlighter::default());
        assert_eq!(render(&table, "---\n").to_html(), "<hr>");
    }

    #[test]
    fn test_inline_code_style() {
        let table = RuleTable::standard(Highlighter::default());
        let tree = render(&table, "use `x` here");
        let code = tree.find(&|n| n.name() == Some("code")).unwrap();
        assert_eq!(code.attr("class"), Some("inline-code"));
        assert!(code.attr("style").unwrap().contains("monospace"));
        assert_eq!(code.text_content(), "x");
    }
}
