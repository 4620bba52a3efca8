//! Markdown rendering with syntax highlighting
//!
//! Content is parsed into a tree of [`ContentNode`]s, then every node is
//! turned into a [`RenderNode`] by the rule registered for its [`NodeTag`]
//! in a [`RuleTable`]. Rendering never fails: anything the parser does not
//! understand ends up as literal text.

mod highlight;
mod node;
mod render;
mod rules;

pub use highlight::{language_from_class, HighlightedBlock, Highlighter, DEFAULT_THEME};
pub use node::{parse, plain_text, CellAlign, ContentNode, Element, NodeAttrs, NodeTag, MAX_NESTING};

use pulldown_cmark::{Event, Parser, Tag};
pub use render::RenderNode;
pub use rules::{inline_code, Rule, RuleInput, RuleTable};

/// Marker separating a post's excerpt from the rest
const MORE_MARKER: &str = "<!-- more -->";

/// Markdown renderer bound to a rule table
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    rules: RuleTable,
}

impl MarkdownRenderer {
    /// Create a renderer with the standard rules and default theme
    pub fn new() -> Self {
        Self::standard(DEFAULT_THEME)
    }

    /// Create a renderer with the standard rules, highlighting with `theme`
    pub fn standard(theme: &str) -> Self {
        Self::with_rules(RuleTable::standard(Highlighter::new(theme)))
    }

    /// Create a renderer with custom rules
    pub fn with_rules(rules: RuleTable) -> Self {
        Self { rules }
    }

    /// Render markdown to an output tree
    pub fn render(&self, markdown: &str) -> RenderNode {
        self.rules.apply(&parse(markdown))
    }

    /// Render arbitrary bytes; invalid UTF-8 is replaced before parsing
    pub fn render_bytes(&self, bytes: &[u8]) -> RenderNode {
        self.render(&String::from_utf8_lossy(bytes))
    }

    /// Render markdown to HTML
    pub fn render_html(&self, markdown: &str) -> String {
        self.render(markdown).to_html()
    }

    /// Split content at a `<!-- more -->` marker.
    ///
    /// Only a marker standing alone as a top-level HTML block counts, so
    /// markers quoted in code or nested blocks stay part of the text.
    /// Returns the text before the marker and the content with the marker
    /// line removed; everything else is kept byte for byte.
    pub fn split_excerpt(content: &str) -> (Option<String>, String) {
        let mut depth = 0usize;
        let parser = Parser::new_ext(content, node::parser_options());
        for (event, range) in parser.into_offset_iter() {
            match event {
                Event::Start(Tag::HtmlBlock)
                    if depth == 0 && content[range.clone()].trim() == MORE_MARKER =>
                {
                    let excerpt = content[..range.start].to_string();
                    let body = format!("{}{}", &content[..range.start], &content[range.end..]);
                    return (Some(excerpt), body);
                }
                Event::Start(_) => depth += 1,
                Event::End(_) => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        (None, content.to_string())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn highlighted(tree: &RenderNode) -> Option<&HighlightedBlock> {
        match tree.find(&|n| matches!(n, RenderNode::Highlighted(_))) {
            Some(RenderNode::Highlighted(block)) => Some(block),
            _ => None,
        }
    }

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("# Hello World\n\nThis is a test.");
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_python_block_is_highlighted() {
        let renderer = MarkdownRenderer::new();
        let tree = renderer.render("```python\nprint(1)\n```\n");
        let block = highlighted(&tree).expect("highlighted block");
        assert_eq!(block.code, "print(1)");
        assert_eq!(block.language, "python");

        let html = tree.to_html();
        assert!(html.starts_with(r#"<div class="highlight language-python" data-language="python">"#));
    }

    #[test]
    fn test_untagged_block_is_inline_code() {
        let renderer = MarkdownRenderer::new();
        let tree = renderer.render("```\nplain text\n```\n");
        assert!(highlighted(&tree).is_none());
        let code = tree.find(&|n| n.name() == Some("code")).unwrap();
        assert_eq!(code.attr("class"), Some("inline-code"));
        assert_eq!(code.text_content(), "plain text\n");

        let html = renderer.render_html("```\nfirst line\n    second line\n```\n");
        assert!(html.starts_with(r#"<pre><code class="inline-code""#), "{}", html);
        assert!(html.contains(">first line\n    second line\n</code></pre>"), "{}", html);
    }

    #[test]
    fn test_unknown_language_is_inline_code() {
        let renderer = MarkdownRenderer::new();
        let tree = renderer.render("```notalanguage\nx = 1\n```\n");
        assert!(highlighted(&tree).is_none());
        assert!(tree.find(&|n| n.attr("class") == Some("inline-code")).is_some());
    }

    #[test]
    fn test_rendering_is_idempotent() {
        let renderer = MarkdownRenderer::new();
        let content = "# T\n\n```rust\nfn main() {}\n```\n\n| a |\n|---|\n| b |\n\n- [ ] x\n";
        let first = renderer.render(content);
        let _ = renderer.render("```python\nother()\n```\n");
        let second = renderer.render(content);
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_utf8_renders() {
        let renderer = MarkdownRenderer::new();
        let tree = renderer.render_bytes(b"# ok \xff\xfe\n\nbody \xc3\x28");
        let text = tree.text_content();
        assert!(text.contains("ok"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_deeply_nested_markdown_renders() {
        let renderer = MarkdownRenderer::new();
        let quotes = format!("{} bottom", ">".repeat(5_000));
        assert!(renderer.render_html(&quotes).contains("bottom"));

        let lists: String = (0..500).map(|i| format!("{}- item\n", "  ".repeat(i))).collect();
        assert!(renderer.render_html(&lists).contains("item"));

        let brackets = "[".repeat(2_000) + &"]".repeat(2_000);
        assert!(renderer.render_html(&brackets).contains('['));
    }

    #[test]
    fn test_raw_html_and_jsx_are_escaped() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("<script>alert(1)</script>\n\nHi <Chart data={x} /> there");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;Chart data={x} /&gt;"));
    }

    #[test]
    fn test_unclosed_constructs_fall_back_to_text() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render_html("**bold [link](http://x\n\n```rust\nunterminated");
        assert!(html.contains("**bold"));
        assert!(html.contains("unterminated"));
    }

    #[test]
    fn test_custom_rules() {
        let rules = RuleTable::new().with(NodeTag::Strong, |input| {
            RenderNode::element("b", input.children)
        });
        let renderer = MarkdownRenderer::with_rules(rules);
        assert_eq!(renderer.render_html("**x**"), "<p><b>x</b></p>");
    }

    #[test]
    fn test_split_excerpt() {
        let content = "This is excerpt.\n<!-- more -->\nThis is more content.";
        let (excerpt, body) = MarkdownRenderer::split_excerpt(content);
        assert_eq!(excerpt.as_deref(), Some("This is excerpt.\n"));
        assert!(!body.contains(MORE_MARKER));
        assert!(body.starts_with("This is excerpt.\n"));
        assert!(body.ends_with("\nThis is more content."));
    }

    #[test]
    fn test_split_excerpt_ignores_marker_in_code() {
        let content = "```html\n<p>a</p>\n<!-- more -->\n    <p>b</p>\n```\n";
        let (excerpt, body) = MarkdownRenderer::split_excerpt(content);
        assert!(excerpt.is_none());
        assert_eq!(body, content);

        let quoted = "> <!-- more -->\n\ntext";
        assert!(MarkdownRenderer::split_excerpt(quoted).0.is_none());
        let inline = "Intro <!-- more --> text";
        assert!(MarkdownRenderer::split_excerpt(inline).0.is_none());
    }
}
