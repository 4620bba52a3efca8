//! Rendered output tree and its HTML serialization

use super::highlight::HighlightedBlock;
use crate::helpers::html::html_escape;

/// Elements written without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// A structured output node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderNode {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
        children: Vec<RenderNode>,
    },
    Text(String),
    /// Children without a wrapping element
    Fragment(Vec<RenderNode>),
    /// Block-level container around highlighted code
    Highlighted(HighlightedBlock),
}

impl RenderNode {
    pub fn element(name: &str, children: Vec<RenderNode>) -> Self {
        RenderNode::Element {
            name: name.to_string(),
            attrs: Vec::new(),
            children,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        RenderNode::Text(text.into())
    }

    /// Add an attribute; no-op on non-element nodes
    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        if let RenderNode::Element { attrs, .. } = &mut self {
            attrs.push((key.to_string(), value.into()));
        }
        self
    }

    /// Element name, if this is an element
    pub fn name(&self) -> Option<&str> {
        match self {
            RenderNode::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Attribute value, if this is an element carrying it
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            RenderNode::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn children(&self) -> &[RenderNode] {
        match self {
            RenderNode::Element { children, .. } | RenderNode::Fragment(children) => {
                children.as_slice()
            }
            _ => &[],
        }
    }

    /// Visible text of the node
    pub fn text_content(&self) -> String {
        match self {
            RenderNode::Text(text) => text.clone(),
            RenderNode::Highlighted(block) => block.code.clone(),
            _ => self.children().iter().map(|c| c.text_content()).collect(),
        }
    }

    /// Depth-first search for the first node matching `pred`
    pub fn find(&self, pred: &dyn Fn(&RenderNode) -> bool) -> Option<&RenderNode> {
        if pred(self) {
            return Some(self);
        }
        self.children().iter().find_map(|c| c.find(pred))
    }

    /// Serialize to HTML, escaping all text and attribute values
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            RenderNode::Text(text) => out.push_str(&html_escape(text)),
            RenderNode::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            RenderNode::Highlighted(block) => {
                let language = html_escape(&block.language);
                out.push_str(&format!(
                    r#"<div class="highlight language-{}" data-language="{}">{}</div>"#,
                    language, language, block.html
                ));
                out.push('\n');
            }
            RenderNode::Element {
                name,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(name);
                for (key, value) in attrs {
                    if value.is_empty() && is_boolean_attr(key) {
                        out.push_str(&format!(" {}", key));
                    } else {
                        out.push_str(&format!(r#" {}="{}""#, key, html_escape(value)));
                    }
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }

                for child in children {
                    child.write_html(out);
                }
                out.push_str(&format!("</{}>", name));
            }
        }
    }
}

fn is_boolean_attr(key: &str) -> bool {
    matches!(key, "checked" | "disabled")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_escaped() {
        let node = RenderNode::element("p", vec![RenderNode::text("<b>&</b>")]);
        assert_eq!(node.to_html(), "<p>&lt;b&gt;&amp;&lt;/b&gt;</p>");
    }

    #[test]
    fn test_attributes_are_escaped() {
        let node = RenderNode::element("a", vec![RenderNode::text("x")])
            .with_attr("href", "/a?b=\"c\"");
        assert_eq!(node.to_html(), r#"<a href="/a?b=&quot;c&quot;">x</a>"#);
    }

    #[test]
    fn test_void_and_boolean_attributes() {
        let node = RenderNode::element("input", Vec::new())
            .with_attr("type", "checkbox")
            .with_attr("disabled", "");
        assert_eq!(node.to_html(), r#"<input type="checkbox" disabled>"#);
    }

    #[test]
    fn test_find_and_text_content() {
        let tree = RenderNode::Fragment(vec![
            RenderNode::element("p", vec![RenderNode::text("one")]),
            RenderNode::element("em", vec![RenderNode::text("two")]),
        ]);
        let em = tree.find(&|n| n.name() == Some("em")).unwrap();
        assert_eq!(em.text_content(), "two");
        assert_eq!(tree.text_content(), "onetwo");
    }
}
