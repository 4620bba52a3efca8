//! Content-node tree built from the markdown event stream

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Nodes nested deeper than this are flattened into their ancestor
pub const MAX_NESTING: usize = 96;

/// Kind of a content node, the key of the rule table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    Paragraph,
    /// Heading level, 1 to 6
    Heading(u8),
    List,
    ListItem,
    BlockQuote,
    Link,
    Table,
    TableHead,
    TableRow,
    TableCell,
    InlineCode,
    CodeBlock,
    Image,
    Rule,
    Emphasis,
    Strong,
    Strikethrough,
    LineBreak,
    TaskMarker,
    /// Document root and constructs without a dedicated kind
    Fragment,
}

impl NodeTag {
    /// Element name used when no rule matches
    pub fn element_name(&self) -> &'static str {
        match self {
            NodeTag::Paragraph => "p",
            NodeTag::Heading(1) => "h1",
            NodeTag::Heading(2) => "h2",
            NodeTag::Heading(3) => "h3",
            NodeTag::Heading(4) => "h4",
            NodeTag::Heading(5) => "h5",
            NodeTag::Heading(_) => "h6",
            NodeTag::List => "ul",
            NodeTag::ListItem => "li",
            NodeTag::BlockQuote => "blockquote",
            NodeTag::Link => "a",
            NodeTag::Table => "table",
            NodeTag::TableHead => "thead",
            NodeTag::TableRow => "tr",
            NodeTag::TableCell => "td",
            NodeTag::InlineCode => "code",
            NodeTag::CodeBlock => "pre",
            NodeTag::Image => "img",
            NodeTag::Rule => "hr",
            NodeTag::Emphasis => "em",
            NodeTag::Strong => "strong",
            NodeTag::Strikethrough => "del",
            NodeTag::LineBreak => "br",
            NodeTag::TaskMarker => "input",
            NodeTag::Fragment => "div",
        }
    }
}

/// Horizontal alignment of a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellAlign {
    Left,
    Center,
    Right,
}

impl CellAlign {
    fn from_alignment(alignment: Alignment) -> Option<Self> {
        match alignment {
            Alignment::None => None,
            Alignment::Left => Some(CellAlign::Left),
            Alignment::Center => Some(CellAlign::Center),
            Alignment::Right => Some(CellAlign::Right),
        }
    }

    pub fn as_css(&self) -> &'static str {
        match self {
            CellAlign::Left => "left",
            CellAlign::Center => "center",
            CellAlign::Right => "right",
        }
    }
}

/// Attributes carried by a content node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeAttrs {
    /// Link target or image source, unfiltered
    pub url: Option<String>,
    pub title: Option<String>,
    /// Class marker, `language-<tag>` on fenced code blocks
    pub class: Option<String>,
    pub ordered: bool,
    pub start: Option<u64>,
    /// Table cell alignment
    pub align: Option<CellAlign>,
    /// Table cell inside the table head
    pub header: bool,
    /// Task list state, on task markers and their list items
    pub checked: Option<bool>,
}

/// A content node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    Element(Element),
    Text(String),
}

/// A content node with a kind, attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: NodeTag,
    pub attrs: NodeAttrs,
    pub children: Vec<ContentNode>,
}

impl Element {
    pub fn new(tag: NodeTag) -> Self {
        Self {
            tag,
            attrs: NodeAttrs::default(),
            children: Vec::new(),
        }
    }

    fn with_attrs(tag: NodeTag, attrs: NodeAttrs) -> Self {
        Self {
            tag,
            attrs,
            children: Vec::new(),
        }
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }

    fn push_text(&mut self, text: &str) {
        if let Some(ContentNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(ContentNode::Text(text.to_string()));
        }
    }
}

fn collect_text(nodes: &[ContentNode], out: &mut String) {
    for node in nodes {
        match node {
            ContentNode::Text(text) => out.push_str(text),
            ContentNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// Parser options: GFM tables, strikethrough and task lists
pub(crate) fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Parse markdown into a content tree rooted at a fragment.
///
/// Total over any input: raw HTML becomes text, unknown constructs become
/// fragments, and nesting past [`MAX_NESTING`] is flattened.
pub fn parse(markdown: &str) -> Element {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, parser_options()) {
        builder.feed(event);
    }
    builder.finish()
}

/// Readable text of markdown, without markup.
///
/// Raw HTML is dropped; blocks and line breaks become single spaces.
pub fn plain_text(markdown: &str) -> String {
    let mut out = String::new();
    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak | Event::HardBreak | Event::Rule => out.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableCell,
            ) => out.push(' '),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct TreeBuilder {
    stack: Vec<Element>,
    /// Start tags dropped because of the nesting limit, still awaiting their end
    overflow: usize,
    in_table_head: bool,
    alignments: Vec<Option<CellAlign>>,
    column: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new(NodeTag::Fragment)],
            overflow: 0,
            in_table_head: false,
            alignments: Vec::new(),
            column: 0,
        }
    }

    fn current(&mut self) -> &mut Element {
        // The root is only popped in finish()
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn feed(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),
            Event::Text(text) => self.current().push_text(&text),
            Event::Code(code) => {
                let mut el = Element::new(NodeTag::InlineCode);
                el.push_text(&code);
                self.leaf(el);
            }
            // Raw HTML and JSX are shown, never interpreted
            Event::Html(html) | Event::InlineHtml(html) => self.current().push_text(&html),
            Event::FootnoteReference(name) => self.current().push_text(&format!("[{}]", name)),
            Event::SoftBreak => self.current().push_text("\n"),
            Event::HardBreak => self.leaf(Element::new(NodeTag::LineBreak)),
            Event::Rule => self.leaf(Element::new(NodeTag::Rule)),
            Event::TaskListMarker(checked) => {
                if let Some(item) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|el| el.tag == NodeTag::ListItem)
                {
                    item.attrs.checked = Some(checked);
                }
                let attrs = NodeAttrs {
                    checked: Some(checked),
                    ..Default::default()
                };
                self.leaf(Element::with_attrs(NodeTag::TaskMarker, attrs));
            }
            _ => {}
        }
    }

    fn leaf(&mut self, el: Element) {
        if self.stack.len() > MAX_NESTING {
            let text = el.text_content();
            self.current().push_text(&text);
        } else {
            self.current().children.push(ContentNode::Element(el));
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let el = self.element_for(tag);
        if self.stack.len() > MAX_NESTING {
            self.overflow += 1;
            return;
        }
        self.stack.push(el);
    }

    fn close(&mut self) {
        if self.overflow > 0 {
            self.overflow -= 1;
            return;
        }
        if self.stack.len() <= 1 {
            return;
        }
        if let Some(el) = self.stack.pop() {
            match el.tag {
                NodeTag::TableHead => self.in_table_head = false,
                NodeTag::Table => self.alignments.clear(),
                _ => {}
            }
            self.current().children.push(ContentNode::Element(el));
        }
    }

    fn element_for(&mut self, tag: Tag<'_>) -> Element {
        match tag {
            Tag::Paragraph => Element::new(NodeTag::Paragraph),
            Tag::Heading { level, .. } => Element::new(NodeTag::Heading(heading_level(level))),
            Tag::BlockQuote(_) => Element::new(NodeTag::BlockQuote),
            Tag::CodeBlock(kind) => {
                let class = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| format!("language-{}", lang)),
                    CodeBlockKind::Indented => None,
                };
                Element::with_attrs(
                    NodeTag::CodeBlock,
                    NodeAttrs {
                        class,
                        ..Default::default()
                    },
                )
            }
            Tag::List(start) => Element::with_attrs(
                NodeTag::List,
                NodeAttrs {
                    ordered: start.is_some(),
                    start,
                    ..Default::default()
                },
            ),
            Tag::Item => Element::new(NodeTag::ListItem),
            Tag::Table(alignments) => {
                self.alignments = alignments
                    .into_iter()
                    .map(CellAlign::from_alignment)
                    .collect();
                Element::new(NodeTag::Table)
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.column = 0;
                Element::new(NodeTag::TableHead)
            }
            Tag::TableRow => {
                self.column = 0;
                Element::new(NodeTag::TableRow)
            }
            Tag::TableCell => {
                let align = self.alignments.get(self.column).copied().flatten();
                self.column += 1;
                Element::with_attrs(
                    NodeTag::TableCell,
                    NodeAttrs {
                        align,
                        header: self.in_table_head,
                        ..Default::default()
                    },
                )
            }
            Tag::Emphasis => Element::new(NodeTag::Emphasis),
            Tag::Strong => Element::new(NodeTag::Strong),
            Tag::Strikethrough => Element::new(NodeTag::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => Element::with_attrs(
                NodeTag::Link,
                NodeAttrs {
                    url: Some(dest_url.to_string()),
                    title: non_empty(&title),
                    ..Default::default()
                },
            ),
            Tag::Image {
                dest_url, title, ..
            } => Element::with_attrs(
                NodeTag::Image,
                NodeAttrs {
                    url: Some(dest_url.to_string()),
                    title: non_empty(&title),
                    ..Default::default()
                },
            ),
            _ => Element::new(NodeTag::Fragment),
        }
    }

    fn finish(mut self) -> Element {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack
            .pop()
            .unwrap_or_else(|| Element::new(NodeTag::Fragment))
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
