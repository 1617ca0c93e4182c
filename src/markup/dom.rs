// SPDX-License-Identifier: MPL-2.0
//! Lenient HTML element tree built on top of `quick-xml`.
//!
//! Gallery pages are hand-written or template-generated HTML, not XML, so the
//! reader is configured to tolerate unmatched end tags, valueless attributes
//! and void elements (`<img>`, `<link>`, ...) that are never closed. The
//! contents of raw text elements (`<script>`, `<style>`) are dropped before
//! parsing so they cannot be mistaken for markup.
//!
//! Optional end tags are implied the way HTML does it: a new `<li>` closes the
//! open `<li>` of the same list, and block-level start tags close an open
//! `<p>`. A syntax error ends parsing, keeping what was built up to that point.

use crate::error::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Elements that never have children or an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose content is raw text.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Start tags that close an open `<p>`.
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Open elements past which no end tag is implied.
const SCOPE_BOUNDARIES: &[&str] = &[
    "#document", "html", "body", "button", "caption", "table", "td", "th", "template",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// One element with lowercase name and attribute keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
        let attributes = start
            .html_attributes()
            .with_checks(false)
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
                let value = match attr.unescape_value() {
                    Ok(value) => value.into_owned(),
                    Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
                };
                (key, value)
            })
            .collect();
        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    /// Value of the first attribute named `name` (lowercase).
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Whether the whitespace-separated `rel` attribute contains `rel`.
    #[must_use]
    pub fn has_rel(&self, rel: &str) -> bool {
        self.attr("rel").is_some_and(|rels| {
            rels.split_ascii_whitespace()
                .any(|r| r.eq_ignore_ascii_case(rel))
        })
    }

    /// Direct element children, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// First direct child element named `name`.
    #[must_use]
    pub fn find_child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|child| child.name == name)
    }

    /// All descendant elements in document (pre-)order, excluding `self`.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.child_elements().collect::<Vec<_>>().into_iter().rev().collect(),
        }
    }

    /// Concatenated text content of this element and its descendants.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(child) => collect_text(child, out),
        }
    }
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        let children: Vec<&Element> = element.child_elements().collect();
        self.stack.extend(children.into_iter().rev());
        Some(element)
    }
}

/// Parses `html` into a synthetic `#document` root element.
pub fn parse(html: &str) -> Result<Element> {
    let source = strip_raw_text(html);
    let mut reader = Reader::from_str(&source);
    {
        let config = reader.config_mut();
        config.trim_text(true);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.expand_empty_elements = false;
    }

    let mut stack = vec![Element {
        name: "#document".to_string(),
        ..Element::default()
    }];

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(err) if stack.len() > 1 || !stack[0].children.is_empty() => {
                tracing::warn!(
                    error = %err,
                    position = reader.error_position(),
                    "malformed markup, keeping the elements parsed so far"
                );
                break;
            }
            Err(err) => return Err(err.into()),
        };
        match event {
            Event::Start(start) => {
                let element = Element::from_start(&start);
                close_implied(&mut stack, &element.name);
                if VOID_ELEMENTS.contains(&element.name.as_str()) {
                    attach(&mut stack, element);
                } else {
                    stack.push(element);
                }
            }
            Event::Empty(start) => {
                let element = Element::from_start(&start);
                close_implied(&mut stack, &element.name);
                attach(&mut stack, element);
            }
            Event::End(end) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                close(&mut stack, &name);
            }
            Event::Text(text) => {
                let value = match text.unescape() {
                    Ok(value) => value.into_owned(),
                    Err(_) => String::from_utf8_lossy(&text).into_owned(),
                };
                if !value.is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(value));
                    }
                }
            }
            Event::CData(data) => {
                let value = String::from_utf8_lossy(&data).into_owned();
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Text(value));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    // Unclosed elements at EOF are closed implicitly.
    while stack.len() > 1 {
        if let Some(element) = stack.pop() {
            attach(&mut stack, element);
        }
    }
    Ok(stack.pop().unwrap_or_default())
}

/// Removes the contents of `<script>`/`<style>` blocks, keeping their tags.
fn strip_raw_text(html: &str) -> String {
    // ASCII lowercasing keeps byte offsets identical.
    let lower = html.to_ascii_lowercase();
    let mut out = String::with_capacity(html.len());
    let mut cursor = 0;
    while let Some((content_start, content_end)) = next_raw_block(&lower, cursor) {
        out.push_str(&html[cursor..content_start]);
        cursor = content_end;
    }
    out.push_str(&html[cursor..]);
    out
}

/// Byte range of the next raw text content at or after `from`.
fn next_raw_block(lower: &str, from: usize) -> Option<(usize, usize)> {
    let (start, name) = RAW_TEXT_ELEMENTS
        .iter()
        .filter_map(|name| find_open_tag(lower, from, name).map(|at| (at, *name)))
        .min_by_key(|(at, _)| *at)?;
    let content_start = start + lower[start..].find('>')? + 1;
    if lower[..content_start].ends_with("/>") {
        return Some((content_start, content_start));
    }
    let closing = format!("</{name}");
    let content_end = lower[content_start..]
        .find(&closing)
        .map_or(lower.len(), |at| content_start + at);
    Some((content_start, content_end))
}

fn find_open_tag(lower: &str, from: usize, name: &str) -> Option<usize> {
    let needle = format!("<{name}");
    let mut search = from;
    while let Some(offset) = lower[search..].find(&needle) {
        let at = search + offset;
        let after = lower[at + needle.len()..].chars().next();
        if matches!(after, Some(c) if c.is_ascii_whitespace() || c == '>' || c == '/') {
            return Some(at);
        }
        search = at + needle.len();
    }
    None
}

fn attach(stack: &mut [Element], element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    }
}

/// Closes elements whose end tag is implied by the start of `opening`.
fn close_implied(stack: &mut Vec<Element>, opening: &str) {
    match opening {
        "li" => close_in_scope(stack, "li", &["ul", "ol", "menu"]),
        "dt" | "dd" => {
            close_in_scope(stack, "dt", &["dl"]);
            close_in_scope(stack, "dd", &["dl"]);
        }
        _ => {}
    }
    if CLOSES_PARAGRAPH.contains(&opening) {
        close_in_scope(stack, "p", &[]);
    }
}

/// Closes the innermost open `name` unless a scope boundary (or one of
/// `boundaries`) is open above it.
fn close_in_scope(stack: &mut Vec<Element>, name: &str, boundaries: &[&str]) {
    let in_scope = stack
        .iter()
        .rev()
        .map(|open| open.name.as_str())
        .take_while(|open| !SCOPE_BOUNDARIES.contains(open) && !boundaries.contains(open))
        .any(|open| open == name);
    if in_scope {
        close(stack, name);
    }
}

/// Closes the innermost open element named `name`, implicitly closing any
/// element opened after it. End tags with no open match are ignored.
fn close(stack: &mut Vec<Element>, name: &str) {
    let Some(position) = stack.iter().skip(1).rposition(|open| open.name == name) else {
        return;
    };
    let target = position + 1;
    while stack.len() > target {
        if let Some(element) = stack.pop() {
            attach(stack, element);
        }
    }
}
