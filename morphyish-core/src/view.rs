//! A small visual tree that components render into.
//!
//! Components never produce strings directly. They build [`Node`]s, which
//! can be inspected in tests and serialized to HTML once at the edge.

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Trusted markup emitted verbatim, e.g. an inline SVG.
    Raw(String),
}

impl Node {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Node::Text(text.into())
    }

    pub fn raw<S: Into<String>>(markup: S) -> Self {
        Node::Raw(markup.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn write_html(&self, out: &mut String) {
        match self {
            Node::Element(el) => el.write_html(out),
            Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Node::Raw(markup) => out.push_str(markup),
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    /// Attributes keep insertion order so output is stable.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new<S: Into<String>>(tag: S) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append one or more space separated classes.
    pub fn class(mut self, class: &str) -> Self {
        let existing = self
            .attributes
            .iter_mut()
            .find(|(name, _)| name == "class");

        match existing {
            Some((_, value)) if !value.is_empty() => {
                value.push(' ');
                value.push_str(class);
            }
            Some((_, value)) => value.push_str(class),
            None => self.attributes.push(("class".into(), class.into())),
        }
        self
    }

    /// Set an attribute, replacing any previous value.
    pub fn attr<K: Into<String>, V: Into<String>>(mut self, name: K, value: V) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    pub fn child<N: Into<Node>>(mut self, node: N) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I, N>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Descendants (self included) with the given class, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |el| {
            if el.has_class(class) {
                found.push(el);
            }
        });
        found
    }

    /// Descendants (self included) with the given tag, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |el| {
            if el.tag == tag {
                found.push(el);
            }
        });
        found
    }

    fn walk<'a, F: FnMut(&'a Element)>(&'a self, visit: &mut F) {
        visit(self);
        for child in self.child_elements() {
            child.walk(visit);
        }
    }

    /// Concatenated text of all descendant text nodes. Raw markup is skipped.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) => text.push_str(t),
                Node::Element(el) => text.push_str(&el.text_content()),
                Node::Raw(_) => {}
            }
        }
        text
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&self.tag.as_str()) {
            return;
        }

        for child in &self.children {
            child.write_html(out);
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }
}

/// Serialize a sequence of sibling elements.
pub fn render_fragment(elements: &[Element]) -> String {
    let mut out = String::new();
    for el in elements {
        el.write_html(&mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_accumulate() {
        let el = Element::new("div").class("col").class("col--4");
        assert_eq!(el.get_attr("class"), Some("col col--4"));
        assert!(el.has_class("col--4"));
        assert!(!el.has_class("col--"));
    }

    #[test]
    fn attr_replaces_previous_value() {
        let el = Element::new("a").attr("href", "/a").attr("href", "/b");
        assert_eq!(el.attributes.len(), 1);
        assert_eq!(el.get_attr("href"), Some("/b"));
    }

    #[test]
    fn escapes_text_and_attributes() {
        let el = Element::new("p")
            .attr("title", "say \"hi\"")
            .child(Node::text("<b> & co"));
        assert_eq!(
            el.to_html(),
            "<p title=\"say &quot;hi&quot;\">&lt;b&gt; &amp; co</p>"
        );
    }

    #[test]
    fn raw_markup_is_verbatim() {
        let el = Element::new("div").child(Node::raw("<svg></svg>"));
        assert_eq!(el.to_html(), "<div><svg></svg></div>");
        assert_eq!(el.text_content(), "");
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let el = Element::new("img").attr("src", "/logo.svg");
        assert_eq!(el.to_html(), "<img src=\"/logo.svg\">");
    }

    #[test]
    fn finds_descendants_in_document_order() {
        let tree = Element::new("ul")
            .child(Element::new("li").class("item").child(Node::text("one")))
            .child(
                Element::new("li")
                    .class("item")
                    .child(Element::new("span").class("item").child(Node::text("two"))),
            );

        let items = tree.find_by_class("item");
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].text_content(), "one");
        assert_eq!(items[2].tag, "span");
        assert_eq!(tree.find_by_tag("li").len(), 2);
    }
}
