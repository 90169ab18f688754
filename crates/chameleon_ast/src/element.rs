use crate::{
    attribute::{Attr, Attributes},
    name::QualName,
    node::Node,
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// An element with it's attributes and children.
///
/// Children are owned by their parent and kept in document order.
pub struct Element {
    /// The tag name of the element
    pub name: QualName,
    /// The attributes of the element, in source order
    pub attributes: Attributes,
    /// The child nodes of the element, in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children
    pub fn new(name: QualName) -> Self {
        Self {
            name,
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Returns the element's name as a qualified name.
    pub fn qual_name(&self) -> &QualName {
        &self.name
    }

    /// Returns the local part of the element's qualified name.
    ///
    /// [MDN | localName](https://developer.mozilla.org/en-US/docs/Web/API/Element/localName)
    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }

    /// Returns the namespace prefix of the element's name.
    ///
    /// [MDN | prefix](https://developer.mozilla.org/en-US/docs/Web/API/Element/prefix)
    pub fn prefix(&self) -> Option<&str> {
        self.name.prefix()
    }

    /// Whether the element is unprefixed and has the given local name
    pub fn is_local(&self, local: &str) -> bool {
        self.name.is_local(local)
    }

    /// Returns a collection of the attributes assigned to the element.
    ///
    /// [MDN | attributes](https://developer.mozilla.org/en-US/docs/Web/API/Element/attributes)
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// See [`Element::attributes`]
    pub fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }

    /// Returns the value of the named attribute. An empty value is still present.
    ///
    /// [MDN | getAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/getAttribute)
    pub fn get_attribute(&self, name: &QualName) -> Option<&str> {
        self.attributes.get_named_item(name).map(Attr::value)
    }

    /// Returns the value of the unprefixed attribute with the given local name.
    pub fn get_attribute_local(&self, local: &str) -> Option<&str> {
        self.attributes.get_named_item_local(local).map(Attr::value)
    }

    /// Whether the unprefixed attribute with the given local name is present
    ///
    /// [MDN | hasAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/hasAttribute)
    pub fn has_attribute_local(&self, local: &str) -> bool {
        self.attributes.get_named_item_local(local).is_some()
    }

    /// Sets the value of the named attribute, returning the previous value.
    ///
    /// [MDN | setAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/setAttribute)
    pub fn set_attribute(&mut self, name: QualName, value: impl Into<String>) -> Option<String> {
        self.attributes
            .set_named_item(Attr::new(name, value))
            .map(|attr| attr.value)
    }

    /// Sets the value of the unprefixed attribute, returning the previous value.
    pub fn set_attribute_local(&mut self, local: &str, value: impl Into<String>) -> Option<String> {
        if let Some(attr) = self.attributes.get_named_item_local_mut(local) {
            return Some(attr.set_value(value));
        }
        self.set_attribute(QualName::local(local), value)
    }

    /// Removes the unprefixed attribute, returning it's value
    ///
    /// [MDN | removeAttribute](https://developer.mozilla.org/en-US/docs/Web/API/Element/removeAttribute)
    pub fn remove_attribute_local(&mut self, local: &str) -> Option<String> {
        self.attributes
            .remove_named_item(&QualName::local(local))
            .map(|attr| attr.value)
    }

    /// Returns an iterator over the child elements of this element.
    ///
    /// [MDN | children](https://developer.mozilla.org/en-US/docs/Web/API/Element/children)
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(Node::element)
    }

    /// See [`Element::children`]
    pub fn children_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::element_mut)
    }

    /// Returns the number of child elements of this element.
    ///
    /// [MDN | childElementCount](https://developer.mozilla.org/en-US/docs/Web/API/Element/childElementCount)
    pub fn child_element_count(&self) -> usize {
        self.children().count()
    }

    /// Adds a node to the end of the element's children
    ///
    /// [MDN | appendChild](https://developer.mozilla.org/en-US/docs/Web/API/Node/appendChild)
    pub fn append_child(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    /// Whether the element has no child nodes
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the concatenated text of the element's text and cdata descendants.
    ///
    /// [MDN | textContent](https://developer.mozilla.org/en-US/docs/Web/API/Node/textContent)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        let mut stack: Vec<&Node> = self.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            match node {
                Node::Text(text) | Node::CData(text) => result.push_str(text),
                Node::Element(element) => stack.extend(element.children.iter().rev()),
                _ => {}
            }
        }
        result
    }
}

impl Drop for Element {
    /// Moves descendants onto a heap stack, so dropping a deep tree doesn't recurse once per
    /// level.
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            if let Node::Element(element) = &mut node {
                stack.append(&mut element.children);
            }
        }
    }
}

#[test]
fn text_content_in_document_order() {
    let mut inner = Element::new("tspan".into());
    inner.append_child(Node::Text("b".into()));
    let mut text = Element::new("text".into());
    text.append_child(Node::Text("a".into()));
    text.append_child(inner);
    text.append_child(Node::Comment("ignored".into()));
    text.append_child(Node::CData("c".into()));

    assert_eq!(text.text_content(), "abc");
    assert_eq!(text.child_element_count(), 1);
}

#[test]
fn set_attribute_local_overwrites_in_place() {
    let mut element = Element::new("path".into());
    element.set_attribute_local("fill", "red");
    element.set_attribute_local("d", "M0 0");
    assert_eq!(
        element.set_attribute_local("fill", "blue"),
        Some(String::from("red"))
    );
    assert_eq!(element.attributes().item(0).map(Attr::value), Some("blue"));
    assert_eq!(element.remove_attribute_local("d"), Some(String::from("M0 0")));
    assert!(!element.has_attribute_local("d"));
}

#[test]
fn drop_deeply_nested() {
    let depth = 200_000;
    let mut element = Element::new("path".into());
    for _ in 0..depth {
        let mut parent = Element::new("g".into());
        parent.append_child(Node::Text(" ".into()));
        parent.append_child(element);
        element = parent;
    }
    assert_eq!(element.child_element_count(), 1);
    drop(crate::document::Document::new(element));
}
