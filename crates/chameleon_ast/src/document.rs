use crate::{element::Element, node::Node};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// The top of a tree, holding the root element along with any comments or processing
/// instructions around it.
pub struct Document {
    /// The top-level nodes of the document
    pub children: Vec<Node>,
}

impl Document {
    /// Creates a document containing only the given root element
    pub fn new(root: Element) -> Self {
        Self {
            children: vec![Node::Element(root)],
        }
    }

    /// Returns the document's root element
    ///
    /// [MDN | documentElement](https://developer.mozilla.org/en-US/docs/Web/API/Document/documentElement)
    pub fn root(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::element)
    }

    /// See [`Document::root`]
    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.children.iter_mut().find_map(Node::element_mut)
    }

    /// Takes the root element, discarding everything else in the document
    pub fn into_root(self) -> Option<Element> {
        self.children.into_iter().find_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }
}
