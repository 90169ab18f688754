use crate::element::Element;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The kind of a node
///
/// [MDN | nodeType](https://developer.mozilla.org/en-US/docs/Web/API/Node/nodeType)
pub enum Type {
    /// An element, such as `<svg>`
    Element,
    /// The text content of an element
    Text,
    /// A `<![CDATA[ ... ]]>` section
    CDataSection,
    /// A `<!-- ... -->` comment
    Comment,
    /// A `<?target value?>` processing instruction
    ProcessingInstruction,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A node in the tree. Only elements carry attributes.
pub enum Node {
    /// An element and it's subtree
    Element(Element),
    /// A text node
    Text(String),
    /// A CDATA section
    CData(String),
    /// A comment
    Comment(String),
    /// A processing instruction
    ProcessingInstruction {
        /// The target of the instruction, e.g. `xml-stylesheet`
        target: String,
        /// The content following the target
        value: Option<String>,
    },
}

impl Node {
    /// Returns the kind of node
    pub fn node_type(&self) -> Type {
        match self {
            Self::Element(_) => Type::Element,
            Self::Text(_) => Type::Text,
            Self::CData(_) => Type::CDataSection,
            Self::Comment(_) => Type::Comment,
            Self::ProcessingInstruction { .. } => Type::ProcessingInstruction,
        }
    }

    /// Returns the node as an element, if it is one
    pub fn element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the node as an element, if it is one
    pub fn element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the text of a text, cdata, or comment node
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::CData(text) | Self::Comment(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Self::Element(value)
    }
}
