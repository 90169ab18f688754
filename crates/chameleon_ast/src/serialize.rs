//! Functions for serializing XML trees
use std::io::Write;

pub use crate::xmlwriter::{Error, Indent, Options};

use crate::{document::Document, element::Element, node::Node, xmlwriter::XmlWriter};

/// An XML node serializer
pub trait Serialize {
    /// # Errors
    /// If the underlying serialization fails
    fn serialize(&self) -> Result<String, Error> {
        self.serialize_with_options(Options::default())
    }

    /// # Errors
    /// If the underlying serialization fails
    fn serialize_with_options(&self, options: Options) -> Result<String, Error> {
        let bytes = self.serialize_into(Vec::new(), options)?;
        String::from_utf8(bytes).map_err(Error::UTF8)
    }

    /// Writes the node to the given writer, returning the writer when complete
    ///
    /// # Errors
    /// If the underlying serialization fails
    fn serialize_into<W: Write>(&self, writer: W, options: Options) -> Result<W, Error>;
}

enum Frame<'a> {
    Element(&'a Element),
    Node(&'a Node),
    Close { restore_whitespace: bool },
}

impl Serialize for Element {
    fn serialize_into<W: Write>(&self, writer: W, options: Options) -> Result<W, Error> {
        let mut xml = XmlWriter::new(writer, options);
        serialize_element(self, &mut xml, options)?;
        xml.end_document()
    }
}

impl Serialize for Document {
    /// Writes each top-level node of the document. Whitespace between top-level nodes isn't
    /// kept.
    fn serialize_into<W: Write>(&self, writer: W, options: Options) -> Result<W, Error> {
        let mut xml = XmlWriter::new(writer, options);
        for node in &self.children {
            match node {
                Node::Element(element) => serialize_element(element, &mut xml, options)?,
                Node::Text(_) | Node::CData(_) => {}
                node => write_leaf(node, &mut xml, options)?,
            }
        }
        xml.end_document()
    }
}

fn serialize_element<W: Write>(
    element: &Element,
    xml: &mut XmlWriter<W>,
    options: Options,
) -> Result<(), Error> {
    let mut stack = vec![Frame::Element(element)];
    let mut preserving = false;
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Element(element) => {
                xml.start_element(element.qual_name())?;
                for attr in element.attributes() {
                    xml.write_attribute(&attr.name, attr.value())?;
                }

                let restore_whitespace = !preserving && has_significant_text(element);
                if restore_whitespace {
                    preserving = true;
                    xml.set_preserve_whitespaces(true);
                }
                stack.push(Frame::Close { restore_whitespace });
                stack.extend(element.children.iter().rev().map(|child| match child {
                    Node::Element(element) => Frame::Element(element),
                    node => Frame::Node(node),
                }));
            }
            Frame::Node(node) => write_leaf(node, xml, options)?,
            Frame::Close { restore_whitespace } => {
                xml.end_element()?;
                if restore_whitespace {
                    preserving = false;
                    xml.set_preserve_whitespaces(false);
                }
            }
        }
    }
    Ok(())
}

fn write_leaf<W: Write>(node: &Node, xml: &mut XmlWriter<W>, options: Options) -> Result<(), Error> {
    match node {
        Node::Text(text) => {
            if options.indent != Indent::None && text.trim().is_empty() {
                return Ok(());
            }
            xml.write_text(text)
        }
        Node::CData(text) => xml.write_cdata_text(text),
        Node::Comment(text) => xml.write_comment(text),
        Node::ProcessingInstruction { target, value } => {
            xml.write_processing_instruction(target, value.as_deref())
        }
        Node::Element(_) => Ok(()),
    }
}

fn has_significant_text(element: &Element) -> bool {
    element.children.iter().any(|child| match child {
        Node::Text(text) => !text.trim().is_empty(),
        Node::CData(_) => true,
        _ => false,
    })
}

#[cfg(all(test, feature = "parse"))]
mod tests {
    use super::*;
    use crate::parse::parse;

    #[test]
    fn serialize_keeps_source_whitespace() {
        let source = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <path fill="red" d="M0 0"/>
  <text>a &amp; b</text>
</svg>"#;
        let document = parse(source).unwrap();
        insta::assert_snapshot!(document.serialize().unwrap(), @r#"
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
          <path fill="red" d="M0 0"/>
          <text>a &amp; b</text>
        </svg>
        "#);
    }

    #[test]
    fn serialize_document_nodes() {
        let source = r##"<?xml version="1.0"?>
<?xml-stylesheet href="a.css"?>
<!-- icon -->
<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a"/><style><![CDATA[.a{}]]></style></svg>"##;
        let document = parse(source).unwrap();
        assert_eq!(
            document.serialize().unwrap(),
            r##"<?xml-stylesheet href="a.css"?><!-- icon --><svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a"/><style>.a{}</style></svg>"##
        );
    }

    #[test]
    fn serialize_indented() {
        let source = r#"<svg>
  <g><path d="M0 0"/></g>
  <text> keep  this </text>
</svg>"#;
        let document = parse(source).unwrap();
        let options = Options {
            indent: Indent::Spaces(2),
            ..Options::default()
        };
        let output = document.serialize_with_options(options).unwrap();
        insta::assert_snapshot!(output.trim_end(), @r#"
        <svg>
          <g>
            <path d="M0 0"/>
          </g>
          <text> keep  this </text>
        </svg>
        "#);
    }

    #[test]
    fn serialize_deeply_nested() {
        let depth = 10_000;
        let mut element = Element::new("g".into());
        for _ in 0..depth {
            let mut parent = Element::new("g".into());
            parent.append_child(element);
            element = parent;
        }
        let output = element.serialize().unwrap();
        assert_eq!(output.matches("<g>").count(), depth);
        assert!(output.contains("<g/></g>"));
        assert!(output.ends_with("</g></g>"));
    }
}
