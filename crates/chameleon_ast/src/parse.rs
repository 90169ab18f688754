//! Parsing methods using roxmltree
//!
//! # Quirks
//!
//! Roxmltree has some notable quirks
//!
//! - The xml declaration is skipped
//! - CDATA sections are merged into the surrounding text
//! - Namespace declarations are restored as `xmlns` attributes on the element that declares
//!   them
use std::{fmt::Display, path::Path};

use roxmltree::{NodeType, ParsingOptions};

use crate::{
    attribute::{Attr, Attributes},
    document::Document,
    element::Element,
    name::QualName,
    node::Node,
};

const XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug)]
/// The errors which may occur while parsing a document with roxmltree.
pub enum ParseError {
    /// The document couldn't be parsed by roxmltree
    ROXML(roxmltree::Error),
    /// The document couldn't be read due to an IO issue
    IO(std::io::Error),
}

/// Parses a document from source text
///
/// # Errors
///
/// If the source is not well-formed XML
pub fn parse(source: &str) -> Result<Document, ParseError> {
    let xml = roxmltree::Document::parse_with_options(
        source,
        ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        },
    )
    .map_err(ParseError::ROXML)?;
    Ok(convert(&xml))
}

/// Reads and parses the document at the given path
///
/// # Errors
///
/// If the file cannot be read or is not well-formed XML
pub fn parse_file(path: &Path) -> Result<Document, ParseError> {
    let source = std::fs::read_to_string(path).map_err(ParseError::IO)?;
    parse(&source)
}

enum Step<'a, 'input> {
    Open(roxmltree::Node<'a, 'input>),
    Close,
}

/// Converts an xml document already in roxmltree representation.
///
/// Elements are opened and closed with an explicit stack so that deeply nested documents
/// don't exhaust the call stack.
pub fn convert(xml: &roxmltree::Document<'_>) -> Document {
    let mut document = Document::default();
    let mut open: Vec<Element> = Vec::new();
    let mut steps: Vec<Step<'_, '_>> = xml.root().children().rev().map(Step::Open).collect();

    while let Some(step) = steps.pop() {
        let node = match step {
            Step::Close => {
                if let Some(element) = open.pop() {
                    attach(&mut document, &mut open, Node::Element(element));
                }
                continue;
            }
            Step::Open(node) => node,
        };
        match node.node_type() {
            NodeType::Root => {}
            NodeType::Element => {
                open.push(parse_element(node));
                steps.push(Step::Close);
                steps.extend(node.children().rev().map(Step::Open));
            }
            NodeType::Text => {
                let text = node.text().unwrap_or_default();
                attach(&mut document, &mut open, Node::Text(text.to_string()));
            }
            NodeType::Comment => {
                let text = node.text().unwrap_or_default();
                attach(&mut document, &mut open, Node::Comment(text.to_string()));
            }
            NodeType::PI => {
                if let Some(pi) = node.pi() {
                    let node = Node::ProcessingInstruction {
                        target: pi.target.to_string(),
                        value: pi.value.map(ToString::to_string),
                    };
                    attach(&mut document, &mut open, node);
                }
            }
        }
    }
    document
}

fn attach(document: &mut Document, open: &mut [Element], node: Node) {
    match open.last_mut() {
        Some(parent) => parent.children.push(node),
        None => document.children.push(node),
    }
}

fn parse_element(node: roxmltree::Node<'_, '_>) -> Element {
    let tag_name = node.tag_name();
    let name = QualName::new(
        tag_name.namespace().and_then(|uri| find_prefix(node, uri)),
        tag_name.name().to_string(),
    );

    let mut attributes = Attributes::new();
    for (prefix, uri) in new_namespaces(node) {
        let name = match prefix {
            Some(prefix) => QualName::new(Some(String::from("xmlns")), prefix.to_string()),
            None => QualName::local("xmlns"),
        };
        attributes.set_named_item(Attr::new(name, uri));
    }
    for attr in node.attributes() {
        let name = QualName::new(
            attr.namespace().and_then(|uri| find_prefix(node, uri)),
            attr.name().to_string(),
        );
        attributes.set_named_item(Attr::new(name, attr.value()));
    }

    Element {
        name,
        attributes,
        children: Vec::new(),
    }
}

fn find_prefix(node: roxmltree::Node<'_, '_>, uri: &str) -> Option<String> {
    if uri == XML_URI {
        return Some(String::from("xml"));
    }
    node.lookup_prefix(uri).map(ToString::to_string)
}

/// Returns the namespaces declared by the node, as opposed to those inherited from it's
/// ancestors.
fn new_namespaces<'a, 'input: 'a>(
    node: roxmltree::Node<'a, 'input>,
) -> Vec<(Option<&'a str>, &'a str)> {
    let parent = node.parent_element();
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| {
            parent.is_none_or(|parent| {
                !parent
                    .namespaces()
                    .any(|inherited| inherited.name() == ns.name() && inherited.uri() == ns.uri())
            })
        })
        .map(|ns| (ns.name(), ns.uri()))
        .collect()
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ROXML(err) => err.fmt(f),
            Self::IO(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ROXML(err) => Some(err),
            Self::IO(err) => Some(err),
        }
    }
}

#[test]
fn parse_roxmltree() {
    use pretty_assertions::assert_eq;

    let source = r##"<?xml version="1.0"?>
<!-- icon -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" viewBox="0 0 24 24">
  <path fill="" d="M0 0"/>
  <use xlink:href="#a" xml:space="preserve"/>
</svg>"##;
    let document = parse(source).unwrap();

    assert!(matches!(document.children.first(), Some(Node::Comment(text)) if text == " icon "));
    let svg = document.root().unwrap();
    assert!(svg.is_local("svg"));
    let names: Vec<_> = svg.attributes().iter().map(|a| a.name.to_string()).collect();
    assert_eq!(names, vec!["xmlns", "xmlns:xlink", "viewBox"]);

    let children: Vec<_> = svg.children().collect();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0].get_attribute_local("fill"), Some(""));
    assert_eq!(
        children[1].get_attribute(&QualName::parse("xlink:href")),
        Some("#a")
    );
    assert_eq!(
        children[1].get_attribute(&QualName::parse("xml:space")),
        Some("preserve")
    );
    assert!(
        children[1]
            .attributes()
            .iter()
            .all(|attr| attr.prefix() != Some("xmlns")),
        "inherited namespaces should not be redeclared"
    );
    // whitespace between elements is kept
    assert_eq!(svg.children.len(), 5);
}

#[test]
fn parse_deeply_nested() {
    let depth = 2000;
    let source = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg">{}{}</svg>"#,
        "<g>".repeat(depth),
        "</g>".repeat(depth)
    );
    let Ok(document) = parse(&source) else {
        // roxmltree may refuse documents beyond it's own nesting limit
        return;
    };
    let mut element = document.root().unwrap();
    let mut count = 0;
    while let Some(child) = element.children().next() {
        element = child;
        count += 1;
    }
    assert_eq!(count, depth);
}

#[test]
fn parse_error() {
    assert!(matches!(parse("<svg>"), Err(ParseError::ROXML(_))));
    assert!(matches!(
        parse_file(Path::new("./does-not-exist.svg")),
        Err(ParseError::IO(_))
    ));
}
