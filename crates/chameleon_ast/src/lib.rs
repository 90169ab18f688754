//! An owned tree of XML nodes, with the tools needed to read, walk, and write SVG documents.
pub mod attribute;
pub mod document;
pub mod element;
pub mod name;
pub mod node;
pub mod serialize;
pub mod visitor;
pub mod xmlwriter;

#[cfg(feature = "parse")]
pub mod parse;
