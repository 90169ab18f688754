/*!

A streaming XML writer adapted from the [xmlwriter](https://docs.rs/xmlwriter/latest/xmlwriter/index.html)
crate, with the following differences

- Errors instead of panicking
- Names are written from a [`QualName`]
- `&`, `<`, `>` and the active quote are escaped in attributes; `&`, `<` and `>` in text
- Processing instructions can be written anywhere a comment can
- CDATA sections are written whole, rather than merged with following text
- Indentation is disabled by default, so that the whitespace of the source is kept

```rust
use chameleon_ast::{name::QualName, xmlwriter::*};

fn main() -> Result<(), Error> {
    let mut w = XmlWriter::new(Vec::<u8>::new(), Options::default());
    w.start_element(&QualName::local("svg"))?;
    w.write_attribute(&QualName::local("viewBox"), "0 0 24 24")?;
    w.start_element(&QualName::local("text"))?;
    w.write_text("a < b")?;

    assert_eq!(
        String::from_utf8(w.end_document()?).map_err(Error::UTF8)?,
        r#"<svg viewBox="0 0 24 24"><text>a &lt; b</text></svg>"#
    );
    Ok(())
}
```
*/
use std::fmt::{self, Display};
use std::io::{self, Write};

use crate::name::QualName;

/// An error while serializing a document.
#[derive(Debug)]
pub enum Error {
    /// An error while running an io operation.
    IO(io::Error),
    /// An error after writing to string.
    UTF8(std::string::FromUtf8Error),
    /// Attempted to close an element when none were open.
    ClosedUnopenedElement,
    /// Attempted to write attribute before `start_element()` or after the element's content.
    AttributeWrittenBeforeElement,
    /// Attempts to write text before `start_element()`.
    TextBeforeElement,
    /// Attempts to write CDATA with `]]>` in the content.
    BadCDATA,
}

/// An XML node indention.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Indent {
    /// Disable indention and new lines.
    None,
    /// Indent with spaces. Preferred range is 0..4.
    Spaces(u8),
    /// Indent with tabs.
    Tabs,
}

/// An XML writing options.
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Use single quote marks instead of double quote.
    ///
    /// Default: disabled
    pub use_single_quote: bool,

    /// Set XML nodes indention.
    ///
    /// Default: `Indent::None`
    pub indent: Indent,

    /// Set XML attributes indention.
    ///
    /// ```text
    /// <svg>
    ///     <rect
    ///       fill="red"
    ///       stroke="black"/>
    /// </svg>
    /// ```
    ///
    /// Default: `Indent::None`
    pub attributes_indent: Indent,

    /// Write self-closing tags when element is empty.
    ///
    /// Default: enabled
    pub enable_self_closing: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            use_single_quote: false,
            indent: Indent::None,
            attributes_indent: Indent::None,
            enable_self_closing: true,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    Empty,
    Document,
    Attributes,
}

#[derive(Clone, Debug)]
struct DepthData {
    element_name: QualName,
    has_children: bool,
}

/// An XML writer.
#[derive(Debug)]
pub struct XmlWriter<W: Write> {
    writer: W,
    state: State,
    preserve_whitespaces: bool,
    depth_stack: Vec<DepthData>,
    opt: Options,
}

impl<W: Write> XmlWriter<W> {
    /// Creates a new `XmlWriter`, writing data in the writer.
    pub fn new(writer: W, opt: Options) -> Self {
        XmlWriter {
            writer,
            state: State::Empty,
            preserve_whitespaces: false,
            depth_stack: Vec::new(),
            opt,
        }
    }

    /// The number of elements currently open
    pub fn depth(&self) -> usize {
        self.depth_stack.len()
    }

    /// Sets the preserve whitespaces flag.
    ///
    /// - If set, nodes are written as is.
    /// - If not set, nodes are indented according to the options.
    ///
    /// Can be set at any moment.
    pub fn set_preserve_whitespaces(&mut self, preserve: bool) {
        self.preserve_whitespaces = preserve;
    }

    /// Writes a comment string.
    ///
    /// # Errors
    ///
    /// When io fails.
    pub fn write_comment(&mut self, text: &str) -> Result<(), Error> {
        self.begin_node()?;
        self.write_raw(b"<!--")?;
        self.write_raw(text.as_bytes())?;
        self.write_raw(b"-->")?;
        self.state = State::Document;
        Ok(())
    }

    /// Writes a processing instruction, such as `<?xml-stylesheet href="a.css"?>`
    ///
    /// # Errors
    ///
    /// When io fails.
    pub fn write_processing_instruction(
        &mut self,
        target: &str,
        value: Option<&str>,
    ) -> Result<(), Error> {
        self.begin_node()?;
        self.write_raw(b"<?")?;
        self.write_raw(target.as_bytes())?;
        if let Some(value) = value.filter(|value| !value.is_empty()) {
            self.write_raw(b" ")?;
            self.write_raw(value.as_bytes())?;
        }
        self.write_raw(b"?>")?;
        self.state = State::Document;
        Ok(())
    }

    /// Starts writing a new element.
    ///
    /// This method writes only the `<tag-name` part.
    ///
    /// # Errors
    ///
    /// When io fails.
    pub fn start_element(&mut self, name: &QualName) -> Result<(), Error> {
        self.begin_node()?;
        self.write_raw(b"<")?;
        write!(self.writer, "{name}").map_err(Error::IO)?;
        self.depth_stack.push(DepthData {
            element_name: name.clone(),
            has_children: false,
        });
        self.state = State::Attributes;
        Ok(())
    }

    /// Writes an attribute.
    ///
    /// Any occurrence of `&<>` and the active quote in the value will be escaped.
    ///
    /// # Errors
    ///
    /// - When called before `start_element()`.
    /// - When called after the content of an element is written.
    pub fn write_attribute(&mut self, name: &QualName, value: &str) -> Result<(), Error> {
        if self.state != State::Attributes {
            return Err(Error::AttributeWrittenBeforeElement);
        }

        if self.opt.attributes_indent == Indent::None {
            self.write_raw(b" ")?;
        } else {
            self.write_raw(b"\n")?;
            let depth = self.depth_stack.len();
            if depth > 0 {
                self.write_indent(depth - 1, self.opt.indent)?;
            }
            self.write_indent(1, self.opt.attributes_indent)?;
        }

        write!(self.writer, "{name}=").map_err(Error::IO)?;
        let quote = self.quote_char();
        self.write_raw(&[quote])?;
        self.write_escaped(value, true)?;
        self.write_raw(&[quote])
    }

    /// Writes a text node.
    ///
    /// `><&` will be escaped.
    ///
    /// # Errors
    ///
    /// - When called outside of an element.
    pub fn write_text(&mut self, text: &str) -> Result<(), Error> {
        if self.depth_stack.is_empty() {
            return Err(Error::TextBeforeElement);
        }
        self.begin_node()?;
        self.write_escaped(text, false)?;
        self.state = State::Document;
        Ok(())
    }

    /// Writes text inside a `<![CDATA[ ... ]]>` node.
    ///
    /// # Errors
    ///
    /// - When called outside of an element.
    /// - When the text contains the literal `]]>`.
    pub fn write_cdata_text(&mut self, text: &str) -> Result<(), Error> {
        if self.depth_stack.is_empty() {
            return Err(Error::TextBeforeElement);
        }
        if text.contains("]]>") {
            return Err(Error::BadCDATA);
        }
        self.begin_node()?;
        self.write_raw(b"<![CDATA[")?;
        self.write_raw(text.as_bytes())?;
        self.write_raw(b"]]>")?;
        self.state = State::Document;
        Ok(())
    }

    /// Closes an open element.
    ///
    /// # Errors
    ///
    /// When no element is open or when io fails.
    pub fn end_element(&mut self) -> Result<(), Error> {
        let depth = self.depth_stack.pop().ok_or(Error::ClosedUnopenedElement)?;
        if depth.has_children || !self.opt.enable_self_closing {
            if !depth.has_children {
                self.write_raw(b">")?;
            } else if !self.preserve_whitespaces {
                self.write_new_line()?;
                self.write_node_indent()?;
            }
            self.write_raw(b"</")?;
            write!(self.writer, "{}", depth.element_name).map_err(Error::IO)?;
            self.write_raw(b">")?;
        } else {
            self.write_raw(b"/>")?;
        }

        self.state = State::Document;
        Ok(())
    }

    /// Closes all open elements and returns back the writer.
    ///
    /// # Errors
    ///
    /// When io fails.
    pub fn end_document(mut self) -> Result<W, Error> {
        while !self.depth_stack.is_empty() {
            self.end_element()?;
        }
        if self.state != State::Empty {
            self.write_new_line()?;
        }
        self.writer.flush().map_err(Error::IO)?;
        Ok(self.writer)
    }

    // Finishes the open tag, if any, and moves to where the next node belongs
    fn begin_node(&mut self) -> Result<(), Error> {
        if self.state == State::Attributes {
            self.write_raw(b">")?;
        }
        if let Some(depth) = self.depth_stack.last_mut() {
            depth.has_children = true;
        }
        if self.state != State::Empty {
            self.write_new_line()?;
        }
        self.write_node_indent()
    }

    fn quote_char(&self) -> u8 {
        if self.opt.use_single_quote {
            b'\''
        } else {
            b'"'
        }
    }

    fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.writer.write_all(bytes).map_err(Error::IO)
    }

    fn write_escaped(&mut self, s: &str, escape_quotes: bool) -> Result<(), Error> {
        let use_single_quote = self.opt.use_single_quote;
        let mut part_start_pos = 0;
        for (byte_pos, byte) in s.bytes().enumerate() {
            let escaped_char: &[u8] = match byte {
                b'&' => b"&amp;",
                b'>' => b"&gt;",
                b'<' => b"&lt;",
                b'"' if escape_quotes && !use_single_quote => b"&quot;",
                b'\'' if escape_quotes && use_single_quote => b"&apos;",
                _ => continue,
            };
            self.write_raw(&s.as_bytes()[part_start_pos..byte_pos])?;
            self.write_raw(escaped_char)?;
            part_start_pos = byte_pos + 1;
        }
        self.write_raw(&s.as_bytes()[part_start_pos..])
    }

    fn write_node_indent(&mut self) -> Result<(), Error> {
        self.write_indent(self.depth_stack.len(), self.opt.indent)
    }

    fn write_indent(&mut self, depth: usize, indent: Indent) -> Result<(), Error> {
        if self.preserve_whitespaces {
            return Ok(());
        }
        let unit: &[u8] = match indent {
            Indent::None => return Ok(()),
            Indent::Spaces(n) => &b"        "[..usize::from(n.min(8))],
            Indent::Tabs => b"\t",
        };
        for _ in 0..depth {
            self.write_raw(unit)?;
        }
        Ok(())
    }

    fn write_new_line(&mut self) -> Result<(), Error> {
        if self.opt.indent != Indent::None && !self.preserve_whitespaces {
            self.write_raw(b"\n")?;
        }
        Ok(())
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IO(err) => err.fmt(f),
            Self::UTF8(err) => err.fmt(f),
            Self::ClosedUnopenedElement => "Attempted to close an element when none were open.".fmt(f),
            Self::AttributeWrittenBeforeElement => {
                "Attempted to write attribute before `start_element()` or after the element's content."
                    .fmt(f)
            }
            Self::TextBeforeElement => "Attempts to write text before `start_element()`.".fmt(f),
            Self::BadCDATA => "Attempts to write CDATA with `]]>` in the content.".fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IO(err) => Some(err),
            Self::UTF8(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
fn written(w: XmlWriter<Vec<u8>>) -> String {
    String::from_utf8(w.end_document().unwrap()).unwrap()
}

#[test]
fn escapes_attributes_and_text() {
    let mut w = XmlWriter::new(Vec::new(), Options::default());
    w.start_element(&"text".into()).unwrap();
    w.write_attribute(&"data-x".into(), r#"a&b<c>"d'"#).unwrap();
    w.write_text(r#"1 < 2 & "3" > 'x'"#).unwrap();
    assert_eq!(
        written(w),
        r#"<text data-x="a&amp;b&lt;c&gt;&quot;d'">1 &lt; 2 &amp; "3" &gt; 'x'</text>"#
    );

    let mut w = XmlWriter::new(
        Vec::new(),
        Options {
            use_single_quote: true,
            ..Options::default()
        },
    );
    w.start_element(&"a".into()).unwrap();
    w.write_attribute(&"title".into(), r#"it's "ok""#).unwrap();
    assert_eq!(written(w), r#"<a title='it&apos;s "ok"'/>"#);
}

#[test]
fn writes_cdata_and_instructions() {
    let mut w = XmlWriter::new(Vec::new(), Options::default());
    w.write_processing_instruction("xml-stylesheet", Some(r#"href="a.css""#))
        .unwrap();
    w.start_element(&"style".into()).unwrap();
    w.write_cdata_text(".a { fill: red }").unwrap();
    w.write_text(" ").unwrap();
    w.write_comment(" c ").unwrap();
    assert_eq!(
        written(w),
        r#"<?xml-stylesheet href="a.css"?><style><![CDATA[.a { fill: red }]]> <!-- c --></style>"#
    );

    let mut w = XmlWriter::new(Vec::new(), Options::default());
    w.start_element(&"style".into()).unwrap();
    assert!(matches!(w.write_cdata_text("]]>"), Err(Error::BadCDATA)));
}

#[test]
fn rejects_invalid_states() {
    let mut w = XmlWriter::new(Vec::new(), Options::default());
    assert!(matches!(
        w.write_attribute(&"x".into(), "1"),
        Err(Error::AttributeWrittenBeforeElement)
    ));
    assert!(matches!(w.write_text("x"), Err(Error::TextBeforeElement)));
    assert!(matches!(w.end_element(), Err(Error::ClosedUnopenedElement)));

    w.start_element(&"g".into()).unwrap();
    w.write_text("x").unwrap();
    assert!(matches!(
        w.write_attribute(&"x".into(), "1"),
        Err(Error::AttributeWrittenBeforeElement)
    ));
}

#[test]
fn indents_nested_elements() {
    let mut w = XmlWriter::new(
        Vec::new(),
        Options {
            indent: Indent::Spaces(2),
            ..Options::default()
        },
    );
    w.start_element(&"svg".into()).unwrap();
    w.start_element(&"g".into()).unwrap();
    w.start_element(&"path".into()).unwrap();
    w.write_attribute(&"d".into(), "M0 0").unwrap();
    w.end_element().unwrap();
    w.end_element().unwrap();
    w.start_element(&"text".into()).unwrap();
    w.set_preserve_whitespaces(true);
    w.write_text("hi").unwrap();
    w.end_element().unwrap();
    w.set_preserve_whitespaces(false);
    assert_eq!(
        written(w),
        "<svg>\n  <g>\n    <path d=\"M0 0\"/>\n  </g>\n  <text>hi</text>\n</svg>\n"
    );
}
