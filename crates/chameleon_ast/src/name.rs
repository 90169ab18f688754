//! Qualified names of elements and attributes
use std::fmt::{self, Display};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A name with an optional namespace prefix, such as `xlink:href` or `fill`.
pub struct QualName {
    /// The namespace prefix, without the trailing colon
    pub prefix: Option<String>,
    /// The local part of the name
    pub local: String,
}

impl QualName {
    /// Creates a qualified name from it's parts
    pub fn new(prefix: Option<String>, local: String) -> Self {
        Self { prefix, local }
    }

    /// Creates a name without a prefix
    pub fn local(local: impl Into<String>) -> Self {
        Self {
            prefix: None,
            local: local.into(),
        }
    }

    /// Splits a name like `prefix:local` into it's parts
    pub fn parse(name: &str) -> Self {
        match name.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() => {
                Self::new(Some(prefix.to_string()), local.to_string())
            }
            _ => Self::local(name),
        }
    }

    /// Returns the local part of the name
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Returns the prefix of the name
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Whether the name is unprefixed and has the given local part
    pub fn is_local(&self, local: &str) -> bool {
        self.prefix.is_none() && self.local == local
    }
}

impl From<&str> for QualName {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[test]
fn parse_qual_name() {
    let name = QualName::parse("xlink:href");
    assert_eq!(name.prefix(), Some("xlink"));
    assert_eq!(name.local_name(), "href");
    assert_eq!(name.to_string(), "xlink:href");

    let name = QualName::parse("stroke-width");
    assert!(name.is_local("stroke-width"));
    assert_eq!(name.to_string(), "stroke-width");

    assert!(QualName::parse(":odd").is_local(":odd"));
}
