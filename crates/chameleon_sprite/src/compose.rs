//! Combines icons into a single sprite, with each icon as a `<symbol>`
use std::{collections::HashSet, fmt::Display, path::Path};

use chameleon_ast::{document::Document, element::Element, name::QualName};

use crate::{inline_styles::InlineStyles, prefix_ids::PrefixIds};

/// The namespace of SVG elements
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Attributes of an icon's root which don't carry over to it's symbol
const DROPPED_ROOT_ATTRIBUTES: [&str; 7] = ["xmlns", "version", "x", "y", "width", "height", "id"];

#[derive(Debug)]
/// The errors which may occur while composing a sprite
pub enum ComposeError {
    /// The icon's document doesn't contain an element
    MissingRoot {
        /// The id of the icon
        id: String,
    },
    /// Two icons were given the same id
    DuplicateId {
        /// The id shared by the icons
        id: String,
    },
    #[cfg(feature = "parse")]
    /// The icon couldn't be parsed
    Parse {
        /// The id of the icon
        id: String,
        /// The reason the icon couldn't be parsed
        error: chameleon_ast::parse::ParseError,
    },
}

#[derive(Debug, Clone)]
/// A single icon to be added to the sprite
pub struct Icon {
    /// The id of the icon's symbol, which is also used to namespace the ids within it
    pub id: String,
    /// The icon's document
    pub document: Document,
}

impl Icon {
    /// Creates an icon from it's parsed document
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self {
            id: id.into(),
            document,
        }
    }

    /// Parses an icon from source text
    ///
    /// # Errors
    ///
    /// If the source is not well-formed XML
    #[cfg(feature = "parse")]
    pub fn parse(id: impl Into<String>, source: &str) -> Result<Self, ComposeError> {
        let id = id.into();
        match chameleon_ast::parse::parse(source) {
            Ok(document) => Ok(Self { id, document }),
            Err(error) => Err(ComposeError::Parse { id, error }),
        }
    }

    /// Derives an id from the file name of the path, with whitespace replaced by `-`.
    ///
    /// ```
    /// use std::path::Path;
    /// use chameleon_sprite::compose::Icon;
    ///
    /// assert_eq!(Icon::id_from_path(Path::new("icons/arrow left.svg")).as_deref(), Some("arrow-left"));
    /// ```
    pub fn id_from_path(path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        Some(stem.split_whitespace().collect::<Vec<_>>().join("-"))
    }
}

#[derive(Debug, Clone, Copy, Default)]
/// Builds a sprite from a list of icons.
///
/// The sprite is an invisible `<svg>` of `<symbol>` elements, which can be drawn with
/// `<use href="#<id>"/>`.
pub struct Composer {
    /// How each icon's stylesheets are inlined before it's added to the sprite
    pub inline_styles: InlineStyles,
}

impl Composer {
    /// Creates a sprite containing each of the icons, in order
    ///
    /// # Errors
    ///
    /// If an icon has no root element, or it's id was already used
    pub fn compose(&self, icons: Vec<Icon>) -> Result<Document, ComposeError> {
        let mut root = Element::new(QualName::local("svg"));
        root.set_attribute_local("xmlns", SVG_NAMESPACE);
        let mut symbols = Vec::with_capacity(icons.len());
        let mut ids = HashSet::new();

        for Icon { id, document } in icons {
            if !ids.insert(id.clone()) {
                return Err(ComposeError::DuplicateId { id });
            }
            let Some(mut icon) = document.into_root() else {
                return Err(ComposeError::MissingRoot { id });
            };
            log::debug!("adding {id} to sprite");

            self.inline_styles.apply(&mut icon);
            PrefixIds::new(id.as_str()).apply(&mut icon);

            for attr in icon.attributes() {
                if attr.prefix() == Some("xmlns")
                    && root.get_attribute(&attr.name).is_none()
                {
                    root.set_attribute(attr.name.clone(), attr.value());
                }
            }
            symbols.push(symbol(id, icon));
        }

        root.set_attribute_local("width", "0");
        root.set_attribute_local("height", "0");
        root.set_attribute_local("style", "position:absolute");
        for symbol in symbols {
            root.append_child(symbol);
        }
        Ok(Document::new(root))
    }
}

fn symbol(id: String, mut icon: Element) -> Element {
    let mut symbol = Element::new(QualName::local("symbol"));
    symbol.set_attribute_local("id", id);
    for attr in icon.attributes() {
        let dropped = attr.prefix() == Some("xmlns")
            || (attr.prefix().is_none() && DROPPED_ROOT_ATTRIBUTES.contains(&attr.local_name()));
        if !dropped {
            symbol.set_attribute(attr.name.clone(), attr.value());
        }
    }

    if !symbol.has_attribute_local("viewBox") {
        let width = icon.get_attribute_local("width").and_then(dimension);
        let height = icon.get_attribute_local("height").and_then(dimension);
        if let (Some(width), Some(height)) = (width, height) {
            symbol.set_attribute_local("viewBox", format!("0 0 {width} {height}"));
        }
    }

    symbol.children = std::mem::take(&mut icon.children);
    symbol
}

/// Returns a unitless or pixel length without it's unit
fn dimension(value: &str) -> Option<&str> {
    let number = value.trim().strip_suffix("px").unwrap_or(value.trim());
    number.parse::<f64>().ok().filter(|n| n.is_finite())?;
    Some(number)
}

impl Display for ComposeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRoot { id } => write!(f, "The icon `{id}` has no root element"),
            Self::DuplicateId { id } => {
                write!(f, "More than one icon would have the id `{id}`")
            }
            #[cfg(feature = "parse")]
            Self::Parse { id, error } => write!(f, "Failed to parse the icon `{id}`: {error}"),
        }
    }
}

impl std::error::Error for ComposeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "parse")]
            Self::Parse { error, .. } => Some(error),
            _ => None,
        }
    }
}

#[cfg(all(test, feature = "parse"))]
mod tests {
    use chameleon_ast::serialize::{Indent, Options, Serialize};

    use super::*;

    fn test_compose(icons: &[(&str, &str)]) -> anyhow::Result<String> {
        let icons = icons
            .iter()
            .map(|(id, source)| Icon::parse(*id, source))
            .collect::<Result<Vec<_>, _>>()?;
        let sprite = Composer::default().compose(icons)?;
        Ok(sprite.serialize_with_options(Options {
            indent: Indent::Spaces(2),
            ..Options::default()
        })?)
    }

    #[test]
    fn composes_symbols() -> anyhow::Result<()> {
        insta::assert_snapshot!(test_compose(&[
            (
                "home",
                r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" version="1.1" width="24" height="24" viewBox="0 0 24 24" fill="none"><path id="roof" d="M0 0"/><use xlink:href="#roof"/></svg>"##,
            ),
            (
                "arrow",
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="16px" height="12"><style>path { stroke: red }</style><path d="M1 1"/></svg>"#,
            ),
        ])?.trim_end(), @r##"
        <svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="0" height="0" style="position:absolute">
          <symbol id="home" viewBox="0 0 24 24" fill="none">
            <path id="home_roof" d="M0 0"/>
            <use xlink:href="#home_roof"/>
          </symbol>
          <symbol id="arrow" viewBox="0 0 16 12">
            <path d="M1 1" stroke="red"/>
          </symbol>
        </svg>
        "##);
        Ok(())
    }

    #[test]
    fn rejects_duplicate_ids() -> anyhow::Result<()> {
        let icons = vec![Icon::parse("a", "<svg/>")?, Icon::parse("a", "<svg/>")?];
        assert!(matches!(
            Composer::default().compose(icons),
            Err(ComposeError::DuplicateId { id }) if id == "a"
        ));
        assert!(matches!(
            Composer::default().compose(vec![Icon::new("b", Document::default())]),
            Err(ComposeError::MissingRoot { id }) if id == "b"
        ));
        Ok(())
    }

    #[test]
    fn ids_from_paths() {
        assert_eq!(
            Icon::id_from_path(Path::new("a/b/chevron  down.svg")).as_deref(),
            Some("chevron-down")
        );
        assert_eq!(Icon::id_from_path(Path::new("")), None);
    }

    #[test]
    fn dimensions() {
        assert_eq!(dimension("24"), Some("24"));
        assert_eq!(dimension(" 1.5px "), Some("1.5"));
        assert_eq!(dimension("100%"), None);
        assert_eq!(dimension("2em"), None);
    }
}
