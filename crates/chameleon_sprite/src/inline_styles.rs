//! Moves the rules of `<style>` elements onto the elements they match, so that colors set by
//! a stylesheet become attributes that can be variablized.
use std::{collections::BTreeMap, convert::Infallible};

use chameleon_ast::{
    element::Element,
    node::Node,
    visitor::{Context, Visitor},
};
use phf::phf_set;
use simplecss::{AttributeOperator, DeclarationTokenizer, PseudoClass, StyleSheet};

/// Properties which have an equivalent presentation attribute
pub static PRESENTATION_PROPERTIES: phf::Set<&'static str> = phf_set! {
    "alignment-baseline",
    "baseline-shift",
    "clip",
    "clip-path",
    "clip-rule",
    "color",
    "color-interpolation",
    "color-interpolation-filters",
    "color-profile",
    "color-rendering",
    "cursor",
    "direction",
    "display",
    "dominant-baseline",
    "enable-background",
    "fill",
    "fill-opacity",
    "fill-rule",
    "filter",
    "flood-color",
    "flood-opacity",
    "font-family",
    "font-size",
    "font-size-adjust",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "glyph-orientation-horizontal",
    "glyph-orientation-vertical",
    "image-rendering",
    "kerning",
    "letter-spacing",
    "lighting-color",
    "marker-end",
    "marker-mid",
    "marker-start",
    "mask",
    "opacity",
    "overflow",
    "paint-order",
    "pointer-events",
    "shape-rendering",
    "stop-color",
    "stop-opacity",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "text-anchor",
    "text-decoration",
    "text-rendering",
    "unicode-bidi",
    "vector-effect",
    "visibility",
    "word-spacing",
    "writing-mode",
};

#[derive(Debug, Clone, Copy)]
/// Inlines the rules of `<style>` elements into the `style` of each matching element, then
/// converts presentation properties of each `style` into attributes.
///
/// Declarations already in an element's `style` take precedence over the stylesheet, unless
/// the stylesheet's declaration is `!important`.
///
/// ```
/// use chameleon_ast::{parse::parse, serialize::Serialize};
/// use chameleon_sprite::inline_styles::InlineStyles;
///
/// let mut document = parse(
///     r#"<svg><style>.a { fill: red; cursor: none }</style><path class="a"/></svg>"#,
/// ).unwrap();
/// InlineStyles::default().apply(document.root_mut().unwrap());
/// assert_eq!(
///     document.serialize().unwrap(),
///     r#"<svg><path class="a" fill="red" cursor="none"/></svg>"#,
/// );
/// ```
pub struct InlineStyles {
    /// Whether a `<style>` element is removed once every one of it's rules were inlined.
    ///
    /// Stylesheets with at-rules are always kept.
    pub remove_matched_styles: bool,
}

impl Default for InlineStyles {
    fn default() -> Self {
        Self {
            remove_matched_styles: true,
        }
    }
}

struct Entry<'a> {
    element: &'a Element,
    parent: Option<usize>,
    prev_sibling: Option<usize>,
    /// The position of the element within it's parent's nodes
    position: usize,
}

#[derive(Clone, Copy)]
struct Scope<'a> {
    entries: &'a [Entry<'a>],
    index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    name: String,
    value: String,
    important: bool,
}

impl InlineStyles {
    /// Inlines the styles of the given element and it's descendants
    pub fn apply(&self, root: &mut Element) {
        let (styles, removable) = {
            let entries = flatten(root);
            let (matched, removable) = self.match_rules(&entries);
            let styles: Vec<_> = matched
                .into_iter()
                .map(|(index, declarations)| (path(&entries, index), declarations))
                .collect();
            let mut removable: Vec<_> = removable
                .into_iter()
                .map(|index| path(&entries, index))
                .collect();
            removable.sort_unstable_by(|a, b| b.cmp(a));
            (styles, removable)
        };

        for (path, declarations) in styles {
            let Some(element) = element_at_mut(root, &path) else {
                continue;
            };
            let inline: Vec<Declaration> = element
                .get_attribute_local("style")
                .map(parse_declarations)
                .unwrap_or_default();
            let style = cascade(declarations, inline);
            element.set_attribute_local("style", serialize_declarations(&style));
        }

        for path in removable {
            let Some((position, parent)) = path.split_last() else {
                continue;
            };
            if let Some(parent) = element_at_mut(root, parent) {
                log::debug!("removing inlined style element");
                parent.children.remove(*position);
            }
        }

        match StyleToAttrs.start(root) {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Returns the declarations for each matched element, in ascending order of precedence,
    /// along with the style elements that can be removed.
    fn match_rules(&self, entries: &[Entry<'_>]) -> (BTreeMap<usize, Vec<Declaration>>, Vec<usize>) {
        let mut matched: BTreeMap<usize, Vec<(([u8; 3], usize), Declaration)>> = BTreeMap::new();
        let mut removable = Vec::new();
        let mut order = 0;

        for (style_index, entry) in entries.iter().enumerate() {
            if !is_css_style(entry.element) {
                continue;
            }
            let css = entry.element.text_content();
            let stylesheet = StyleSheet::parse(&css);
            let mut all_matched = true;

            for rule in &stylesheet.rules {
                order += 1;
                let specificity = rule.selector.specificity();
                let mut rule_matched = false;
                for index in 0..entries.len() {
                    if !rule.selector.matches(&Scope { entries, index }) {
                        continue;
                    }
                    rule_matched = true;
                    matched.entry(index).or_default().extend(
                        rule.declarations.iter().map(|declaration| {
                            (
                                (specificity, order),
                                Declaration {
                                    name: declaration.name.to_string(),
                                    value: declaration.value.to_string(),
                                    important: declaration.important,
                                },
                            )
                        }),
                    );
                }
                if !rule_matched {
                    log::debug!("a rule of the stylesheet matched no elements");
                    all_matched = false;
                }
            }

            let has_content = !stylesheet.rules.is_empty() || css.trim().is_empty();
            if self.remove_matched_styles && all_matched && has_content && !css.contains('@') {
                removable.push(style_index);
            }
        }

        let matched = matched
            .into_iter()
            .map(|(index, mut declarations)| {
                declarations.sort_by_key(|(precedence, _)| *precedence);
                (
                    index,
                    declarations
                        .into_iter()
                        .map(|(_, declaration)| declaration)
                        .collect(),
                )
            })
            .collect();
        (matched, removable)
    }
}

fn is_css_style(element: &Element) -> bool {
    element.is_local("style")
        && element
            .get_attribute_local("type")
            .is_none_or(|kind| kind.is_empty() || kind == "text/css")
}

/// Lists every element of the tree, with the relations needed to match selectors
fn flatten(root: &Element) -> Vec<Entry<'_>> {
    let mut entries = vec![Entry {
        element: root,
        parent: None,
        prev_sibling: None,
        position: 0,
    }];
    let mut stack = vec![0];
    while let Some(index) = stack.pop() {
        let element = entries[index].element;
        let first_child = entries.len();
        let mut prev_sibling = None;
        for (position, child) in element.children.iter().enumerate() {
            let Node::Element(child) = child else {
                continue;
            };
            entries.push(Entry {
                element: child,
                parent: Some(index),
                prev_sibling,
                position,
            });
            prev_sibling = Some(entries.len() - 1);
        }
        stack.extend(first_child..entries.len());
    }
    entries
}

/// The positions leading from the root to the entry
fn path(entries: &[Entry<'_>], mut index: usize) -> Vec<usize> {
    let mut path = Vec::new();
    while let Some(parent) = entries[index].parent {
        path.push(entries[index].position);
        index = parent;
    }
    path.reverse();
    path
}

fn element_at_mut<'e>(root: &'e mut Element, path: &[usize]) -> Option<&'e mut Element> {
    path.iter()
        .try_fold(root, |element, position| element.children.get_mut(*position)?.element_mut())
}

/// Applies the inline declarations over the stylesheet's, keeping the first position of each
/// property.
fn cascade(stylesheet: Vec<Declaration>, inline: Vec<Declaration>) -> Vec<Declaration> {
    let (important, normal): (Vec<_>, Vec<_>) =
        stylesheet.into_iter().partition(|declaration| declaration.important);

    let mut result: Vec<Declaration> = Vec::new();
    for declaration in normal.into_iter().chain(important) {
        upsert(&mut result, declaration);
    }
    for declaration in inline {
        let overridden = result.iter().any(|existing| {
            existing.name == declaration.name && existing.important && !declaration.important
        });
        if !overridden {
            upsert(&mut result, declaration);
        }
    }
    result
}

fn upsert(declarations: &mut Vec<Declaration>, declaration: Declaration) {
    match declarations
        .iter_mut()
        .find(|existing| existing.name == declaration.name)
    {
        Some(existing) => *existing = declaration,
        None => declarations.push(declaration),
    }
}

fn parse_declarations(style: &str) -> Vec<Declaration> {
    DeclarationTokenizer::from(style)
        .map(|declaration| Declaration {
            name: declaration.name.to_string(),
            value: declaration.value.to_string(),
            important: declaration.important,
        })
        .collect()
}

fn serialize_declarations(declarations: &[Declaration]) -> String {
    declarations
        .iter()
        .map(|declaration| {
            if declaration.important {
                format!("{}:{}!important", declaration.name, declaration.value)
            } else {
                format!("{}:{}", declaration.name, declaration.value)
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

/// Moves presentation properties out of `style` and into attributes
struct StyleToAttrs;

impl Visitor for StyleToAttrs {
    type Error = Infallible;

    fn element(&mut self, element: &mut Element, _context: &Context) -> Result<(), Self::Error> {
        let Some(style) = element.get_attribute_local("style") else {
            return Ok(());
        };
        let (attrs, remaining): (Vec<_>, Vec<_>) =
            parse_declarations(style)
                .into_iter()
                .partition(|declaration| {
                    !declaration.important
                        && PRESENTATION_PROPERTIES.contains(declaration.name.as_str())
                });
        if attrs.is_empty() && !style.trim().is_empty() {
            return Ok(());
        }

        for declaration in attrs {
            element.set_attribute_local(&declaration.name, declaration.value);
        }
        if remaining.is_empty() {
            element.remove_attribute_local("style");
        } else {
            element.set_attribute_local("style", serialize_declarations(&remaining));
        }
        Ok(())
    }
}

impl simplecss::Element for Scope<'_> {
    fn parent_element(&self) -> Option<Self> {
        self.entries[self.index].parent.map(|index| Self {
            entries: self.entries,
            index,
        })
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.entries[self.index].prev_sibling.map(|index| Self {
            entries: self.entries,
            index,
        })
    }

    fn has_local_name(&self, name: &str) -> bool {
        self.entries[self.index].element.local_name() == name
    }

    fn attribute_matches(&self, local_name: &str, operator: AttributeOperator<'_>) -> bool {
        self.entries[self.index]
            .element
            .get_attribute_local(local_name)
            .is_some_and(|value| operator.matches(value))
    }

    fn pseudo_class_matches(&self, class: PseudoClass<'_>) -> bool {
        match class {
            PseudoClass::FirstChild => self.entries[self.index].prev_sibling.is_none(),
            _ => false,
        }
    }
}
