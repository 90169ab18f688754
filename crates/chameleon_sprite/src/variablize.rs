//! Replaces the colors and stroke widths of each icon in a sprite with CSS variables
use std::convert::Infallible;

use chameleon_ast::{
    document::Document,
    element::Element,
    visitor::{Context, Visitor},
};

use crate::{
    options::Options,
    registry::{Kind, Registry},
};

/// The `vector-effect` keeping strokes the same width when scaled
pub const NON_SCALING_STROKE: &str = "non-scaling-stroke";

/// Whether a value can be replaced with a variable.
///
/// Values that already reference a variable, or are `none`, are left as is. Anything else is
/// accepted without checking it's a valid color or length.
///
/// ```
/// use chameleon_sprite::variablize::is_valid_value;
///
/// assert!(is_valid_value("#000"));
/// assert!(is_valid_value("1.5px"));
/// assert!(!is_valid_value("none"));
/// assert!(!is_valid_value("var(--a-1, var(--a, #000))"));
/// ```
pub fn is_valid_value(raw: &str) -> bool {
    !raw.contains("var(") && raw != "none"
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// Counts of the changes made by a run
pub struct Report {
    /// The number of `fill` and `stroke` attributes rewritten
    pub colors: usize,
    /// The number of `stroke-width` attributes rewritten
    pub stroke_widths: usize,
    /// The number of color variables created, across every icon
    pub color_variables: usize,
    /// The number of stroke-width variables created, across every icon
    pub stroke_width_variables: usize,
}

/// Rewrites a sprite so each icon's colors and stroke widths can be restyled with CSS
/// variables.
///
/// Each child of the sprite's root is treated as an icon, with it's own numbering of
/// variables.
///
/// ```
/// use chameleon_ast::{element::Element, name::QualName};
/// use chameleon_sprite::{options::Options, variablize::Variablizer};
///
/// let mut path = Element::new(QualName::local("path"));
/// path.set_attribute_local("fill", "red");
/// let mut symbol = Element::new(QualName::local("symbol"));
/// symbol.append_child(path);
/// let mut svg = Element::new(QualName::local("svg"));
/// svg.append_child(symbol);
///
/// let options = Options {
///     transition: None,
///     ..Options::default()
/// };
/// let report = Variablizer::new(&options).run(&mut svg);
/// assert_eq!(report.colors, 1);
///
/// let path = svg.children().next().and_then(|symbol| symbol.children().next()).unwrap();
/// assert_eq!(
///     path.get_attribute_local("fill"),
///     Some("var(--svg-custom-color-1, var(--svg-custom-color, red))"),
/// );
/// ```
pub struct Variablizer<'o> {
    options: &'o Options,
}

impl<'o> Variablizer<'o> {
    /// Creates a variablizer for the given options
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// Rewrites every icon within the sprite's root element. The root itself is left as is.
    pub fn run(&self, root: &mut Element) -> Report {
        let mut report = Report::default();
        for icon in root.children_mut() {
            log::debug!("variablizing <{}> with new registries", icon.name);
            let mut rewriter = Rewriter::new(self.options, &mut report);
            match rewriter.start(icon) {
                Ok(()) => {}
                Err(never) => match never {},
            }
        }
        report
    }

    /// Rewrites every icon within the document's root element
    pub fn run_document(&self, document: &mut Document) -> Report {
        document
            .root_mut()
            .map(|root| self.run(root))
            .unwrap_or_default()
    }
}

struct Rewriter<'o, 'r> {
    options: &'o Options,
    colors: Registry<'o>,
    stroke_widths: Registry<'o>,
    report: &'r mut Report,
}

impl<'o, 'r> Rewriter<'o, 'r> {
    fn new(options: &'o Options, report: &'r mut Report) -> Self {
        Self {
            options,
            colors: Registry::new(
                Kind::Color {
                    preserve_original: options.colors.preserve_original,
                },
                &options.colors.naming,
            ),
            stroke_widths: Registry::new(Kind::StrokeWidth, &options.stroke_widths.naming),
            report,
        }
    }

    /// Replaces the attribute's value with it's variable, returning whether a new variable was
    /// created. Returns `None` when the attribute is absent or not replaceable.
    fn replace(element: &mut Element, name: &str, registry: &mut Registry) -> Option<bool> {
        let attr = element.attributes_mut().get_named_item_local_mut(name)?;
        if !is_valid_value(attr.value()) {
            log::debug!("skipping {name}={:?}", attr.value());
            return None;
        }
        let resolved = registry.resolve(attr.value());
        attr.set_value(resolved.reference);
        Some(resolved.minted)
    }

    fn ensure_non_scaling(element: &mut Element) {
        let vector_effect = match element.get_attribute_local("vector-effect") {
            Some(value)
                if value
                    .split_whitespace()
                    .any(|effect| effect == NON_SCALING_STROKE) =>
            {
                return;
            }
            Some(value) if !value.trim().is_empty() => format!("{value} {NON_SCALING_STROKE}"),
            _ => String::from(NON_SCALING_STROKE),
        };
        element.set_attribute_local("vector-effect", vector_effect);
    }
}

/// Appends a `transition` declaration to an inline style, separated by a space, or returns
/// `None` when the style already ends a declaration with the same transition.
fn append_transition(style: Option<&str>, transition: &str) -> Option<String> {
    let declaration = format!("transition: {transition}");
    match style {
        Some(style) if has_declaration(style, &declaration) => None,
        Some(style) if !style.trim().is_empty() => Some(format!("{style} {declaration}")),
        _ => Some(declaration),
    }
}

fn has_declaration(style: &str, declaration: &str) -> bool {
    style.match_indices(declaration).any(|(index, _)| {
        let before = &style[..index];
        let after = style[index + declaration.len()..].trim_start();
        (before.is_empty() || before.ends_with(|c: char| c == ';' || c.is_whitespace()))
            && (after.is_empty() || after.starts_with(';'))
    })
}

impl Visitor for Rewriter<'_, '_> {
    type Error = Infallible;

    fn element(&mut self, element: &mut Element, _context: &Context) -> Result<(), Self::Error> {
        if element.is_local("style") {
            return Ok(());
        }

        if self.options.colors.modifiable {
            for name in ["fill", "stroke"] {
                if let Some(minted) = Self::replace(element, name, &mut self.colors) {
                    self.report.colors += 1;
                    self.report.color_variables += usize::from(minted);
                }
            }
        }

        if self.options.stroke_widths.modifiable {
            if let Some(minted) = Self::replace(element, "stroke-width", &mut self.stroke_widths) {
                self.report.stroke_widths += 1;
                self.report.stroke_width_variables += usize::from(minted);
            }
        }

        if self.options.stroke_widths.non_scaling && element.has_attribute_local("stroke-width") {
            Self::ensure_non_scaling(element);
        }

        if let Some(transition) = &self.options.transition {
            if let Some(style) = append_transition(element.get_attribute_local("style"), transition)
            {
                element.set_attribute_local("style", style);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chameleon_ast::{parse::parse, serialize::Serialize};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::options::{Colors, StrokeWidths};

    fn no_transition() -> Options {
        Options {
            transition: None,
            ..Options::default()
        }
    }

    fn test_variablize(options: &Options, source: &str) -> anyhow::Result<(String, Report)> {
        let mut document = parse(source)?;
        let report = Variablizer::new(options).run_document(&mut document);
        Ok((document.serialize()?, report))
    }

    fn attributes_of(output: &str, local: &str) -> anyhow::Result<Vec<Option<String>>> {
        let document = parse(output)?;
        let mut values = Vec::new();
        let mut stack: Vec<&Element> = document.root().into_iter().collect();
        while let Some(element) = stack.pop() {
            if element.is_local("path") || element.is_local("circle") {
                values.push(element.get_attribute_local(local).map(String::from));
            }
            stack.extend(element.children().rev());
        }
        Ok(values)
    }

    #[test]
    fn end_to_end() -> anyhow::Result<()> {
        let (output, report) = test_variablize(
            &Options::default(),
            r##"<svg xmlns="http://www.w3.org/2000/svg"><symbol id="a"><path fill="#000" d="M0 0"/><path fill="#000" d="M1 1"/></symbol></svg>"##,
        )?;
        insta::assert_snapshot!(output, @r##"<svg xmlns="http://www.w3.org/2000/svg"><symbol id="a" style="transition: all .3s ease"><path fill="var(--svg-custom-color-1, var(--svg-custom-color, #000))" d="M0 0" style="transition: all .3s ease"/><path fill="var(--svg-custom-color-1, var(--svg-custom-color, #000))" d="M1 1" style="transition: all .3s ease"/></symbol></svg>"##);
        assert_eq!(
            report,
            Report {
                colors: 2,
                stroke_widths: 0,
                color_variables: 1,
                stroke_width_variables: 0,
            }
        );
        Ok(())
    }

    #[test]
    fn fill_and_stroke_share_variables() -> anyhow::Result<()> {
        let (output, report) = test_variablize(
            &no_transition(),
            r#"<svg><symbol id="a">
                <path fill="red" stroke="blue"/>
                <g><path stroke="red" fill="green"/></g>
            </symbol></svg>"#,
        )?;
        assert_eq!(
            attributes_of(&output, "fill")?,
            vec![
                Some(String::from("var(--svg-custom-color-1, var(--svg-custom-color, red))")),
                Some(String::from("var(--svg-custom-color-3, var(--svg-custom-color, green))")),
            ]
        );
        assert_eq!(
            attributes_of(&output, "stroke")?,
            vec![
                Some(String::from("var(--svg-custom-color-2, var(--svg-custom-color, blue))")),
                Some(String::from("var(--svg-custom-color-1, var(--svg-custom-color, red))")),
            ]
        );
        assert_eq!(report.colors, 4);
        assert_eq!(report.color_variables, 3);
        Ok(())
    }

    #[test]
    fn numbering_restarts_for_each_icon() -> anyhow::Result<()> {
        let (output, report) = test_variablize(
            &no_transition(),
            r##"<svg>
                <symbol id="a"><path fill="#111"/><path stroke-width="2"/></symbol>
                <symbol id="b"><path fill="#222"/><path stroke-width="3"/></symbol>
            </svg>"##,
        )?;
        assert_eq!(
            attributes_of(&output, "fill")?,
            vec![
                Some(String::from("var(--svg-custom-color-1, var(--svg-custom-color, #111))")),
                None,
                Some(String::from("var(--svg-custom-color-1, var(--svg-custom-color, #222))")),
                None,
            ]
        );
        assert_eq!(
            attributes_of(&output, "stroke-width")?,
            vec![
                None,
                Some(String::from(
                    "var(--svg-custom-stroke-width-1, var(--svg-custom-stroke-width, 2))"
                )),
                None,
                Some(String::from(
                    "var(--svg-custom-stroke-width-1, var(--svg-custom-stroke-width, 3))"
                )),
            ]
        );
        assert_eq!(report.color_variables, 2);
        assert_eq!(report.stroke_width_variables, 2);
        Ok(())
    }

    #[test]
    fn skips_none_and_references() -> anyhow::Result<()> {
        let (output, report) = test_variablize(
            &no_transition(),
            r#"<svg><symbol>
                <path fill="none" stroke="var(--brand)"/>
                <path fill="red" stroke-width="none"/>
            </symbol></svg>"#,
        )?;
        assert_eq!(
            attributes_of(&output, "fill")?,
            vec![
                Some(String::from("none")),
                Some(String::from("var(--svg-custom-color-1, var(--svg-custom-color, red))")),
            ]
        );
        assert_eq!(
            attributes_of(&output, "stroke")?,
            vec![Some(String::from("var(--brand)")), None]
        );
        assert_eq!(report.colors, 1);
        assert_eq!(report.stroke_widths, 0);
        assert!(!is_valid_value(
            "var(--svg-custom-color-1, var(--svg-custom-color, red))"
        ));
        Ok(())
    }

    #[test]
    fn empty_value_is_present() -> anyhow::Result<()> {
        let (output, _) = test_variablize(&no_transition(), r#"<svg><g><path fill=""/></g></svg>"#)?;
        assert_eq!(
            attributes_of(&output, "fill")?,
            vec![Some(String::from(
                "var(--svg-custom-color-1, var(--svg-custom-color, ))"
            ))]
        );
        Ok(())
    }

    #[test]
    fn preserve_original() -> anyhow::Result<()> {
        let source = r##"<svg><g><path fill="#ff0000"/></g></svg>"##;
        let options = Options {
            colors: Colors {
                preserve_original: false,
                ..Colors::default()
            },
            ..no_transition()
        };
        let (output, _) = test_variablize(&options, source)?;
        assert_eq!(
            attributes_of(&output, "fill")?,
            vec![Some(String::from(
                "var(--svg-custom-color-1, var(--svg-custom-color, currentColor))"
            ))]
        );

        let (output, _) = test_variablize(&no_transition(), source)?;
        assert_eq!(
            attributes_of(&output, "fill")?,
            vec![Some(String::from(
                "var(--svg-custom-color-1, var(--svg-custom-color, #ff0000))"
            ))]
        );
        Ok(())
    }

    #[test]
    fn non_scaling_stroke() -> anyhow::Result<()> {
        let (output, _) = test_variablize(
            &no_transition(),
            r#"<svg><g>
                <path stroke-width="2"/>
                <path stroke-width="2" vector-effect="rotate"/>
                <path stroke-width="2" vector-effect="non-scaling-stroke"/>
                <path stroke-width="2" vector-effect=""/>
                <path fill="red"/>
            </g></svg>"#,
        )?;
        assert_eq!(
            attributes_of(&output, "vector-effect")?,
            vec![
                Some(String::from("non-scaling-stroke")),
                Some(String::from("rotate non-scaling-stroke")),
                Some(String::from("non-scaling-stroke")),
                Some(String::from("non-scaling-stroke")),
                None,
            ]
        );
        Ok(())
    }

    #[test]
    fn non_scaling_without_modifiable_widths() -> anyhow::Result<()> {
        let options = Options {
            stroke_widths: StrokeWidths {
                modifiable: false,
                ..StrokeWidths::default()
            },
            ..no_transition()
        };
        let (output, report) =
            test_variablize(&options, r#"<svg><g><path stroke-width="2"/></g></svg>"#)?;
        insta::assert_snapshot!(output, @r#"<svg><g><path stroke-width="2" vector-effect="non-scaling-stroke"/></g></svg>"#);
        assert_eq!(report, Report::default());

        let options = Options {
            stroke_widths: StrokeWidths {
                non_scaling: false,
                ..StrokeWidths::default()
            },
            ..no_transition()
        };
        let (output, _) =
            test_variablize(&options, r#"<svg><g><path stroke-width="2"/></g></svg>"#)?;
        assert_eq!(attributes_of(&output, "vector-effect")?, vec![None]);
        Ok(())
    }

    #[test]
    fn disabled_colors() -> anyhow::Result<()> {
        let options = Options {
            colors: Colors {
                modifiable: false,
                ..Colors::default()
            },
            ..no_transition()
        };
        let (output, report) =
            test_variablize(&options, r#"<svg><g><path fill="red" stroke="blue"/></g></svg>"#)?;
        insta::assert_snapshot!(output, @r#"<svg><g><path fill="red" stroke="blue"/></g></svg>"#);
        assert_eq!(report.colors, 0);
        Ok(())
    }

    #[test]
    fn transition() -> anyhow::Result<()> {
        let (output, _) = test_variablize(
            &Options {
                transition: Some(String::from("fill 1s")),
                ..Options::default()
            },
            r#"<svg><g style="opacity: .5"><path style="opacity: 1;"/><circle style="  "/></g></svg>"#,
        )?;
        insta::assert_snapshot!(output, @r#"<svg><g style="opacity: .5 transition: fill 1s"><path style="opacity: 1; transition: fill 1s"/><circle style="transition: fill 1s"/></g></svg>"#);
        Ok(())
    }

    #[test]
    fn transition_appended_once() {
        let transition = "all .3s ease";
        assert_eq!(
            append_transition(Some("opacity: 1"), transition).as_deref(),
            Some("opacity: 1 transition: all .3s ease")
        );
        assert_eq!(
            append_transition(Some("opacity: 1 transition: all .3s ease"), transition),
            None
        );
        assert_eq!(
            append_transition(Some("transition: all .3s ease; opacity: 1"), transition),
            None
        );
        assert_eq!(
            append_transition(Some("transition: all .3s ease-in"), transition).as_deref(),
            Some("transition: all .3s ease-in transition: all .3s ease")
        );
        assert_eq!(
            append_transition(None, transition).as_deref(),
            Some("transition: all .3s ease")
        );
    }

    #[test]
    fn style_elements_are_skipped() -> anyhow::Result<()> {
        let (output, report) = test_variablize(
            &Options::default(),
            r#"<svg><symbol><style fill="red">.a { fill: blue }</style></symbol></svg>"#,
        )?;
        insta::assert_snapshot!(output, @r#"<svg><symbol style="transition: all .3s ease"><style fill="red">.a { fill: blue }</style></symbol></svg>"#);
        assert_eq!(report, Report::default());
        Ok(())
    }

    #[test]
    fn rerun_is_stable() -> anyhow::Result<()> {
        let source = r##"<svg><symbol><path fill="#000" stroke-width="1" vector-effect="rotate" style="opacity: 1"/></symbol></svg>"##;
        let (once, first) = test_variablize(&Options::default(), source)?;
        let (twice, second) = test_variablize(&Options::default(), &once)?;
        assert_eq!(once, twice);
        assert_eq!(first.colors, 1);
        assert_eq!(second, Report::default());
        Ok(())
    }

    #[test]
    fn root_and_top_level_text_untouched() -> anyhow::Result<()> {
        let (output, _) = test_variablize(
            &Options::default(),
            r#"<svg fill="red"><!-- icons --></svg>"#,
        )?;
        insta::assert_snapshot!(output, @r#"<svg fill="red"><!-- icons --></svg>"#);
        Ok(())
    }

    #[test]
    fn deeply_nested_icon() {
        let depth = 200_000;
        let mut element = Element::new("path".into());
        element.set_attribute_local("fill", "red");
        for _ in 0..depth {
            let mut parent = Element::new("g".into());
            parent.append_child(element);
            element = parent;
        }
        let mut root = Element::new("svg".into());
        root.append_child(element);

        let report = Variablizer::new(&Options::default()).run(&mut root);
        assert_eq!(report.colors, 1);
        drop(root);
    }
}
