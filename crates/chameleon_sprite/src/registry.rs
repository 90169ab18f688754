//! Assigns each distinct value within an icon it's own CSS variable
use std::collections::HashMap;

/// The fallback for colors when the original isn't preserved
pub const CURRENT_COLOR: &str = "currentColor";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The kind of value held by a registry, which decides the literal fallback of each variable
pub enum Kind {
    /// Values of `fill` and `stroke`
    Color {
        /// Whether the fallback is the original value, or otherwise [`CURRENT_COLOR`]
        preserve_original: bool,
    },
    /// Values of `stroke-width`, which always fall back to the original value
    StrokeWidth,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// The variable reference for a value
pub struct Resolved {
    /// The `var(...)` expression to replace the value with
    pub reference: String,
    /// Whether the reference was created for this value, rather than reused
    pub minted: bool,
}

#[derive(Debug)]
/// A table of the values seen so far and the variable each was assigned.
///
/// The `n`th distinct value is assigned
/// `var(--<naming>-<n>, var(--<naming>, <fallback>))`, so that a page can restyle the one
/// value within one icon, or every icon sharing the fallback, or neither.
pub struct Registry<'a> {
    kind: Kind,
    naming: &'a str,
    entries: HashMap<String, String>,
}

impl<'a> Registry<'a> {
    /// Creates an empty registry
    pub fn new(kind: Kind, naming: &'a str) -> Self {
        Self {
            kind,
            naming,
            entries: HashMap::new(),
        }
    }

    /// The number of distinct values registered
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no value has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the reference assigned to the exact raw value, if any
    pub fn get(&self, raw: &str) -> Option<&str> {
        self.entries.get(raw).map(String::as_str)
    }

    /// Returns the reference for the raw value, assigning the next numbered variable when the
    /// value hasn't been seen before.
    pub fn resolve(&mut self, raw: &str) -> Resolved {
        if let Some(reference) = self.entries.get(raw) {
            return Resolved {
                reference: reference.clone(),
                minted: false,
            };
        }

        let fallback = match self.kind {
            Kind::Color {
                preserve_original: false,
            } => CURRENT_COLOR,
            Kind::Color { .. } | Kind::StrokeWidth => raw,
        };
        let reference = variable(self.naming, self.entries.len() + 1, fallback);
        log::debug!("assigned {reference} to {raw:?}");
        self.entries.insert(raw.to_string(), reference.clone());
        Resolved {
            reference,
            minted: true,
        }
    }
}

/// Formats a variable reference with a two-level fallback
pub fn variable(naming: &str, index: usize, fallback: &str) -> String {
    format!("var(--{naming}-{index}, var(--{naming}, {fallback}))")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_distinct_values() {
        let mut registry = Registry::new(
            Kind::Color {
                preserve_original: true,
            },
            "svg-custom-color",
        );
        let first = registry.resolve("#000");
        assert!(first.minted);
        assert_eq!(
            first.reference,
            "var(--svg-custom-color-1, var(--svg-custom-color, #000))"
        );

        let second = registry.resolve("red");
        assert_eq!(
            second.reference,
            "var(--svg-custom-color-2, var(--svg-custom-color, red))"
        );

        let again = registry.resolve("#000");
        assert!(!again.minted);
        assert_eq!(again.reference, first.reference);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let mut registry = Registry::new(Kind::StrokeWidth, "w");
        registry.resolve("RED");
        assert!(registry.resolve("red").minted);
        assert_eq!(registry.get("red"), Some("var(--w-2, var(--w, red))"));
    }

    #[test]
    fn fallback_by_kind() {
        let mut colors = Registry::new(
            Kind::Color {
                preserve_original: false,
            },
            "c",
        );
        assert_eq!(
            colors.resolve("#ff0000").reference,
            "var(--c-1, var(--c, currentColor))"
        );

        let mut widths = Registry::new(Kind::StrokeWidth, "w");
        assert_eq!(widths.resolve("2px").reference, "var(--w-1, var(--w, 2px))");
    }
}
