//! Namespaces the ids of an icon, so that icons combined into a sprite don't conflict
use std::{collections::HashSet, convert::Infallible, sync::LazyLock};

use chameleon_ast::{
    element::Element,
    visitor::{Context, Visitor},
};
use regex::{Captures, Regex};

static REFERENCES_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(\s*(['"]?)#([^'")\s]+)(['"]?)\s*\)"#).expect("valid regex")
});

/// Prefixes each `id` within an icon with `<prefix>_`, along with the `href`, `xlink:href`,
/// and `url(#...)` references to those ids.
///
/// References to ids that aren't defined within the icon are left as is.
pub struct PrefixIds {
    prefix: String,
    ids: HashSet<String>,
}

#[derive(Default)]
struct CollectIds(HashSet<String>);

impl Visitor for CollectIds {
    type Error = Infallible;

    fn element(&mut self, element: &mut Element, _context: &Context) -> Result<(), Self::Error> {
        if let Some(id) = element.get_attribute_local("id") {
            self.0.insert(id.to_string());
        }
        Ok(())
    }
}

impl PrefixIds {
    /// Creates a visitor prefixing with the given string, usually the id of the icon.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ids: HashSet::new(),
        }
    }

    /// Prefixes the ids and references within the element and it's descendants
    pub fn apply(&mut self, root: &mut Element) {
        let mut collect = CollectIds::default();
        let result = collect.start(root).and_then(|()| {
            self.ids = collect.0;
            self.start(root)
        });
        match result {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    fn prefix_id(&self, id: &str) -> String {
        format!("{}_{id}", self.prefix)
    }

    fn prefix_reference(&self, reference: &str) -> Option<String> {
        let id = reference.strip_prefix('#')?;
        if !self.ids.contains(id) {
            return None;
        }
        Some(format!("#{}", self.prefix_id(id)))
    }
}

impl Visitor for PrefixIds {
    type Error = Infallible;

    fn element(&mut self, element: &mut Element, _context: &Context) -> Result<(), Self::Error> {
        for attr in element.attributes_mut() {
            let prefix = attr.prefix();
            let local_name = attr.local_name();

            let new_value = if prefix.is_none() && local_name == "id" {
                log::debug!("prefixing id");
                Some(self.prefix_id(attr.value()))
            } else if prefix.is_none_or(|p| p == "xlink") && local_name == "href" {
                log::debug!("prefixing reference");
                self.prefix_reference(attr.value())
            } else if attr.value().contains("url(") {
                log::debug!("prefixing url");
                let value = REFERENCES_URL.replace_all(attr.value(), |caps: &Captures| {
                    match self.prefix_reference(&format!("#{}", &caps[2])) {
                        Some(reference) => format!("url({}{reference}{})", &caps[1], &caps[3]),
                        None => caps[0].to_string(),
                    }
                });
                Some(value.into_owned())
            } else {
                None
            };

            if let Some(new_value) = new_value {
                attr.set_value(new_value);
            }
        }
        Ok(())
    }
}
