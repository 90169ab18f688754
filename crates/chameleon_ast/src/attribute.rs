use std::fmt::{self, Display};

use crate::name::QualName;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Represents one of an element's attributes.
///
/// [MDN | Attr](https://developer.mozilla.org/en-US/docs/Web/API/Attr)
pub struct Attr {
    /// The qualified name of the attribute
    pub name: QualName,
    /// The raw value of the attribute, as written in the source
    pub value: String,
}

impl Attr {
    /// Creates an attribute with the given name and value
    pub fn new(name: QualName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    /// Returns the local part of the qualified name of an attribute.
    ///
    /// [MDN | localName](https://developer.mozilla.org/en-US/docs/Web/API/Attr/localName)
    pub fn local_name(&self) -> &str {
        self.name.local_name()
    }

    /// Returns the namespace prefix of the attribute.
    ///
    /// [MDN | prefix](https://developer.mozilla.org/en-US/docs/Web/API/Attr/prefix)
    pub fn prefix(&self) -> Option<&str> {
        self.name.prefix()
    }

    /// Returns the value of the attribute.
    ///
    /// [MDN | value](https://developer.mozilla.org/en-US/docs/Web/API/Attr/value)
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Overwrites the value of the attribute with a new one, returning the old value.
    pub fn set_value(&mut self, value: impl Into<String>) -> String {
        std::mem::replace(&mut self.value, value.into())
    }
}

impl Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A collection of [Attr] objects, kept in source order.
///
/// Names are unique within the collection.
///
/// [MDN | NamedNodeMap](https://developer.mozilla.org/en-US/docs/Web/API/NamedNodeMap)
pub struct Attributes(Vec<Attr>);

impl Attributes {
    /// Creates an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of attributes stored in the collection.
    ///
    /// [MDN | length](https://developer.mozilla.org/en-US/docs/Web/API/NamedNodeMap/length)
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are any attributes stored in the collection
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an attribute corresponding to the given name.
    ///
    /// [MDN | getNamedItem](https://developer.mozilla.org/en-US/docs/Web/API/NamedNodeMap/getNamedItem)
    pub fn get_named_item(&self, name: &QualName) -> Option<&Attr> {
        self.0.iter().find(|attr| &attr.name == name)
    }

    /// See [`Attributes::get_named_item`]
    pub fn get_named_item_mut(&mut self, name: &QualName) -> Option<&mut Attr> {
        self.0.iter_mut().find(|attr| &attr.name == name)
    }

    /// Returns an attribute corresponding to the given local-name, only if the attribute has no
    /// prefix
    pub fn get_named_item_local(&self, local: &str) -> Option<&Attr> {
        self.0.iter().find(|attr| attr.name.is_local(local))
    }

    /// See [`Attributes::get_named_item_local`]
    pub fn get_named_item_local_mut(&mut self, local: &str) -> Option<&mut Attr> {
        self.0.iter_mut().find(|attr| attr.name.is_local(local))
    }

    /// Returns the attribute in the collection matching the index
    ///
    /// [MDN | item](https://developer.mozilla.org/en-US/docs/Web/API/NamedNodeMap/item)
    pub fn item(&self, index: usize) -> Option<&Attr> {
        self.0.get(index)
    }

    /// Puts the attribute into the collection. An existing attribute with the same name keeps
    /// it's position and is returned.
    ///
    /// [MDN | setNamedItem](https://developer.mozilla.org/en-US/docs/Web/API/NamedNodeMap/setNamedItem)
    pub fn set_named_item(&mut self, attr: Attr) -> Option<Attr> {
        if let Some(existing) = self.get_named_item_mut(&attr.name) {
            return Some(std::mem::replace(existing, attr));
        }
        self.0.push(attr);
        None
    }

    /// Removes the attribute with the given name
    ///
    /// [MDN | removeNamedItem](https://developer.mozilla.org/en-US/docs/Web/API/NamedNodeMap/removeNamedItem)
    pub fn remove_named_item(&mut self, name: &QualName) -> Option<Attr> {
        let index = self.0.iter().position(|attr| &attr.name == name)?;
        Some(self.0.remove(index))
    }

    /// Removes attributes that don't satisfy the predicate
    pub fn retain<F: FnMut(&Attr) -> bool>(&mut self, f: F) {
        self.0.retain(f);
    }

    /// Returns an iterator over the attributes
    pub fn iter(&self) -> std::slice::Iter<'_, Attr> {
        self.0.iter()
    }

    /// Returns an iterator over the attributes that allows modifying each value
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Attr> {
        self.0.iter_mut()
    }
}

impl FromIterator<Attr> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attr>>(iter: T) -> Self {
        let mut attributes = Self::new();
        for attr in iter {
            attributes.set_named_item(attr);
        }
        attributes
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attr;
    type IntoIter = std::slice::Iter<'a, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut Attributes {
    type Item = &'a mut Attr;
    type IntoIter = std::slice::IterMut<'a, Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl IntoIterator for Attributes {
    type Item = Attr;
    type IntoIter = std::vec::IntoIter<Attr>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[test]
fn set_named_item_keeps_position() {
    let mut attributes: Attributes = [
        Attr::new("fill".into(), "red"),
        Attr::new("d".into(), "M0 0"),
    ]
    .into_iter()
    .collect();

    let old = attributes.set_named_item(Attr::new("fill".into(), "blue"));
    assert_eq!(old.map(|attr| attr.value), Some(String::from("red")));
    assert_eq!(attributes.item(0).map(Attr::value), Some("blue"));

    assert!(attributes
        .set_named_item(Attr::new("stroke".into(), ""))
        .is_none());
    assert_eq!(attributes.len(), 3);
    assert_eq!(
        attributes.get_named_item_local("stroke").map(Attr::value),
        Some("")
    );
}

#[test]
fn local_lookup_ignores_prefixed() {
    let attributes: Attributes = [Attr::new("xlink:href".into(), "#a")].into_iter().collect();
    assert!(attributes.get_named_item_local("href").is_none());
    assert!(attributes
        .get_named_item(&QualName::parse("xlink:href"))
        .is_some());
}
