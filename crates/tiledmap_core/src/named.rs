//! Ordered collections keyed by element name.

use crate::error::{MapError, Result};

/// Anything stored in a [`NamedList`].
pub trait Named {
    fn name(&self) -> &str;
}

/// Insertion-ordered collection whose items are keyed by their [`Named::name`].
///
/// Names are unique; inserting a second item with a taken name fails with
/// [`MapError::DuplicateKey`] and leaves the list untouched. Lookups are linear,
/// which is fine for the handful of tilesets, layers or properties a map carries.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedList<T> {
    items: Vec<T>,
}

impl<T> Default for NamedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Named> NamedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item`, rejecting duplicate names.
    pub fn insert(&mut self, item: T) -> Result<()> {
        if self.contains(item.name()) {
            return Err(MapError::DuplicateKey(item.name().to_string()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Append without the uniqueness check; the caller has already looked the name up.
    pub(crate) fn push_unchecked(&mut self, item: T) {
        debug_assert!(!self.contains(item.name()));
        self.items.push(item);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.items.iter().find(|item| item.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.name() == name)
    }

    /// Remove and return the item called `name`, keeping the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<T> {
        let index = self.position(name)?;
        Some(self.items.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(Named::name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name() == name)
    }
}

impl<'a, T> IntoIterator for &'a NamedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> IntoIterator for NamedList<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
