//! Non-empty lists.
//!
//! Accumulating validation reports "one or more" problems. `NonEmpty<T>`
//! makes the "one" part a type-level guarantee: there is no way to build
//! an empty one, so a failed validation can never carry zero violations.

use std::ops::Index;

use smallvec::SmallVec;

/// A list with at least one element.
///
/// SmallVec keeps the common case (one or two entries) off the heap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NonEmpty<T> {
    items: SmallVec<[T; 2]>,
}

impl<T> NonEmpty<T> {
    /// Create a list holding a single element.
    #[must_use]
    pub fn one(item: T) -> Self {
        let mut items = SmallVec::new();
        items.push(item);
        Self { items }
    }

    /// Build from a `Vec`, returning `None` if it is empty.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Option<Self> {
        if items.is_empty() {
            None
        } else {
            Some(Self {
                items: SmallVec::from_vec(items),
            })
        }
    }

    /// Append an element.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// The first element. Always present.
    #[must_use]
    pub fn first(&self) -> &T {
        &self.items[0]
    }

    /// Number of elements (never zero).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; present for API symmetry with other collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_vec()
    }
}

impl<T> Index<usize> for NonEmpty<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IntoIterator for NonEmpty<T> {
    type Item = T;
    type IntoIter = smallvec::IntoIter<[T; 2]>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a NonEmpty<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
