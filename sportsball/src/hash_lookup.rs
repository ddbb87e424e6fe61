//! An insertion-ordered, bidirectional index between items and their positions.

use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::hash::Hash;
use std::ops::Index;

#[derive(Debug, Clone)]
pub struct HashLookup<T: Eq + PartialEq + Hash> {
    item_to_index: FxHashMap<T, usize>,
    index_to_item: Vec<T>,
}
impl<T: Eq + PartialEq + Hash> HashLookup<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        let item_to_index = FxHashMap::with_capacity_and_hasher(capacity, Default::default());
        let index_to_item = Vec::with_capacity(capacity);
        Self {
            item_to_index,
            index_to_item,
        }
    }

    /// Appends a new item, returning its index.
    ///
    /// # Panics
    /// If the item is already present.
    pub fn push(&mut self, item: T) -> usize
    where
        T: Clone,
    {
        let index = self.index_to_item.len();
        if let Some(existing) = self.item_to_index.insert(item.clone(), index) {
            self.item_to_index.insert(item, existing);
            panic!("duplicate item at index {index}, previously at {existing}")
        }
        self.index_to_item.push(item);
        index
    }

    /// Returns the index of `item`, appending it first if it has not been seen.
    pub fn index_or_push(&mut self, item: T) -> usize
    where
        T: Clone,
    {
        match self.index_of(&item) {
            Some(index) => index,
            None => self.push(item),
        }
    }

    pub fn item_at(&self, index: usize) -> Option<&T> {
        self.index_to_item.get(index)
    }

    pub fn index_of<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.item_to_index.get(item).copied()
    }

    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.item_to_index.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.index_to_item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index_to_item.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.index_to_item
    }
}

impl<T: Eq + PartialEq + Hash> Default for HashLookup<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: Eq + PartialEq + Hash> Index<usize> for HashLookup<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.item_at(index)
            .unwrap_or_else(|| panic!("no item at index {index}"))
    }
}

impl<T: Eq + PartialEq + Hash + Clone> From<Vec<T>> for HashLookup<T> {
    fn from(items: Vec<T>) -> Self {
        let mut lookup = Self::with_capacity(items.len());
        for item in items {
            lookup.push(item);
        }
        lookup
    }
}
