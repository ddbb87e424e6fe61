//! The "more interesting" field merge policy.
//!
//! Reconciliation folds source records left to right. At each step a scalar field keeps its
//! current value unless the candidate is present, in which case the candidate wins. Sources must
//! therefore be supplied in ascending order of authority. Collection fields are never resolved to a
//! single winner; they are unioned and de-duplicated by a per-entity key, preserving first-seen
//! order.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Chooses between the `current` value of a field and a `candidate` from a later source.
#[inline]
pub fn more_interesting<T>(current: Option<T>, candidate: Option<T>) -> Option<T> {
    match candidate {
        Some(candidate) => Some(candidate),
        None => current,
    }
}

/// A record that can absorb a later observation of the same entity.
pub trait Combine: Sized {
    fn combine(self, candidate: Self) -> Self;
}

impl<T: Combine> Combine for Option<T> {
    fn combine(self, candidate: Self) -> Self {
        match (self, candidate) {
            (Some(current), Some(candidate)) => Some(current.combine(candidate)),
            (current, None) => current,
            (None, candidate) => candidate,
        }
    }
}

/// Folds `records` through [Combine] in iteration order. Returns `None` if there are no records.
pub fn reduce_fields<T: Combine>(records: impl IntoIterator<Item = T>) -> Option<T> {
    records.into_iter().reduce(Combine::combine)
}

/// Unions two collections keyed by `key`. Elements sharing a key are resolved with `merge`, which is
/// given the earlier element first. The result is in first-seen key order.
pub fn union_by<T, K, F, M>(current: Vec<T>, candidate: Vec<T>, key: F, merge: M) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
    M: Fn(T, T) -> T,
{
    let mut slots: Vec<Option<T>> = Vec::with_capacity(current.len() + candidate.len());
    let mut index: FxHashMap<K, usize> = FxHashMap::default();
    for item in current.into_iter().chain(candidate) {
        let item_key = key(&item);
        match index.get(&item_key) {
            Some(&existing) => {
                let slot = &mut slots[existing];
                *slot = match slot.take() {
                    Some(earlier) => Some(merge(earlier, item)),
                    None => Some(item),
                };
            }
            None => {
                index.insert(item_key, slots.len());
                slots.push(Some(item));
            }
        }
    }
    slots.into_iter().flatten().collect()
}

/// Unions two collections keyed by `key`, keeping the first-seen element of each key.
pub fn distinct_by<T, K, F>(current: Vec<T>, candidate: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    union_by(current, candidate, key, |first, _| first)
}
