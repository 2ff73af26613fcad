//! Hash-bucketed multimap of interned strings.
//!
//! A [`Table`] maps a 32-bit content hash to every string stored under it.
//! Collisions are resolved by a linear scan of the bucket. Tables are only
//! reachable through the [`InternTable`](crate::InternTable) lock guard, so
//! holding a `&Table` or `&mut Table` implies the table-wide lock is held.

use rustc_hash::FxHashMap;
use tern_common::StrRef;

#[derive(Debug, Default)]
pub(crate) struct Table {
    buckets: FxHashMap<u32, Vec<StrRef>>,
    len: usize,
}

impl Table {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            len: 0,
        }
    }

    /// First entry under `hash_code` that is value-equal to `s`.
    pub(crate) fn lookup(&self, s: &StrRef, hash_code: u32) -> Option<StrRef> {
        self.buckets
            .get(&hash_code)?
            .iter()
            .find(|existing| existing.equals(s))
            .cloned()
    }

    /// Add `s` under `hash_code` without checking for duplicates.
    pub(crate) fn insert(&mut self, s: StrRef, hash_code: u32) -> StrRef {
        self.buckets.entry(hash_code).or_default().push(s.clone());
        self.len += 1;
        s
    }

    /// Remove the entry that is the same object as `s`, if any.
    pub(crate) fn remove(&mut self, s: &StrRef, hash_code: u32) {
        let Some(bucket) = self.buckets.get_mut(&hash_code) else {
            return;
        };
        if let Some(index) = bucket.iter().position(|existing| StrRef::ptr_eq(existing, s)) {
            bucket.swap_remove(index);
            self.len -= 1;
            if bucket.is_empty() {
                self.buckets.remove(&hash_code);
            }
        }
    }

    /// True if `s` itself, not merely an equal value, is stored here.
    pub(crate) fn contains_identity(&self, s: &StrRef, hash_code: u32) -> bool {
        self.buckets
            .get(&hash_code)
            .is_some_and(|bucket| bucket.iter().any(|existing| StrRef::ptr_eq(existing, s)))
    }

    /// Keep only the entries for which `keep` returns true. `keep` is called
    /// exactly once per entry. Returns the number of entries removed.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&StrRef) -> bool) -> usize {
        let before = self.len;
        self.buckets.retain(|_, bucket| {
            bucket.retain(|s| keep(s));
            !bucket.is_empty()
        });
        self.len = self.buckets.values().map(Vec::len).sum();
        before - self.len
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &StrRef> {
        self.buckets.values().flatten()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
