//! Capabilities the intern table exchanges with the garbage collector.

use rustc_hash::FxHashSet;
use tern_common::StrRef;

/// Receives every reference the intern table keeps alive.
///
/// Called with the table lock held; implementations must not call back
/// into the [`InternTable`](crate::InternTable).
pub trait RootVisitor {
    fn visit_root(&mut self, root: &StrRef);
}

impl<F: FnMut(&StrRef)> RootVisitor for F {
    fn visit_root(&mut self, root: &StrRef) {
        self(root)
    }
}

/// Liveness oracle consulted once per weak entry during a sweep.
///
/// Called with the table lock held. Must not block and must not mutate the
/// table.
pub trait IsMarked {
    fn is_marked(&self, object: &StrRef) -> bool;
}

impl<F: Fn(&StrRef) -> bool> IsMarked for F {
    fn is_marked(&self, object: &StrRef) -> bool {
        self(object)
    }
}

/// A set of marked objects, keyed by identity.
///
/// Stands in for a collector's mark bitmap. Marking holds a reference to the
/// object, so addresses in the set cannot be reused while it is alive.
#[derive(Debug, Default)]
pub struct MarkSet {
    marked: FxHashSet<usize>,
    objects: Vec<StrRef>,
}

impl MarkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark every root reported by `enumerate`.
    pub fn from_roots(enumerate: impl FnOnce(&mut MarkSet)) -> Self {
        let mut set = Self::new();
        enumerate(&mut set);
        set
    }

    /// Returns false if `object` was already marked.
    pub fn mark(&mut self, object: &StrRef) -> bool {
        if self.marked.insert(object.addr()) {
            self.objects.push(object.clone());
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.marked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }
}

impl IsMarked for MarkSet {
    fn is_marked(&self, object: &StrRef) -> bool {
        self.marked.contains(&object.addr())
    }
}

impl RootVisitor for MarkSet {
    fn visit_root(&mut self, root: &StrRef) {
        self.mark(root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_set_uses_identity() {
        let a = StrRef::from("live");
        let twin = StrRef::from("live");
        let mut set = MarkSet::new();

        assert!(set.mark(&a));
        assert!(!set.mark(&a.clone()));
        assert!(set.is_marked(&a));
        assert!(!set.is_marked(&twin));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_closures_are_capabilities() {
        let s = StrRef::from("x");
        let mut seen = 0;
        let mut visitor = |_: &StrRef| seen += 1;
        visitor.visit_root(&s);
        visitor.visit_root(&s);
        assert_eq!(seen, 2);

        let never = |_: &StrRef| false;
        assert!(!never.is_marked(&s));
    }

    #[test]
    fn test_from_roots() {
        let roots = [StrRef::from("a"), StrRef::from("b")];
        let set = MarkSet::from_roots(|set| roots.iter().for_each(|r| set.visit_root(r)));
        assert_eq!(set.len(), 2);
        assert!(!set.is_empty());
    }
}
