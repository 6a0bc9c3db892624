//! A small ordered pareto set.
//!
//! Retain-based eviction of dominated elements, generalised over a user-supplied per-criterion
//! comparator rather than a single hardcoded label type, and extended with the insertion-order
//! cursor (`mark_at_end`/`stream_after_marker`) the multi-criteria worker needs.

use std::cmp::Ordering;

/// Per-criterion comparator for elements of type `T`. `compare(a, b)` returns one [`Ordering`]
/// per criterion: `Less` where `a` is strictly better, `Greater` where `b` is, `Equal` where tied.
pub trait Dominance<T> {
    fn compare(&self, a: &T, b: &T) -> Vec<Ordering>;
}

/// Why an element left the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCause {
    /// A newly added element dominated it on every criterion.
    Dominated,
}

/// A collection that retains only mutually non-dominated elements, in insertion order.
pub struct ParetoSet<T, D> {
    items: Vec<T>,
    dominance: D,
    on_drop: Option<Box<dyn FnMut(&T, DropCause)>>,
}

const INITIAL_CAPACITY: usize = 16;

impl<T, D: Dominance<T>> ParetoSet<T, D> {
    pub fn new(dominance: D) -> Self {
        Self {
            items: Vec::with_capacity(INITIAL_CAPACITY),
            dominance,
            on_drop: None,
        }
    }

    /// Registers a callback invoked exactly once per evicted element, with the cause of eviction.
    pub fn set_on_drop(&mut self, callback: impl FnMut(&T, DropCause) + 'static) {
        self.on_drop = Some(Box::new(callback));
    }

    /// Attempts to insert `v`. Returns `true` iff it was inserted; any incumbents it strictly
    /// dominates are evicted in the same call, compacting the buffer in place.
    pub fn add(&mut self, v: T) -> bool {
        if !self.qualify(&v) {
            return false;
        }

        let mut dominated_indices = Vec::new();
        for (i, existing) in self.items.iter().enumerate() {
            let (any_better, any_worse) = self.relation(&v, existing);
            if any_better && !any_worse {
                dominated_indices.push(i);
            }
        }

        for &i in dominated_indices.iter().rev() {
            let evicted = self.items.remove(i);
            if let Some(on_drop) = &mut self.on_drop {
                on_drop(&evicted, DropCause::Dominated);
            }
        }

        self.items.push(v);
        true
    }

    /// Non-mutating: would `add(v)` insert? `v` is rejected when some existing element dominates
    /// it, or when it exactly ties an existing element on every criterion.
    pub fn qualify(&self, v: &T) -> bool {
        !self
            .items
            .iter()
            .any(|existing| {
                let (any_better, any_worse) = self.relation(v, existing);
                (any_worse && !any_better) || (!any_worse && !any_better)
            })
    }

    fn relation(&self, v: &T, existing: &T) -> (bool, bool) {
        let cmp = self.dominance.compare(v, existing);
        let any_better = cmp.iter().any(|&o| o == Ordering::Less);
        let any_worse = cmp.iter().any(|&o| o == Ordering::Greater);
        (any_better, any_worse)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Cursor marking the current end of the set, for use with [`Self::stream_after_marker`].
    pub fn mark_at_end(&self) -> usize {
        self.items.len()
    }

    /// Elements inserted after a previous [`Self::mark_at_end`] call.
    pub fn stream_after_marker(&self, marker: usize) -> &[T] {
        &self.items[marker.min(self.items.len())..]
    }
}
