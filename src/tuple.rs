//! The interned tuple value type.
//!
//! A tuple is an immutable, fixed-length, ordered sequence of the original
//! element values. Immutability is structural rather than enforced at runtime:
//! the elements live in a `Box<[Value]>` behind a shared handle with no
//! mutation entry point, so there is nothing to freeze and nothing to bypass.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use ahash::AHashSet;

use crate::value::{repr_sequence_fmt, Value};

/// Backing storage for one interned tuple.
#[derive(Debug)]
pub(crate) struct TupleData {
    elements: Box<[Value]>,
}

/// Shared handle to an interned tuple.
///
/// Handles returned for canonical-key-equal sequences of the same length are
/// guaranteed to share one allocation, so `==` (and `Hash`) operate on the
/// allocation address: comparing tuples is O(1) regardless of length, and a
/// `TupleRef` can serve directly as a map or set key.
///
/// Cloning shares the allocation. The interner's trie holds tuples only
/// weakly; once every external `TupleRef` (and every `Value::Tuple` wrapping
/// one) is dropped, the tuple is reclaimed.
#[derive(Debug, Clone)]
pub struct TupleRef(Rc<TupleData>);

impl TupleRef {
    pub(crate) fn new(elements: &[Value]) -> Self {
        Self(Rc::new(TupleData {
            elements: elements.to_vec().into_boxed_slice(),
        }))
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.elements.len()
    }

    /// Returns `true` iff this is the empty tuple.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.elements.is_empty()
    }

    /// Returns the element at `index`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.elements.get(index)
    }

    /// Returns the elements as a slice, in construction order.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.0.elements
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.elements.iter()
    }

    /// Returns `true` iff both handles share one underlying allocation.
    ///
    /// Equivalent to `==`; provided for symmetry with `Rc::ptr_eq`.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn downgrade(&self) -> Weak<TupleData> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn upgrade(slot: &Weak<TupleData>) -> Option<Self> {
        slot.upgrade().map(Self)
    }
}

impl PartialEq for TupleRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for TupleRef {}

impl Hash for TupleRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.addr());
    }
}

impl std::ops::Index<usize> for TupleRef {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.0.elements[index]
    }
}

impl<'a> IntoIterator for &'a TupleRef {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl fmt::Display for TupleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen = AHashSet::new();
        seen.insert(self.addr());
        repr_sequence_fmt('(', ')', self.as_slice(), f, &mut seen)
    }
}
