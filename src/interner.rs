use std::rc::Rc;

use smallvec::SmallVec;

use crate::canonical::{CanonicalKey, PrimitiveBoxCache, Sentinel, Sentinels};
use crate::error::{InternError, InternResult};
use crate::trie::TrieForest;
use crate::tuple::TupleRef;
use crate::value::Value;

/// Scratch buffer for one construction's canonical keys.
type KeyBuf = SmallVec<[CanonicalKey; 8]>;

/// The tuple factory: canonicalization, trie traversal and tuple construction
/// behind one explicit registry object.
///
/// All state - the per-length tries, the primitive box cache, the sentinel
/// allocations and the empty-tuple singleton - lives on this struct rather
/// than in module-level globals, so tests can construct throwaway interners
/// and [`reset`](Self::reset) one in place. Process lifetime is a convention
/// of the caller, not a property of the type.
///
/// # Singleton guarantee
///
/// Within one interner, two constructions with canonical-key-equal element
/// sequences of the same length return handles sharing one allocation. The
/// check-then-insert traversal must not interleave; every construction method
/// takes `&mut self`, so the borrow checker enforces the mutual exclusion a
/// concurrent host would need a lock for. Share an interner through your own
/// `RefCell` or `Mutex` if needed.
///
/// # Memory
///
/// The tries hold tuples weakly: dropping the last external handle reclaims
/// the tuple immediately. The trie *node space* left behind by dead tuples or
/// dead keys is reclaimed by [`sweep`](Self::sweep). The primitive box cache
/// is the deliberate exception: it grows monotonically with the number of
/// distinct primitives ever canonicalized and releases only on `reset`.
#[derive(Debug, Default)]
pub struct TupleInterner {
    sentinels: Sentinels,
    boxes: PrimitiveBoxCache,
    trie: TrieForest,
    empty: Option<TupleRef>,
}

impl TupleInterner {
    /// Creates an empty interner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict construction: interns an array-like value (list or tuple) into
    /// a singleton tuple.
    ///
    /// Only identity-bearing elements plus `null` and `undefined` are
    /// accepted; a bare primitive element fails with
    /// [`InternError::InvalidElement`] because it cannot key the weak trie.
    ///
    /// # Errors
    ///
    /// [`InternError::NotSequence`] if `sequence` is not array-like;
    /// [`InternError::InvalidElement`] on the first bare primitive element.
    /// Either way the cache is left untouched.
    pub fn tuple(&mut self, sequence: &Value) -> InternResult<TupleRef> {
        self.tuple_of(Self::as_sequence(sequence)?)
    }

    /// Strict construction from an element slice. See [`tuple`](Self::tuple).
    ///
    /// # Errors
    ///
    /// [`InternError::InvalidElement`] on the first bare primitive element.
    pub fn tuple_of(&mut self, elements: &[Value]) -> InternResult<TupleRef> {
        if elements.is_empty() {
            return Ok(self.empty_tuple());
        }
        let mut keys = KeyBuf::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            keys.push(self.strict_key(element, index)?);
        }
        Ok(self.trie.intern(&keys, elements))
    }

    /// Permissive construction: interns an array-like value into a singleton
    /// tuple, boxing primitive elements first so any element mix succeeds.
    ///
    /// Note the retention trade-off on the box cache: every distinct
    /// primitive interned this way is retained until [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// [`InternError::NotSequence`] if `sequence` is not array-like.
    pub fn tuple_any(&mut self, sequence: &Value) -> InternResult<TupleRef> {
        Ok(self.tuple_any_of(Self::as_sequence(sequence)?))
    }

    /// Permissive construction from an element slice; never fails.
    pub fn tuple_any_of(&mut self, elements: &[Value]) -> TupleRef {
        if elements.is_empty() {
            return self.empty_tuple();
        }
        let mut keys = KeyBuf::with_capacity(elements.len());
        for element in elements {
            keys.push(self.canonical_key(element));
        }
        self.trie.intern(&keys, elements)
    }

    /// Returns the canonical key for a single value: the permissive
    /// canonicalizer, exposed so callers can use any value as a map/set key
    /// outside of tuple construction.
    ///
    /// Repeated calls with equal primitives, or with clones of one reference,
    /// return equal keys; everything else gets a distinct key.
    pub fn canonical_key(&mut self, element: &Value) -> CanonicalKey {
        match element {
            Value::Null => self.sentinels.key(Sentinel::Null),
            Value::Undefined => self.sentinels.key(Sentinel::Undefined),
            Value::Float(x) if x.is_nan() => self.sentinels.key(Sentinel::Nan),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) => {
                CanonicalKey::boxed(self.boxes.get_or_box(element))
            }
            Value::Object(object) => CanonicalKey::object(object.clone()),
            Value::List(list) => CanonicalKey::list(Rc::clone(list)),
            Value::Tuple(tuple) => CanonicalKey::tuple(tuple.clone()),
        }
    }

    /// Strict canonicalizer: passes identity-bearing elements through and
    /// maps only `null`/`undefined` to sentinels. Bare primitives are
    /// rejected here, before the trie is touched.
    fn strict_key(&self, element: &Value, index: usize) -> InternResult<CanonicalKey> {
        match element {
            Value::Null => Ok(self.sentinels.key(Sentinel::Null)),
            Value::Undefined => Ok(self.sentinels.key(Sentinel::Undefined)),
            Value::Object(object) => Ok(CanonicalKey::object(object.clone())),
            Value::List(list) => Ok(CanonicalKey::list(Rc::clone(list))),
            Value::Tuple(tuple) => Ok(CanonicalKey::tuple(tuple.clone())),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) => {
                Err(InternError::InvalidElement {
                    type_name: element.type_name(),
                    index,
                })
            }
        }
    }

    fn as_sequence(sequence: &Value) -> InternResult<&[Value]> {
        sequence.as_slice().ok_or(InternError::NotSequence {
            type_name: sequence.type_name(),
        })
    }

    /// The trie walk needs a final key to index, so the empty sequence is
    /// special-cased to one lazily created, strongly retained singleton.
    fn empty_tuple(&mut self) -> TupleRef {
        self.empty.get_or_insert_with(|| TupleRef::new(&[])).clone()
    }

    /// Prunes trie edges whose key or tuple has been reclaimed, plus subtrees
    /// emptied by the pruning. Returns the number of edges removed.
    ///
    /// Tuples themselves are reclaimed by dropping their last handle; sweep
    /// only recovers the cache's own bookkeeping space and is never required
    /// for correctness.
    pub fn sweep(&mut self) -> usize {
        self.trie.sweep()
    }

    /// Clears the tries, the primitive box cache and the empty-tuple
    /// singleton. Sentinel allocations persist, so canonical keys taken
    /// before the reset remain coherent with keys taken after.
    ///
    /// Existing tuple handles stay valid but lose their singleton status:
    /// re-interning an equal sequence afterwards creates a new tuple.
    pub fn reset(&mut self) {
        self.trie.clear();
        self.boxes.clear();
        self.empty = None;
    }

    /// Number of trie nodes currently allocated, roots included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.trie.node_count()
    }

    /// Number of tuples currently cached and alive.
    #[must_use]
    pub fn cached_tuple_count(&self) -> usize {
        self.trie.cached_tuple_count()
    }

    /// Number of distinct primitive values boxed so far.
    #[must_use]
    pub fn boxed_primitive_count(&self) -> usize {
        self.boxes.len()
    }
}
