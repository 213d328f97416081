//! Element canonicalization: sentinels, primitive boxing and canonical keys.
//!
//! The trie caches tuples under *canonical keys*: identity-comparable handles
//! where two elements that must be treated as the same sequence position map
//! to the same key allocation. Identity-bearing elements (objects, lists,
//! tuples) key by their own allocation; `null`, `undefined` and `NaN` map to
//! fixed sentinel singletons; remaining primitives are boxed once per distinct
//! value in a strong, interner-lifetime cache.

use std::rc::{Rc, Weak};

use ahash::AHashMap;

use crate::tuple::{TupleData, TupleRef};
use crate::value::{Object, ObjectRef, Value};

/// Fixed singleton stand-ins for values that cannot key the trie directly.
///
/// `Null` and `Undefined` have no allocation of their own, and `NaN` needs
/// disambiguation because it is unequal to itself under strict equality. Each
/// interner owns one allocation per sentinel, created at construction and
/// never released (`reset` keeps them, so keys taken before a reset stay
/// coherent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Sentinel {
    Null,
    Undefined,
    Nan,
}

/// The per-interner sentinel allocations.
#[derive(Debug)]
pub(crate) struct Sentinels {
    null: Rc<Sentinel>,
    undefined: Rc<Sentinel>,
    nan: Rc<Sentinel>,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            null: Rc::new(Sentinel::Null),
            undefined: Rc::new(Sentinel::Undefined),
            nan: Rc::new(Sentinel::Nan),
        }
    }
}

impl Sentinels {
    pub(crate) fn key(&self, which: Sentinel) -> CanonicalKey {
        let rc = match which {
            Sentinel::Null => &self.null,
            Sentinel::Undefined => &self.undefined,
            Sentinel::Nan => &self.nan,
        };
        CanonicalKey(KeyRepr::Sentinel(Rc::clone(rc)))
    }
}

/// Canonical boxed form of one primitive value.
#[derive(Debug)]
pub(crate) struct PrimitiveBox {
    value: Value,
}

impl PrimitiveBox {
    /// The primitive this box stands for.
    pub(crate) fn value(&self) -> &Value {
        &self.value
    }
}

/// Type-qualified lookup key for the box cache.
///
/// Keying by type then value means `3`, `3.0` and `"3"` each get their own
/// box; keying by stringified value would conflate them. Floats key by bit
/// pattern with `-0.0` normalized to `0.0` (strict equality treats them as
/// the same number); NaN never reaches the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum BoxKey {
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(Rc<str>),
}

/// Strong registry mapping each distinct primitive value to its canonical box.
///
/// Every box ever created is retained for the interner's lifetime: the trie
/// can only forget a path once its keys die, and a primitive's key must stay
/// stable across constructions. This is an intentional, bounded-by-usage
/// trade-off - feeding an unbounded stream of *distinct* primitive values
/// through permissive construction retains memory proportional to that
/// variance. `reset` is the only release point.
#[derive(Debug, Default)]
pub(crate) struct PrimitiveBoxCache {
    boxes: AHashMap<BoxKey, Rc<PrimitiveBox>>,
}

impl PrimitiveBoxCache {
    /// Returns the canonical box for `value`, creating it on first sight.
    ///
    /// Repeated calls with an equal primitive return the identical `Rc`.
    pub(crate) fn get_or_box(&mut self, value: &Value) -> Rc<PrimitiveBox> {
        let key = match value {
            Value::Bool(b) => BoxKey::Bool(*b),
            Value::Int(i) => BoxKey::Int(*i),
            Value::Float(x) => {
                debug_assert!(!x.is_nan(), "NaN is canonicalized as a sentinel, not boxed");
                // normalize -0.0 so both zeroes share a box
                let normalized = if *x == 0.0 { 0.0 } else { *x };
                BoxKey::Float(normalized.to_bits())
            }
            Value::Str(s) => BoxKey::Str(Rc::clone(s)),
            _ => unreachable!("only bare primitives are boxed"),
        };
        let entry = self.boxes.entry(key).or_insert_with(|| {
            Rc::new(PrimitiveBox {
                value: value.clone(),
            })
        });
        Rc::clone(entry)
    }

    pub(crate) fn len(&self) -> usize {
        self.boxes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.boxes.clear();
    }
}

/// A stable, identity-comparable stand-in for one element value.
///
/// Keys compare and hash by the address of their backing allocation, so they
/// are valid map/set keys on their own. Two keys are equal iff the elements
/// they were derived from must share a trie edge.
#[derive(Debug, Clone)]
pub struct CanonicalKey(KeyRepr);

#[derive(Debug, Clone)]
enum KeyRepr {
    Sentinel(Rc<Sentinel>),
    Boxed(Rc<PrimitiveBox>),
    Object(ObjectRef),
    List(Rc<Vec<Value>>),
    Tuple(TupleRef),
}

impl CanonicalKey {
    pub(crate) fn boxed(primitive: Rc<PrimitiveBox>) -> Self {
        Self(KeyRepr::Boxed(primitive))
    }

    pub(crate) fn object(object: ObjectRef) -> Self {
        Self(KeyRepr::Object(object))
    }

    pub(crate) fn list(list: Rc<Vec<Value>>) -> Self {
        Self(KeyRepr::List(list))
    }

    pub(crate) fn tuple(tuple: TupleRef) -> Self {
        Self(KeyRepr::Tuple(tuple))
    }

    /// The sentinel this key stands for, if it is a sentinel key.
    #[must_use]
    pub fn as_sentinel(&self) -> Option<Sentinel> {
        match &self.0 {
            KeyRepr::Sentinel(s) => Some(**s),
            _ => None,
        }
    }

    /// The primitive value this key boxes, if it is a box key.
    #[must_use]
    pub fn as_boxed_primitive(&self) -> Option<&Value> {
        match &self.0 {
            KeyRepr::Boxed(b) => Some(b.value()),
            _ => None,
        }
    }

    /// Address of the backing allocation; the key's identity.
    pub(crate) fn addr(&self) -> usize {
        match &self.0 {
            KeyRepr::Sentinel(s) => Rc::as_ptr(s) as usize,
            KeyRepr::Boxed(b) => Rc::as_ptr(b) as usize,
            KeyRepr::Object(o) => o.addr(),
            KeyRepr::List(l) => Rc::as_ptr(l) as usize,
            KeyRepr::Tuple(t) => t.addr(),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakKey {
        match &self.0 {
            KeyRepr::Sentinel(s) => WeakKey::Sentinel(Rc::downgrade(s)),
            KeyRepr::Boxed(b) => WeakKey::Boxed(Rc::downgrade(b)),
            KeyRepr::Object(o) => WeakKey::Object(o.downgrade()),
            KeyRepr::List(l) => WeakKey::List(Rc::downgrade(l)),
            KeyRepr::Tuple(t) => WeakKey::Tuple(t.downgrade()),
        }
    }
}

impl PartialEq for CanonicalKey {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for CanonicalKey {}

impl std::hash::Hash for CanonicalKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_usize(self.addr());
    }
}

/// Non-owning key handle stored on trie edges.
///
/// Holding the `Weak` pins the key's allocation address (an `Rc` box is not
/// freed while weak counts remain), so a live key can never collide with a
/// dead edge's address - dead edges are merely unreclaimed space until the
/// next sweep.
#[derive(Debug)]
pub(crate) enum WeakKey {
    Sentinel(Weak<Sentinel>),
    Boxed(Weak<PrimitiveBox>),
    Object(Weak<Object>),
    List(Weak<Vec<Value>>),
    Tuple(Weak<TupleData>),
}

impl WeakKey {
    pub(crate) fn is_alive(&self) -> bool {
        match self {
            Self::Sentinel(w) => w.strong_count() > 0,
            Self::Boxed(w) => w.strong_count() > 0,
            Self::Object(w) => w.strong_count() > 0,
            Self::List(w) => w.strong_count() > 0,
            Self::Tuple(w) => w.strong_count() > 0,
        }
    }
}
