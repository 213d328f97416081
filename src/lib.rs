//! Canonical, singleton tuples.
//!
//! Given an ordered sequence of values, [`TupleInterner`] returns a unique,
//! immutable representative: two constructions with element-wise identical
//! sequences yield handles sharing one allocation, so tuple equality is an
//! O(1) pointer comparison and tuples work directly as map/set keys.
//!
//! Internally each element is canonicalized into an identity-comparable key
//! ([`CanonicalKey`]) - objects key by their own allocation, `null`,
//! `undefined` and `NaN` map to sentinels, other primitives are boxed once
//! per distinct value - and a forest of weakly-referencing tries (one per
//! tuple length) caches the tuple for each key sequence. The trie never keeps
//! a tuple alive: dropping the last external handle reclaims it.
//!
//! ```
//! use tuplet::{TupleInterner, Value};
//!
//! let mut interner = TupleInterner::new();
//! let a = Value::object();
//! let b = Value::object();
//!
//! let first = interner.tuple_of(&[a.clone(), b.clone()]).unwrap();
//! let second = interner.tuple_of(&[a.clone(), b.clone()]).unwrap();
//! assert!(first.ptr_eq(&second));
//!
//! let reversed = interner.tuple_of(&[b, a]).unwrap();
//! assert!(!first.ptr_eq(&reversed));
//! ```
//!
//! Two construction modes exist: [`TupleInterner::tuple`] (strict) accepts
//! only identity-bearing elements plus `null`/`undefined`, while
//! [`TupleInterner::tuple_any`] (permissive) additionally boxes primitives -
//! at the documented cost that every distinct primitive ever boxed is
//! retained until [`TupleInterner::reset`].

mod canonical;
mod error;
mod interner;
mod trie;
mod tuple;
mod value;

pub use crate::canonical::{CanonicalKey, Sentinel};
pub use crate::error::{InternError, InternResult};
pub use crate::interner::TupleInterner;
pub use crate::tuple::TupleRef;
pub use crate::value::{ObjectRef, Value};
