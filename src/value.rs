use std::fmt::{self, Write};
use std::rc::Rc;

use ahash::AHashSet;

use crate::tuple::TupleRef;

/// Primary value type for tuple elements.
///
/// This enum uses a hybrid design: small immediate values (Bool, Int, Float)
/// are stored inline, while identity-bearing values (Str, Object, List, Tuple)
/// are shared `Rc` allocations, so cloning a `Value` is always cheap.
///
/// Equality is the host's strict equality: booleans, numbers and strings
/// compare by value (with `NaN != NaN`), while objects, lists and tuples
/// compare by reference identity. Structural comparison of distinct lists is
/// deliberately not provided - interning exists precisely so that identity
/// comparison of tuples is sufficient.
#[derive(Debug, Clone, strum::IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Value {
    Null,
    Undefined,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    /// An opaque object with reference identity, see [`ObjectRef`].
    Object(ObjectRef),
    /// A plain, non-interned sequence. Two lists with equal contents are
    /// distinct values.
    List(Rc<Vec<Value>>),
    /// An interned tuple produced by [`crate::TupleInterner`].
    Tuple(TupleRef),
}

impl Value {
    /// Builds a string value from a string slice.
    #[must_use]
    pub fn str(s: &str) -> Self {
        Self::Str(Rc::from(s))
    }

    /// Builds a fresh anonymous object with its own identity.
    #[must_use]
    pub fn object() -> Self {
        Self::Object(ObjectRef::new())
    }

    /// Builds a fresh object carrying a debug label.
    #[must_use]
    pub fn labeled_object(label: &str) -> Self {
        Self::Object(ObjectRef::labeled(label))
    }

    /// Builds a plain (non-interned) list value.
    #[must_use]
    pub fn list(elements: Vec<Value>) -> Self {
        Self::List(Rc::new(elements))
    }

    /// Returns the host-level type name of this value, e.g. `"int"` or
    /// `"tuple"`.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.into()
    }

    /// Returns `true` iff this value is an interned tuple.
    ///
    /// Plain lists are never tuples, even with element-wise equal contents,
    /// and `Null`/`Undefined`/primitives always return `false`.
    #[must_use]
    pub fn is_tuple(&self) -> bool {
        matches!(self, Self::Tuple(_))
    }

    /// Returns the interned tuple handle if this value is a tuple.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&TupleRef> {
        match self {
            Self::Tuple(tuple) => Some(tuple),
            _ => None,
        }
    }

    /// Returns the elements of an array-like value (a list or a tuple).
    ///
    /// This is the "has a length" check of the construction operations: any
    /// value for which this returns `None` is rejected with
    /// [`crate::InternError::NotSequence`].
    #[must_use]
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            Self::Tuple(tuple) => Some(tuple.as_slice()),
            _ => None,
        }
    }

    /// Formats this value repr-style into `f`, guarding against reference
    /// cycles through containers with the `seen` address set.
    pub(crate) fn repr_fmt<W: Write>(&self, f: &mut W, seen: &mut AHashSet<usize>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Undefined => f.write_str("undefined"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => float_repr_fmt(f, *x),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Object(object) => match object.label() {
                Some(label) => write!(f, "<object {label}>"),
                None => f.write_str("<object>"),
            },
            Self::List(items) => {
                let addr = Rc::as_ptr(items) as usize;
                if !seen.insert(addr) {
                    return f.write_str("[...]");
                }
                let result = repr_sequence_fmt('[', ']', items, f, seen);
                seen.remove(&addr);
                result
            }
            Self::Tuple(tuple) => {
                let addr = tuple.addr();
                if !seen.insert(addr) {
                    return f.write_str("(...)");
                }
                let result = repr_sequence_fmt('(', ')', tuple.as_slice(), f, seen);
                seen.remove(&addr);
                result
            }
        }
    }
}

/// Formats a comma-separated sequence between `open` and `close` delimiters.
pub(crate) fn repr_sequence_fmt<W: Write>(
    open: char,
    close: char,
    items: &[Value],
    f: &mut W,
    seen: &mut AHashSet<usize>,
) -> fmt::Result {
    f.write_char(open)?;
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        item.repr_fmt(f, seen)?;
    }
    f.write_char(close)
}

fn float_repr_fmt<W: Write>(f: &mut W, value: f64) -> fmt::Result {
    if value.is_nan() {
        f.write_str("NaN")
    } else if value == f64::INFINITY {
        f.write_str("Infinity")
    } else if value == f64::NEG_INFINITY {
        f.write_str("-Infinity")
    } else {
        write!(f, "{value}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut seen = AHashSet::new();
        self.repr_fmt(f, &mut seen)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) | (Self::Undefined, Self::Undefined) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            // IEEE semantics: NaN is not equal to itself
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Tuple(a), Self::Tuple(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::str(v)
    }
}

impl From<TupleRef> for Value {
    fn from(v: TupleRef) -> Self {
        Self::Tuple(v)
    }
}

/// An opaque heap object with reference identity.
///
/// Objects carry no data beyond an optional debug label; their purpose is to
/// *be distinct*: every [`ObjectRef::new`] call yields a value that is
/// identity-equal only to its own clones. Cloning the ref shares the
/// underlying allocation rather than creating a new identity.
#[derive(Debug, Clone)]
pub struct ObjectRef(Rc<Object>);

#[derive(Debug)]
pub(crate) struct Object {
    label: Option<Box<str>>,
}

impl ObjectRef {
    /// Creates a fresh object identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(Object { label: None }))
    }

    /// Creates a fresh object identity carrying a debug label.
    #[must_use]
    pub fn labeled(label: &str) -> Self {
        Self(Rc::new(Object {
            label: Some(label.into()),
        }))
    }

    /// Returns the debug label, if one was set at construction.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.0.label.as_deref()
    }

    /// Returns `true` iff both refs share one underlying allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn downgrade(&self) -> std::rc::Weak<Object> {
        Rc::downgrade(&self.0)
    }
}

impl Default for ObjectRef {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ObjectRef {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_equality_is_identity_for_references() {
        let a = Value::object();
        let b = Value::object();
        assert_eq!(a, a.clone());
        assert_ne!(a, b);

        let list = Value::list(vec![Value::Int(1)]);
        assert_eq!(list, list.clone());
        assert_ne!(list, Value::list(vec![Value::Int(1)]));
    }

    #[test]
    fn strict_equality_is_value_for_primitives() {
        assert_eq!(Value::Int(3), Value::Int(3));
        assert_ne!(Value::Int(3), Value::Float(3.0));
        assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::str("x"), Value::str("x"));
    }

    #[test]
    fn repr_shares_without_false_cycle_hits() {
        // The cycle guard only fires on revisits along one path, so shared
        // (non-cyclic) elements print in full.
        let inner = Value::list(vec![Value::Int(1)]);
        let outer = Value::list(vec![inner.clone(), inner]);
        assert_eq!(outer.to_string(), "[[1], [1]]");
    }

    #[test]
    fn type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Undefined.type_name(), "undefined");
        assert_eq!(Value::Int(0).type_name(), "int");
        assert_eq!(Value::object().type_name(), "object");
        assert_eq!(Value::list(vec![]).type_name(), "list");
    }
}
