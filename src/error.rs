use std::fmt;

/// Result alias for tuple construction.
pub type InternResult<T> = Result<T, InternError>;

/// Errors raised by tuple construction.
///
/// Both kinds are contract violations by the caller; the interner performs no
/// retries and leaves no partial cache state behind a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternError {
    /// The sequence argument was not array-like (not a list or tuple).
    /// Raised before any canonicalization or trie mutation.
    NotSequence {
        /// Type name of the rejected value.
        type_name: &'static str,
    },
    /// Strict construction encountered a bare primitive, which cannot serve
    /// as a weak-trie key. Raised during canonicalization, before any trie
    /// mutation for the sequence.
    InvalidElement {
        /// Type name of the offending element.
        type_name: &'static str,
        /// Position of the offending element in the sequence.
        index: usize,
    },
}

impl fmt::Display for InternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotSequence { type_name } => {
                write!(
                    f,
                    "tuples can only be created from array-like values, got {type_name}"
                )
            }
            Self::InvalidElement { type_name, index } => {
                write!(
                    f,
                    "invalid value at index {index}: a bare {type_name} cannot key the weak trie"
                )
            }
        }
    }
}

impl std::error::Error for InternError {}
