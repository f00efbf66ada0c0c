//! ETF term values.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// A value exchanged through the codec, corresponding to ETF terms.
///
/// The atoms `nil`, `true` and `false` map to [`Term::Null`] and
/// [`Term::Bool`]; every other atom decodes to [`Term::Str`]. The empty
/// list is `List(vec![])`.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers outside the `i64` range. Values up to ±(2⁶⁴ − 1) are
    /// encodable; larger magnitudes fail at pack time.
    BigInt(i128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Tuple(Vec<Term>),
    List(Vec<Term>),
    /// Insertion-ordered key/value pairs. Keys are arbitrary terms.
    Map(Vec<(Term, Term)>),
}

impl Term {
    /// Builds an integer term, folding values that fit into [`Term::Int`].
    pub fn integer(value: i128) -> Self {
        if i128::from(i64::MIN) <= value && value <= i128::from(i64::MAX) {
            Self::Int(value as i64)
        } else {
            Self::BigInt(value)
        }
    }

    /// Returns the value as an i64, if it is an `Int` variant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a string reference, if it is a `Str` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a byte slice, if it is a `Bytes` variant.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "nil"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::BigInt(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => write!(f, "\"{s}\""),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Tuple(items) => {
                write!(f, "{{")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "}}")
            }
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Map(pairs) => {
                write!(f, "#{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k} => {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

// -- Conversions from host types --

impl From<bool> for Term {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Term {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Term {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u64> for Term {
    fn from(v: u64) -> Self {
        Self::integer(i128::from(v))
    }
}

impl From<i128> for Term {
    fn from(v: i128) -> Self {
        Self::integer(v)
    }
}

impl From<f64> for Term {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Term {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Term {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<&[u8]> for Term {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<Vec<u8>> for Term {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<Vec<Term>> for Term {
    fn from(v: Vec<Term>) -> Self {
        Self::List(v)
    }
}

// Sets carry over as lists, in the set iterator's order.

impl<T: Into<Term> + Eq + Hash> From<HashSet<T>> for Term {
    fn from(v: HashSet<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Term> + Ord> From<BTreeSet<T>> for Term {
    fn from(v: BTreeSet<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<Term> + Eq + Hash, V: Into<Term>> From<HashMap<K, V>> for Term {
    fn from(v: HashMap<K, V>) -> Self {
        Self::Map(v.into_iter().map(|(k, val)| (k.into(), val.into())).collect())
    }
}

impl<K: Into<Term> + Ord, V: Into<Term>> From<BTreeMap<K, V>> for Term {
    fn from(v: BTreeMap<K, V>) -> Self {
        Self::Map(v.into_iter().map(|(k, val)| (k.into(), val.into())).collect())
    }
}
