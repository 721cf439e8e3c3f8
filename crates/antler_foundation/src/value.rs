//! Core scalar value type and the relational comparator.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core scalar value carried by facts.
///
/// Values are immutable and cheaply cloneable. Each value carries its
/// [`Kind`]; comparisons never coerce across kinds.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// String value.
    Str(Arc<str>),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
}

/// The kind of a [`Value`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    /// String.
    Str,
    /// Signed integer.
    Int,
    /// Floating point.
    Float,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
        }
    }
}

/// Relational operator applied by condition filters and binding tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operator {
    /// Equal.
    Eq,
    /// Greater than or equal.
    Ge,
    /// Greater than.
    Gt,
    /// Less than or equal.
    Le,
    /// Less than.
    Lt,
    /// Not equal.
    Ne,
}

impl Operator {
    /// Returns true for the two operators defined across differing kinds.
    #[must_use]
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Eq => write!(f, "EQ"),
            Self::Ge => write!(f, "GE"),
            Self::Gt => write!(f, "GT"),
            Self::Le => write!(f, "LE"),
            Self::Lt => write!(f, "LT"),
            Self::Ne => write!(f, "NE"),
        }
    }
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Str(_) => Kind::Str,
            Self::Int(_) => Kind::Int,
            Self::Float(_) => Kind::Float,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a float value.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Applies a relational operator to two values.
    ///
    /// Values of differing kinds never match under [`Operator::Eq`], always
    /// match under [`Operator::Ne`], and fail with a kind-mismatch error for
    /// every ordered operator. Within a kind the native total order applies:
    /// lexicographic for strings, numeric for integers and floats. Float
    /// equality is bit-equality; there is no epsilon tolerance.
    pub fn matches(&self, op: Operator, other: &Self) -> Result<bool> {
        if self.kind() != other.kind() {
            return match op {
                Operator::Eq => Ok(false),
                Operator::Ne => Ok(true),
                _ => Err(Error::kind_mismatch(self.kind(), op, other.kind())),
            };
        }

        Ok(match (self, other) {
            (Self::Str(a), Self::Str(b)) => ordered(a.as_ref().cmp(b.as_ref()), op),
            (Self::Int(a), Self::Int(b)) => ordered(a.cmp(b), op),
            (Self::Float(a), Self::Float(b)) => match op {
                // Bit equality, consistent with PartialEq and Hash.
                Operator::Eq => a.to_bits() == b.to_bits(),
                Operator::Ne => a.to_bits() != b.to_bits(),
                Operator::Ge => a >= b,
                Operator::Gt => a > b,
                Operator::Le => a <= b,
                Operator::Lt => a < b,
            },
            _ => unreachable!("kinds verified equal above"),
        })
    }
}

fn ordered(ord: Ordering, op: Operator) -> bool {
    match op {
        Operator::Eq => ord == Ordering::Equal,
        Operator::Ge => ord != Ordering::Less,
        Operator::Gt => ord == Ordering::Greater,
        Operator::Le => ord != Ordering::Greater,
        Operator::Lt => ord == Ordering::Less,
        Operator::Ne => ord != Ordering::Equal,
    }
}

/// Applies a relational operator to two optional values.
///
/// This is the comparator used where a value may be absent, such as the
/// unconditional compare-to slot of an alpha node. Two absent values match
/// under [`Operator::Eq`] and fail under [`Operator::Ne`]; any ordered
/// operator against an absent side is an error, as is mixing an absent and
/// a present value under an ordered operator.
pub fn matches_optional(left: Option<&Value>, op: Operator, right: Option<&Value>) -> Result<bool> {
    match (left, right) {
        (Some(l), Some(r)) => l.matches(op, r),
        (None, None) => match op {
            Operator::Eq => Ok(true),
            Operator::Ne => Ok(false),
            _ => Err(Error::absent_comparison(op)),
        },
        _ => match op {
            Operator::Eq => Ok(false),
            Operator::Ne => Ok(true),
            _ => Err(Error::absent_comparison(op)),
        },
    }
}

// Implement PartialEq manually so float comparison is bit-equality,
// keeping Eq and Hash consistent.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Str(s) => s.hash(state),
            Self::Int(n) => n.hash(state),
            Self::Float(n) => n.to_bits().hash(state),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
        }
    }
}

// Convenience From implementations

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(s: Arc<str>) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}
