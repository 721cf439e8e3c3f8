//! Ground facts: (object, attribute, value) triples.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// A ground fact: an attribute of an object holding a scalar value.
///
/// Facts are cheaply cloneable; object and attribute share their string
/// storage across clones. Two facts are equal iff all three components are
/// equal, with value equality defined within-kind ([`Value`]).
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fact {
    /// Identifier of the object this fact describes.
    pub object: Arc<str>,
    /// Attribute name.
    pub attribute: Arc<str>,
    /// Scalar value.
    pub value: Value,
}

impl Fact {
    /// Creates a new fact.
    #[must_use]
    pub fn new(
        object: impl Into<Arc<str>>,
        attribute: impl Into<Arc<str>>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            object: object.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Fact({} {} {:?})",
            self.object, self.attribute, self.value
        )
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "O {} A {} V {}", self.object, self.attribute, self.value)
    }
}
