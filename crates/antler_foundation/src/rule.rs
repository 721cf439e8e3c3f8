//! The declarative rule model: variables, terms, conditions, inferences.
//!
//! Rules are constructed in memory by the embedding application and handed
//! to the engine for compilation; there is no textual rule language.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::value::{Operator, Value};

/// A named placeholder in a rule.
///
/// The first occurrence of a variable in a rule binds free; every later
/// occurrence constrains unification. Distinct variables within one rule
/// bind to distinct values.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Variable(Arc<str>);

impl Variable {
    /// Creates a new variable with the given name.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Returns the variable's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}

impl From<&str> for Variable {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A term in a condition or inference: a literal scalar or a variable.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Term {
    /// A literal scalar value.
    Literal(Value),
    /// A variable reference.
    Var(Variable),
}

impl Term {
    /// Creates a literal term.
    #[must_use]
    pub fn lit(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates a variable term.
    #[must_use]
    pub fn var(name: impl Into<Arc<str>>) -> Self {
        Self::Var(Variable::new(name))
    }

    /// Returns the variable if this term is one.
    #[must_use]
    pub const fn as_var(&self) -> Option<&Variable> {
        match self {
            Self::Var(v) => Some(v),
            Self::Literal(_) => None,
        }
    }
}

impl From<Variable> for Term {
    fn from(v: Variable) -> Self {
        Self::Var(v)
    }
}

impl<V: Into<Value>> From<V> for Term {
    fn from(value: V) -> Self {
        Self::Literal(value.into())
    }
}

/// One element of a rule's left-hand side.
///
/// Matches facts with the given attribute whose object satisfies the object
/// term and whose value satisfies `comparator` against the value term. A
/// literal object of `""` constrains nothing. Setting [`Condition::negated`]
/// turns the condition into an existential negation: it is satisfied only
/// while no fact matches.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Condition {
    /// Existential negation flag.
    pub not_exists: bool,
    /// Object position: a string literal or a variable.
    pub object: Term,
    /// Attribute name the condition filters on.
    pub attribute: String,
    /// Operator applied between a fact's value and the value term.
    pub comparator: Operator,
    /// Value position: a scalar literal or a variable (variables require
    /// [`Operator::Eq`]).
    pub value: Term,
}

impl Condition {
    /// Creates a positive condition.
    #[must_use]
    pub fn new(
        object: impl Into<Term>,
        attribute: impl Into<String>,
        comparator: Operator,
        value: impl Into<Term>,
    ) -> Self {
        Self {
            not_exists: false,
            object: object.into(),
            attribute: attribute.into(),
            comparator,
            value: value.into(),
        }
    }

    /// Marks this condition as an existential negation.
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.not_exists = true;
        self
    }
}

/// One element of a rule's right-hand side: a template for a derived fact.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inference {
    /// Object position: a string literal or a variable bound in the LHS.
    pub object: Term,
    /// Attribute of the derived fact.
    pub attribute: String,
    /// Value position: a scalar literal or a variable bound in the LHS.
    pub value: Term,
}

impl Inference {
    /// Creates a new inference template.
    #[must_use]
    pub fn new(
        object: impl Into<Term>,
        attribute: impl Into<String>,
        value: impl Into<Term>,
    ) -> Self {
        Self {
            object: object.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// A declarative rule: an ordered list of conditions and the inferences
/// fired when all of them hold.
///
/// LHS order is significant; it determines the slot index each condition
/// occupies in the compiled production.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rule {
    /// Rule identifier, used in diagnostics.
    pub id: String,
    /// Conditions, in slot order.
    pub lhs: Vec<Condition>,
    /// Inference templates, in firing order.
    pub rhs: Vec<Inference>,
}

impl Rule {
    /// Creates an empty rule with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lhs: Vec::new(),
            rhs: Vec::new(),
        }
    }

    /// Appends a condition to the left-hand side.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.lhs.push(condition);
        self
    }

    /// Appends an inference to the right-hand side.
    #[must_use]
    pub fn then(mut self, inference: Inference) -> Self {
        self.rhs.push(inference);
        self
    }
}
