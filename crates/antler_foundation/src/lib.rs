//! Core types for the Antler rule engine.
//!
//! This crate provides:
//! - [`Value`] - Tagged scalar values and the relational comparator
//! - [`Fact`] - (object, attribute, value) triples
//! - [`Rule`], [`Condition`], [`Inference`], [`Term`], [`Variable`] - the
//!   declarative rule model
//! - [`Error`] - Categorized error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod fact;
pub mod rule;
pub mod value;

// Re-export primary types at crate root for convenience
pub use error::{Error, ErrorKind, Result};
pub use fact::Fact;
pub use rule::{Condition, Inference, Rule, Term, Variable};
pub use value::{matches_optional, Kind, Operator, Value};
