//! Antler - forward-chaining production-rule engine
//!
//! This crate re-exports both layers of the Antler system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: antler_engine     — Alpha/beta network, tokens, agenda,
//!                              truth maintenance, engine facade
//! Layer 0: antler_foundation — Core types (Value, Fact, Rule, Error)
//! ```

pub use antler_engine as engine;
pub use antler_foundation as foundation;

pub use antler_engine::Engine;
pub use antler_foundation::{
    Condition, Fact, Inference, Operator, Result, Rule, Term, Value, Variable,
};
