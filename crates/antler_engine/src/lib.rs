//! Rete-style discrimination network and truth maintenance for Antler.
//!
//! This crate provides:
//! - [`Engine`] - The forward-chaining engine facade: define, assert,
//!   retract, query
//! - [`NetworkStats`] - Structured introspection over the compiled network
//!
//! The network internals (alpha nodes, beta nodes, tokens, productions, the
//! agenda) are private; the programmatic surface is the engine itself plus
//! the data model re-exported from `antler_foundation`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow large error types - our Error carries rich context
#![allow(clippy::result_large_err)]
#![allow(clippy::missing_errors_doc)]

mod agenda;
mod alpha;
mod beta;
mod engine;
mod ids;
mod production;
mod stats;
mod token;

pub use engine::Engine;
pub use stats::NetworkStats;
