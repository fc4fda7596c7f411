//! Graph module: the live argumentation graph and its reconciliation.
//!
//! # Module Organization
//!
//! - [`base`]: [`ArgGraph`], the arena-backed graph with its relation id generator
//! - [`reconcile`]: minimal-mutation sync of an [`ArgGraph`] to a parsed framework
//!
//! ```rust
//! use argdesigner_core::graph::{ArgGraph, reconcile};
//! ```

mod base;
mod reconcile;


pub use base::ArgGraph;
pub use reconcile::{reconcile, Reconciliation};
