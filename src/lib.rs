//! # argdesigner-core
//!
//! A Rust library for editing argumentation frameworks through two synchronized views: a live
//! graph and a compact textual description.
//!
//! ## Overview
//!
//! An argumentation framework is a directed graph of **arguments** connected by **attack** and
//! **support** relations, where arguments and relations may carry a weight in `[0, 1]`.
//! argdesigner-core keeps a mutable graph and its textual description in step:
//!
//! - text edits are parsed, validated all-or-nothing and reconciled into the graph with minimal
//!   mutation, so surviving arguments keep their layout position and relations keep their ids;
//! - direct graph edits are serialized back into canonical text;
//! - the framework is classified (AF, BAF, WAF, WBAF, QBAF, WQBAF) to pick between
//!   extension-based and gradual semantics;
//! - results computed by an external semantics service (labelings, strengths) are projected
//!   onto node visual state.
//!
//! ### Description notation
//!
//! ```text
//! arg(a).
//! arg(b,0.5).
//! att(a,b).
//! support(b,a,0.25).
//! ```
//!
//! ## Architecture
//!
//! - **[`validate`]**: Field checks shared by the parser and direct edits
//! - **[`codec`]**: Tokenizer, parser, diagnostics and canonical serializer
//! - **[`framework`]**: The parsed, validated framework model
//! - **[`graph`]**: The live arena-backed graph (`ArgGraph`) and the reconciler
//! - **[`classify`]**: Framework category and display mode
//! - **[`overlay`]**: Labeling and strength projection
//! - **[`sync`]**: The `Session` tying it together, plus description debouncing
//! - **[`semantics`]**: Request/response types for the external semantics service
//! - **[`export`]**: `.apx` and `.json` project files
//!
//! ## Quick Start
//!
//! ```rust
//! use argdesigner_core::{classify::FrameworkCategory, sync::Session, properties::Position};
//!
//! let mut session = Session::default();
//! let outcome = session.apply_description("arg(a).\narg(b).\natt(a,b).").unwrap();
//! assert_eq!(outcome.classification.category, FrameworkCategory::Af);
//!
//! // Direct edits rewrite the description
//! session.add_argument("c", Some(0.5), None, Position::new(0.0, 240.0)).unwrap();
//! assert_eq!(session.description(), "arg(a).\narg(b).\narg(c,0.5).\natt(a,b).");
//! assert_eq!(session.classification().category, FrameworkCategory::Qbaf);
//! ```
//!
//! ### Working with Diagnostics
//!
//! A description with errors is rejected as a whole and every problem is reported:
//!
//! ```rust
//! use argdesigner_core::sync::Session;
//!
//! let mut session = Session::default();
//! let err = session.apply_description("arg(a).\natt(a,c).\nbogus").unwrap_err();
//! for diagnostic in err.diagnostics().unwrap() {
//!     println!("{diagnostic}");
//! }
//! assert!(session.graph().is_empty());
//! ```
//!
//! ## Features
//!
//! - **default**: The synchronization engine
//! - **bin**: The `argdesigner` command line tool (`check`, `format`, `export`)

pub mod classify;
pub mod codec;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod framework;
pub mod graph;
pub mod overlay;
pub mod properties;
pub mod semantics;
pub mod sync;
#[cfg(test)]
mod tests;
pub mod validate;

pub use error::*;
