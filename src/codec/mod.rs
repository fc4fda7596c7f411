//! The textual description notation: parsing into a [`Framework`](crate::framework::Framework)
//! and rendering a graph back to text.
//!
//! ## Key Components
//!
//! - [`tokenize`] - Hand-written line tokenizer producing a tagged [`Statement`]
//! - [`DescriptionParser`] - All-or-nothing parser with exhaustive, line-tagged diagnostics
//! - [`DescriptionErrors`] - The diagnostic batch, rendered under a fixed header
//! - [`serialize_graph`] / [`serialize_framework`] - Canonical text output
//!
//! ## Notation
//!
//! ```text
//! arg(a).
//! arg(b,0.5).
//! att(a,b).
//! support(b,a,0.25).
//! ```
//!
//! Identifiers are case-insensitive and stored lowercase. Blank lines are ignored and do not
//! count toward diagnostic line numbers.
//!
//! ```rust
//! use argdesigner_core::{codec::{parse_description, serialize_framework}, config::Limits};
//!
//! let framework = parse_description("arg(A).\narg(b).\natt(a,B).", &Limits::default()).unwrap();
//! assert_eq!(serialize_framework(&framework).unwrap(), "arg(a).\narg(b).\natt(a,b).");
//! ```

pub mod canonical;
pub mod diagnostic;
pub mod parser;
pub mod statement;

pub use canonical::{serialize_framework, serialize_graph};
pub use diagnostic::{
    DescriptionError, DescriptionErrors, DiagnosticKind, DESCRIPTION_ERRORS_PREFIX,
};
pub use parser::{parse_description, DescriptionParser};
pub use statement::{tokenize, Statement};
