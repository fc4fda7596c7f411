//! Diagnostic types for description parsing.
//!
//! Every problem found in a submission is recorded as a [`DescriptionError`] tagged with the
//! line it came from, and the whole batch travels as [`DescriptionErrors`].

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use crate::{properties::RelationKind, validate::ValidationError};

/// Header printed above a batch of description errors.
pub const DESCRIPTION_ERRORS_PREFIX: &str = "Argumentation framework errors found:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// The line matches no statement grammar
    Syntax { text: String },
    /// A field failed validation
    Invalid(ValidationError),
    UndefinedSource { kind: RelationKind, id: String },
    UndefinedTarget { kind: RelationKind, id: String },
}

impl Display for DiagnosticKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DiagnosticKind::Syntax { text } => write!(f, "syntax error in \"{text}\""),
            DiagnosticKind::Invalid(reason) => write!(f, "{reason}"),
            DiagnosticKind::UndefinedSource { kind, id } => write!(
                f,
                "{} error - source arg \"{id}\" is not defined",
                kind.keyword()
            ),
            DiagnosticKind::UndefinedTarget { kind, id } => write!(
                f,
                "{} error - target arg \"{id}\" is not defined",
                kind.keyword()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionError {
    /// 1-based index among the non-blank lines
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl DescriptionError {
    pub fn new(line: usize, kind: DiagnosticKind) -> Self {
        DescriptionError { line, kind }
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.kind, DiagnosticKind::Syntax { .. })
    }
}

impl Display for DescriptionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Line {}: {}", self.line, self.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DescriptionErrors(pub Vec<DescriptionError>);

impl DescriptionErrors {
    pub fn push(&mut self, line: usize, kind: DiagnosticKind) {
        self.0.push(DescriptionError::new(line, kind));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DescriptionError> {
        self.0.iter()
    }
}

impl Display for DescriptionErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{DESCRIPTION_ERRORS_PREFIX}")?;
        for error in self.0.iter() {
            write!(f, "\n{error}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a DescriptionErrors {
    type Item = &'a DescriptionError;
    type IntoIter = std::slice::Iter<'a, DescriptionError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
