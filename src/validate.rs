//! Field validation shared by the description parser and the direct edit operations.
//!
//! All checks are pure and parameterized by the configured [`Limits`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Limits, WeightRange};

/// Characters allowed in an argument description besides ASCII letters, digits and whitespace.
pub const DESCRIPTION_PUNCTUATION: &[char] =
    &['.', ',', ';', ':', '!', '?', '(', ')', '-', '_', '\'', '"'];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum ValidationError {
    #[error("Argument Name cannot be empty.")]
    EmptyIdentifier,
    #[error("Argument Name is too long (max {max} characters).")]
    IdentifierTooLong { max: usize },
    #[error("Argument Name can only contain letters and numbers.")]
    InvalidIdentifierChars,
    #[error("Weight must be a number")]
    NotANumber,
    #[error("Weight must be a number between {min} and {max}.")]
    WeightOutOfRange { min: f64, max: f64 },
    #[error("Description is too long (max {max}).")]
    TextTooLong { max: usize },
    #[error("Description contains invalid characters: only letters, numbers, spaces and common punctuation are allowed.")]
    InvalidTextChars,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightKind {
    Node,
    Edge,
}

impl WeightKind {
    pub fn range(&self, limits: &Limits) -> WeightRange {
        match self {
            WeightKind::Node => limits.node_weight,
            WeightKind::Edge => limits.edge_weight,
        }
    }
}

pub fn validate_identifier(limits: &Limits, raw: &str) -> Result<(), ValidationError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ValidationError::EmptyIdentifier);
    }
    if id.chars().count() > limits.max_identifier_length {
        return Err(ValidationError::IdentifierTooLong {
            max: limits.max_identifier_length,
        });
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidIdentifierChars);
    }
    Ok(())
}

/// Parse and range-check raw weight text. `None` (no weight given) is always valid.
pub fn validate_weight(
    limits: &Limits,
    raw: Option<&str>,
    kind: WeightKind,
) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ValidationError::NotANumber)?;
    check_weight(limits, Some(value), kind)?;
    Ok(Some(value))
}

/// Range-check an already numeric weight.
pub fn check_weight(
    limits: &Limits,
    value: Option<f64>,
    kind: WeightKind,
) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };
    if value.is_nan() {
        return Err(ValidationError::NotANumber);
    }
    let range = kind.range(limits);
    if !range.contains(value) {
        return Err(ValidationError::WeightOutOfRange {
            min: range.min,
            max: range.max,
        });
    }
    Ok(())
}

pub fn validate_free_text(limits: &Limits, text: &str) -> Result<(), ValidationError> {
    if text.chars().count() > limits.max_description_length {
        return Err(ValidationError::TextTooLong {
            max: limits.max_description_length,
        });
    }
    let allowed = |c: char| {
        c.is_ascii_alphanumeric() || c.is_whitespace() || DESCRIPTION_PUNCTUATION.contains(&c)
    };
    if !text.chars().all(allowed) {
        return Err(ValidationError::InvalidTextChars);
    }
    Ok(())
}
