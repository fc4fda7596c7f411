use std::{fmt, io};

use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use tokio::sync::mpsc::error::SendError as TokioSendError;

use crate::{codec::DescriptionErrors, event::GraphEvent, validate::ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum DesignerError {
    /// Syntax and semantic errors of a description submission, reported as one batch.
    #[error("{0}")]
    Description(DescriptionErrors),
    #[error("{0}")]
    Validation(ValidationError),
    #[error("There is already an Argument with this Name: {0}")]
    DuplicateArgument(String),
    #[error("There is already a Relationship of this type between the two Arguments: {0}")]
    DuplicateRelation(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    /// A caller handed the reconciler a framework that was never validated.
    #[error("Graph invariant violated: {0}")]
    Invariant(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NoResults(String),
    #[error("Unsupported file format: {0}. Please select .apx or .json.")]
    UnsupportedFormat(String),
    #[error("Semantics service error: {0}")]
    Service(String),
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
    #[error("File System error: {0}")]
    Io(String),
}

impl DesignerError {
    /// The individual description diagnostics, if this is a description batch.
    pub fn diagnostics(&self) -> Option<&DescriptionErrors> {
        match self {
            DesignerError::Description(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<DescriptionErrors> for DesignerError {
    fn from(src: DescriptionErrors) -> DesignerError {
        DesignerError::Description(src)
    }
}

impl From<ValidationError> for DesignerError {
    fn from(src: ValidationError) -> DesignerError {
        DesignerError::Validation(src)
    }
}

impl From<toml::de::Error> for DesignerError {
    fn from(src: toml::de::Error) -> DesignerError {
        DesignerError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for DesignerError {
    fn from(src: toml::ser::Error) -> DesignerError {
        DesignerError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for DesignerError {
    fn from(src: JsonError) -> DesignerError {
        DesignerError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<io::Error> for DesignerError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => DesignerError::NotFound(format!("{x}")),
            _ => DesignerError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for DesignerError {
    fn from(x: fmt::Error) -> Self {
        DesignerError::Serialization(format!("{x}"))
    }
}

impl From<TokioSendError<GraphEvent>> for DesignerError {
    fn from(x: TokioSendError<GraphEvent>) -> Self {
        DesignerError::Io(format!(
            "Channel update send Error, could not transmit graph event {:?}",
            x.0
        ))
    }
}

impl From<TokioSendError<String>> for DesignerError {
    fn from(_: TokioSendError<String>) -> Self {
        DesignerError::Io("Description channel closed, could not submit text".to_string())
    }
}
