//! Boundary types for the external semantics service.
//!
//! The core never computes extensions or strengths itself. It builds requests from the current
//! description, hands them to a [`SemanticsService`] implementation, and validates the response
//! envelope into [`LabelingList`] or [`StrengthList`] before anything reaches the overlay.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use crate::{config::GradualDefaults, error::DesignerError};

pub const EMPTY_FRAMEWORK_MESSAGE: &str =
    "Argumentation framework is empty. Please define a BAF/QBAF first.";
pub const NO_LABELINGS_MESSAGE: &str = "No labelings to filter. Please compute semantics first.";
pub const NO_CONSTRAINTS_MESSAGE: &str = "Please enter at least one constraint (e.g., in(a)).";
pub const UNEXPECTED_FORMAT_MESSAGE: &str = "unexpected data format";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradualSemantics {
    #[default]
    Drl,
    Ddr,
    Eul,
    Dfq,
    Mlp,
    Qen,
}

impl GradualSemantics {
    pub const ALL: [GradualSemantics; 6] = [
        GradualSemantics::Drl,
        GradualSemantics::Ddr,
        GradualSemantics::Eul,
        GradualSemantics::Dfq,
        GradualSemantics::Mlp,
        GradualSemantics::Qen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GradualSemantics::Drl => "drl",
            GradualSemantics::Ddr => "ddr",
            GradualSemantics::Eul => "eul",
            GradualSemantics::Dfq => "dfq",
            GradualSemantics::Mlp => "mlp",
            GradualSemantics::Qen => "qen",
        }
    }

    /// Whether the gamma parameter has any effect.
    pub fn uses_gamma(&self) -> bool {
        matches!(self, GradualSemantics::Drl | GradualSemantics::Ddr)
    }

    /// Whether the aggregation selector has any effect.
    pub fn uses_aggregation(&self) -> bool {
        !matches!(
            self,
            GradualSemantics::Eul | GradualSemantics::Dfq | GradualSemantics::Mlp
        )
    }
}

impl Display for GradualSemantics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for GradualSemantics {
    type Err = DesignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GradualSemantics::ALL
            .into_iter()
            .find(|sem| sem.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| {
                DesignerError::InvalidRequest(format!("unknown gradual semantics '{s}'"))
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Sum,
    Product,
    DeltaMax,
    DeltaSum,
}

impl Aggregation {
    pub const ALL: [Aggregation; 4] = [
        Aggregation::Sum,
        Aggregation::Product,
        Aggregation::DeltaMax,
        Aggregation::DeltaSum,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregation::Sum => "sum",
            Aggregation::Product => "product",
            Aggregation::DeltaMax => "deltamax",
            Aggregation::DeltaSum => "deltasum",
        }
    }
}

impl Display for Aggregation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Aggregation {
    type Err = DesignerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aggregation::ALL
            .into_iter()
            .find(|agg| agg.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| DesignerError::InvalidRequest(format!("unknown aggregation '{s}'")))
    }
}

/// Request body for extension-based semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRequest {
    pub semantics: String,
    pub content: String,
}

impl ExtensionRequest {
    pub fn new(semantics: &str, content: &str) -> Result<Self, DesignerError> {
        if content.trim().is_empty() {
            return Err(DesignerError::InvalidRequest(
                EMPTY_FRAMEWORK_MESSAGE.to_string(),
            ));
        }
        Ok(ExtensionRequest {
            semantics: semantics.to_string(),
            content: content.to_string(),
        })
    }
}

/// User-selected gradual computation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradualParams {
    pub semantics: GradualSemantics,
    pub aggregation: Aggregation,
    pub gamma: f64,
    pub epsilon: f64,
}

impl Default for GradualParams {
    fn default() -> Self {
        GradualParams::from(&GradualDefaults::default())
    }
}

impl From<&GradualDefaults> for GradualParams {
    fn from(defaults: &GradualDefaults) -> Self {
        GradualParams {
            semantics: defaults.semantics,
            aggregation: defaults.aggregation,
            gamma: defaults.gamma,
            epsilon: defaults.epsilon,
        }
    }
}

impl GradualParams {
    pub fn validate(&self) -> Result<(), DesignerError> {
        for (name, value) in [("gamma", self.gamma), ("epsilon", self.epsilon)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DesignerError::InvalidRequest(format!(
                    "{name} must be a number between 0 and 1, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Request body for gradual semantics, using the service's field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradualRequest {
    pub content: String,
    pub sem: GradualSemantics,
    pub params: Aggregation,
    pub gamma: f64,
    pub epsilon: f64,
}

impl GradualRequest {
    pub fn new(content: &str, params: &GradualParams) -> Result<Self, DesignerError> {
        if content.trim().is_empty() {
            return Err(DesignerError::InvalidRequest(
                EMPTY_FRAMEWORK_MESSAGE.to_string(),
            ));
        }
        params.validate()?;
        Ok(GradualRequest {
            content: content.to_string(),
            sem: params.semantics,
            params: params.aggregation,
            gamma: params.gamma,
            epsilon: params.epsilon,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    pub labelings: Vec<Vec<String>>,
    pub constraints: Vec<String>,
}

impl FilterRequest {
    /// Split each labeling into its literals and the constraint text into non-blank lines.
    pub fn new(labelings: &LabelingList, constraints: &str) -> Result<Self, DesignerError> {
        if labelings.is_empty() {
            return Err(DesignerError::InvalidRequest(NO_LABELINGS_MESSAGE.to_string()));
        }
        let constraints: Vec<String> = constraints
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        if constraints.is_empty() {
            return Err(DesignerError::InvalidRequest(
                NO_CONSTRAINTS_MESSAGE.to_string(),
            ));
        }
        Ok(FilterRequest {
            labelings: labelings
                .iter()
                .map(|row| row.split_whitespace().map(str::to_string).collect())
                .collect(),
            constraints,
        })
    }
}

/// Raw `{ "results": ... }` / `{ "error": ... }` envelope returned by every endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceResponse {
    pub fn results(results: Value) -> Self {
        ServiceResponse {
            results: Some(results),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ServiceResponse {
            results: None,
            error: Some(message.into()),
        }
    }

    pub fn from_json(body: &str) -> Result<Self, DesignerError> {
        Ok(serde_json::from_str(body)?)
    }

    fn into_array(self) -> Result<Vec<Value>, DesignerError> {
        if let Some(message) = self.error {
            return Err(DesignerError::Service(message));
        }
        match self.results {
            Some(Value::Array(rows)) => Ok(rows),
            _ => Err(DesignerError::Service(UNEXPECTED_FORMAT_MESSAGE.to_string())),
        }
    }

    /// Extension-based results: an array of labeling strings.
    pub fn into_labelings(self) -> Result<LabelingList, DesignerError> {
        let rows = self
            .into_array()?
            .into_iter()
            .map(|row| match row {
                Value::String(row) => Ok(row),
                _ => Err(DesignerError::Service(UNEXPECTED_FORMAT_MESSAGE.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LabelingList(rows))
    }

    /// Filter results: an array of literal arrays, each joined back into one labeling string.
    pub fn into_filtered_labelings(self) -> Result<LabelingList, DesignerError> {
        let rows = self
            .into_array()?
            .into_iter()
            .map(|row| {
                let literals: Vec<String> = serde_json::from_value(row).map_err(|_| {
                    DesignerError::Service(UNEXPECTED_FORMAT_MESSAGE.to_string())
                })?;
                Ok(literals.join(" "))
            })
            .collect::<Result<Vec<_>, DesignerError>>()?;
        Ok(LabelingList(rows))
    }

    /// Gradual results: an array of `id:value` lines.
    pub fn into_strengths(self) -> Result<StrengthList, DesignerError> {
        let rows = self
            .into_array()?
            .into_iter()
            .map(|row| match row {
                Value::String(row) => Ok(row),
                _ => Err(DesignerError::Service(UNEXPECTED_FORMAT_MESSAGE.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StrengthList(rows))
    }
}

/// Ordered labeling rows, each a space separated list of literals such as `in(a) ou(b)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelingList(pub Vec<String>);

impl LabelingList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn position(&self, text: &str) -> Option<usize> {
        self.0.iter().position(|row| row.trim() == text.trim())
    }

    pub fn to_text(&self) -> String {
        self.0.join("\n")
    }
}

/// Ordered `id:value` strength lines as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthList(pub Vec<String>);

impl StrengthList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_text(&self) -> String {
        self.0.join("\n")
    }
}

/// The external computation collaborator. Transport is up to the implementor.
#[async_trait]
pub trait SemanticsService: Send + Sync {
    async fn compute_extensions(
        &self,
        request: ExtensionRequest,
    ) -> Result<ServiceResponse, DesignerError>;

    async fn compute_strengths(
        &self,
        request: GradualRequest,
    ) -> Result<ServiceResponse, DesignerError>;

    async fn filter_labelings(
        &self,
        request: FilterRequest,
    ) -> Result<ServiceResponse, DesignerError>;
}
