use crate::{
    config::Limits,
    framework::{Framework, RelationSpec},
    properties::{canonical_id, RelationKind},
    validate::{validate_identifier, validate_weight, WeightKind},
};

use super::{
    diagnostic::{DescriptionErrors, DiagnosticKind},
    statement::{tokenize, Statement},
};

/// A relation statement that passed its own line checks, kept for the endpoint pass.
#[derive(Debug)]
struct PendingRelation {
    line: usize,
    spec: RelationSpec,
    source_valid: bool,
    target_valid: bool,
}

/// All-or-nothing parser for the description notation.
///
/// Every line is checked and every problem recorded before deciding, so a submission with
/// errors reports all of them together and never yields a partial [`Framework`].
#[derive(Debug, Clone, Default)]
pub struct DescriptionParser {
    limits: Limits,
}

impl DescriptionParser {
    pub fn new(limits: Limits) -> Self {
        DescriptionParser { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    #[tracing::instrument(skip_all)]
    pub fn parse(&self, text: &str) -> Result<Framework, DescriptionErrors> {
        let mut errors = DescriptionErrors::default();
        let mut framework = Framework::new();
        let mut attacks = Vec::new();
        let mut supports = Vec::new();

        let lines = text.lines().map(str::trim).filter(|line| !line.is_empty());
        for (index, line) in lines.enumerate() {
            let line_no = index + 1;
            match tokenize(line) {
                Statement::ArgumentDecl { id, weight } => {
                    let id_ok = self.check_identifier(line_no, id, &mut errors);
                    let weight = self.check_weight(line_no, weight, WeightKind::Node, &mut errors);
                    // A bad weight is already recorded; the id still counts as declared so
                    // relations naming it are not reported as undefined.
                    if id_ok {
                        framework.declare_argument(&canonical_id(id), weight.flatten());
                    }
                }
                Statement::Unrecognized => {
                    tracing::debug!("line {line_no}: unrecognized statement {line:?}");
                    errors.push(
                        line_no,
                        DiagnosticKind::Syntax {
                            text: line.to_string(),
                        },
                    );
                }
                statement => {
                    let Some((kind, source, target, weight)) = statement.as_relation() else {
                        continue;
                    };
                    let source_valid = self.check_identifier(line_no, source, &mut errors);
                    let target_valid = self.check_identifier(line_no, target, &mut errors);
                    let weight = self.check_weight(line_no, weight, WeightKind::Edge, &mut errors);
                    let pending = PendingRelation {
                        line: line_no,
                        spec: RelationSpec {
                            kind,
                            source: canonical_id(source),
                            target: canonical_id(target),
                            weight: weight.flatten(),
                        },
                        source_valid,
                        target_valid,
                    };
                    match kind {
                        RelationKind::Attack => attacks.push((pending, weight.is_some())),
                        RelationKind::Support => supports.push((pending, weight.is_some())),
                    }
                }
            }
        }

        // Endpoints may be declared after the relations that use them, so this runs once every
        // argument line has been seen.
        for (pending, weight_ok) in attacks.into_iter().chain(supports) {
            let PendingRelation {
                line,
                spec,
                source_valid,
                target_valid,
            } = pending;
            let mut endpoints_ok = source_valid && target_valid;
            if source_valid && !framework.contains_argument(&spec.source) {
                errors.push(
                    line,
                    DiagnosticKind::UndefinedSource {
                        kind: spec.kind,
                        id: spec.source.clone(),
                    },
                );
                endpoints_ok = false;
            }
            if target_valid && !framework.contains_argument(&spec.target) {
                errors.push(
                    line,
                    DiagnosticKind::UndefinedTarget {
                        kind: spec.kind,
                        id: spec.target.clone(),
                    },
                );
                endpoints_ok = false;
            }
            if endpoints_ok && weight_ok {
                framework.declare_relation(spec);
            }
        }

        if errors.is_empty() {
            tracing::debug!(
                "parsed {} arguments, {} attacks, {} supports",
                framework.arguments().len(),
                framework.attacks().len(),
                framework.supports().len()
            );
            Ok(framework)
        } else {
            tracing::debug!("description rejected with {} errors", errors.len());
            Err(errors)
        }
    }

    fn check_identifier(&self, line: usize, raw: &str, errors: &mut DescriptionErrors) -> bool {
        match validate_identifier(&self.limits, raw) {
            Ok(()) => true,
            Err(reason) => {
                errors.push(line, DiagnosticKind::Invalid(reason));
                false
            }
        }
    }

    /// `Some(weight)` when the weight is acceptable, `None` after recording the failure.
    fn check_weight(
        &self,
        line: usize,
        raw: Option<&str>,
        kind: WeightKind,
        errors: &mut DescriptionErrors,
    ) -> Option<Option<f64>> {
        match validate_weight(&self.limits, raw, kind) {
            Ok(weight) => Some(weight),
            Err(reason) => {
                errors.push(line, DiagnosticKind::Invalid(reason));
                None
            }
        }
    }
}

/// Parse a description with the given limits.
pub fn parse_description(text: &str, limits: &Limits) -> Result<Framework, DescriptionErrors> {
    DescriptionParser::new(limits.clone()).parse(text)
}
