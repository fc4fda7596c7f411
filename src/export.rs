//! Project export and import.
//!
//! Two formats are supported: `.apx`, which is just the description text, and `.json`, which
//! adds the project name, argument positions and descriptions, relation ids and the layout so
//! that a graph can be restored exactly as it was laid out.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    config::get_content,
    error::DesignerError,
    properties::{Position, RelationId, RelationKind},
    sync::{Session, SyncOutcome},
};

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Apx,
    Json,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, DesignerError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "apx" => Ok(ExportFormat::Apx),
            "json" => Ok(ExportFormat::Json),
            _ => Err(DesignerError::UnsupportedFormat(format!(
                "'{}'",
                path.display()
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Apx => "apx",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub project_name: String,
    pub export_date: String,
    pub version: String,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportNode {
    pub id: String,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEdge {
    pub id: RelationId,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: RelationKind,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportGraph {
    #[serde(default)]
    pub nodes: Vec<ExportNode>,
    #[serde(default)]
    pub edges: Vec<ExportEdge>,
}

/// The JSON export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectExport {
    #[serde(default)]
    pub metadata: Option<ExportMetadata>,
    #[serde(default)]
    pub graph: ExportGraph,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl ProjectExport {
    pub fn from_session(session: &Session) -> Self {
        let graph = session.graph();
        let nodes = graph
            .arguments()
            .map(|argument| ExportNode {
                id: argument.id.clone(),
                weight: argument.weight,
                description: argument.description.clone(),
                position: Some(argument.position),
            })
            .collect::<Vec<_>>();
        let edges = graph
            .relations()
            .map(|relation| ExportEdge {
                id: relation.id,
                source: relation.source.clone(),
                target: relation.target.clone(),
                kind: relation.kind,
                weight: relation.weight,
            })
            .collect::<Vec<_>>();
        ProjectExport {
            metadata: Some(ExportMetadata {
                project_name: session.project_name().to_string(),
                export_date: Utc::now().to_rfc3339(),
                version: EXPORT_VERSION.to_string(),
                node_count: nodes.len(),
                edge_count: edges.len(),
            }),
            graph: ExportGraph { nodes, edges },
            layout: Some(session.layout().to_string()),
            description: Some(session.description().to_string()),
        }
    }

    pub fn to_json(&self) -> Result<String, DesignerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self, DesignerError> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Render the session in `format`.
pub fn export(session: &Session, format: ExportFormat) -> Result<String, DesignerError> {
    match format {
        ExportFormat::Apx => Ok(session.description().to_string()),
        ExportFormat::Json => ProjectExport::from_session(session).to_json(),
    }
}

/// Write the session to `path`, picking the format from its extension.
pub fn export_file(session: &Session, path: &Path) -> Result<(), DesignerError> {
    let content = export(session, ExportFormat::from_path(path)?)?;
    fs::write(path, content)?;
    tracing::info!("Exported project '{}' to {}", session.project_name(), path.display());
    Ok(())
}

/// Apply a description read from an `.apx` file.
pub fn import_apx(session: &mut Session, content: &str) -> Result<SyncOutcome, DesignerError> {
    session.apply_description(content)
}

/// Restore a JSON export into `session`.
///
/// The description is applied first; positions and descriptions are then restored for the
/// arguments it declares, each only when the node carries it. Unknown node ids are ignored.
pub fn import_json(session: &mut Session, content: &str) -> Result<SyncOutcome, DesignerError> {
    let export = ProjectExport::from_json(content)?;
    if let Some(name) = export.metadata.as_ref().map(|m| m.project_name.as_str()) {
        if !name.trim().is_empty() {
            session.set_project_name(name);
        }
    }

    let outcome = match export.description.as_deref() {
        Some(description) if !description.trim().is_empty() => {
            session.apply_description(description)?
        }
        _ => SyncOutcome {
            classification: session.classification(),
            changed: false,
            events: vec![],
        },
    };

    let mut restored = 0;
    for node in export.graph.nodes {
        if session.restore_argument(&node.id, node.description, node.position) {
            restored += 1;
        } else {
            tracing::debug!("export names unknown argument '{}'", node.id);
        }
    }
    if let Some(layout) = export.layout.filter(|layout| !layout.trim().is_empty()) {
        session.set_layout(&layout);
    }
    session.reseed_relation_ids();
    tracing::debug!("restored {restored} argument layouts");
    Ok(outcome)
}

/// Start a new project from `path`. The project name defaults to the file stem.
pub fn import_file(session: &mut Session, path: &Path) -> Result<SyncOutcome, DesignerError> {
    let format = ExportFormat::from_path(path)?;
    let content = get_content(path)?;
    session.reset();
    if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
        session.set_project_name(stem);
    }
    let outcome = match format {
        ExportFormat::Apx => import_apx(session, &content),
        ExportFormat::Json => import_json(session, &content),
    }?;
    tracing::info!(
        "Imported {} as project '{}': {}",
        path.display(),
        session.project_name(),
        outcome.classification
    );
    Ok(outcome)
}

/// Default file name for exporting the session in `format`.
pub fn default_export_path(session: &Session, format: ExportFormat) -> PathBuf {
    PathBuf::from(format!("{}.{}", session.project_name(), format.extension()))
}

/// Where to export a session imported from `source`: `output`, or the default JSON path.
///
/// Refuses a destination that is the source file itself, so a `.json` project is never
/// overwritten by its own export.
pub fn export_destination(
    session: &Session,
    source: &Path,
    output: Option<PathBuf>,
) -> Result<PathBuf, DesignerError> {
    let output = output.unwrap_or_else(|| default_export_path(session, ExportFormat::Json));
    let same_file = match (fs::canonicalize(source), fs::canonicalize(&output)) {
        (Ok(source), Ok(output)) => source == output,
        _ => source == output,
    };
    if same_file {
        return Err(DesignerError::InvalidRequest(format!(
            "export would overwrite its source {}; choose another output",
            source.display()
        )));
    }
    Ok(output)
}
