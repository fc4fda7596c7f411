//! End-to-end tests for the text/graph synchronization session
//!
//! These tests drive a [`Session`] through its public API only:
//! - text edits reconciled into the graph
//! - direct graph edits serialized back into the description
//! - result projection through a mock semantics service
//! - project export and import

mod common;

use argdesigner_core::{
    classify::{DisplayMode, FrameworkCategory},
    codec::serialize_graph,
    event::GraphEvent,
    export::{default_export_path, export, export_file, import_file, ExportFormat, ProjectExport},
    overlay::{ResultList, STRENGTH_THRESHOLDS},
    properties::{NodeVisual, Position, RelationId, RelationKind},
    semantics::GradualSemantics,
    sync::{DescriptionDebouncer, Session, SyncMode},
    DesignerError,
};
use common::{init_logging, MockSemantics};
use std::time::Duration;
use tempfile::TempDir;
use test_log::test;
use tokio::sync::mpsc::unbounded_channel;

fn session(text: &str) -> Session {
    init_logging();
    let mut session = Session::default();
    session.apply_description(text).unwrap();
    session
}

#[test]
fn test_plain_attack_framework() {
    let session = session("arg(a).\narg(b).\natt(a,b).");
    let graph = session.graph();
    assert_eq!(graph.argument_count(), 2);
    assert_eq!(graph.relation_count(), 1);

    let relation = graph.relations().next().unwrap();
    assert_eq!(relation.kind, RelationKind::Attack);
    assert_eq!((relation.source.as_str(), relation.target.as_str()), ("a", "b"));
    assert!(relation.weight.is_none());
    assert!(graph.arguments().all(|a| a.weight.is_none()));

    let classification = session.classification();
    assert_eq!(classification.category, FrameworkCategory::Af);
    assert_eq!(classification.mode, DisplayMode::ExtensionBased);
}

#[test]
fn test_node_weight_makes_qbaf() {
    let session = session("arg(a,0.5).\narg(b).\nsupport(a,b).");
    assert_eq!(session.classification().category, FrameworkCategory::Qbaf);
    assert_eq!(session.classification().mode, DisplayMode::Gradual);
}

#[test]
fn test_undefined_target_leaves_graph_untouched() {
    let mut session = session("arg(x).\narg(y).\nsupport(x,y).");
    let before = serialize_graph(session.graph()).unwrap();
    let description = session.description().to_string();

    let err = session.apply_description("arg(a).\natt(a,c).").unwrap_err();
    let errors = err.diagnostics().expect("description errors");
    assert_eq!(errors.len(), 1);
    let error = errors.iter().next().unwrap();
    assert_eq!(error.line, 2);
    assert_eq!(
        error.to_string(),
        "Line 2: att error - target arg \"c\" is not defined"
    );

    assert_eq!(serialize_graph(session.graph()).unwrap(), before);
    assert_eq!(session.description(), description);
}

#[test]
fn test_labeling_projection() {
    let mut session = session("arg(a).\narg(b).\narg(c).\narg(d).\natt(a,b).");
    let (tx, mut rx) = unbounded_channel();
    session = session.with_events(tx);

    let service = MockSemantics {
        labelings: vec!["in(a) out(b) undecided(c)"],
        ..Default::default()
    };
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(session.compute_labelings(&service, None))
        .unwrap();
    session.select_labeling(ResultList::Primary, 0).unwrap();

    let visual = |id: &str| session.graph().argument(id).unwrap().visual;
    assert_eq!(visual("a"), NodeVisual::In);
    assert_eq!(visual("b"), NodeVisual::Out);
    assert_eq!(visual("c"), NodeVisual::Undecided);
    assert_eq!(visual("d"), NodeVisual::Default);

    // Result projection is not a structural change
    assert!(rx.try_recv().is_err());
    assert_eq!(session.description(), "arg(a).\narg(b).\narg(c).\narg(d).\natt(a,b).");
}

#[tokio::test]
async fn test_strength_projection() {
    let mut session = session("arg(a,0.5).\narg(b).\natt(a,b).");
    let service = MockSemantics {
        strengths: vec!["a:0.5", "b:1"],
        ..Default::default()
    };
    let applied = session.compute_strengths(&service, None).await.unwrap();
    assert_eq!(applied, 2);

    let a = session.graph().argument("a").unwrap();
    assert_eq!(a.strength, Some(0.5));
    let bucket = STRENGTH_THRESHOLDS.iter().position(|t| *t >= 0.5).unwrap();
    assert_eq!(a.visual, NodeVisual::Strength(bucket));
    assert_eq!(
        session.graph().argument("b").unwrap().visual,
        NodeVisual::Strength(STRENGTH_THRESHOLDS.len() - 1)
    );

    let requests = service.gradual_requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].sem, GradualSemantics::default());
    assert_eq!(requests[0].content, session.description());
}

#[tokio::test]
async fn test_filtered_selection_mirrors_primary() {
    let mut session = session("arg(a).\narg(b).\natt(a,b).\natt(b,a).");
    let service = MockSemantics {
        labelings: vec!["in(a) out(b)", "out(a) in(b)"],
        filtered: vec![vec!["out(a)", "in(b)"]],
        ..Default::default()
    };
    session.compute_labelings(&service, Some("preferred")).await.unwrap();
    let filtered = session
        .filter_labelings(&service, "\nin(b)\n\n")
        .await
        .unwrap();
    assert_eq!(filtered.get(0), Some("out(a) in(b)"));

    let request = service.filter_requests.lock().unwrap()[0].clone();
    assert_eq!(request.constraints, vec!["in(b)".to_string()]);
    assert_eq!(request.labelings[0], vec!["in(a)".to_string(), "out(b)".to_string()]);
    assert_eq!(
        service.extension_requests.lock().unwrap()[0].semantics,
        "preferred"
    );

    session.select_labeling(ResultList::Filtered, 0).unwrap();
    assert_eq!(session.overlay().selected(ResultList::Primary), Some(1));
    assert_eq!(session.graph().argument("a").unwrap().visual, NodeVisual::Out);

    // Deselecting clears both lists and every visual
    session.select_labeling(ResultList::Filtered, 0).unwrap();
    assert_eq!(session.overlay().selected(ResultList::Primary), None);
    assert!(session
        .graph()
        .arguments()
        .all(|a| a.visual == NodeVisual::Default));
}

#[tokio::test]
async fn test_service_errors_are_surfaced() {
    let mut session = session("arg(a).");
    let service = MockSemantics {
        error: Some("solver unavailable"),
        ..Default::default()
    };
    let err = session.compute_labelings(&service, None).await.unwrap_err();
    assert!(matches!(err, DesignerError::Service(ref msg) if msg == "solver unavailable"));

    // Empty description never reaches the service
    let mut empty = Session::default();
    let err = empty.compute_strengths(&service, None).await.unwrap_err();
    assert!(matches!(err, DesignerError::InvalidRequest(_)));
    assert!(service.gradual_requests.lock().unwrap().is_empty());

    // No labelings to filter yet
    let err = session.filter_labelings(&service, "in(a)").await.unwrap_err();
    assert!(matches!(err, DesignerError::InvalidRequest(_)));
}

#[test]
fn test_text_edit_keeps_layout_and_relation_ids() {
    let mut session = session("arg(a).\narg(b).\nsupport(a,b).");
    session.move_argument("a", Position::new(42.0, 7.0)).unwrap();
    let rel = session.graph().relation_ids().next().unwrap();

    let outcome = session
        .apply_description("arg(a).\narg(b,0.3).\nsupport(a,b).\natt(b,a).")
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.classification.category, FrameworkCategory::Qbaf);

    let graph = session.graph();
    assert_eq!(graph.argument("a").unwrap().position, Position::new(42.0, 7.0));
    assert_eq!(graph.relation(rel).unwrap().kind, RelationKind::Support);
    assert_eq!(graph.relation_count(), 2);
    assert!(graph.relation(RelationId::new(2)).is_some());
}

#[test]
fn test_text_application_does_not_rewrite_text() {
    let typed = "arg(B).\n   arg(a,0.50).\n\natt(B,a).";
    let session = session(typed);
    assert_eq!(session.description(), typed);
    assert_eq!(session.mode(), SyncMode::Idle);
    assert!(session.graph().contains_argument("b"));
}

#[test]
fn test_direct_edits_rewrite_description() {
    let (tx, mut rx) = unbounded_channel();
    let mut session = Session::default().with_events(tx);
    session.apply_description("arg(a).\narg(b).\natt(a,b).").unwrap();
    while rx.try_recv().is_ok() {}

    session
        .add_argument("c", None, Some("a third view"), Position::new(0.0, 240.0))
        .unwrap();
    session
        .add_relation("c", "a", RelationKind::Support, Some(0.7))
        .unwrap();
    assert_eq!(
        session.description(),
        "arg(a).\narg(b).\narg(c).\natt(a,b).\nsupport(c,a,0.7)."
    );
    assert_eq!(session.classification().category, FrameworkCategory::Wbaf);

    let rel = session.graph().relation_ids().next().unwrap();
    session.switch_relation_kind(rel).unwrap();
    assert_eq!(
        session.description(),
        "arg(a).\narg(b).\narg(c).\nsupport(a,b).\nsupport(c,a,0.7)."
    );

    session.edit_argument("a", "z", Some(0.1), None).unwrap();
    assert_eq!(
        session.description(),
        "arg(b).\narg(c).\narg(z,0.1).\nsupport(z,b).\nsupport(c,z,0.7)."
    );

    session.remove_argument("c").unwrap();
    assert_eq!(session.description(), "arg(b).\narg(z,0.1).\nsupport(z,b).");

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    assert!(events.contains(&GraphEvent::ArgumentAdded("c".to_string())));
    assert!(events.contains(&GraphEvent::ArgumentRemoved("c".to_string())));
}

#[test]
fn test_invalid_direct_edits_are_rejected() {
    let mut session = session("arg(a).\narg(b).\natt(a,b).");
    let description = session.description().to_string();

    assert!(session
        .add_argument("a", None, None, Position::default())
        .is_err());
    assert!(session
        .add_argument("bad id", None, None, Position::default())
        .is_err());
    assert!(session
        .add_argument("c", Some(1.5), None, Position::default())
        .is_err());
    assert!(matches!(
        session.add_relation("a", "b", RelationKind::Attack, None),
        Err(DesignerError::DuplicateRelation(_))
    ));
    assert!(session
        .add_relation("a", "missing", RelationKind::Attack, None)
        .is_err());

    assert_eq!(session.description(), description);
    assert_eq!(session.graph().argument_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_debounced_edits_apply_last_text() {
    init_logging();
    let (sender, mut debouncer) = DescriptionDebouncer::channel(Duration::from_millis(100));
    let mut session = Session::default();

    sender.submit("arg(a).").unwrap();
    sender.submit("arg(a).\narg(b).").unwrap();
    sender.submit("arg(a).\narg(b).\natt(a,b).").unwrap();

    let outcome = session.apply_next_settled(&mut debouncer).await.unwrap().unwrap();
    assert_eq!(outcome.events.len(), 3);
    assert_eq!(session.graph().relation_count(), 1);

    drop(sender);
    assert!(session.apply_next_settled(&mut debouncer).await.is_none());
}

#[test]
fn test_json_export_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = session("arg(a,0.5).\narg(b).\natt(a,b,0.25).");
    session.set_project_name("debate");
    session.set_layout("dagre");
    session.move_argument("b", Position::new(300.0, 12.5)).unwrap();
    session
        .edit_argument("a", "a", Some(0.5), Some("the opening claim"))
        .unwrap();

    let path = temp_dir
        .path()
        .join(default_export_path(&session, ExportFormat::Json));
    export_file(&session, &path).unwrap();
    assert!(path.ends_with("debate.json"));

    let export = ProjectExport::from_json(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let metadata = export.metadata.unwrap();
    assert_eq!(metadata.project_name, "debate");
    assert_eq!((metadata.node_count, metadata.edge_count), (2, 1));

    let mut restored = Session::default();
    import_file(&mut restored, &path).unwrap();
    assert_eq!(restored.project_name(), "debate");
    assert_eq!(restored.layout(), "dagre");
    assert_eq!(restored.description(), session.description());

    let b = restored.graph().argument("b").unwrap();
    assert_eq!(b.position, Position::new(300.0, 12.5));
    let a = restored.graph().argument("a").unwrap();
    assert_eq!(a.description.as_deref(), Some("the opening claim"));

    // New relations continue after the restored ids
    restored
        .add_relation("b", "a", RelationKind::Support, None)
        .unwrap();
    assert!(restored.graph().relation(RelationId::new(2)).is_some());
}

#[test]
fn test_apx_import_uses_file_stem() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lecture.APX");
    std::fs::write(&path, "arg(a).\narg(b).\nsupport(a,b).\n").unwrap();

    let mut session = session("arg(old).");
    let outcome = import_file(&mut session, &path).unwrap();
    assert_eq!(outcome.classification.category, FrameworkCategory::Baf);
    assert_eq!(session.project_name(), "lecture");
    assert!(!session.graph().contains_argument("old"));
    assert_eq!(
        export(&session, ExportFormat::Apx).unwrap(),
        "arg(a).\narg(b).\nsupport(a,b).\n"
    );
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("graph.txt");
    std::fs::write(&path, "arg(a).").unwrap();

    let mut session = Session::default();
    assert!(matches!(
        import_file(&mut session, &path),
        Err(DesignerError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        export_file(&session, &path),
        Err(DesignerError::UnsupportedFormat(_))
    ));
}
