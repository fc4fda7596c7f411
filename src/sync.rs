//! Two-way synchronization between the textual description and the live graph.
//!
//! A [`Session`] owns the graph, the description text and the result overlay. Text flows into
//! the graph through [`Session::apply_description`]; direct graph edits flow back into the text
//! by re-serializing the graph. [`SyncMode`] records which direction is in progress so that
//! graph events raised while applying text never trigger the inverse rewrite.
//!
//! Rapid text edits are coalesced by a [`DescriptionDebouncer`] before they reach the session.

use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::{
    classify::{classify, Classification},
    codec::{serialize_graph, DescriptionParser},
    config::DesignerConfig,
    error::DesignerError,
    event::GraphEvent,
    framework::Framework,
    graph::{reconcile, ArgGraph},
    overlay::{ResultList, ResultOverlay},
    properties::{canonical_id, Argument, Position, RelationId, RelationKind},
    semantics::{
        ExtensionRequest, FilterRequest, GradualParams, GradualRequest, LabelingList,
        SemanticsService, StrengthList,
    },
    validate::{check_weight, validate_free_text, validate_identifier, WeightKind},
};

/// Spacing of the default placement grid for arguments created from text.
const GRID_STEP: f64 = 120.0;
const GRID_COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncMode {
    #[default]
    Idle,
    ApplyingTextToGraph,
    ApplyingGraphToText,
}

/// What a sync step did and how the framework classifies afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    pub classification: Classification,
    pub changed: bool,
    pub events: Vec<GraphEvent>,
}

/// Grid position for the `slot`-th argument.
pub fn grid_placement(slot: usize) -> Position {
    Position::new(
        (slot % GRID_COLUMNS) as f64 * GRID_STEP,
        (slot / GRID_COLUMNS) as f64 * GRID_STEP,
    )
}

#[derive(Debug)]
pub struct Session {
    config: DesignerConfig,
    parser: DescriptionParser,
    graph: ArgGraph,
    description: String,
    last_applied: Option<String>,
    overlay: ResultOverlay,
    mode: SyncMode,
    events_tx: Option<UnboundedSender<GraphEvent>>,
    project_name: String,
    layout: String,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(DesignerConfig::default())
    }
}

impl Session {
    pub fn new(config: DesignerConfig) -> Self {
        Session {
            parser: DescriptionParser::new(config.limits.clone()),
            graph: ArgGraph::new(),
            description: String::new(),
            last_applied: None,
            overlay: ResultOverlay::new(),
            mode: SyncMode::Idle,
            events_tx: None,
            project_name: config.defaults.project_name.clone(),
            layout: config.defaults.layout.clone(),
            config,
        }
    }

    /// Forward every structural [`GraphEvent`] to `tx`.
    pub fn with_events(mut self, tx: UnboundedSender<GraphEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    pub fn config(&self) -> &DesignerConfig {
        &self.config
    }

    pub fn graph(&self) -> &ArgGraph {
        &self.graph
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn overlay(&self) -> &ResultOverlay {
        &self.overlay
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn set_project_name(&mut self, name: &str) {
        let name = name.trim();
        self.project_name = if name.is_empty() {
            self.config.defaults.project_name.clone()
        } else {
            name.to_string()
        };
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: &str) {
        self.layout = layout.to_string();
    }

    pub fn classification(&self) -> Classification {
        classify(&self.graph)
    }

    /// Parse the description without applying it.
    pub fn check_description(&self, text: &str) -> Result<Framework, DesignerError> {
        Ok(self.parser.parse(text)?)
    }

    /// Apply `text`, placing new arguments on the default grid.
    pub fn apply_description(&mut self, text: &str) -> Result<SyncOutcome, DesignerError> {
        let mut slot = self.graph.argument_count();
        self.apply_description_with(text, move |_| {
            let position = grid_placement(slot);
            slot += 1;
            position
        })
    }

    /// Parse `text` and, when it is valid and differs from the last applied text, reconcile the
    /// graph to it. On any diagnostic the graph and overlay are left untouched.
    pub fn apply_description_with<F>(
        &mut self,
        text: &str,
        placement: F,
    ) -> Result<SyncOutcome, DesignerError>
    where
        F: FnMut(&str) -> Position,
    {
        let framework = match self.parser.parse(text) {
            Ok(framework) => framework,
            Err(errors) => {
                tracing::debug!("description rejected: {} errors", errors.len());
                return Err(errors.into());
            }
        };
        self.description = text.to_string();

        let trimmed = text.trim();
        if self.last_applied.as_deref() == Some(trimmed) {
            return Ok(self.outcome(vec![]));
        }

        self.mode = SyncMode::ApplyingTextToGraph;
        let result = self.apply_framework(&framework, placement);
        self.mode = SyncMode::Idle;
        let events = result?;
        self.last_applied = Some(trimmed.to_string());
        Ok(self.outcome(events))
    }

    fn apply_framework<F>(
        &mut self,
        framework: &Framework,
        placement: F,
    ) -> Result<Vec<GraphEvent>, DesignerError>
    where
        F: FnMut(&str) -> Position,
    {
        self.overlay.reset(&mut self.graph);
        let reconciliation = reconcile(&mut self.graph, framework, placement)?;
        self.dispatch(&reconciliation.events)?;
        Ok(reconciliation.events)
    }

    /// Forward events to the listener and, when no sync is in progress, rewrite the description.
    fn dispatch(&mut self, events: &[GraphEvent]) -> Result<(), DesignerError> {
        if events.is_empty() {
            return Ok(());
        }
        let listener_gone = match &self.events_tx {
            Some(tx) => events.iter().any(|event| tx.send(event.clone()).is_err()),
            None => false,
        };
        if listener_gone {
            tracing::warn!("graph event listener dropped, no longer forwarding events");
            self.events_tx = None;
        }
        match self.mode {
            SyncMode::Idle => self.sync_description_from_graph(),
            mode => {
                tracing::debug!("{} events during {mode:?}, inverse sync suppressed", events.len());
                Ok(())
            }
        }
    }

    /// Replace the description with the canonical text of the graph.
    pub fn sync_description_from_graph(&mut self) -> Result<(), DesignerError> {
        self.mode = SyncMode::ApplyingGraphToText;
        self.overlay.reset(&mut self.graph);
        let text = serialize_graph(&self.graph);
        self.mode = SyncMode::Idle;
        self.description = text?;
        self.last_applied = Some(self.description.trim().to_string());
        Ok(())
    }

    fn outcome(&self, events: Vec<GraphEvent>) -> SyncOutcome {
        SyncOutcome {
            classification: self.classification(),
            changed: !events.is_empty(),
            events,
        }
    }

    fn after_edit(&mut self, events: Vec<GraphEvent>) -> Result<SyncOutcome, DesignerError> {
        self.dispatch(&events)?;
        Ok(self.outcome(events))
    }

    fn validated_text(&self, text: Option<&str>) -> Result<Option<String>, DesignerError> {
        match text.map(str::trim).filter(|t| !t.is_empty()) {
            Some(text) => {
                validate_free_text(&self.config.limits, text)?;
                Ok(Some(text.to_string()))
            }
            None => Ok(None),
        }
    }

    fn rejected<T>(&self, op: &str, err: DesignerError) -> Result<T, DesignerError> {
        tracing::warn!("{op} rejected: {err}");
        Err(err)
    }

    pub fn add_argument(
        &mut self,
        id: &str,
        weight: Option<f64>,
        description: Option<&str>,
        position: Position,
    ) -> Result<SyncOutcome, DesignerError> {
        let limits = &self.config.limits;
        if let Err(err) = validate_identifier(limits, id)
            .and_then(|_| check_weight(limits, weight, WeightKind::Node))
        {
            return self.rejected("add argument", err.into());
        }
        let description = self.validated_text(description)?;
        let argument = Argument::new(id)
            .with_weight(weight)
            .with_description(description)
            .at(position);
        let event = match self.graph.insert_argument(argument) {
            Ok(event) => event,
            Err(err) => return self.rejected("add argument", err),
        };
        self.after_edit(vec![event])
    }

    /// Rename and/or update an argument. Renaming keeps its position and relations.
    pub fn edit_argument(
        &mut self,
        id: &str,
        new_id: &str,
        weight: Option<f64>,
        description: Option<&str>,
    ) -> Result<SyncOutcome, DesignerError> {
        let limits = &self.config.limits;
        if let Err(err) = validate_identifier(limits, new_id)
            .and_then(|_| check_weight(limits, weight, WeightKind::Node))
        {
            return self.rejected("edit argument", err.into());
        }
        let description = self.validated_text(description)?;
        if !self.graph.contains_argument(id) {
            return self.rejected(
                "edit argument",
                DesignerError::NotFound(format!("argument '{}'", canonical_id(id))),
            );
        }

        let mut events = match self.graph.rename_argument(id, new_id) {
            Ok(events) => events,
            Err(err) => return self.rejected("edit argument", err),
        };
        let current = canonical_id(new_id);
        events.extend(self.graph.set_argument_weight(&current, weight));
        if let Some(argument) = self.graph.argument_mut(&current) {
            if argument.description != description {
                argument.description = description;
                let updated = GraphEvent::ArgumentUpdated(current.clone());
                if !events.contains(&updated) {
                    events.push(updated);
                }
            }
        }
        self.after_edit(events)
    }

    /// Visual only: positions are not part of the description.
    pub fn move_argument(&mut self, id: &str, position: Position) -> Result<(), DesignerError> {
        match self.graph.argument_mut(id) {
            Some(argument) => {
                argument.position = position;
                Ok(())
            }
            None => Err(DesignerError::NotFound(format!("argument '{}'", canonical_id(id)))),
        }
    }

    pub fn remove_argument(&mut self, id: &str) -> Result<SyncOutcome, DesignerError> {
        let events = self.graph.remove_argument(id)?;
        self.after_edit(events)
    }

    /// Remove every relation touching `id`, keeping the argument.
    pub fn clear_relations(&mut self, id: &str) -> Result<SyncOutcome, DesignerError> {
        if !self.graph.contains_argument(id) {
            return Err(DesignerError::NotFound(format!(
                "argument '{}'",
                canonical_id(id)
            )));
        }
        let mut events = Vec::new();
        for relation_id in self.graph.incident_relations(id) {
            events.push(self.graph.remove_relation(relation_id)?);
        }
        self.after_edit(events)
    }

    pub fn add_relation(
        &mut self,
        source: &str,
        target: &str,
        kind: RelationKind,
        weight: Option<f64>,
    ) -> Result<SyncOutcome, DesignerError> {
        if let Err(err) = check_weight(&self.config.limits, weight, WeightKind::Edge) {
            return self.rejected("add relation", err.into());
        }
        let event = match self.graph.insert_relation(kind, source, target, weight) {
            Ok((_, event)) => event,
            Err(err) => return self.rejected("add relation", err),
        };
        self.after_edit(vec![event])
    }

    pub fn edit_relation(
        &mut self,
        id: RelationId,
        kind: RelationKind,
        weight: Option<f64>,
    ) -> Result<SyncOutcome, DesignerError> {
        if let Err(err) = check_weight(&self.config.limits, weight, WeightKind::Edge) {
            return self.rejected("edit relation", err.into());
        }
        let mut events: Vec<GraphEvent> = match self.graph.set_relation_kind(id, kind) {
            Ok(event) => event.into_iter().collect(),
            Err(err) => return self.rejected("edit relation", err),
        };
        if let Some(event) = self.graph.set_relation_weight(id, weight) {
            if !events.contains(&event) {
                events.push(event);
            }
        }
        self.after_edit(events)
    }

    pub fn reverse_relation(&mut self, id: RelationId) -> Result<SyncOutcome, DesignerError> {
        match self.graph.reverse_relation(id) {
            Ok(event) => self.after_edit(vec![event]),
            Err(err) => self.rejected("reverse relation", err),
        }
    }

    /// Turn an attack into a support or vice versa.
    pub fn switch_relation_kind(&mut self, id: RelationId) -> Result<SyncOutcome, DesignerError> {
        let Some(kind) = self.graph.relation(id).map(|r| r.kind.opposite()) else {
            return Err(DesignerError::NotFound(format!("relation '{id}'")));
        };
        match self.graph.set_relation_kind(id, kind) {
            Ok(event) => self.after_edit(event.into_iter().collect()),
            Err(err) => self.rejected("switch relation", err),
        }
    }

    pub fn remove_relation(&mut self, id: RelationId) -> Result<SyncOutcome, DesignerError> {
        let event = self.graph.remove_relation(id)?;
        self.after_edit(vec![event])
    }

    /// Start a new project: empty graph, empty text, no results, relation ids from 1.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.description.clear();
        self.last_applied = None;
        self.overlay = ResultOverlay::new();
        self.mode = SyncMode::Idle;
        self.project_name = self.config.defaults.project_name.clone();
        self.layout = self.config.defaults.layout.clone();
    }

    /// Restore attributes the description does not carry, after the description was applied.
    /// Each attribute is only written when present.
    pub(crate) fn restore_argument(
        &mut self,
        id: &str,
        description: Option<String>,
        position: Option<Position>,
    ) -> bool {
        match self.graph.argument_mut(id) {
            Some(argument) => {
                if description.is_some() {
                    argument.description = description;
                }
                if let Some(position) = position {
                    argument.position = position;
                }
                true
            }
            None => false,
        }
    }

    pub(crate) fn reseed_relation_ids(&mut self) {
        self.graph.reseed_relation_ids();
    }

    pub fn select_labeling(&mut self, list: ResultList, idx: usize) -> Result<(), DesignerError> {
        self.overlay.select(&mut self.graph, list, idx)
    }

    /// Re-project strength lines edited by hand.
    pub fn apply_strength_text(&mut self, text: &str) -> usize {
        let lines = text.lines().map(str::to_string).collect();
        self.overlay.apply_strengths(&mut self.graph, StrengthList(lines))
    }

    pub fn reset_results(&mut self) {
        self.overlay.reset(&mut self.graph);
    }

    pub fn reset_filtered(&mut self) {
        self.overlay.reset_filtered(&mut self.graph);
    }

    /// Request extension-based labelings for the current description.
    pub async fn compute_labelings(
        &mut self,
        service: &dyn SemanticsService,
        semantics: Option<&str>,
    ) -> Result<&LabelingList, DesignerError> {
        let semantics = semantics.unwrap_or(self.config.defaults.extension_semantics.as_str());
        let request = ExtensionRequest::new(semantics, &self.description)?;
        tracing::debug!("requesting {} labelings", request.semantics);
        let labelings = service.compute_extensions(request).await?.into_labelings()?;
        self.overlay.set_labelings(&mut self.graph, labelings);
        Ok(self.overlay.labelings(ResultList::Primary))
    }

    /// Request gradual strengths and project them. Returns the number of arguments colored.
    pub async fn compute_strengths(
        &mut self,
        service: &dyn SemanticsService,
        params: Option<&GradualParams>,
    ) -> Result<usize, DesignerError> {
        let defaults = GradualParams::from(&self.config.defaults.gradual);
        let request = GradualRequest::new(&self.description, params.unwrap_or(&defaults))?;
        tracing::debug!("requesting {} strengths", request.sem);
        let strengths = service.compute_strengths(request).await?.into_strengths()?;
        Ok(self.overlay.apply_strengths(&mut self.graph, strengths))
    }

    /// Filter the primary labelings by newline separated constraints.
    pub async fn filter_labelings(
        &mut self,
        service: &dyn SemanticsService,
        constraints: &str,
    ) -> Result<&LabelingList, DesignerError> {
        let request =
            FilterRequest::new(self.overlay.labelings(ResultList::Primary), constraints)?;
        let filtered = service
            .filter_labelings(request)
            .await?
            .into_filtered_labelings()?;
        self.overlay.set_filtered(&mut self.graph, filtered);
        Ok(self.overlay.labelings(ResultList::Filtered))
    }

    /// Wait for the next settled description and apply it. `None` once the senders are gone.
    pub async fn apply_next_settled(
        &mut self,
        debouncer: &mut DescriptionDebouncer,
    ) -> Option<Result<SyncOutcome, DesignerError>> {
        let text = debouncer.settled().await?;
        Some(self.apply_description(&text))
    }
}

/// Producer side of a [`DescriptionDebouncer`].
#[derive(Debug, Clone)]
pub struct DescriptionSender {
    tx: UnboundedSender<String>,
}

impl DescriptionSender {
    pub fn submit(&self, text: impl Into<String>) -> Result<(), DesignerError> {
        self.tx.send(text.into())?;
        Ok(())
    }
}

/// Coalesces description submissions: only the last text of a burst is emitted, once no newer
/// text has arrived for the whole window.
#[derive(Debug)]
pub struct DescriptionDebouncer {
    rx: UnboundedReceiver<String>,
    window: Duration,
}

impl DescriptionDebouncer {
    pub fn channel(window: Duration) -> (DescriptionSender, DescriptionDebouncer) {
        let (tx, rx) = unbounded_channel();
        (DescriptionSender { tx }, DescriptionDebouncer { rx, window })
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// The latest text once the burst settles, or `None` when all senders are dropped and
    /// nothing is pending.
    pub async fn settled(&mut self) -> Option<String> {
        let mut latest = self.rx.recv().await?;
        loop {
            tokio::select! {
                next = self.rx.recv() => match next {
                    Some(text) => {
                        tracing::trace!("description superseded before the window elapsed");
                        latest = text;
                    }
                    None => return Some(latest),
                },
                _ = tokio::time::sleep(self.window) => return Some(latest),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{classify::FrameworkCategory, tests::init_logging};

    fn session(text: &str) -> Session {
        let mut session = Session::default();
        session.apply_description(text).unwrap();
        session
    }

    #[test]
    fn text_application_keeps_the_typed_text() {
        init_logging();
        let typed = "arg(A).\n\n   arg(b, 0.5).\natt(a,B).";
        let (tx, mut rx) = unbounded_channel();
        let mut session = Session::default().with_events(tx);
        let outcome = session.apply_description(typed).unwrap();

        assert!(outcome.changed);
        assert_eq!(outcome.classification.category, FrameworkCategory::Qbaf);
        // No inverse rewrite into canonical form while applying text
        assert_eq!(session.description(), typed);
        assert_eq!(session.mode(), SyncMode::Idle);

        let mut forwarded = Vec::new();
        while let Ok(event) = rx.try_recv() {
            forwarded.push(event);
        }
        assert_eq!(forwarded, outcome.events);
    }

    #[test]
    fn unchanged_text_is_not_reapplied() {
        let mut session = session("arg(a).\narg(b).");
        session.move_argument("a", Position::new(5.0, 5.0)).unwrap();
        let outcome = session.apply_description("  arg(a).\narg(b).  ").unwrap();
        assert!(!outcome.changed);
        assert_eq!(
            session.graph().argument("a").unwrap().position,
            Position::new(5.0, 5.0)
        );
    }

    #[test]
    fn invalid_text_leaves_everything_untouched() {
        let mut session = session("arg(a).\narg(b).\natt(a,b).");
        session.apply_strength_text("a:0.5");
        let err = session.apply_description("arg(a).\natt(a,c).").unwrap_err();
        let diagnostics = err.diagnostics().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.0[0].line, 2);
        assert_eq!(session.graph().argument_count(), 2);
        assert_eq!(session.description(), "arg(a).\narg(b).\natt(a,b).");
        assert_eq!(session.graph().argument("a").unwrap().strength, Some(0.5));
    }

    #[test]
    fn direct_edits_rewrite_the_description() {
        let mut session = session("arg(A).\n   arg(b).");
        session
            .add_argument("C", Some(0.25), Some("Third claim."), Position::new(1.0, 1.0))
            .unwrap();
        assert_eq!(session.description(), "arg(a).\narg(b).\narg(c,0.25).");

        let outcome = session
            .add_relation("c", "a", RelationKind::Support, None)
            .unwrap();
        assert_eq!(outcome.events, vec![GraphEvent::RelationAdded(RelationId::new(1))]);
        assert_eq!(outcome.classification.category, FrameworkCategory::Qbaf);
        assert!(session.description().ends_with("support(c,a)."));

        session.switch_relation_kind(RelationId::new(1)).unwrap();
        session.reverse_relation(RelationId::new(1)).unwrap();
        assert!(session.description().ends_with("att(a,c)."));

        session.edit_argument("c", "d", None, None).unwrap();
        assert_eq!(session.description(), "arg(a).\narg(b).\narg(d).\natt(a,d).");
        assert_eq!(session.graph().argument("d").unwrap().position, Position::new(1.0, 1.0));
        assert_eq!(session.graph().argument("d").unwrap().description, None);

        session
            .edit_relation(RelationId::new(1), RelationKind::Attack, Some(0.75))
            .unwrap();
        assert!(session.description().ends_with("att(a,d,0.75)."));

        session.clear_relations("d").unwrap();
        assert_eq!(session.graph().relation_count(), 0);
        session.remove_argument("b").unwrap();
        assert_eq!(session.description(), "arg(a).\narg(d).");
        assert_eq!(session.mode(), SyncMode::Idle);
    }

    #[test]
    fn rejected_edits_change_nothing() {
        let mut session = session("arg(a).\narg(b).\natt(a,b).");
        let before = session.description().to_string();

        assert!(matches!(
            session.add_argument("B", None, None, Position::default()),
            Err(DesignerError::DuplicateArgument(_))
        ));
        assert!(matches!(
            session.add_argument("b-2", None, None, Position::default()),
            Err(DesignerError::Validation(_))
        ));
        assert!(matches!(
            session.add_argument("c", Some(1.2), None, Position::default()),
            Err(DesignerError::Validation(_))
        ));
        assert!(matches!(
            session.add_argument("c", None, Some("50% sure"), Position::default()),
            Err(DesignerError::Validation(_))
        ));
        assert!(matches!(
            session.add_relation("a", "b", RelationKind::Attack, Some(0.5)),
            Err(DesignerError::DuplicateRelation(_))
        ));
        assert!(matches!(
            session.edit_argument("a", "b", None, None),
            Err(DesignerError::DuplicateArgument(_))
        ));
        assert!(matches!(
            session.remove_relation(RelationId::new(9)),
            Err(DesignerError::NotFound(_))
        ));
        assert_eq!(session.description(), before);
        assert_eq!(session.graph().argument_count(), 2);
    }

    #[test]
    fn structural_edits_discard_results() {
        let mut session = session("arg(a).\narg(b).");
        session.apply_strength_text("a:0.9\nb:0.1");
        assert_eq!(session.graph().argument("b").unwrap().strength, Some(0.1));
        session.add_relation("a", "b", RelationKind::Attack, None).unwrap();
        assert!(session.graph().arguments().all(|a| a.strength.is_none()));
    }

    #[test]
    fn reset_starts_a_new_project() {
        let mut session = session("arg(a).\narg(b).\natt(a,b).");
        session.set_project_name("demo");
        session.reset();
        assert!(session.graph().is_empty());
        assert_eq!(session.description(), "");
        assert_eq!(session.project_name(), "graph");
        assert_eq!(session.graph().next_relation_number(), 1);
        // The same text applies again after a reset
        assert!(session.apply_description("arg(a).").unwrap().changed);
    }

    #[test]
    fn new_arguments_land_on_the_grid() {
        let session = session("arg(a).\narg(b).");
        assert_eq!(session.graph().argument("a").unwrap().position, grid_placement(0));
        assert_eq!(
            session.graph().argument("b").unwrap().position,
            Position::new(GRID_STEP, 0.0)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_emits_only_the_last_text() {
        let (sender, mut debouncer) = DescriptionDebouncer::channel(Duration::from_millis(100));
        sender.submit("arg(a).").unwrap();
        sender.submit("arg(a).\narg(b).").unwrap();
        sender.submit("arg(a).\narg(b).\natt(a,b).").unwrap();
        assert_eq!(
            debouncer.settled().await.as_deref(),
            Some("arg(a).\narg(b).\natt(a,b).")
        );

        let mut session = Session::default();
        sender.submit("arg(x).").unwrap();
        let outcome = session.apply_next_settled(&mut debouncer).await.unwrap().unwrap();
        assert!(outcome.changed);
        assert!(session.graph().contains_argument("x"));

        drop(sender);
        assert!(debouncer.settled().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn debouncer_waits_for_a_quiet_window() {
        let (sender, mut debouncer) = DescriptionDebouncer::channel(Duration::from_millis(100));
        let producer = tokio::spawn(async move {
            for i in 0..3 {
                sender.submit(format!("arg(a{i}).")).unwrap();
                tokio::time::sleep(Duration::from_millis(60)).await;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
            sender.submit("arg(late).").unwrap();
            sender
        });
        assert_eq!(debouncer.settled().await.as_deref(), Some("arg(a2)."));
        assert_eq!(debouncer.settled().await.as_deref(), Some("arg(late)."));
        let _sender = producer.await.unwrap();
    }
}
