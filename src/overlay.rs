//! Result overlay: projects computed labelings and strengths onto argument visual state.
//!
//! The overlay writes only [`Argument::visual`](crate::properties::Argument) and
//! [`Argument::strength`](crate::properties::Argument); it never touches structure, so it
//! produces no [`GraphEvent`](crate::event::GraphEvent)s.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    error::DesignerError,
    graph::ArgGraph,
    properties::{canonical_id, NodeVisual},
    semantics::{LabelingList, StrengthList},
};

/// Ascending upper bounds of the strength buckets.
pub const STRENGTH_THRESHOLDS: [f64; 29] = [
    0.0, 0.036, 0.071, 0.107, 0.143, 0.179, 0.214, 0.25, 0.286, 0.321, 0.357, 0.393, 0.429, 0.464,
    0.5, 0.536, 0.571, 0.607, 0.643, 0.679, 0.714, 0.75, 0.786, 0.821, 0.857, 0.893, 0.929, 0.964,
    1.0,
];

/// Fill colors, red through amber to green, one per strength bucket.
pub const STRENGTH_FILL: [&str; 29] = [
    "#ce2222", "#d12c23", "#d53725", "#d84227", "#dc4d29", "#df582b", "#e3632d", "#e66e2f",
    "#ea7831", "#ed8333", "#f18e35", "#f49937", "#f8a439", "#fbaf3b", "#ffba3d", "#f0b93e",
    "#e1b93f", "#d2b940", "#c3b941", "#b5b942", "#a6b943", "#97b945", "#88b946", "#79b947",
    "#6bb948", "#5cb949", "#4db94a", "#3eb94b", "#30b94d",
];

pub const STRENGTH_BORDER: [&str; 29] = [
    "#971919", "#99201a", "#9b281b", "#9d301d", "#9f381e", "#a23f1f", "#a44721", "#a64f22",
    "#a85723", "#aa5f25", "#ad6626", "#af6e27", "#b17629", "#b37e2a", "#b6862c", "#ab852c",
    "#a0842d", "#96832d", "#8b832e", "#80822f", "#76812f", "#6b8130", "#608031", "#567f31",
    "#4b7e32", "#407e33", "#367d33", "#2b7c34", "#217c35",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeColors {
    pub fill: &'static str,
    pub border: &'static str,
}

impl NodeColors {
    pub const DEFAULT: NodeColors = NodeColors {
        fill: "#1976d2",
        border: "#145a86",
    };
    pub const IN: NodeColors = NodeColors {
        fill: "#30b94d",
        border: "#217c35",
    };
    pub const OUT: NodeColors = NodeColors {
        fill: "#ce2222",
        border: "#971919",
    };
    pub const UNDECIDED: NodeColors = NodeColors {
        fill: "#ffba3d",
        border: "#b6862c",
    };
}

impl NodeVisual {
    pub fn colors(&self) -> NodeColors {
        match self {
            NodeVisual::Default => NodeColors::DEFAULT,
            NodeVisual::In => NodeColors::IN,
            NodeVisual::Out => NodeColors::OUT,
            NodeVisual::Undecided => NodeColors::UNDECIDED,
            NodeVisual::Strength(bucket) => {
                let bucket = (*bucket).min(STRENGTH_THRESHOLDS.len() - 1);
                NodeColors {
                    fill: STRENGTH_FILL[bucket],
                    border: STRENGTH_BORDER[bucket],
                }
            }
        }
    }
}

/// Index of the first threshold at or above `value`, or the last bucket.
pub fn bucket_for(value: f64) -> usize {
    STRENGTH_THRESHOLDS
        .iter()
        .position(|threshold| value <= *threshold)
        .unwrap_or(STRENGTH_THRESHOLDS.len() - 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelStatus {
    In,
    Out,
    Undecided,
}

impl LabelStatus {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "in" => Some(LabelStatus::In),
            "out" | "ou" => Some(LabelStatus::Out),
            "undecided" | "un" => Some(LabelStatus::Undecided),
            _ => None,
        }
    }

    pub fn visual(&self) -> NodeVisual {
        match self {
            LabelStatus::In => NodeVisual::In,
            LabelStatus::Out => NodeVisual::Out,
            LabelStatus::Undecided => NodeVisual::Undecided,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    pub status: LabelStatus,
    pub argument: String,
}

// Longer tags first so `undecided(` is not read as `un` followed by junk.
static LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(undecided|out|ou|un|in)\(\s*([^()\s]+)\s*\)")
        .expect("literal pattern is valid")
});

static STRENGTH_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z0-9]+):([0-9]*\.?[0-9]+)$").expect("strength pattern is valid")
});

/// The literals of one labeling row, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labeling(pub Vec<Literal>);

impl Labeling {
    pub fn parse(row: &str) -> Self {
        let literals = LITERAL_RE
            .captures_iter(row)
            .filter_map(|cap| {
                let status = LabelStatus::from_tag(&cap[1].to_lowercase())?;
                Some(Literal {
                    status,
                    argument: canonical_id(&cap[2]),
                })
            })
            .collect();
        Labeling(literals)
    }

    pub fn literals(&self) -> &[Literal] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthAssignment {
    pub value: f64,
}

impl StrengthAssignment {
    /// Parse one `id:value` line. Returns `None` for malformed or out of range lines.
    pub fn parse(line: &str) -> Option<(String, StrengthAssignment)> {
        let caps = STRENGTH_LINE_RE.captures(line.trim())?;
        let value: f64 = caps[2].parse().ok()?;
        if !(0.0..=1.0).contains(&value) {
            return None;
        }
        Some((canonical_id(&caps[1]), StrengthAssignment { value }))
    }

    pub fn bucket(&self) -> usize {
        bucket_for(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultList {
    Primary,
    Filtered,
}

impl ResultList {
    pub fn other(&self) -> ResultList {
        match self {
            ResultList::Primary => ResultList::Filtered,
            ResultList::Filtered => ResultList::Primary,
        }
    }
}

/// Computed results currently held for display, plus the row selection across both lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultOverlay {
    primary: LabelingList,
    filtered: LabelingList,
    primary_selected: Option<usize>,
    filtered_selected: Option<usize>,
    strengths: StrengthList,
}

impl ResultOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labelings(&self, list: ResultList) -> &LabelingList {
        match list {
            ResultList::Primary => &self.primary,
            ResultList::Filtered => &self.filtered,
        }
    }

    pub fn strengths(&self) -> &StrengthList {
        &self.strengths
    }

    pub fn selected(&self, list: ResultList) -> Option<usize> {
        match list {
            ResultList::Primary => self.primary_selected,
            ResultList::Filtered => self.filtered_selected,
        }
    }

    fn selected_mut(&mut self, list: ResultList) -> &mut Option<usize> {
        match list {
            ResultList::Primary => &mut self.primary_selected,
            ResultList::Filtered => &mut self.filtered_selected,
        }
    }

    /// The labeling row that drives the projection, if any.
    pub fn selected_labeling(&self) -> Option<&str> {
        self.primary_selected
            .and_then(|idx| self.primary.get(idx))
            .or_else(|| self.filtered_selected.and_then(|idx| self.filtered.get(idx)))
    }

    /// Replace the primary list. Clears every selection and visual.
    pub fn set_labelings(&mut self, graph: &mut ArgGraph, labelings: LabelingList) {
        self.primary = labelings;
        self.filtered = LabelingList::default();
        self.primary_selected = None;
        self.filtered_selected = None;
        self.project_labeling(graph);
    }

    pub fn set_filtered(&mut self, graph: &mut ArgGraph, labelings: LabelingList) {
        self.filtered = labelings;
        self.filtered_selected = None;
        self.project_labeling(graph);
    }

    /// Toggle selection of row `idx` in `list` and re-project.
    ///
    /// Selecting a row also selects the identical row of the other list, or clears the other
    /// list's selection when there is none. Selecting the already selected row clears both.
    pub fn select(
        &mut self,
        graph: &mut ArgGraph,
        list: ResultList,
        idx: usize,
    ) -> Result<(), DesignerError> {
        let Some(text) = self.labelings(list).get(idx).map(str::to_string) else {
            return Err(DesignerError::NotFound(format!("labeling row {idx}")));
        };
        if self.selected(list) == Some(idx) {
            self.primary_selected = None;
            self.filtered_selected = None;
        } else {
            *self.selected_mut(list) = Some(idx);
            let mirrored = self.labelings(list.other()).position(&text);
            *self.selected_mut(list.other()) = mirrored;
        }
        self.project_labeling(graph);
        Ok(())
    }

    fn project_labeling(&self, graph: &mut ArgGraph) {
        for argument in graph.arguments_mut() {
            argument.visual = NodeVisual::Default;
        }
        let Some(row) = self.selected_labeling() else {
            return;
        };
        for literal in Labeling::parse(row).literals() {
            match graph.argument_mut(&literal.argument) {
                Some(argument) => argument.visual = literal.status.visual(),
                None => tracing::debug!("labeling names unknown argument '{}'", literal.argument),
            }
        }
    }

    /// Replace the strength lines and re-project them. Returns the number of lines applied.
    pub fn apply_strengths(&mut self, graph: &mut ArgGraph, strengths: StrengthList) -> usize {
        self.strengths = strengths;
        for argument in graph.arguments_mut() {
            argument.clear_results();
        }
        let mut applied = 0;
        for line in self.strengths.0.iter().filter(|line| !line.trim().is_empty()) {
            let Some((id, assignment)) = StrengthAssignment::parse(line) else {
                tracing::warn!("skipping malformed strength line {line:?}");
                continue;
            };
            if let Some(argument) = graph.argument_mut(&id) {
                argument.strength = Some(assignment.value);
                argument.visual = NodeVisual::Strength(assignment.bucket());
                applied += 1;
            }
        }
        applied
    }

    /// Discard every result and restore default visuals.
    pub fn reset(&mut self, graph: &mut ArgGraph) {
        *self = ResultOverlay::default();
        for argument in graph.arguments_mut() {
            argument.clear_results();
        }
    }

    /// Discard only the filtered list and the visuals it drove.
    /// Drop the filtered list. The projection is cleared, so no row stays selected in either
    /// list.
    pub fn reset_filtered(&mut self, graph: &mut ArgGraph) {
        self.filtered = LabelingList::default();
        self.filtered_selected = None;
        self.primary_selected = None;
        for argument in graph.arguments_mut() {
            argument.visual = NodeVisual::Default;
        }
    }

    pub fn labelings_text(&self, list: ResultList) -> Result<String, DesignerError> {
        let labelings = self.labelings(list);
        if labelings.is_empty() {
            return Err(DesignerError::NoResults(match list {
                ResultList::Primary => "No labelings to save.".to_string(),
                ResultList::Filtered => "No filtered labelings to save.".to_string(),
            }));
        }
        Ok(labelings.to_text())
    }

    pub fn strength_text(&self) -> Result<String, DesignerError> {
        if self.strengths.is_empty() {
            return Err(DesignerError::NoResults(
                "No strength values to save.".to_string(),
            ));
        }
        Ok(self.strengths.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Argument;
    use test_log::test;

    fn graph(ids: &[&str]) -> ArgGraph {
        let mut graph = ArgGraph::new();
        for id in ids {
            graph.insert_argument(Argument::new(id)).unwrap();
        }
        graph
    }

    fn visual(graph: &ArgGraph, id: &str) -> NodeVisual {
        graph.argument(id).unwrap().visual
    }

    fn labelings(rows: &[&str]) -> LabelingList {
        LabelingList(rows.iter().map(|r| r.to_string()).collect())
    }

    #[test]
    fn labeling_projection() {
        let mut graph = graph(&["a", "b", "c", "d"]);
        let mut overlay = ResultOverlay::new();
        overlay.set_labelings(&mut graph, labelings(&["in(a) out(b) undecided(c)"]));
        assert!(graph.arguments().all(|a| a.visual == NodeVisual::Default));

        overlay.select(&mut graph, ResultList::Primary, 0).unwrap();
        assert_eq!(visual(&graph, "a"), NodeVisual::In);
        assert_eq!(visual(&graph, "b"), NodeVisual::Out);
        assert_eq!(visual(&graph, "c"), NodeVisual::Undecided);
        assert_eq!(visual(&graph, "d"), NodeVisual::Default);
        assert_eq!(visual(&graph, "a").colors(), NodeColors::IN);
    }

    #[test]
    fn literal_tags_and_case() {
        let labeling = Labeling::parse("IN(A) ou(b) un( c ) undecided(D) in(a) out(zz");
        let parsed: Vec<_> = labeling
            .literals()
            .iter()
            .map(|l| (l.status, l.argument.as_str()))
            .collect();
        assert_eq!(
            parsed,
            vec![
                (LabelStatus::In, "a"),
                (LabelStatus::Out, "b"),
                (LabelStatus::Undecided, "c"),
                (LabelStatus::Undecided, "d"),
                (LabelStatus::In, "a"),
            ]
        );
    }

    #[test]
    fn later_literals_win() {
        let mut graph = graph(&["a"]);
        let mut overlay = ResultOverlay::new();
        overlay.set_labelings(&mut graph, labelings(&["in(a) ou(a)"]));
        overlay.select(&mut graph, ResultList::Primary, 0).unwrap();
        assert_eq!(visual(&graph, "a"), NodeVisual::Out);
    }

    #[test]
    fn selection_is_mirrored_and_toggled() {
        let mut graph = graph(&["a", "b"]);
        let mut overlay = ResultOverlay::new();
        overlay.set_labelings(&mut graph, labelings(&["in(a) ou(b)", "ou(a) in(b)"]));
        overlay.set_filtered(&mut graph, labelings(&["ou(a) in(b)"]));

        overlay.select(&mut graph, ResultList::Filtered, 0).unwrap();
        assert_eq!(overlay.selected(ResultList::Primary), Some(1));
        assert_eq!(overlay.selected(ResultList::Filtered), Some(0));
        assert_eq!(visual(&graph, "a"), NodeVisual::Out);

        // A primary row without a filtered twin clears the filtered selection
        overlay.select(&mut graph, ResultList::Primary, 0).unwrap();
        assert_eq!(overlay.selected(ResultList::Filtered), None);
        assert_eq!(visual(&graph, "a"), NodeVisual::In);

        overlay.select(&mut graph, ResultList::Primary, 0).unwrap();
        assert_eq!(overlay.selected_labeling(), None);
        assert!(graph.arguments().all(|a| a.visual == NodeVisual::Default));

        assert!(matches!(
            overlay.select(&mut graph, ResultList::Filtered, 7),
            Err(DesignerError::NotFound(_))
        ));
    }

    #[test]
    fn strength_projection() {
        let mut graph = graph(&["a", "b", "c"]);
        let mut overlay = ResultOverlay::new();
        let applied = overlay.apply_strengths(
            &mut graph,
            StrengthList(vec![
                "a:0.5".to_string(),
                "B:1".to_string(),
                "c:1.5".to_string(),
                "junk".to_string(),
                "ghost:0.2".to_string(),
            ]),
        );
        assert_eq!(applied, 2);

        let a = graph.argument("a").unwrap();
        assert_eq!(a.strength, Some(0.5));
        assert_eq!(a.visual, NodeVisual::Strength(14));
        assert_eq!(a.visual.colors().fill, "#ffba3d");
        assert_eq!(visual(&graph, "b"), NodeVisual::Strength(28));
        assert_eq!(graph.argument("c").unwrap().strength, None);
        assert_eq!(visual(&graph, "c"), NodeVisual::Default);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(bucket_for(0.0), 0);
        assert_eq!(bucket_for(0.01), 1);
        assert_eq!(bucket_for(0.036), 1);
        assert_eq!(bucket_for(0.5), 14);
        assert_eq!(bucket_for(0.51), 15);
        assert_eq!(bucket_for(1.0), 28);
        assert_eq!(bucket_for(2.0), 28);
    }

    #[test]
    fn resets_and_saving() {
        let mut graph = graph(&["a"]);
        let mut overlay = ResultOverlay::new();
        assert!(matches!(
            overlay.labelings_text(ResultList::Primary),
            Err(DesignerError::NoResults(_))
        ));
        assert!(overlay.strength_text().is_err());

        overlay.set_labelings(&mut graph, labelings(&["in(a)", "ou(a)"]));
        overlay.set_filtered(&mut graph, labelings(&["in(a)"]));
        overlay.select(&mut graph, ResultList::Filtered, 0).unwrap();
        assert_eq!(overlay.labelings_text(ResultList::Primary).unwrap(), "in(a)\nou(a)");

        assert_eq!(overlay.selected(ResultList::Primary), Some(0));
        overlay.reset_filtered(&mut graph);
        assert!(overlay.labelings(ResultList::Filtered).is_empty());
        assert_eq!(visual(&graph, "a"), NodeVisual::Default);
        assert_eq!(overlay.labelings(ResultList::Primary).len(), 2);
        assert_eq!(overlay.selected(ResultList::Primary), None);

        // The next click on the formerly shown row selects it again instead of toggling off
        overlay.select(&mut graph, ResultList::Primary, 0).unwrap();
        assert_eq!(visual(&graph, "a"), NodeVisual::In);

        overlay.apply_strengths(&mut graph, StrengthList(vec!["a:0.3".to_string()]));
        overlay.reset(&mut graph);
        assert_eq!(overlay, ResultOverlay::default());
        assert_eq!(graph.argument("a").unwrap().strength, None);
    }
}
