use graphlens_core::{
    GraphData, GraphEdge, GraphMeta, GraphNode, GroupBy, ImportError, LayoutMode, NodeId,
    ViewState,
};
use graphlens_schema::ValidGraph;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Per-type visibility toggles.
///
/// Always rebuilt from the current graph's types: every type starts visible
/// and types that no longer occur are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    visible: BTreeMap<String, bool>,
}

impl FilterState {
    pub fn from_graph(graph: &GraphData) -> Self {
        Self {
            visible: graph
                .node_types()
                .into_iter()
                .map(|t| (t.to_string(), true))
                .collect(),
        }
    }

    /// Unknown types are never visible.
    pub fn is_visible(&self, node_type: &str) -> bool {
        self.visible.get(node_type).copied().unwrap_or(false)
    }

    pub fn is_known(&self, node_type: &str) -> bool {
        self.visible.contains_key(node_type)
    }

    /// Returns `false` without changing anything when the type is unknown.
    pub fn set(&mut self, node_type: &str, visible: bool) -> bool {
        match self.visible.get_mut(node_type) {
            Some(flag) => {
                *flag = visible;
                true
            }
            None => false,
        }
    }

    pub fn set_all(&mut self, visible: bool) {
        self.visible.values_mut().for_each(|flag| *flag = visible);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.visible.iter().map(|(t, v)| (t.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct VisibleEdge<'a> {
    /// Position in the graph's full edge list.
    pub index: usize,
    pub edge: &'a GraphEdge,
}

/// Result of one derivation pass over the store.
#[derive(Debug, Clone, Default)]
pub struct VisibleGraph<'a> {
    pub nodes: Vec<&'a GraphNode>,
    pub edges: Vec<VisibleEdge<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    pub node_type: String,
    pub count: usize,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphStats {
    pub title: String,
    pub nodes: usize,
    pub edges: usize,
    pub visible_nodes: usize,
    pub visible_edges: usize,
    pub types: Vec<TypeSummary>,
}

/// Canonical graph state: the imported graph, the type filters and the view
/// selections. Owned by a single writer.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    data: GraphData,
    filters: FilterState,
    view: ViewState,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &GraphData {
        &self.data
    }

    pub fn meta(&self) -> &GraphMeta {
        &self.data.meta
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.data.node(id)
    }

    /// Selection is advisory; the id may not name a node in the current graph.
    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.view
            .selected_node_id
            .as_ref()
            .and_then(|id| self.node(id.as_str()))
    }

    /// Replace the graph. Filters are rebuilt, selection is cleared, the rest
    /// of the view state is kept.
    pub fn load(&mut self, graph: ValidGraph) {
        self.data = graph.into_inner();
        self.filters = FilterState::from_graph(&self.data);
        self.view.selected_node_id = None;
        tracing::info!(
            title = %self.data.meta.title,
            nodes = self.data.nodes.len(),
            edges = self.data.edges.len(),
            types = self.filters.len(),
            "graph loaded"
        );
    }

    /// Validate `data` and load it. On failure the store is left untouched.
    pub fn try_load(&mut self, data: GraphData) -> Result<(), ImportError> {
        let graph = ValidGraph::try_from(data).map_err(|errors| {
            tracing::warn!(violations = errors.len(), "refusing to load unvalidated graph");
            ImportError::Invalid(errors)
        })?;
        self.load(graph);
        Ok(())
    }

    /// Swap in the placeholder graph but keep view settings.
    pub fn unload(&mut self) {
        self.data = GraphData::placeholder();
        self.filters = FilterState::from_graph(&self.data);
        self.view.selected_node_id = None;
        tracing::info!("graph unloaded");
    }

    pub fn reset(&mut self) {
        self.data = GraphData::placeholder();
        self.filters = FilterState::from_graph(&self.data);
        self.view = ViewState::default();
        tracing::info!("graph store reset");
    }

    pub fn set_filter(&mut self, node_type: &str, visible: bool) -> bool {
        let applied = self.filters.set(node_type, visible);
        tracing::debug!(node_type, visible, applied, "set type filter");
        applied
    }

    pub fn set_all_filters(&mut self, visible: bool) {
        self.filters.set_all(visible);
        tracing::debug!(visible, "set all type filters");
    }

    pub fn set_group_by(&mut self, mode: GroupBy) {
        tracing::debug!(%mode, "set group-by");
        self.view.group_by = mode;
    }

    pub fn set_layout(&mut self, layout: LayoutMode) {
        tracing::debug!(%layout, "set layout");
        self.view.layout = layout;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.view.search_term = term.into();
        tracing::debug!(term = %self.view.search_term, "set search term");
    }

    pub fn select_node(&mut self, id: Option<NodeId>) {
        tracing::debug!(id = ?id, "select node");
        self.view.selected_node_id = id;
    }

    /// Derive the nodes and edges to render. The node pass runs once and its
    /// id set is reused for the edge pass.
    pub fn visible(&self) -> VisibleGraph<'_> {
        let needle = self.view.search_term.to_lowercase();
        let nodes: Vec<&GraphNode> = self
            .data
            .nodes
            .iter()
            .filter(|n| self.filters.is_visible(&n.node_type))
            .filter(|n| needle.is_empty() || matches_search(n, &needle))
            .collect();

        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let edges = self
            .data
            .edges
            .iter()
            .enumerate()
            .filter(|(_, e)| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
            .map(|(index, edge)| VisibleEdge { index, edge })
            .collect();

        VisibleGraph { nodes, edges }
    }

    pub fn visible_nodes(&self) -> Vec<&GraphNode> {
        self.visible().nodes
    }

    pub fn visible_edges(&self) -> Vec<&GraphEdge> {
        self.visible().edges.into_iter().map(|e| e.edge).collect()
    }

    /// Node count per type alongside its toggle, sorted by type name.
    pub fn type_summary(&self) -> Vec<TypeSummary> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for node in &self.data.nodes {
            *counts.entry(node.node_type.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(node_type, count)| TypeSummary {
                node_type: node_type.to_string(),
                count,
                visible: self.filters.is_visible(node_type),
            })
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        let visible = self.visible();
        GraphStats {
            title: self.data.meta.title.clone(),
            nodes: self.data.nodes.len(),
            edges: self.data.edges.len(),
            visible_nodes: visible.nodes.len(),
            visible_edges: visible.edges.len(),
            types: self.type_summary(),
        }
    }
}

fn matches_search(node: &GraphNode, needle: &str) -> bool {
    node.label.to_lowercase().contains(needle)
        || node.id.as_str().to_lowercase().contains(needle)
        || node.node_type.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphlens_core::{GraphEdge, PLACEHOLDER_TITLE};
    use graphlens_schema::{parse_graph, validate};
    use proptest::prelude::*;
    use serde_json::json;

    fn scenario_graph() -> ValidGraph {
        validate(&json!({
            "meta": {"title": "t"},
            "nodes": [
                {"id": "a", "label": "A", "type": "x"},
                {"id": "b", "label": "B", "type": "y"}
            ],
            "edges": [{"source": "a", "target": "b"}]
        }))
        .expect("scenario graph")
    }

    fn ids(nodes: &[&GraphNode]) -> Vec<String> {
        nodes.iter().map(|n| n.id.to_string()).collect()
    }

    #[test]
    fn test_initial_state_is_placeholder() {
        let store = GraphStore::new();
        assert_eq!(store.meta().title, PLACEHOLDER_TITLE);
        assert!(store.filters().is_empty());
        assert!(store.visible_nodes().is_empty());
        assert_eq!(store.view(), &ViewState::default());
    }

    #[test]
    fn test_filter_hides_node_and_its_edges() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        assert_eq!(ids(&store.visible_nodes()), vec!["a", "b"]);
        assert_eq!(store.visible_edges().len(), 1);

        assert!(store.set_filter("y", false));
        assert_eq!(ids(&store.visible_nodes()), vec!["a"]);
        assert!(store.visible_edges().is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        store.set_search_term("A");
        assert_eq!(ids(&store.visible_nodes()), vec!["a"]);

        // matches the type field as well
        store.set_search_term("Y");
        assert_eq!(ids(&store.visible_nodes()), vec!["b"]);

        store.set_search_term("");
        assert_eq!(store.visible_nodes().len(), 2);
    }

    #[test]
    fn test_unknown_filter_type_is_noop() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        let before = store.filters().clone();
        assert!(!store.set_filter("nope", false));
        assert_eq!(store.filters(), &before);
        assert!(!store.filters().is_known("nope"));
    }

    #[test]
    fn test_load_rebuilds_filters_and_clears_selection_only() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        store.set_filter("x", false);
        store.set_group_by(GroupBy::Group);
        store.set_layout(LayoutMode::Circle);
        store.set_search_term("b");
        store.select_node(Some(NodeId::from("a")));

        let next = parse_graph(
            r#"{"meta":{"title":"next"},"nodes":[{"id":"z","label":"Zed","type":"w"},{"id":"q","label":"Q","type":"x"}],"edges":[]}"#,
        )
        .unwrap();
        store.load(next);

        let filters: Vec<_> = store.filters().iter().collect();
        assert_eq!(filters, vec![("w", true), ("x", true)]);
        assert_eq!(store.view().selected_node_id, None);
        assert_eq!(store.view().group_by, GroupBy::Group);
        assert_eq!(store.view().layout, LayoutMode::Circle);
        assert_eq!(store.view().search_term, "b");
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        store.set_layout(LayoutMode::Grid);
        store.set_search_term("zz");
        store.reset();
        assert!(store.data().is_placeholder());
        assert_eq!(store.view(), &ViewState::default());
        assert!(store.filters().is_empty());
    }

    #[test]
    fn test_unload_keeps_view_settings() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        store.set_layout(LayoutMode::Concentric);
        store.select_node(Some(NodeId::from("a")));
        store.unload();
        assert!(store.data().is_placeholder());
        assert_eq!(store.view().layout, LayoutMode::Concentric);
        assert_eq!(store.view().selected_node_id, None);
    }

    #[test]
    fn test_try_load_rejects_dangling_edge_and_keeps_graph() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        let mut bad = store.data().clone();
        bad.edges.push(GraphEdge::new("a", "ghost"));

        let err = store.try_load(bad).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].kind_name(), "ReferentialError");
        assert_eq!(store.meta().title, "t");
        assert_eq!(store.data().edges.len(), 1);
    }

    #[test]
    fn test_selection_accepts_unknown_id() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        store.select_node(Some(NodeId::from("ghost")));
        assert_eq!(store.view().selected_node_id, Some(NodeId::from("ghost")));
        assert!(store.selected_node().is_none());

        store.select_node(Some(NodeId::from("b")));
        assert_eq!(store.selected_node().map(|n| n.label.as_str()), Some("B"));
    }

    #[test]
    fn test_visible_edges_keep_original_index() {
        let graph = parse_graph(
            r#"{"meta":{"title":"t"},
                "nodes":[{"id":"a","label":"A","type":"x"},{"id":"b","label":"B","type":"y"},{"id":"c","label":"C","type":"x"}],
                "edges":[{"source":"a","target":"b"},{"source":"a","target":"c"}]}"#,
        )
        .unwrap();
        let mut store = GraphStore::new();
        store.load(graph);
        store.set_filter("y", false);
        let visible = store.visible();
        assert_eq!(visible.edges.len(), 1);
        assert_eq!(visible.edges[0].index, 1);
    }

    #[test]
    fn test_stats_and_type_summary() {
        let mut store = GraphStore::new();
        store.load(scenario_graph());
        store.set_filter("x", false);
        let stats = store.stats();
        assert_eq!(stats.nodes, 2);
        assert_eq!(stats.edges, 1);
        assert_eq!(stats.visible_nodes, 1);
        assert_eq!(stats.visible_edges, 0);
        assert_eq!(
            stats.types,
            vec![
                TypeSummary {
                    node_type: "x".to_string(),
                    count: 1,
                    visible: false
                },
                TypeSummary {
                    node_type: "y".to_string(),
                    count: 1,
                    visible: true
                },
            ]
        );
    }

    fn arb_store() -> impl Strategy<Value = GraphStore> {
        (1usize..25)
            .prop_flat_map(|count| {
                (
                    proptest::collection::vec(("[a-zA-Z]{1,6}", 0usize..4), count),
                    proptest::collection::vec((0..count, 0..count), 0..40),
                )
            })
            .prop_map(|(nodes, edges)| {
                let nodes: Vec<_> = nodes
                    .into_iter()
                    .enumerate()
                    .map(|(i, (label, t))| json!({"id": format!("n{i}"), "label": label, "type": format!("t{t}")}))
                    .collect();
                let edges: Vec<_> = edges
                    .into_iter()
                    .map(|(s, t)| json!({"source": format!("n{s}"), "target": format!("n{t}")}))
                    .collect();
                let graph = validate(&json!({"meta": {"title": "p"}, "nodes": nodes, "edges": edges}))
                    .expect("generated graph is valid");
                let mut store = GraphStore::new();
                store.load(graph);
                store
            })
    }

    proptest! {
        #[test]
        fn prop_all_hidden_means_empty(mut store in arb_store()) {
            store.set_all_filters(false);
            prop_assert!(store.visible_nodes().is_empty());
            prop_assert!(store.visible_edges().is_empty());
        }

        #[test]
        fn prop_search_only_narrows(
            mut store in arb_store(),
            hidden in proptest::collection::vec(0usize..4, 0..3),
            term in "[a-zA-Z0-9]{0,3}",
        ) {
            for t in hidden {
                store.set_filter(&format!("t{t}"), false);
            }
            let before: HashSet<String> =
                store.visible_nodes().iter().map(|n| n.id.to_string()).collect();
            store.set_search_term(term);
            for node in store.visible_nodes() {
                prop_assert!(before.contains(node.id.as_str()));
            }
        }

        #[test]
        fn prop_no_dangling_edges(mut store in arb_store(), hidden in 0usize..4, term in "[a-z]{0,2}") {
            store.set_filter(&format!("t{hidden}"), false);
            store.set_search_term(term);
            let visible = store.visible();
            let ids: HashSet<&str> = visible.nodes.iter().map(|n| n.id.as_str()).collect();
            for e in &visible.edges {
                prop_assert!(ids.contains(e.edge.source.as_str()));
                prop_assert!(ids.contains(e.edge.target.as_str()));
            }
        }

        #[test]
        fn prop_reset_is_idempotent(mut store in arb_store(), term in "[a-z]{0,4}") {
            store.set_search_term(term);
            store.set_layout(LayoutMode::Grid);
            store.reset();
            let once = (store.data().clone(), store.filters().clone(), store.view().clone());
            store.reset();
            let twice = (store.data().clone(), store.filters().clone(), store.view().clone());
            prop_assert_eq!(once, twice);
        }
    }
}
