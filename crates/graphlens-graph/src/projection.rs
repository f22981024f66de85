use crate::store::GraphStore;
use crate::style::{StylePalette, cluster_key};
use graphlens_core::{Direction, GraphEdge, GraphNode, GroupBy, LayoutMode, LineType, NodeId};
use graphlens_events::{Event, EventBus, TooltipInfo};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub color: String,
    pub shape: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub color: String,
    pub line_type: LineType,
    /// Forwarded untouched; the backend decides how to draw arrowheads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

/// Everything the rendering backend needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderGraph {
    pub title: String,
    pub layout: LayoutMode,
    pub group_by: GroupBy,
    pub selected: Option<NodeId>,
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

/// Events reported by the rendering backend.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    NodeClick { id: NodeId },
    NodeHover { id: NodeId, x: f32, y: f32 },
    NodeHoverEnd,
    BackgroundClick,
}

/// Element id for the edge at `index` in the full edge list. Imported edges
/// carry no id of their own, and the backend needs unique ones.
pub fn edge_id(index: usize, edge: &GraphEdge) -> String {
    format!("e{index}:{}->{}", edge.source, edge.target)
}

#[derive(Debug, Clone, Default)]
pub struct ViewProjection {
    palette: StylePalette,
}

impl ViewProjection {
    pub fn new(palette: StylePalette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &StylePalette {
        &self.palette
    }

    pub fn project_node(&self, node: &GraphNode, group_by: GroupBy) -> RenderNode {
        RenderNode {
            id: node.id.to_string(),
            label: node.label.clone(),
            color: self.palette.node_color(node, group_by),
            shape: self.palette.node_shape(node),
            node_type: node.node_type.clone(),
            cluster: cluster_key(node, group_by).map(str::to_string),
            selected: false,
        }
    }

    pub fn project_edge(&self, index: usize, edge: &GraphEdge) -> RenderEdge {
        RenderEdge {
            id: edge_id(index, edge),
            source: edge.source.to_string(),
            target: edge.target.to_string(),
            label: edge.label.clone(),
            color: self.palette.edge_color(edge),
            line_type: self.palette.line_type(edge),
            direction: edge.direction,
        }
    }

    /// Project the store's current visible subset.
    pub fn project(&self, store: &GraphStore) -> RenderGraph {
        let view = store.view();
        let visible = store.visible();
        let nodes = visible
            .nodes
            .iter()
            .map(|node| {
                let mut projected = self.project_node(node, view.group_by);
                projected.selected = view.selected_node_id.as_ref() == Some(&node.id);
                projected
            })
            .collect();
        let edges = visible
            .edges
            .iter()
            .map(|v| self.project_edge(v.index, v.edge))
            .collect();

        RenderGraph {
            title: store.meta().title.clone(),
            layout: view.layout,
            group_by: view.group_by,
            selected: view.selected_node_id.clone(),
            nodes,
            edges,
        }
    }

    /// Map a backend interaction to the store event it stands for.
    /// Hovering an id the store doesn't know yields nothing.
    pub fn translate(&self, store: &GraphStore, interaction: InteractionEvent) -> Option<Event> {
        match interaction {
            InteractionEvent::NodeClick { id } => Some(Event::SelectNode(Some(id))),
            InteractionEvent::BackgroundClick => Some(Event::SelectNode(None)),
            InteractionEvent::NodeHover { id, x, y } => store.node(id.as_str()).map(|node| {
                Event::TooltipShow {
                    info: tooltip_info(node),
                    x,
                    y,
                }
            }),
            InteractionEvent::NodeHoverEnd => Some(Event::TooltipHide),
        }
    }

    pub fn forward(&self, store: &GraphStore, interaction: InteractionEvent, bus: &EventBus) {
        if let Some(event) = self.translate(store, interaction) {
            bus.publish(event);
        }
    }
}

pub fn tooltip_info(node: &GraphNode) -> TooltipInfo {
    let mut lines = vec![format!("type: {}", node.node_type)];
    if let Some(group) = &node.group {
        lines.push(format!("group: {group}"));
    }
    if let Some(properties) = &node.properties {
        lines.extend(properties.iter().map(|(key, value)| format!("{key}: {value}")));
    }
    TooltipInfo {
        node_id: node.id.clone(),
        title: node.label.clone(),
        description: lines.join("\n"),
    }
}
