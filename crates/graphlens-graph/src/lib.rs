pub mod projection;
pub mod store;
pub mod style;

pub use projection::{
    InteractionEvent, RenderEdge, RenderGraph, RenderNode, ViewProjection, edge_id, tooltip_info,
};
pub use store::{FilterState, GraphStats, GraphStore, TypeSummary, VisibleEdge, VisibleGraph};
pub use style::{
    Color, DEFAULT_EDGE_COLOR, DEFAULT_NODE_PALETTE, DEFAULT_NODE_SHAPE, StylePalette,
    cluster_key, color_key,
};
