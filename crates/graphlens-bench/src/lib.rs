use graphlens_core::{Direction, GraphData, GraphEdge, GraphMeta, GraphNode, PropertyValue};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TYPES: [&str; 6] = ["service", "database", "queue", "person", "external", "job"];

/// Deterministic graph with `node_count` nodes spread over six types and
/// `edges_per_node` outgoing edges each.
pub fn synthetic_graph(node_count: usize, edges_per_node: usize) -> GraphData {
    let nodes = (0..node_count)
        .map(|i| {
            GraphNode::new(format!("n{i}"), format!("Node {i}"), TYPES[i % TYPES.len()])
                .with_group(format!("g{}", i % 17))
                .with_property("index", PropertyValue::Number(i.into()))
        })
        .collect();

    let edges = if node_count < 2 {
        Vec::new()
    } else {
        (0..node_count)
            .flat_map(|i| {
                (1..=edges_per_node).map(move |k| {
                    let target = (i * 31 + k * 7) % node_count;
                    GraphEdge::new(format!("n{i}"), format!("n{target}"))
                        .with_direction(Direction::Forward)
                })
            })
            .collect()
    };

    GraphData {
        meta: GraphMeta {
            title: format!("synthetic {node_count}"),
            description: None,
        },
        nodes,
        edges,
    }
}

/// Write a synthetic graph to a temporary directory for file-import benches.
pub fn write_synthetic_graph(
    node_count: usize,
    edges_per_node: usize,
) -> anyhow::Result<(TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("graph.json");
    fs::write(&path, synthetic_graph(node_count, edges_per_node).to_json_string()?)?;
    Ok((dir, path))
}
