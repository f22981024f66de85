use criterion::{Criterion, criterion_group, criterion_main};
use graphlens_bench::synthetic_graph;
use graphlens_graph::{GraphStore, ViewProjection};
use graphlens_schema::ValidGraph;
use std::hint::black_box;

fn loaded_store(node_count: usize) -> GraphStore {
    let graph = ValidGraph::try_from(synthetic_graph(node_count, 3)).expect("synthetic graph");
    let mut store = GraphStore::new();
    store.load(graph);
    store
}

fn bench_visible_5000_nodes(c: &mut Criterion) {
    let mut store = loaded_store(5000);

    c.bench_function("visible_5000_nodes_unfiltered", |b| {
        b.iter(|| black_box(store.visible()).edges.len())
    });

    store.set_filter("queue", false);
    store.set_search_term("node 1");
    c.bench_function("visible_5000_nodes_search_and_filter", |b| {
        b.iter(|| black_box(store.visible()).nodes.len())
    });
}

fn bench_project_5000_nodes(c: &mut Criterion) {
    let store = loaded_store(5000);
    let projection = ViewProjection::default();

    c.bench_function("project_5000_nodes", |b| {
        b.iter(|| black_box(projection.project(black_box(&store))))
    });
}

criterion_group!(benches, bench_visible_5000_nodes, bench_project_5000_nodes);
criterion_main!(benches);
