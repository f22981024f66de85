use criterion::{Criterion, criterion_group, criterion_main};
use graphlens_app::GraphSession;
use graphlens_bench::{synthetic_graph, write_synthetic_graph};
use graphlens_schema::parse_graph;
use std::hint::black_box;

fn bench_parse_5000_nodes(c: &mut Criterion) {
    let text = synthetic_graph(5000, 3)
        .to_json_string()
        .expect("serialize synthetic graph");

    c.bench_function("parse_graph_5000_nodes", |b| {
        b.iter(|| parse_graph(black_box(&text)).expect("valid graph"))
    });
}

fn bench_file_import_round_trip(c: &mut Criterion) {
    let (_dir, path) = write_synthetic_graph(2000, 2).expect("write synthetic graph");

    c.bench_function("session_file_import_2000_nodes", |b| {
        b.iter(|| {
            let mut session = GraphSession::default();
            let (_, handle) = session.import_file(&path);
            handle.join().expect("reader thread");
            session.pump();
            black_box(session.store().stats())
        })
    });
}

criterion_group!(benches, bench_parse_5000_nodes, bench_file_import_round_trip);
criterion_main!(benches);
