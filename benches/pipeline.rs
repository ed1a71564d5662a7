use coursemap::config::{CorequisiteLayout, LayoutConfig, SmallComponentLayout};
use coursemap::ir::{Edge, Graph, Node, Position};
use coursemap::layout::{
    DagreEngine, EngineError, LayeredEngine, LayoutRequest, LayoutResult, NodeLayout, PlacedChild,
    find_connected_components, identify_corequisite_pairs, layout_elements_sync,
    resolve_corequisite_overlaps,
};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

/// Grid placement without any layering work, to isolate pipeline overhead.
struct GridEngine;

impl LayeredEngine for GridEngine {
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResult, EngineError> {
        let children = request
            .children
            .iter()
            .enumerate()
            .map(|(idx, child)| PlacedChild {
                id: child.id.clone(),
                x: (idx % 6) as f32 * 250.0,
                y: (idx / 6) as f32 * 220.0,
                width: child.width,
                height: child.height,
                children: child
                    .children
                    .iter()
                    .map(|inner| PlacedChild {
                        id: inner.id.clone(),
                        x: inner.x.unwrap_or(0.0),
                        y: inner.y.unwrap_or(0.0),
                        width: inner.width,
                        height: inner.height,
                        children: Vec::new(),
                    })
                    .collect(),
            })
            .collect();
        Ok(LayoutResult { children })
    }
}

/// `tracks` independent prerequisite chains of `depth` courses; every third
/// course has a lab.
fn synthetic_plan(tracks: usize, depth: usize) -> Graph {
    let mut graph = Graph::new();
    for t in 0..tracks {
        for d in 0..depth {
            let id = format!("T{t}C{d}");
            graph
                .nodes
                .push(Node::with_course(&id, &format!("Course {t}.{d}"), 3.0));
            if d > 0 {
                graph
                    .edges
                    .push(Edge::prerequisite(&format!("T{t}C{}", d - 1), &id));
            }
            if d % 3 == 0 {
                let lab = format!("{id}L");
                graph
                    .nodes
                    .push(Node::with_course(&lab, &format!("Course {t}.{d} Lab"), 1.0));
                graph.edges.push(Edge::corequisite(&id, &lab));
            }
        }
    }
    graph
}

fn bench_components(c: &mut Criterion) {
    let mut group = c.benchmark_group("components");
    for (tracks, depth) in [(4, 8), (40, 12), (200, 20)] {
        let graph = synthetic_plan(tracks, depth);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tracks}x{depth}")),
            &graph,
            |b, graph| {
                b.iter(|| {
                    let components = find_connected_components(
                        black_box(&graph.nodes),
                        black_box(&graph.edges),
                    );
                    black_box(components.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_resolver(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");
    let config = LayoutConfig::default();
    for count in [8usize, 32, 96] {
        let graph = synthetic_plan(1, count);
        let pairs = identify_corequisite_pairs(&graph.nodes, &graph.edges);
        // Every node piled on a tight grid forces the far and spiral rungs.
        let nodes: Vec<NodeLayout> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| NodeLayout {
                id: node.id.clone(),
                x: (idx % 4) as f32 * 200.0,
                y: (idx / 4) as f32 * 130.0,
                width: 192.0,
                height: 120.0,
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &nodes, |b, nodes| {
            b.iter(|| {
                let mut working = nodes.clone();
                let placements = resolve_corequisite_overlaps(&mut working, &pairs, &config);
                black_box(placements.len());
            });
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let mut grid = LayoutConfig::default();
    grid.small_component_layout = SmallComponentLayout::Grid;
    let mut subgraph = LayoutConfig::default();
    subgraph.corequisite_layout = CorequisiteLayout::Subgraph;
    let graph = synthetic_plan(12, 10);
    for (name, config) in [
        ("adjacent_vertical", LayoutConfig::default()),
        ("adjacent_grid", grid),
        ("subgraph", subgraph),
    ] {
        group.bench_with_input(BenchmarkId::new("grid_engine", name), &config, |b, config| {
            b.iter(|| {
                let out = layout_elements_sync(black_box(&graph), config, &GridEngine);
                black_box(out.graph.nodes.len());
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let config = LayoutConfig::default();
    let engine = DagreEngine::new();
    for (tracks, depth) in [(1, 6), (4, 10), (10, 12)] {
        let mut graph = synthetic_plan(tracks, depth);
        for node in &mut graph.nodes {
            node.position = Some(Position::default());
        }
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{tracks}x{depth}")),
            &graph,
            |b, graph| {
                b.iter(|| {
                    let out = layout_elements_sync(black_box(graph), &config, &engine);
                    black_box(out.report.components.len());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_components, bench_resolver, bench_pipeline, bench_end_to_end
);
criterion_main!(benches);
