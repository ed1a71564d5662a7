mod canvas;
mod components;
mod corequisite;
mod dagre;
pub mod engine;
mod invoke;
mod overlap;
pub(crate) mod types;

pub use canvas::{Composition, compose_components};
pub use components::{Component, find_connected_components};
pub use corequisite::{CorequisitePairs, identify_corequisite_pairs, looks_like_lab};
pub use dagre::DagreEngine;
pub use engine::{
    EngineError, LayeredEngine, LayoutChild, LayoutEdge, LayoutRequest, LayoutResult, PlacedChild,
};
pub use invoke::{ComponentLayout, ComponentRequest, build_component_request, run_component};
pub use overlap::{
    LabSearch, STRATEGIES, Strategy, far_offsets, primary_offsets, resolve_corequisite_overlaps,
    spiral_offsets,
};
pub use types::*;

use std::collections::{HashMap, HashSet};

use futures::future::join_all;

use crate::config::LayoutConfig;
use crate::ir::{Edge, Graph, Node};

/// Lays out a course graph: split into components, lay each one out through
/// `engine`, place corequisite labs, then compose everything onto one canvas.
///
/// Component layouts are independent futures joined before composition. The
/// returned graph lists the input nodes in input order, each with a position;
/// edges are passed through untouched.
pub async fn layout_elements<E>(graph: &Graph, config: &LayoutConfig, engine: &E) -> LayoutOutput
where
    E: LayeredEngine + ?Sized,
{
    if graph.nodes.is_empty() {
        return LayoutOutput {
            graph: Graph {
                nodes: Vec::new(),
                edges: graph.edges.clone(),
            },
            report: LayoutReport::default(),
        };
    }

    let pairs = identify_corequisite_pairs(&graph.nodes, &graph.edges);
    let components = find_connected_components(&graph.nodes, &graph.edges);
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        components = components.len(),
        corequisite_pairs = pairs.len(),
        "laying out course graph"
    );

    let mut by_id: HashMap<&str, &Node> = HashMap::new();
    for node in &graph.nodes {
        by_id.entry(node.id.as_str()).or_insert(node);
    }

    let tasks = components.iter().enumerate().map(|(index, component)| {
        let members: HashSet<&str> = component.node_ids.iter().map(String::as_str).collect();
        let component_pairs = pairs.within(&members);
        let nodes: Vec<&Node> = component
            .node_ids
            .iter()
            .filter_map(|id| by_id.get(id.as_str()).copied())
            .collect();
        let edges: Vec<&Edge> = graph
            .edges
            .iter()
            .filter(|edge| {
                members.contains(edge.source.as_str()) && members.contains(edge.target.as_str())
            })
            .collect();
        let prepared = build_component_request(index, &nodes, &edges, &component_pairs, config);
        async move { run_component(index, &nodes, &prepared, &component_pairs, engine, config) }
    });
    let layouts = join_all(tasks).await;

    let composition = compose_components(&layouts, config);

    let nodes = graph
        .nodes
        .iter()
        .map(|node| {
            let mut out = node.clone();
            out.position = Some(
                composition
                    .positions
                    .get(&node.id)
                    .copied()
                    .or(node.position)
                    .unwrap_or_default(),
            );
            out
        })
        .collect();

    let report = LayoutReport {
        components: layouts
            .into_iter()
            .map(|layout| ComponentReport {
                index: layout.index,
                node_ids: layout.nodes.iter().map(|node| node.id.clone()).collect(),
                engine_failed: layout.engine_failed,
                is_main: composition.main_component == Some(layout.index),
                base_x: composition.bases[layout.index].x,
                base_y: composition.bases[layout.index].y,
                placements: layout.placements,
            })
            .collect(),
    };
    if report.failed_components() > 0 {
        tracing::warn!(
            failed = report.failed_components(),
            total = report.components.len(),
            "some components kept their pre-layout positions"
        );
    }

    LayoutOutput {
        graph: Graph {
            nodes,
            edges: graph.edges.clone(),
        },
        report,
    }
}

/// Blocking variant of [`layout_elements`].
pub fn layout_elements_sync<E>(graph: &Graph, config: &LayoutConfig, engine: &E) -> LayoutOutput
where
    E: LayeredEngine + ?Sized,
{
    futures::executor::block_on(layout_elements(graph, config, engine))
}

/// Lays out with the bundled dagre engine.
pub fn compute_layout(graph: &Graph, config: &LayoutConfig) -> LayoutOutput {
    layout_elements_sync(graph, config, &DagreEngine::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CorequisiteLayout;
    use crate::ir::Position;

    /// Puts every child in its own row, in request order.
    struct RowEngine;

    impl LayeredEngine for RowEngine {
        fn layout(&self, request: &LayoutRequest) -> Result<LayoutResult, EngineError> {
            let mut y = 0.0;
            let children = request
                .children
                .iter()
                .map(|child| {
                    let placed = PlacedChild {
                        id: child.id.clone(),
                        x: 0.0,
                        y,
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
                    };
                    y += child.height + 100.0;
                    placed
                })
                .collect();
            Ok(LayoutResult { children })
        }
    }

    #[test]
    fn empty_graph_short_circuits() {
        let mut graph = Graph::new();
        graph.edges.push(Edge::prerequisite("A", "B"));
        let out = layout_elements_sync(&graph, &LayoutConfig::default(), &RowEngine);
        assert!(out.graph.nodes.is_empty());
        assert_eq!(out.graph.edges.len(), 1);
        assert!(out.report.components.is_empty());
    }

    #[test]
    fn subgraph_mode_ungroups_side_by_side() {
        let graph = Graph {
            nodes: vec![
                Node::with_course("CS101", "Intro", 3.0),
                Node::with_course("CS101L", "Intro Lab", 1.0),
            ],
            edges: vec![Edge::corequisite("CS101", "CS101L")],
        };
        let mut config = LayoutConfig::default();
        config.corequisite_layout = CorequisiteLayout::Subgraph;
        let out = layout_elements_sync(&graph, &config, &RowEngine);
        let main = out.graph.node("CS101").and_then(|n| n.position).unwrap();
        let lab = out.graph.node("CS101L").and_then(|n| n.position).unwrap();
        assert_eq!(main, Position::new(100.0, 100.0));
        assert_eq!(lab, Position::new(100.0 + 216.0, 100.0));
        assert!(out.report.components[0].placements.is_empty());
    }

    #[test]
    fn adjacent_mode_reports_lab_placement() {
        let graph = Graph {
            nodes: vec![
                Node::with_course("CS101", "Intro", 3.0),
                Node::with_course("CS101L", "Intro Lab", 1.0),
            ],
            edges: vec![Edge::corequisite("CS101", "CS101L")],
        };
        let out = layout_elements_sync(&graph, &LayoutConfig::default(), &RowEngine);
        let placements = &out.report.components[0].placements;
        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].lab, "CS101L");
        assert_eq!(placements[0].outcome, PlacementOutcome::Primary);
        let lab = out.graph.node("CS101L").and_then(|n| n.position).unwrap();
        assert_eq!(lab, Position::new(100.0 + 280.0, 100.0));
    }
}
