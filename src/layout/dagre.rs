use std::collections::{HashMap, HashSet};
use std::panic::{AssertUnwindSafe, catch_unwind};

use dagre_rust::{
    GraphConfig as DagreConfig, GraphEdge as DagreEdge, GraphNode as DagreNode,
    layout as dagre_layout,
};
use graphlib_rust::{Graph as DagreGraph, GraphOption};

use super::engine::{
    EngineError, LayeredEngine, LayoutRequest, LayoutResult, OPT_DIRECTION, OPT_LAYER_SPACING,
    OPT_NODE_SPACING, PlacedChild,
};
use crate::config::Direction;

const DEFAULT_NODE_SPACING: f32 = 50.0;
const DEFAULT_LAYER_SPACING: f32 = 100.0;
/// Network simplex in dagre_rust does not terminate on some multi-parent DAGs.
const RANKER: &str = "tight-tree";

/// `LayeredEngine` backed by dagre. A fresh dagre graph is built per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DagreEngine;

impl DagreEngine {
    pub fn new() -> Self {
        Self
    }
}

fn dagre_rankdir(direction: Direction) -> &'static str {
    match direction {
        Direction::Down => "tb",
        Direction::Up => "bt",
        Direction::Right => "lr",
        Direction::Left => "rl",
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "unknown panic".to_string()
}

impl LayeredEngine for DagreEngine {
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResult, EngineError> {
        if request.children.is_empty() {
            return Ok(LayoutResult::default());
        }

        let mut known: HashSet<&str> = HashSet::with_capacity(request.children.len());
        for child in &request.children {
            if !known.insert(child.id.as_str()) {
                return Err(EngineError::InvalidRequest(format!(
                    "duplicate child `{}`",
                    child.id
                )));
            }
            let sized = |v: f32| v.is_finite() && v > 0.0;
            if !sized(child.width) || !sized(child.height) {
                return Err(EngineError::InvalidRequest(format!(
                    "child `{}` has size {}x{}",
                    child.id, child.width, child.height
                )));
            }
        }
        for edge in &request.edges {
            for end in edge.sources.iter().chain(edge.targets.iter()) {
                if !known.contains(end.as_str()) {
                    return Err(EngineError::UnknownNode {
                        edge: edge.id.clone(),
                        node: end.clone(),
                    });
                }
            }
        }

        let direction = request
            .option(OPT_DIRECTION)
            .and_then(Direction::from_elk)
            .unwrap_or_default();
        let node_spacing = request
            .option_f32(OPT_NODE_SPACING)
            .unwrap_or(DEFAULT_NODE_SPACING);
        let layer_spacing = request
            .option_f32(OPT_LAYER_SPACING)
            .unwrap_or(DEFAULT_LAYER_SPACING);
        if !node_spacing.is_finite() || !layer_spacing.is_finite() {
            return Err(EngineError::InvalidRequest(format!(
                "spacing {node_spacing}/{layer_spacing} is not finite"
            )));
        }

        let run = catch_unwind(AssertUnwindSafe(|| {
            let mut dagre_graph: DagreGraph<DagreConfig, DagreNode, DagreEdge> =
                DagreGraph::new(Some(GraphOption {
                    directed: Some(true),
                    multigraph: Some(false),
                    compound: Some(false),
                }));

            let mut graph_config = DagreConfig::default();
            graph_config.rankdir = Some(dagre_rankdir(direction).to_string());
            graph_config.nodesep = Some(node_spacing);
            graph_config.ranksep = Some(layer_spacing);
            graph_config.marginx = Some(0.0);
            graph_config.marginy = Some(0.0);
            graph_config.ranker = Some(RANKER.to_string());
            dagre_graph.set_graph(graph_config);

            for (order, child) in request.children.iter().enumerate() {
                let mut node = DagreNode::default();
                node.width = child.width;
                node.height = child.height;
                node.order = Some(order);
                dagre_graph.set_node(child.id.clone(), Some(node));
            }

            let mut edge_set: HashSet<(String, String)> = HashSet::new();
            for edge in &request.edges {
                for from in &edge.sources {
                    for to in &edge.targets {
                        // Self-loops never affect ranks.
                        if from == to || !edge_set.insert((from.clone(), to.clone())) {
                            continue;
                        }
                        let edge_label = DagreEdge::default();
                        let _ = dagre_graph.set_edge(from, to, Some(edge_label), None);
                    }
                }
            }

            dagre_layout::run_layout(&mut dagre_graph);

            let mut centers: HashMap<String, (f32, f32)> = HashMap::new();
            for child in &request.children {
                if let Some(node) = dagre_graph.node(&child.id) {
                    centers.insert(child.id.clone(), (node.x, node.y));
                }
            }
            centers
        }))
        .map_err(|payload| EngineError::Panicked(panic_message(payload)))?;

        let mut children = Vec::with_capacity(request.children.len());
        for child in &request.children {
            let Some(&(cx, cy)) = run.get(&child.id) else {
                return Err(EngineError::MissingPosition(child.id.clone()));
            };
            if !cx.is_finite() || !cy.is_finite() {
                return Err(EngineError::MissingPosition(child.id.clone()));
            }
            let inner = child
                .children
                .iter()
                .map(|grandchild| PlacedChild {
                    id: grandchild.id.clone(),
                    x: grandchild.x.unwrap_or(0.0),
                    y: grandchild.y.unwrap_or(0.0),
                    width: grandchild.width,
                    height: grandchild.height,
                    children: Vec::new(),
                })
                .collect();
            children.push(PlacedChild {
                id: child.id.clone(),
                x: cx - child.width / 2.0,
                y: cy - child.height / 2.0,
                width: child.width,
                height: child.height,
                children: inner,
            });
        }

        Ok(LayoutResult { children })
    }
}
