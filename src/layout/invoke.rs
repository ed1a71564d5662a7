use std::collections::{BTreeMap, HashMap, HashSet};

use super::corequisite::CorequisitePairs;
use super::engine::{
    EngineError, LayeredEngine, LayoutChild, LayoutEdge, LayoutRequest, OPT_ALGORITHM,
    OPT_ALIGNMENT, OPT_DIRECTION, OPT_LAYER_SPACING, OPT_NODE_SPACING,
};
use super::overlap::resolve_corequisite_overlaps;
use super::types::{LabPlacement, NodeLayout};
use crate::config::{CorequisiteLayout, LayoutConfig};
use crate::ir::{Edge, Node};

/// A component request plus the bookkeeping needed to undo compound grouping.
#[derive(Debug, Clone)]
pub struct ComponentRequest {
    pub request: LayoutRequest,
    /// Ids of the mains and labs folded into compound children (subgraph mode only).
    pub grouped: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct ComponentLayout {
    pub index: usize,
    pub nodes: Vec<NodeLayout>,
    pub engine_failed: bool,
    pub placements: Vec<LabPlacement>,
}

pub fn node_size(node: &Node, config: &LayoutConfig) -> (f32, f32) {
    (
        node.width.unwrap_or(config.node_width),
        node.height.unwrap_or(config.node_height),
    )
}

fn layered_options(config: &LayoutConfig) -> BTreeMap<String, String> {
    let mut options = BTreeMap::new();
    let mut set = |key: &str, value: String| {
        options.insert(key.to_string(), value);
    };
    set(OPT_ALGORITHM, config.algorithm.clone());
    set(OPT_DIRECTION, config.direction.as_elk().to_string());
    set(OPT_NODE_SPACING, config.node_spacing.to_string());
    set(OPT_LAYER_SPACING, config.layer_spacing.to_string());
    set(OPT_ALIGNMENT, config.alignment.clone());
    set(
        "elk.layered.considerModelOrder.strategy",
        "NODES_AND_EDGES".to_string(),
    );
    set("elk.layered.cycleBreaking.strategy", "GREEDY".to_string());
    set("elk.layered.nodePlacement.strategy", "SIMPLE".to_string());
    set(
        "elk.layered.crossingMinimization.strategy",
        "LAYER_SWEEP".to_string(),
    );
    set("elk.hierarchyHandling", "INCLUDE_CHILDREN".to_string());
    options
}

fn compound_options(config: &LayoutConfig) -> BTreeMap<String, String> {
    let mut options = BTreeMap::new();
    options.insert(OPT_ALGORITHM.to_string(), "fixed".to_string());
    options.insert(OPT_DIRECTION.to_string(), "RIGHT".to_string());
    options.insert(
        OPT_NODE_SPACING.to_string(),
        config.corequisite.compound_gap.to_string(),
    );
    options
}

pub fn compound_id(main: &str) -> String {
    format!("coreq-{main}")
}

/// Builds the engine request for one component. `nodes` and `edges` must
/// already be restricted to the component.
pub fn build_component_request(
    index: usize,
    nodes: &[&Node],
    edges: &[&Edge],
    pairs: &CorequisitePairs,
    config: &LayoutConfig,
) -> ComponentRequest {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|node| (node.id.as_str(), *node)).collect();

    // main id -> lab id, in pair order
    let mut groups: Vec<(&str, &str)> = Vec::new();
    let mut grouped: HashSet<String> = HashSet::new();
    if config.corequisite_layout == CorequisiteLayout::Subgraph {
        for (lab, main) in pairs.iter() {
            if grouped.contains(main) || grouped.contains(lab) {
                continue;
            }
            if !by_id.contains_key(main) || !by_id.contains_key(lab) {
                continue;
            }
            groups.push((main, lab));
            grouped.insert(main.to_string());
            grouped.insert(lab.to_string());
        }
    }

    let mut children: Vec<LayoutChild> = nodes
        .iter()
        .filter(|node| !grouped.contains(&node.id))
        .map(|node| {
            let (width, height) = node_size(node, config);
            LayoutChild::leaf(&node.id, width, height)
        })
        .collect();

    let mut owner: HashMap<&str, String> = HashMap::new();
    let gap = config.corequisite.compound_gap;
    for &(main, lab) in &groups {
        let (main_w, main_h) = node_size(by_id[main], config);
        let (lab_w, lab_h) = node_size(by_id[lab], config);
        let mut main_child = LayoutChild::leaf(main, main_w, main_h);
        main_child.x = Some(0.0);
        main_child.y = Some(0.0);
        let mut lab_child = LayoutChild::leaf(lab, lab_w, lab_h);
        lab_child.x = Some(main_w + gap);
        lab_child.y = Some(0.0);

        let id = compound_id(main);
        owner.insert(main, id.clone());
        owner.insert(lab, id.clone());
        children.push(LayoutChild {
            id,
            width: main_w + gap + lab_w + gap,
            height: main_h.max(lab_h),
            layout_options: compound_options(config),
            children: vec![main_child, lab_child],
            x: None,
            y: None,
        });
    }

    let mut layout_edges = Vec::with_capacity(edges.len());
    for edge in edges {
        let source = owner
            .get(edge.source.as_str())
            .cloned()
            .unwrap_or_else(|| edge.source.clone());
        let target = owner
            .get(edge.target.as_str())
            .cloned()
            .unwrap_or_else(|| edge.target.clone());
        if source == target && edge.source != edge.target {
            continue;
        }
        layout_edges.push(LayoutEdge {
            id: edge.id.clone(),
            sources: vec![source],
            targets: vec![target],
        });
    }

    ComponentRequest {
        request: LayoutRequest {
            id: format!("component-{index}"),
            layout_options: layered_options(config),
            children,
            edges: layout_edges,
        },
        grouped,
    }
}

fn fallback_nodes(nodes: &[&Node], config: &LayoutConfig) -> Vec<NodeLayout> {
    nodes
        .iter()
        .map(|node| {
            let (width, height) = node_size(node, config);
            let position = node.position.unwrap_or_default();
            NodeLayout {
                id: node.id.clone(),
                x: position.x,
                y: position.y,
                width,
                height,
            }
        })
        .collect()
}

/// Runs the engine for one component, then places labs. An engine failure
/// leaves the component at its pre-layout positions.
pub fn run_component<E: LayeredEngine + ?Sized>(
    index: usize,
    nodes: &[&Node],
    prepared: &ComponentRequest,
    pairs: &CorequisitePairs,
    engine: &E,
    config: &LayoutConfig,
) -> ComponentLayout {
    let placed = engine.layout(&prepared.request).and_then(|result| {
        let flat: HashMap<String, NodeLayout> = result
            .flatten()
            .into_iter()
            .map(|child| {
                let layout = NodeLayout {
                    id: child.id.clone(),
                    x: child.x,
                    y: child.y,
                    width: child.width,
                    height: child.height,
                };
                (child.id, layout)
            })
            .collect();
        nodes
            .iter()
            .map(|node| {
                flat.get(&node.id)
                    .cloned()
                    .ok_or_else(|| EngineError::MissingPosition(node.id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()
    });

    let mut layout_nodes = match placed {
        Ok(layout_nodes) => layout_nodes,
        Err(err) => {
            tracing::warn!(
                component = index,
                nodes = nodes.len(),
                error = %err,
                "layout engine failed, keeping pre-layout positions"
            );
            return ComponentLayout {
                index,
                nodes: fallback_nodes(nodes, config),
                engine_failed: true,
                placements: Vec::new(),
            };
        }
    };

    let mut placements = Vec::new();
    if !pairs.is_empty() {
        let loose = if prepared.grouped.is_empty() {
            pairs.clone()
        } else {
            let mut loose = CorequisitePairs::new();
            for (lab, main) in pairs.iter() {
                if !prepared.grouped.contains(lab) {
                    loose.insert(lab, main);
                }
            }
            loose
        };
        if !loose.is_empty() {
            tracing::info!(
                component = index,
                pairs = loose.len(),
                "processing corequisite pairs"
            );
            placements = resolve_corequisite_overlaps(&mut layout_nodes, &loose, config);
        }
    }

    ComponentLayout {
        index,
        nodes: layout_nodes,
        engine_failed: false,
        placements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::corequisite::identify_corequisite_pairs;

    fn course_nodes() -> Vec<Node> {
        vec![
            Node::with_course("CS101", "Intro", 3.0),
            Node::with_course("CS101L", "Intro Lab", 1.0),
            Node::with_course("CS201", "Data Structures", 3.0),
        ]
    }

    fn course_edges() -> Vec<Edge> {
        vec![
            Edge::corequisite("CS101", "CS101L"),
            Edge::prerequisite("CS101", "CS201"),
            Edge::prerequisite("CS101L", "CS201"),
        ]
    }

    #[test]
    fn adjacent_mode_passes_every_node_through() {
        let nodes = course_nodes();
        let edges = course_edges();
        let node_refs: Vec<&Node> = nodes.iter().collect();
        let edge_refs: Vec<&Edge> = edges.iter().collect();
        let pairs = identify_corequisite_pairs(&nodes, &edges);
        let config = LayoutConfig::default();
        let prepared = build_component_request(3, &node_refs, &edge_refs, &pairs, &config);
        let request = &prepared.request;
        assert_eq!(request.id, "component-3");
        let ids: Vec<&str> = request.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CS101", "CS101L", "CS201"]);
        assert!(request.children.iter().all(|c| c.width == 192.0 && c.height == 120.0));
        assert_eq!(request.edges.len(), 3);
        assert_eq!(request.option(OPT_DIRECTION), Some("DOWN"));
        assert_eq!(request.option(OPT_NODE_SPACING), Some("50"));
        assert_eq!(request.option(OPT_LAYER_SPACING), Some("100"));
        assert_eq!(request.option(OPT_ALIGNMENT), Some("CENTER"));
        assert!(prepared.grouped.is_empty());
    }

    #[test]
    fn subgraph_mode_groups_pairs_and_lifts_edges() {
        let nodes = course_nodes();
        let edges = course_edges();
        let node_refs: Vec<&Node> = nodes.iter().collect();
        let edge_refs: Vec<&Edge> = edges.iter().collect();
        let pairs = identify_corequisite_pairs(&nodes, &edges);
        let mut config = LayoutConfig::default();
        config.corequisite_layout = CorequisiteLayout::Subgraph;
        let prepared = build_component_request(0, &node_refs, &edge_refs, &pairs, &config);
        let request = &prepared.request;

        let ids: Vec<&str> = request.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["CS201", "coreq-CS101"]);
        let compound = &request.children[1];
        assert!(compound.is_compound());
        assert_eq!(compound.width, 432.0);
        assert_eq!(compound.children[0].id, "CS101");
        assert_eq!(compound.children[1].id, "CS101L");
        assert_eq!(compound.children[1].x, Some(216.0));
        assert_eq!(
            compound.layout_options.get(OPT_ALGORITHM).map(String::as_str),
            Some("fixed")
        );

        // The corequisite edge collapses; both prerequisite edges now start at
        // the compound.
        assert_eq!(request.edges.len(), 2);
        assert!(request
            .edges
            .iter()
            .all(|e| e.sources == vec!["coreq-CS101".to_string()]
                && e.targets == vec!["CS201".to_string()]));
    }

    #[test]
    fn a_main_with_two_labs_groups_only_the_first() {
        let nodes = vec![
            Node::with_course("BIO1", "Biology", 3.0),
            Node::with_course("BIO1L", "Biology Lab", 1.0),
            Node::with_course("BIO1F", "Field Lab", 1.0),
        ];
        let edges = vec![
            Edge::corequisite("BIO1", "BIO1L"),
            Edge::corequisite("BIO1", "BIO1F"),
        ];
        let node_refs: Vec<&Node> = nodes.iter().collect();
        let edge_refs: Vec<&Edge> = edges.iter().collect();
        let pairs = identify_corequisite_pairs(&nodes, &edges);
        let mut config = LayoutConfig::default();
        config.corequisite_layout = CorequisiteLayout::Subgraph;
        let prepared = build_component_request(0, &node_refs, &edge_refs, &pairs, &config);
        assert!(prepared.grouped.contains("BIO1L"));
        assert!(!prepared.grouped.contains("BIO1F"));
        let ids: Vec<&str> = prepared.request.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["BIO1F", "coreq-BIO1"]);
        assert_eq!(prepared.request.edges[0].sources, vec!["coreq-BIO1".to_string()]);
        assert_eq!(prepared.request.edges[0].targets, vec!["BIO1F".to_string()]);
    }

    #[test]
    fn explicit_node_size_wins_over_default() {
        let mut node = Node::new("BIG");
        node.width = Some(300.0);
        let config = LayoutConfig::default();
        assert_eq!(node_size(&node, &config), (300.0, 120.0));
    }
}
