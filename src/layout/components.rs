use std::collections::{HashMap, HashSet};

use crate::ir::{Edge, Node};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Members in input order.
    pub node_ids: Vec<String>,
}

impl Component {
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_ids.iter().any(|member| member == id)
    }
}

/// Partitions the nodes into undirected connected components. Components come
/// out in order of their first member in `nodes`; edges touching unknown ids
/// are ignored.
pub fn find_connected_components(nodes: &[Node], edges: &[Edge]) -> Vec<Component> {
    let mut order: Vec<&str> = Vec::with_capacity(nodes.len());
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for node in nodes {
        if adjacency.contains_key(node.id.as_str()) {
            continue;
        }
        adjacency.insert(node.id.as_str(), Vec::new());
        order.push(node.id.as_str());
    }
    for edge in edges {
        let (from, to) = (edge.source.as_str(), edge.target.as_str());
        if !adjacency.contains_key(from) || !adjacency.contains_key(to) {
            continue;
        }
        if let Some(neigh) = adjacency.get_mut(from) {
            neigh.push(to);
        }
        if let Some(neigh) = adjacency.get_mut(to) {
            neigh.push(from);
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut component_of: HashMap<&str, usize> = HashMap::new();
    let mut count = 0usize;
    for &start in &order {
        if !visited.insert(start) {
            continue;
        }
        let mut stack = vec![start];
        while let Some(cur) = stack.pop() {
            component_of.insert(cur, count);
            if let Some(neigh) = adjacency.get(cur) {
                for &next in neigh {
                    if visited.insert(next) {
                        stack.push(next);
                    }
                }
            }
        }
        count += 1;
    }

    let mut components: Vec<Component> = (0..count)
        .map(|_| Component {
            node_ids: Vec::new(),
        })
        .collect();
    for id in order {
        if let Some(&idx) = component_of.get(id) {
            components[idx].node_ids.push(id.to_string());
        }
    }
    components
}
