use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::ir::{CorequisiteRole, Edge, Node};

/// Lab id -> main id, in insertion order. Re-pairing a lab updates its main in
/// place, so processing order stays the order labs were first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorequisitePairs {
    pairs: IndexMap<String, String>,
}

impl CorequisitePairs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lab: &str, main: &str) {
        self.pairs.insert(lab.to_string(), main.to_string());
    }

    pub fn main_of(&self, lab: &str) -> Option<&str> {
        self.pairs.get(lab).map(String::as_str)
    }

    pub fn is_lab(&self, id: &str) -> bool {
        self.pairs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs
            .iter()
            .map(|(lab, main)| (lab.as_str(), main.as_str()))
    }

    /// Pairs whose lab and main are both in `members`.
    pub fn within(&self, members: &HashSet<&str>) -> Self {
        let pairs = self
            .pairs
            .iter()
            .filter(|(lab, main)| members.contains(lab.as_str()) && members.contains(main.as_str()))
            .map(|(lab, main)| (lab.clone(), main.clone()))
            .collect();
        Self { pairs }
    }
}

/// Name or credit-hour guess used when neither endpoint carries a role.
pub fn looks_like_lab(node: &Node) -> bool {
    let named_lab = node
        .data
        .name
        .as_deref()
        .map(|name| name.to_lowercase().contains("lab"))
        .unwrap_or(false);
    named_lab || node.data.credit_hours == Some(1.0)
}

fn classify(source: &Node, target: &Node) -> (bool, bool) {
    let source_role = source.data.corequisite_role;
    let target_role = target.data.corequisite_role;
    if source_role.is_some() || target_role.is_some() {
        return (
            source_role == Some(CorequisiteRole::Lab),
            target_role == Some(CorequisiteRole::Lab),
        );
    }
    (looks_like_lab(source), looks_like_lab(target))
}

pub fn identify_corequisite_pairs(nodes: &[Node], edges: &[Edge]) -> CorequisitePairs {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|node| (node.id.as_str(), node)).collect();
    let mut pairs = CorequisitePairs::new();

    for edge in edges.iter().filter(|edge| edge.is_corequisite()) {
        let (Some(source), Some(target)) = (
            by_id.get(edge.source.as_str()),
            by_id.get(edge.target.as_str()),
        ) else {
            continue;
        };
        match classify(source, target) {
            (true, false) => pairs.insert(&edge.source, &edge.target),
            (false, true) => pairs.insert(&edge.target, &edge.source),
            (source_lab, _) => {
                tracing::debug!(
                    edge = %edge.id,
                    both_labs = source_lab,
                    "ambiguous corequisite edge, no lab/main pair recorded"
                );
            }
        }
    }

    pairs
}
