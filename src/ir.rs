use serde::{Deserialize, Serialize};

pub const COREQ_SOURCE_HANDLE: &str = "coreq-out";
pub const COREQ_TARGET_HANDLE: &str = "coreq-in";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorequisiteRole {
    Lab,
    Main,
}

/// Course payload carried by a node. Layout only reads `name`, `credit_hours`
/// and `corequisite_role`; everything else is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit_hours: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub corequisites: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corequisite_role: Option<CorequisiteRole>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    #[serde(default)]
    pub data: CourseData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Node {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            width: None,
            height: None,
            data: CourseData::default(),
            position: None,
        }
    }

    pub fn with_course(id: &str, name: &str, credit_hours: f32) -> Self {
        let mut node = Self::new(id);
        node.data.name = Some(name.to_string());
        node.data.credit_hours = Some(credit_hours);
        node
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Edge {
    pub fn prerequisite(source: &str, target: &str) -> Self {
        Self {
            id: format!("e-{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: None,
            target_handle: None,
        }
    }

    pub fn corequisite(source: &str, target: &str) -> Self {
        Self {
            id: format!("coreq-{source}-{target}"),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: Some(COREQ_SOURCE_HANDLE.to_string()),
            target_handle: Some(COREQ_TARGET_HANDLE.to_string()),
        }
    }

    pub fn is_corequisite(&self) -> bool {
        self.source_handle.as_deref() == Some(COREQ_SOURCE_HANDLE)
            || self.target_handle.as_deref() == Some(COREQ_TARGET_HANDLE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corequisite_edges_are_detected_by_either_handle() {
        let mut edge = Edge::prerequisite("A", "B");
        assert!(!edge.is_corequisite());
        edge.target_handle = Some("coreq-in".to_string());
        assert!(edge.is_corequisite());
        edge.target_handle = None;
        edge.source_handle = Some("coreq-out".to_string());
        assert!(edge.is_corequisite());
    }

    #[test]
    fn parses_camel_case_graph_json() {
        let raw = r#"{
            "nodes": [
                {"id": "CS101", "data": {"name": "Intro", "creditHours": 3}},
                {"id": "CS101L", "width": 192, "height": 120,
                 "data": {"name": "Intro Lab", "creditHours": 1, "corequisiteRole": "lab"},
                 "position": {"x": 0, "y": 150}}
            ],
            "edges": [
                {"id": "c1", "source": "CS101", "target": "CS101L", "sourceHandle": "coreq-out"}
            ]
        }"#;
        let graph: Graph = serde_json::from_str(raw).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[0].data.credit_hours, Some(3.0));
        assert_eq!(
            graph.nodes[1].data.corequisite_role,
            Some(CorequisiteRole::Lab)
        );
        assert_eq!(graph.nodes[1].position, Some(Position::new(0.0, 150.0)));
        assert!(graph.edges[0].is_corequisite());
    }
}
