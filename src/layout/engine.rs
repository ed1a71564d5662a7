//! The boundary to the layered layout solver.
//!
//! The pipeline hands the engine one component at a time as an ELK-shaped
//! graph: sized children, directed edges and a bag of string directives. The
//! engine returns top-left positions for every top-level child. Compound
//! children (corequisite groups) carry their own fixed child offsets, which
//! the engine echoes back unchanged.

use std::collections::BTreeMap;

use serde::Serialize;

pub const OPT_ALGORITHM: &str = "elk.algorithm";
pub const OPT_DIRECTION: &str = "elk.direction";
pub const OPT_NODE_SPACING: &str = "elk.spacing.nodeNode";
pub const OPT_LAYER_SPACING: &str = "elk.layered.spacing.nodeNodeBetweenLayers";
pub const OPT_ALIGNMENT: &str = "elk.alignment";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("edge `{edge}` references unknown child `{node}`")]
    UnknownNode { edge: String, node: String },
    #[error("layout engine panicked: {0}")]
    Panicked(String),
    #[error("layout engine returned no position for `{0}`")]
    MissingPosition(String),
    #[error("invalid layout request: {0}")]
    InvalidRequest(String),
    #[error("layout engine failed: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutChild {
    pub id: String,
    pub width: f32,
    pub height: f32,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub layout_options: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutChild>,
    /// Fixed offset inside a compound parent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

impl LayoutChild {
    pub fn leaf(id: &str, width: f32, height: f32) -> Self {
        Self {
            id: id.to_string(),
            width,
            height,
            layout_options: BTreeMap::new(),
            children: Vec::new(),
            x: None,
            y: None,
        }
    }

    pub fn is_compound(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutEdge {
    pub id: String,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub id: String,
    pub layout_options: BTreeMap<String, String>,
    pub children: Vec<LayoutChild>,
    pub edges: Vec<LayoutEdge>,
}

impl LayoutRequest {
    pub fn option(&self, key: &str) -> Option<&str> {
        self.layout_options.get(key).map(String::as_str)
    }

    pub fn option_f32(&self, key: &str) -> Option<f32> {
        self.option(key).and_then(|raw| raw.trim().parse::<f32>().ok())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedChild {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub children: Vec<PlacedChild>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    pub children: Vec<PlacedChild>,
}

impl LayoutResult {
    /// Flattens compound children into absolute component-local boxes.
    pub fn flatten(&self) -> Vec<PlacedChild> {
        let mut out = Vec::new();
        for child in &self.children {
            if child.children.is_empty() {
                out.push(child.clone());
                continue;
            }
            for inner in &child.children {
                out.push(PlacedChild {
                    id: inner.id.clone(),
                    x: child.x + inner.x,
                    y: child.y + inner.y,
                    width: inner.width,
                    height: inner.height,
                    children: Vec::new(),
                });
            }
        }
        out
    }
}

/// A layered-layout solver. Implementations must not keep state between calls.
pub trait LayeredEngine: Send + Sync {
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResult, EngineError>;
}

impl<T: LayeredEngine + ?Sized> LayeredEngine for &T {
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResult, EngineError> {
        (**self).layout(request)
    }
}

impl<T: LayeredEngine + ?Sized> LayeredEngine for Box<T> {
    fn layout(&self, request: &LayoutRequest) -> Result<LayoutResult, EngineError> {
        (**self).layout(request)
    }
}
