use serde::Serialize;

use crate::ir::Graph;

/// A node box in component-local coordinates (top-left anchored).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeLayout {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl NodeLayout {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Two boxes overlap unless at least `padding` separates them on one axis.
    pub fn overlaps(&self, other: &Rect, padding: f32) -> bool {
        !(self.x + self.width + padding <= other.x
            || other.x + other.width + padding <= self.x
            || self.y + self.height + padding <= other.y
            || other.y + other.height + padding <= self.y)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementOutcome {
    Primary,
    Far,
    Spiral,
    /// Every strategy failed; the engine position was kept and may overlap.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabPlacement {
    pub lab: String,
    pub main: String,
    pub outcome: PlacementOutcome,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentReport {
    pub index: usize,
    pub node_ids: Vec<String>,
    pub engine_failed: bool,
    pub is_main: bool,
    pub base_x: f32,
    pub base_y: f32,
    pub placements: Vec<LabPlacement>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutReport {
    pub components: Vec<ComponentReport>,
}

impl LayoutReport {
    pub fn fallback_labs(&self) -> Vec<&str> {
        self.components
            .iter()
            .flat_map(|component| component.placements.iter())
            .filter(|placement| placement.outcome == PlacementOutcome::Fallback)
            .map(|placement| placement.lab.as_str())
            .collect()
    }

    pub fn failed_components(&self) -> usize {
        self.components
            .iter()
            .filter(|component| component.engine_failed)
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutOutput {
    pub graph: Graph,
    pub report: LayoutReport,
}
