use std::collections::HashMap;
use std::f32::consts::TAU;

use super::corequisite::CorequisitePairs;
use super::types::{LabPlacement, NodeLayout, PlacementOutcome, Rect};
use crate::config::{CorequisiteConfig, LayoutConfig};

/// What a strategy sees: the main node's corner, the lab size and every box
/// already claimed in the component.
pub struct LabSearch<'a> {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub width: f32,
    pub height: f32,
    pub occupied: &'a [Rect],
    pub config: &'a CorequisiteConfig,
}

impl LabSearch<'_> {
    fn is_clear(&self, x: f32, y: f32) -> bool {
        let candidate = Rect::new(x, y, self.width, self.height);
        !self
            .occupied
            .iter()
            .any(|rect| candidate.overlaps(rect, self.config.padding))
    }

    fn first_clear<I>(&self, offsets: I) -> Option<(f32, f32)>
    where
        I: IntoIterator<Item = (f32, f32)>,
    {
        offsets
            .into_iter()
            .map(|(dx, dy)| (self.anchor_x + dx, self.anchor_y + dy))
            .find(|&(x, y)| self.is_clear(x, y))
    }
}

pub type Strategy = fn(&LabSearch<'_>) -> Option<(f32, f32)>;

/// Tried in order; the first strategy to return a spot wins.
pub const STRATEGIES: [(PlacementOutcome, Strategy); 3] = [
    (PlacementOutcome::Primary, primary_strategy),
    (PlacementOutcome::Far, far_strategy),
    (PlacementOutcome::Spiral, spiral_strategy),
];

/// right, left, below, above, the four half-step diagonals, then the four
/// full-step corners.
pub fn primary_offsets(config: &CorequisiteConfig) -> Vec<(f32, f32)> {
    let s = config.spacing;
    let v = config.vertical_spacing;
    let half = s / 2.0;
    vec![
        (s, 0.0),
        (-s, 0.0),
        (0.0, v),
        (0.0, -v),
        (half, v),
        (-half, v),
        (half, -v),
        (-half, -v),
        (s, v),
        (-s, v),
        (s, -v),
        (-s, -v),
    ]
}

pub fn far_offsets(config: &CorequisiteConfig) -> Vec<(f32, f32)> {
    let f = config.far_spacing;
    let v = config.vertical_spacing;
    vec![(f, 0.0), (-f, 0.0), (0.0, v * 2.0), (f, v), (-f, v)]
}

pub fn spiral_offsets(config: &CorequisiteConfig) -> Vec<(f32, f32)> {
    let mut out = Vec::new();
    if config.spiral_step <= 0.0 || config.spiral_angle_steps == 0 {
        return out;
    }
    let steps = config.spiral_angle_steps;
    let mut ring = 0usize;
    loop {
        let radius = config.spiral_radius + ring as f32 * config.spiral_step;
        if radius > config.spiral_max_radius + 1e-3 {
            break;
        }
        for k in 0..steps {
            let angle = TAU * k as f32 / steps as f32;
            out.push((angle.cos() * radius, angle.sin() * radius));
        }
        ring += 1;
    }
    out
}

fn primary_strategy(search: &LabSearch<'_>) -> Option<(f32, f32)> {
    search.first_clear(primary_offsets(search.config))
}

fn far_strategy(search: &LabSearch<'_>) -> Option<(f32, f32)> {
    search.first_clear(far_offsets(search.config))
}

fn spiral_strategy(search: &LabSearch<'_>) -> Option<(f32, f32)> {
    search.first_clear(spiral_offsets(search.config))
}

/// Moves every lab in `pairs` next to its main node. Nodes that are not labs
/// are never moved. Returns one record per lab that had a positioned main.
pub fn resolve_corequisite_overlaps(
    nodes: &mut [NodeLayout],
    pairs: &CorequisitePairs,
    config: &LayoutConfig,
) -> Vec<LabPlacement> {
    let mut placements = Vec::new();
    if pairs.is_empty() {
        return placements;
    }

    let index: HashMap<String, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.clone(), idx))
        .collect();

    let mut occupied: Vec<Rect> = nodes
        .iter()
        .filter(|node| !pairs.is_lab(&node.id))
        .map(NodeLayout::rect)
        .collect();
    tracing::debug!(
        occupied = occupied.len(),
        labs = pairs.len(),
        "resolving corequisite placements"
    );

    for (lab_id, main_id) in pairs.iter() {
        let (Some(&lab_idx), Some(&main_idx)) = (index.get(lab_id), index.get(main_id)) else {
            continue;
        };
        let (anchor_x, anchor_y) = (nodes[main_idx].x, nodes[main_idx].y);
        let lab = &nodes[lab_idx];
        let search = LabSearch {
            anchor_x,
            anchor_y,
            width: lab.width.max(config.footprint_width),
            height: lab.height,
            occupied: &occupied,
            config: &config.corequisite,
        };

        let mut found = None;
        for (outcome, strategy) in STRATEGIES {
            if let Some(spot) = strategy(&search) {
                found = Some((outcome, spot));
                break;
            }
            tracing::debug!(lab = lab_id, ?outcome, "no free slot for lab");
        }

        let lab = &mut nodes[lab_idx];
        let outcome = match found {
            Some((outcome, (x, y))) => {
                lab.x = x;
                lab.y = y;
                tracing::debug!(lab = lab_id, main = main_id, ?outcome, x, y, "placed lab");
                outcome
            }
            None => {
                tracing::warn!(
                    lab = lab_id,
                    main = main_id,
                    x = lab.x,
                    y = lab.y,
                    "could not find a non-overlapping position for lab, keeping engine position"
                );
                PlacementOutcome::Fallback
            }
        };
        occupied.push(lab.rect());
        placements.push(LabPlacement {
            lab: lab_id.to_string(),
            main: main_id.to_string(),
            outcome,
            x: lab.x,
            y: lab.y,
        });
    }

    placements
}
