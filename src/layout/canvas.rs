use std::collections::HashMap;

use super::invoke::ComponentLayout;
use crate::config::{LayoutConfig, SmallComponentLayout};
use crate::ir::Position;

#[derive(Debug, Clone, Default)]
pub struct Composition {
    pub positions: HashMap<String, Position>,
    /// Base offset per component, indexed like the input slice.
    pub bases: Vec<Position>,
    pub main_component: Option<usize>,
    /// Right extent of the main component (including the footprint width).
    pub main_extent: f32,
}

fn local_origin(component: &ComponentLayout) -> (f32, f32) {
    let min_x = component
        .nodes
        .iter()
        .map(|node| node.x)
        .fold(f32::INFINITY, f32::min);
    let min_y = component
        .nodes
        .iter()
        .map(|node| node.y)
        .fold(f32::INFINITY, f32::min);
    if min_x.is_finite() && min_y.is_finite() {
        (min_x, min_y)
    } else {
        (0.0, 0.0)
    }
}

/// Places every component on one canvas. The largest component is anchored at
/// the canvas origin; the rest go to its right, stacked or in a grid.
pub fn compose_components(components: &[ComponentLayout], config: &LayoutConfig) -> Composition {
    let canvas = &config.canvas;
    let mut composition = Composition {
        bases: vec![Position::default(); components.len()],
        ..Composition::default()
    };

    let mut order: Vec<usize> = (0..components.len()).collect();
    order.sort_by(|a, b| components[*b].nodes.len().cmp(&components[*a].nodes.len()));

    let mut right_side_x: Option<f32> = None;
    let mut cursor_y = canvas.origin_y;

    for (rank, &idx) in order.iter().enumerate() {
        let component = &components[idx];
        let (min_x, min_y) = local_origin(component);
        let local = |x: f32, y: f32| (x - min_x, y - min_y);

        let base = if rank == 0 {
            let base = Position::new(canvas.origin_x, canvas.origin_y);
            composition.main_extent = component
                .nodes
                .iter()
                .map(|node| {
                    let (lx, _) = local(node.x, node.y);
                    base.x + lx + node.width.max(config.footprint_width)
                })
                .fold(0.0, f32::max);
            composition.main_component = Some(idx);
            base
        } else {
            let right =
                *right_side_x.get_or_insert(composition.main_extent + canvas.component_gap);
            if config.small_component_layout == SmallComponentLayout::Grid && rank > 1 {
                let rows = canvas.grid_rows.max(1);
                let column = (rank - 1) / rows;
                let row = (rank - 1) % rows;
                Position::new(
                    right + column as f32 * canvas.grid_cell_width,
                    canvas.origin_y + row as f32 * canvas.grid_cell_height,
                )
            } else {
                let base = Position::new(right, cursor_y);
                let height = component
                    .nodes
                    .iter()
                    .map(|node| local(node.x, node.y).1 + node.height)
                    .fold(0.0, f32::max);
                cursor_y = base.y + height.max(canvas.min_stack_height) + canvas.stack_gap;
                base
            }
        };

        composition.bases[idx] = base;
        for node in &component.nodes {
            let (lx, ly) = local(node.x, node.y);
            composition
                .positions
                .insert(node.id.clone(), Position::new(base.x + lx, base.y + ly));
        }
    }

    composition
}
