use crate::config::LayoutConfig;
use crate::layout::{LabPlacement, LayoutOutput};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDump {
    pub direction: String,
    pub corequisite_layout: String,
    pub small_component_layout: String,
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub components: Vec<ComponentDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDump {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub component: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDump {
    pub index: usize,
    pub main: bool,
    pub engine_failed: bool,
    pub base: [f32; 2],
    pub nodes: Vec<String>,
    pub placements: Vec<LabPlacement>,
}

impl LayoutDump {
    pub fn from_output(output: &LayoutOutput, config: &LayoutConfig) -> Self {
        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        let nodes = output
            .graph
            .nodes
            .iter()
            .map(|node| {
                let position = node.position.unwrap_or_default();
                let w = node.width.unwrap_or(config.node_width);
                let h = node.height.unwrap_or(config.node_height);
                width = width.max(position.x + w);
                height = height.max(position.y + h);
                NodeDump {
                    id: node.id.clone(),
                    x: position.x,
                    y: position.y,
                    width: w,
                    height: h,
                    component: output
                        .report
                        .components
                        .iter()
                        .find(|component| component.node_ids.contains(&node.id))
                        .map(|component| component.index),
                }
            })
            .collect();

        let components = output
            .report
            .components
            .iter()
            .map(|component| ComponentDump {
                index: component.index,
                main: component.is_main,
                engine_failed: component.engine_failed,
                base: [component.base_x, component.base_y],
                nodes: component.node_ids.clone(),
                placements: component.placements.clone(),
            })
            .collect();

        LayoutDump {
            direction: config.direction.as_elk().to_string(),
            corequisite_layout: config.corequisite_layout.as_str().to_string(),
            small_component_layout: config.small_component_layout.as_str().to_string(),
            width,
            height,
            nodes,
            components,
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    output: &LayoutOutput,
    config: &LayoutConfig,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_output(output, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
