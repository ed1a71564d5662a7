use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[default]
    Down,
    Up,
    Left,
    Right,
}

impl Direction {
    pub fn as_elk(self) -> &'static str {
        match self {
            Self::Down => "DOWN",
            Self::Up => "UP",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        }
    }

    pub fn from_elk(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "DOWN" => Some(Self::Down),
            "UP" => Some(Self::Up),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SmallComponentLayout {
    #[default]
    Vertical,
    Grid,
}

impl SmallComponentLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Grid => "grid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CorequisiteLayout {
    Subgraph,
    #[default]
    Adjacent,
}

impl CorequisiteLayout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Subgraph => "subgraph",
            Self::Adjacent => "adjacent",
        }
    }
}

/// Lab placement search constants. Offsets are relative to the main node's
/// top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorequisiteConfig {
    pub padding: f32,
    pub spacing: f32,
    pub vertical_spacing: f32,
    pub far_spacing: f32,
    pub spiral_radius: f32,
    pub spiral_step: f32,
    pub spiral_max_radius: f32,
    pub spiral_angle_steps: usize,
    /// Width between the two members of a compound corequisite group.
    pub compound_gap: f32,
}

impl Default for CorequisiteConfig {
    fn default() -> Self {
        Self {
            padding: 20.0,
            spacing: 280.0,
            vertical_spacing: 140.0,
            far_spacing: 420.0,
            spiral_radius: 350.0,
            spiral_step: 140.0,
            spiral_max_radius: 1050.0,
            spiral_angle_steps: 8,
            compound_gap: 24.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub origin_x: f32,
    pub origin_y: f32,
    pub component_gap: f32,
    pub grid_rows: usize,
    pub grid_cell_width: f32,
    pub grid_cell_height: f32,
    pub min_stack_height: f32,
    pub stack_gap: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            origin_x: 100.0,
            origin_y: 100.0,
            component_gap: 300.0,
            grid_rows: 2,
            grid_cell_width: 400.0,
            grid_cell_height: 400.0,
            min_stack_height: 200.0,
            stack_gap: 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub node_spacing: f32,
    pub layer_spacing: f32,
    pub algorithm: String,
    pub alignment: String,
    pub small_component_layout: SmallComponentLayout,
    pub corequisite_layout: CorequisiteLayout,
    pub node_width: f32,
    pub node_height: f32,
    /// Rendered card width. Used for lab candidate boxes and the main component's
    /// right extent, so it is wider than the layout box.
    pub footprint_width: f32,
    pub corequisite: CorequisiteConfig,
    pub canvas: CanvasConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Down,
            node_spacing: 50.0,
            layer_spacing: 100.0,
            algorithm: "layered".to_string(),
            alignment: "CENTER".to_string(),
            small_component_layout: SmallComponentLayout::Vertical,
            corequisite_layout: CorequisiteLayout::Adjacent,
            node_width: 192.0,
            node_height: 120.0,
            footprint_width: 256.0,
            corequisite: CorequisiteConfig::default(),
            canvas: CanvasConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CorequisiteConfigFile {
    padding: Option<f32>,
    spacing: Option<f32>,
    vertical_spacing: Option<f32>,
    far_spacing: Option<f32>,
    spiral_radius: Option<f32>,
    spiral_step: Option<f32>,
    spiral_max_radius: Option<f32>,
    spiral_angle_steps: Option<usize>,
    compound_gap: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct CanvasConfigFile {
    origin_x: Option<f32>,
    origin_y: Option<f32>,
    component_gap: Option<f32>,
    grid_rows: Option<usize>,
    grid_cell_width: Option<f32>,
    grid_cell_height: Option<f32>,
    min_stack_height: Option<f32>,
    stack_gap: Option<f32>,
}

/// Partial options, as accepted from a config file or the wasm binding.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    direction: Option<Direction>,
    node_spacing: Option<f32>,
    layer_spacing: Option<f32>,
    algorithm: Option<String>,
    alignment: Option<String>,
    small_component_layout: Option<SmallComponentLayout>,
    corequisite_layout: Option<CorequisiteLayout>,
    node_width: Option<f32>,
    node_height: Option<f32>,
    footprint_width: Option<f32>,
    corequisite: Option<CorequisiteConfigFile>,
    canvas: Option<CanvasConfigFile>,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        // json5 accepts plain JSON as well as comments and trailing commas.
        Ok(json5::from_str(contents)?)
    }

    pub fn apply(self, config: &mut LayoutConfig) {
        if let Some(v) = self.direction {
            config.direction = v;
        }
        if let Some(v) = self.node_spacing {
            config.node_spacing = v;
        }
        if let Some(v) = self.layer_spacing {
            config.layer_spacing = v;
        }
        if let Some(v) = self.algorithm {
            config.algorithm = v;
        }
        if let Some(v) = self.alignment {
            config.alignment = v;
        }
        if let Some(v) = self.small_component_layout {
            config.small_component_layout = v;
        }
        if let Some(v) = self.corequisite_layout {
            config.corequisite_layout = v;
        }
        if let Some(v) = self.node_width {
            config.node_width = v;
        }
        if let Some(v) = self.node_height {
            config.node_height = v;
        }
        if let Some(v) = self.footprint_width {
            config.footprint_width = v;
        }
        if let Some(coreq) = self.corequisite {
            let target = &mut config.corequisite;
            if let Some(v) = coreq.padding {
                target.padding = v;
            }
            if let Some(v) = coreq.spacing {
                target.spacing = v;
            }
            if let Some(v) = coreq.vertical_spacing {
                target.vertical_spacing = v;
            }
            if let Some(v) = coreq.far_spacing {
                target.far_spacing = v;
            }
            if let Some(v) = coreq.spiral_radius {
                target.spiral_radius = v;
            }
            if let Some(v) = coreq.spiral_step {
                target.spiral_step = v.max(1.0);
            }
            if let Some(v) = coreq.spiral_max_radius {
                target.spiral_max_radius = v;
            }
            if let Some(v) = coreq.spiral_angle_steps {
                target.spiral_angle_steps = v.max(1);
            }
            if let Some(v) = coreq.compound_gap {
                target.compound_gap = v;
            }
        }
        if let Some(canvas) = self.canvas {
            let target = &mut config.canvas;
            if let Some(v) = canvas.origin_x {
                target.origin_x = v;
            }
            if let Some(v) = canvas.origin_y {
                target.origin_y = v;
            }
            if let Some(v) = canvas.component_gap {
                target.component_gap = v;
            }
            if let Some(v) = canvas.grid_rows {
                target.grid_rows = v.max(1);
            }
            if let Some(v) = canvas.grid_cell_width {
                target.grid_cell_width = v;
            }
            if let Some(v) = canvas.grid_cell_height {
                target.grid_cell_height = v;
            }
            if let Some(v) = canvas.min_stack_height {
                target.min_stack_height = v;
            }
            if let Some(v) = canvas.stack_gap {
                target.stack_gap = v;
            }
        }
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<LayoutConfig> {
    let mut config = LayoutConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    ConfigFile::parse(&contents)?.apply(&mut config);
    Ok(config)
}
