#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod roadmap;
pub mod session;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{LayoutConfig, load_config};
pub use ir::{Edge, Graph, Node, Position};
pub use layout::{
    DagreEngine, EngineError, LayeredEngine, LayoutOutput, LayoutReport, compute_layout,
    layout_elements, layout_elements_sync,
};
pub use roadmap::{build_course_graph, filter_roadmaps};
pub use session::LayoutSession;
