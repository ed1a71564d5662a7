use crate::config::{CorequisiteLayout, Direction, LayoutConfig, SmallComponentLayout, load_config};
use crate::ir::Graph;
use crate::layout::{DagreEngine, LayoutOutput, layout_elements_sync};
use crate::layout_dump::write_layout_dump;
use crate::roadmap::{RoadmapBundle, build_course_graph};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "coursemap",
    version,
    about = "Lay out course roadmaps as layered graphs"
)]
pub struct Args {
    /// Input graph JSON (or roadmap bundle with --roadmap), '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config file (JSON or JSON5)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Treat the input as a roadmap bundle and lay out this roadmap
    #[arg(long = "roadmap")]
    pub roadmap: Option<String>,

    #[arg(long = "direction", value_enum)]
    pub direction: Option<Direction>,

    /// Placement of components other than the largest one
    #[arg(long = "small-components", value_enum)]
    pub small_components: Option<SmallComponentLayout>,

    /// How lab/main corequisite pairs are handed to the layout engine
    #[arg(long = "corequisites", value_enum)]
    pub corequisites: Option<CorequisiteLayout>,

    /// Write a layout dump (positions, components, lab placements) here
    #[arg(long = "dump")]
    pub dump: Option<PathBuf>,

    /// More output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = resolve_config(&args)?;
    let input = read_input(args.input.as_deref())?;
    let graph = build_graph(&input, args.roadmap.as_deref())?;

    let output = layout_elements_sync(&graph, &config, &DagreEngine::new());
    let fallbacks = output.report.fallback_labs();
    if !fallbacks.is_empty() {
        tracing::warn!(labs = ?fallbacks, "some labs may overlap their neighbours");
    }

    if let Some(path) = args.dump.as_deref() {
        write_layout_dump(path, &output, &config)
            .with_context(|| format!("failed to write layout dump to {}", path.display()))?;
    }
    write_output(&output, args.output.as_deref())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn resolve_config(args: &Args) -> Result<LayoutConfig> {
    let mut config = load_config(args.config.as_deref()).with_context(|| {
        format!(
            "failed to load config {}",
            args.config
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        )
    })?;
    if let Some(direction) = args.direction {
        config.direction = direction;
    }
    if let Some(mode) = args.small_components {
        config.small_component_layout = mode;
    }
    if let Some(mode) = args.corequisites {
        config.corequisite_layout = mode;
    }
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()));
        }
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn build_graph(input: &str, roadmap: Option<&str>) -> Result<Graph> {
    let Some(id) = roadmap else {
        return serde_json::from_str(input).context("input is not a course graph");
    };
    let bundle: RoadmapBundle =
        serde_json::from_str(input).context("input is not a roadmap bundle")?;
    let roadmap = bundle.roadmap(id).ok_or_else(|| {
        let known: Vec<&str> = bundle.roadmaps.iter().map(|r| r.id.as_str()).collect();
        anyhow::anyhow!("roadmap `{id}` not found (available: {})", known.join(", "))
    })?;
    Ok(build_course_graph(roadmap, &bundle.courses))
}

fn write_output(output: &LayoutOutput, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(&output.graph)?;
    match path {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_overrides_config() {
        let args = Args::try_parse_from([
            "coursemap",
            "-i",
            "plan.json",
            "--direction",
            "right",
            "--small-components",
            "grid",
            "--corequisites",
            "subgraph",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.verbose, 2);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.direction, Direction::Right);
        assert_eq!(config.small_component_layout, SmallComponentLayout::Grid);
        assert_eq!(config.corequisite_layout, CorequisiteLayout::Subgraph);
        assert_eq!(config.node_spacing, 50.0);
    }

    #[test]
    fn builds_graph_from_roadmap_bundle() {
        let input = r#"{
            "roadmaps": [{"id": "cs", "courseIds": ["A", "B"]}],
            "courses": {
                "A": {"id": "A", "name": "Alpha", "creditHours": 3, "year": 1},
                "B": {"id": "B", "name": "Beta", "creditHours": 3, "year": 2,
                      "prerequisites": ["A"]}
            }
        }"#;
        let graph = build_graph(input, Some("cs")).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges[0].id, "e-A-B");

        let err = build_graph(input, Some("ee")).unwrap_err();
        assert!(err.to_string().contains("available: cs"));
    }

    #[test]
    fn plain_graph_input_is_parsed_directly() {
        let graph = build_graph(r#"{"nodes": [{"id": "A", "data": {}}]}"#, None).unwrap();
        assert_eq!(graph.nodes[0].id, "A");
        assert!(build_graph("not json", None).is_err());
    }
}
