use coursemap::config::{ConfigFile, LayoutConfig};
use coursemap::{DagreEngine, Graph, layout_elements_sync};
use wasm_bindgen::prelude::*;

fn build_layout_config(options_json: Option<&str>) -> Result<LayoutConfig, String> {
    let mut config = LayoutConfig::default();
    if let Some(raw) = options_json {
        ConfigFile::parse(raw)
            .map_err(|error| error.to_string())?
            .apply(&mut config);
    }
    Ok(config)
}

fn layout_json(graph_json: &str, options_json: Option<&str>) -> Result<String, String> {
    let graph: Graph = serde_json::from_str(graph_json).map_err(|error| error.to_string())?;
    let config = build_layout_config(options_json)?;
    let output = layout_elements_sync(&graph, &config, &DagreEngine::new());
    serde_json::to_string(&output.graph).map_err(|error| error.to_string())
}

/// Lays out a course graph given as JSON and returns the same graph with
/// every node positioned.
#[wasm_bindgen]
pub fn layout_course_graph(
    graph_json: &str,
    options_json: Option<String>,
) -> Result<String, JsValue> {
    layout_json(graph_json, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use crate::{build_layout_config, layout_json};
    use coursemap::Graph;
    use coursemap::config::Direction;

    #[test]
    fn lays_out_graph_json_with_options() {
        let graph = r#"{
            "nodes": [
                {"id": "A", "data": {"name": "Alpha", "creditHours": 3}},
                {"id": "B", "data": {"name": "Beta", "creditHours": 3}},
                {"id": "Z", "data": {"name": "Zeta", "creditHours": 3}}
            ],
            "edges": [{"id": "e-A-B", "source": "A", "target": "B"}]
        }"#;

        let out = layout_json(graph, Some(r#"{"direction": "DOWN"}"#))
            .expect("course graph should lay out");
        let parsed: Graph = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.nodes.len(), 3);
        assert!(parsed.nodes.iter().all(|node| node.position.is_some()));
        assert_eq!(parsed.edges.len(), 1);
    }

    #[test]
    fn options_are_optional_and_validated() {
        assert_eq!(build_layout_config(None).unwrap().direction, Direction::Down);
        assert!(build_layout_config(Some(r#"{"direction": "NORTH"}"#)).is_err());
        assert!(layout_json("{", None).is_err());
    }
}
