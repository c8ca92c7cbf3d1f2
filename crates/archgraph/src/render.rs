//! Hand-off of graphs to a force-layout renderer.
//!
//! Layout and drawing happen outside this crate. A [`Renderer`] receives the
//! styling options once and then a complete replacement of its data each time
//! the description changes.

use std::{io, path::PathBuf};

use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use archgraph_core::graph::Graph;

use crate::storage::write_atomic;

/// Errors raised by [`Renderer`] implementations.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize graph: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Styling options for a force-layout network view.
///
/// Serializes into the nested option vocabulary network renderers take:
///
/// ```json
/// {
///   "physics": { "hierarchicalRepulsion": { "nodeDistance": 1000.0 } },
///   "nodes": { "size": 40.0, "color": { "background": "#006400" },
///              "font": { "color": "#eeeeee", "size": 30.0 } },
///   "edges": { "physics": false }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    physics: PhysicsOptions,
    nodes: NodeOptions,
    edges: EdgeOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct PhysicsOptions {
    hierarchical_repulsion: HierarchicalRepulsion,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct HierarchicalRepulsion {
    node_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct NodeOptions {
    size: f64,
    color: NodeColor,
    font: FontOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct NodeColor {
    background: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct FontOptions {
    color: String,
    size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct EdgeOptions {
    physics: bool,
}

impl RenderOptions {
    /// Creates render options.
    ///
    /// # Arguments
    ///
    /// * `node_distance` - Spacing the hierarchical repulsion solver aims for
    /// * `node_size` - Node size
    /// * `node_color` - Node background color
    /// * `font_color` - Label color
    /// * `font_size` - Label size
    /// * `edge_physics` - Whether edges take part in the physics simulation
    pub fn new(
        node_distance: f64,
        node_size: f64,
        node_color: &str,
        font_color: &str,
        font_size: f64,
        edge_physics: bool,
    ) -> Self {
        Self {
            physics: PhysicsOptions {
                hierarchical_repulsion: HierarchicalRepulsion { node_distance },
            },
            nodes: NodeOptions {
                size: node_size,
                color: NodeColor {
                    background: node_color.to_string(),
                },
                font: FontOptions {
                    color: font_color.to_string(),
                    size: font_size,
                },
            },
            edges: EdgeOptions {
                physics: edge_physics,
            },
        }
    }

    pub fn node_distance(&self) -> f64 {
        self.physics.hierarchical_repulsion.node_distance
    }

    pub fn node_size(&self) -> f64 {
        self.nodes.size
    }

    pub fn node_color(&self) -> &str {
        &self.nodes.color.background
    }

    pub fn font_color(&self) -> &str {
        &self.nodes.font.color
    }

    pub fn font_size(&self) -> f64 {
        self.nodes.font.size
    }

    pub fn edge_physics(&self) -> bool {
        self.edges.physics
    }
}

/// Receiver of graphs produced by the synchronization driver.
pub trait Renderer {
    /// Applies styling options. Called once before the first graph.
    fn set_options(&mut self, options: &RenderOptions);

    /// Replaces everything shown with `graph`.
    fn replace_data(&mut self, graph: &Graph) -> Result<(), RenderError>;
}

/// Renderer that writes `{"options": ..., "data": ...}` JSON to a file.
///
/// The file is rewritten in full on every replacement, ready for a network
/// view to load.
#[derive(Debug, Clone)]
pub struct JsonFileRenderer {
    path: PathBuf,
    options: Option<RenderOptions>,
}

#[derive(Serialize)]
struct Snapshot<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a RenderOptions>,
    data: &'a Graph,
}

impl JsonFileRenderer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: None,
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Serializes `graph` together with the current options.
    pub fn to_json(&self, graph: &Graph) -> Result<String, RenderError> {
        let snapshot = Snapshot {
            options: self.options.as_ref(),
            data: graph,
        };
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}

impl Renderer for JsonFileRenderer {
    fn set_options(&mut self, options: &RenderOptions) {
        debug!(options:?; "Render options set");
        self.options = Some(options.clone());
    }

    fn replace_data(&mut self, graph: &Graph) -> Result<(), RenderError> {
        let json = self.to_json(graph)?;
        write_atomic(&self.path, json.as_bytes())?;
        info!(
            path:? = self.path,
            nodes_count = graph.nodes_count(),
            edges_count = graph.edges_count();
            "Graph written"
        );
        Ok(())
    }
}

/// Renderer that keeps everything it receives in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    options: Option<RenderOptions>,
    frames: Vec<Graph>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The options last applied, if any.
    pub fn options(&self) -> Option<&RenderOptions> {
        self.options.as_ref()
    }

    /// Every graph received, oldest first.
    pub fn frames(&self) -> &[Graph] {
        &self.frames
    }

    /// The graph currently shown.
    pub fn current(&self) -> Option<&Graph> {
        self.frames.last()
    }
}

impl Renderer for RecordingRenderer {
    fn set_options(&mut self, options: &RenderOptions) {
        self.options = Some(options.clone());
    }

    fn replace_data(&mut self, graph: &Graph) -> Result<(), RenderError> {
        self.frames.push(graph.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use tempfile::tempdir;

    use archgraph_core::{
        graph::{Direction, Edge, Node},
        schema::Level,
    };

    use super::*;
    use crate::config::StyleConfig;

    #[test]
    fn test_default_options_shape() {
        let options = StyleConfig::default().render_options();
        let value = serde_json::to_value(&options).unwrap();
        assert_eq!(
            value,
            json!({
                "physics": { "hierarchicalRepulsion": { "nodeDistance": 1000.0 } },
                "nodes": {
                    "size": 40.0,
                    "color": { "background": "#006400" },
                    "font": { "color": "#eeeeee", "size": 30.0 }
                },
                "edges": { "physics": false }
            })
        );
    }

    #[test]
    fn test_json_file_renderer_writes_snapshot() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("graph.json");
        let mut renderer = JsonFileRenderer::new(&path);
        renderer.set_options(&StyleConfig::default().render_options());

        let mut graph = Graph::new();
        graph.add_node(Node::new("user", "User", Level::Context));
        graph.add_edge(Edge::new("user", "shop", Direction::To).with_label(Some("uses")));
        renderer.replace_data(&graph).unwrap();

        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["data"]["nodes"][0]["id"], "user");
        assert_eq!(written["data"]["nodes"][0]["shape"], "box");
        assert_eq!(written["data"]["edges"][0]["arrows"], "to");
        assert_eq!(written["options"]["nodes"]["size"], 40.0);

        let data: Graph = serde_json::from_value(written["data"].clone()).unwrap();
        assert_eq!(data, graph);
    }

    #[test]
    fn test_recording_renderer_keeps_frames() {
        let mut renderer = RecordingRenderer::new();
        assert!(renderer.current().is_none());

        renderer.replace_data(&Graph::new()).unwrap();
        let mut graph = Graph::new();
        graph.add_node(Node::new("db", "Database", Level::Containers));
        renderer.replace_data(&graph).unwrap();

        assert_eq!(renderer.frames().len(), 2);
        assert_eq!(renderer.current(), Some(&graph));
    }
}
