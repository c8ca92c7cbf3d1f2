//! archgraph - Architecture descriptions as live graphs.
//!
//! An architecture is described in YAML as a tree of entities at four levels
//! of granularity (context, containers, components, classes), each entity
//! optionally declaring relations to others. This crate unrolls such a
//! description into a flat node/edge graph for a force-layout network view,
//! and keeps that view in step with edits of the description.
//!
//! - [`GraphPipeline`] - parse and build, one description at a time.
//! - [`sync::SyncDriver`] - persistence and rendering around the pipeline.
//! - [`builder`] - the unrolling itself.

pub mod builder;
pub mod config;
pub mod render;
pub mod storage;
pub mod sync;

mod error;

pub use archgraph_core::{graph, path, schema};
pub use archgraph_parser::Document;

pub use error::ArchGraphError;

use log::{debug, info, trace, warn};

use archgraph_core::graph::Graph;

use builder::GraphBuilder;
use config::AppConfig;

/// Description shown when nothing has been stored yet.
pub const DEFAULT_SOURCE: &str = r#"context:
  software-system:
    name: Software System
    description: A software system that solves some problem
    relations:
      to:
        user: consumes
    containers:
      web-application:
        name: Web Application
      database:
        name: Database
  user:
    name: User
    caption: Human
    description:
    relations:
      to:
        software-system: consumes
        admin: is
        supervisor: is
  admin:
    name: Administrator
  supervisor:
    name: Supervisor
"#;

/// Parses descriptions and builds their graphs.
///
/// # Examples
///
/// ```
/// use archgraph::{DEFAULT_SOURCE, GraphPipeline};
///
/// let pipeline = GraphPipeline::default();
/// let document = pipeline.parse(DEFAULT_SOURCE).expect("valid description");
/// let graph = pipeline.build(&document);
/// assert_eq!(graph.nodes_count(), 6);
/// assert_eq!(graph.edges_count(), 4);
/// ```
#[derive(Debug, Default)]
pub struct GraphPipeline {
    config: AppConfig,
}

impl GraphPipeline {
    /// Create a new pipeline with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including parse and build settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source text into a [`Document`].
    ///
    /// Lenient warnings are logged and kept on the returned document.
    ///
    /// # Errors
    ///
    /// Returns [`ArchGraphError::Parse`] carrying the diagnostics and the source.
    pub fn parse(&self, source: &str) -> Result<Document, ArchGraphError> {
        info!(strict = self.config.parse().strict(); "Parsing description");
        let document = archgraph_parser::parse(source, self.config.parse().to_parse_config())
            .map_err(|err| ArchGraphError::new_parse_error(err, source))?;

        if !document.warnings().is_empty() {
            warn!(warnings_count = document.warnings().len(); "Skipped malformed parts of the description");
        }
        for warning in document.warnings() {
            debug!(path = warning.path().unwrap_or_default(); "{warning}");
        }
        debug!(
            has_root = document.has_root(),
            warnings_count = document.warnings().len();
            "Description parsed"
        );
        trace!(document:?; "Parsed document");
        Ok(document)
    }

    /// Build the graph of a parsed document.
    ///
    /// A document without a `context` key builds an empty graph.
    pub fn build(&self, document: &Document) -> Graph {
        match document.context() {
            Some(root) => GraphBuilder::new(self.config.build().clone()).build(root),
            None => {
                info!("No context in description, building empty graph");
                Graph::new()
            }
        }
    }
}
