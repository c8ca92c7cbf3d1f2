//! Keeps a rendered graph in step with an editable description.
//!
//! [`SyncDriver`] sits between the host's editor, a [`Storage`] for the last
//! accepted source text, and a [`Renderer`]. Every accepted change is parsed,
//! unrolled, persisted, and handed to the renderer as a complete replacement.
//! A change that does not parse leaves everything as it was.

use log::{debug, error, info, warn};

use archgraph_core::graph::Graph;
use archgraph_parser::error::Diagnostic;

use crate::{
    DEFAULT_SOURCE, GraphPipeline, config::AppConfig, error::ArchGraphError, render::Renderer,
    storage::Storage,
};

/// Summary of one accepted change.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome {
    nodes_count: usize,
    edges_count: usize,
    dangling_count: usize,
    missing_root: bool,
    persisted: bool,
    warnings: Vec<Diagnostic>,
}

impl SyncOutcome {
    pub fn nodes_count(&self) -> usize {
        self.nodes_count
    }

    pub fn edges_count(&self) -> usize {
        self.edges_count
    }

    /// Number of edges naming an entity that is not in the graph.
    pub fn dangling_count(&self) -> usize {
        self.dangling_count
    }

    /// `true` when the description had no `context` key and rendered as an empty graph.
    pub fn missing_root(&self) -> bool {
        self.missing_root
    }

    /// `false` when the source could not be written to storage.
    pub fn persisted(&self) -> bool {
        self.persisted
    }

    /// Structural problems skipped while reading leniently.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// Drives a renderer from edits of an architecture description.
///
/// # Examples
///
/// ```
/// use archgraph::{
///     config::AppConfig,
///     render::RecordingRenderer,
///     storage::MemoryStorage,
///     sync::SyncDriver,
/// };
///
/// let mut driver = SyncDriver::new(AppConfig::default(), MemoryStorage::new(), RecordingRenderer::new());
/// driver.initialize().expect("default description is valid");
/// assert_eq!(driver.graph().nodes_count(), 6);
///
/// let outcome = driver
///     .on_source_changed("context:\n  user:\n    name: User\n")
///     .expect("valid description");
/// assert_eq!(outcome.nodes_count(), 1);
/// assert!(outcome.persisted());
/// ```
#[derive(Debug)]
pub struct SyncDriver<S, R> {
    pipeline: GraphPipeline,
    storage: S,
    renderer: R,
    source: String,
    graph: Graph,
}

impl<S: Storage, R: Renderer> SyncDriver<S, R> {
    /// Creates a driver. Nothing is read or rendered until [`Self::initialize`].
    pub fn new(config: AppConfig, storage: S, renderer: R) -> Self {
        Self {
            pipeline: GraphPipeline::new(config),
            storage,
            renderer,
            source: String::new(),
            graph: Graph::new(),
        }
    }

    /// Loads the stored description (or the built-in default) and renders it.
    ///
    /// The returned text is what the host should show in its editor. It is
    /// returned by [`Self::source`] afterwards, even when it fails to parse.
    ///
    /// # Errors
    ///
    /// Returns [`ArchGraphError::Parse`] when the loaded text does not parse and
    /// [`ArchGraphError::Render`] when the renderer rejects the graph. In both
    /// cases the current graph stays empty.
    pub fn initialize(&mut self) -> Result<&str, ArchGraphError> {
        let key = self.pipeline.config().storage().key();
        let source = match self.storage.get(key) {
            Ok(Some(stored)) => {
                info!(key, bytes = stored.len(); "Loaded stored description");
                stored
            }
            Ok(None) => {
                info!(key; "Storage is empty, load default context");
                DEFAULT_SOURCE.to_string()
            }
            Err(err) => {
                warn!(key, err:%; "Failed to read storage, load default context");
                DEFAULT_SOURCE.to_string()
            }
        };
        self.source = source;

        self.renderer
            .set_options(&self.pipeline.config().style().render_options());

        let document = self.pipeline.parse(&self.source)?;
        let graph = self.pipeline.build(&document);
        self.renderer.replace_data(&graph)?;
        self.graph = graph;

        Ok(&self.source)
    }

    /// Handles a new version of the description.
    ///
    /// # Errors
    ///
    /// Returns [`ArchGraphError::Parse`] when `text` does not parse; storage,
    /// accepted source, and current graph are left untouched. Returns
    /// [`ArchGraphError::Render`] when the renderer rejects the new graph; the
    /// text is not persisted and the previous source and graph stay current.
    pub fn on_source_changed(&mut self, text: &str) -> Result<SyncOutcome, ArchGraphError> {
        debug!(bytes = text.len(); "Description changed");

        let document = self.pipeline.parse(text)?;
        let graph = self.pipeline.build(&document);

        self.renderer.replace_data(&graph)?;

        let key = self.pipeline.config().storage().key();
        let persisted = match self.storage.set(key, text) {
            Ok(()) => true,
            Err(err) => {
                error!(key, err:%; "Failed to persist description");
                false
            }
        };

        let outcome = SyncOutcome {
            nodes_count: graph.nodes_count(),
            edges_count: graph.edges_count(),
            dangling_count: graph.dangling_edges().count(),
            missing_root: !document.has_root(),
            persisted,
            warnings: document.warnings().to_vec(),
        };
        info!(
            nodes_count = outcome.nodes_count,
            edges_count = outcome.edges_count,
            persisted;
            "Graph updated"
        );

        self.source = text.to_string();
        self.graph = graph;
        Ok(outcome)
    }

    /// Handles a selection made in the rendered view.
    pub fn on_select<I, T>(&self, node_ids: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let selected: Vec<String> = node_ids
            .into_iter()
            .map(|id| id.as_ref().to_string())
            .collect();
        let known = selected
            .iter()
            .filter(|id| self.graph.contains_node(id))
            .count();
        debug!(nodes:? = selected, known; "Selection changed");
    }

    /// The last accepted description text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The graph currently shown by the renderer.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &AppConfig {
        self.pipeline.config()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consumes the driver, returning its collaborators.
    pub fn into_parts(self) -> (S, R) {
        (self.storage, self.renderer)
    }
}
