//! Unrolling of an architecture description into a flat graph.
//!
//! The walk is depth-first in document order. For each entity it appends the
//! entity's node, then its outgoing (`to`) edges, then its incoming (`from`)
//! edges, and then descends into `containers`, `components` and `classes` in
//! that order. The ancestors of the entity being visited are carried as an
//! explicit path, which is what gives nested entities their scope under
//! [`IdScheme::Path`] and their group under [`Grouping::Parent`].

use std::collections::HashMap;

use log::{debug, info, trace, warn};

use archgraph_core::{
    graph::{Direction, Edge, Graph, Node},
    path::{EntityPath, SEPARATOR},
    schema::{Entity, EntityMap, Level},
};

use crate::config::{BuildConfig, Grouping, IdScheme};

/// Group assigned to top-level entities under [`Grouping::Parent`].
const ROOT_GROUP: &str = "context";

/// Builds graphs from entity mappings with a fixed [`BuildConfig`].
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: BuildConfig,
}

impl GraphBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    /// Unrolls `root`, the top-level `context` mapping, into a graph.
    ///
    /// Building is deterministic: the same mapping always yields equal graphs.
    /// Relation targets are never checked against the declared entities.
    pub fn build(&self, root: &EntityMap) -> Graph {
        info!(ids:? = self.config.ids(), grouping:? = self.config.grouping(); "Building graph");

        let mut walk = Walk::new(&self.config);
        walk.visit_level(root, Level::Context);
        let graph = walk.finish();

        for id in graph.duplicate_node_ids() {
            warn!(id; "Entity id used by more than one node");
        }
        debug!(
            nodes_count = graph.nodes_count(),
            edges_count = graph.edges_count(),
            dangling_count = graph.dangling_edges().count();
            "Graph built"
        );
        trace!(graph:?; "Built graph");
        graph
    }
}

/// Unrolls `root` with the default configuration.
///
/// Node ids are the entity keys, nodes carry no group, and every level is unrolled.
pub fn build(root: &EntityMap) -> Graph {
    GraphBuilder::default().build(root)
}

/// A relation seen during the walk, resolved into an edge once every node is known.
struct PendingEdge<'a> {
    owner: EntityPath,
    owner_id: String,
    target: &'a str,
    direction: Direction,
    label: Option<&'a str>,
}

/// An entity as seen from its parent's scope.
struct ScopedChild<'a> {
    /// Key of the entity in the description.
    local: &'a str,
    /// Path segment of the entity. Equals `local` unless the parent declares
    /// the same key on another level, in which case the level is prefixed.
    segment: String,
    node_id: String,
}

struct Walk<'c, 'a> {
    config: &'c BuildConfig,
    graph: Graph,
    /// Path segments of the ancestors of the entity being visited, outermost first.
    path: Vec<String>,
    pending: Vec<PendingEdge<'a>>,
    /// Children by parent path. Only filled under [`IdScheme::Path`].
    scopes: HashMap<EntityPath, Vec<ScopedChild<'a>>>,
    /// Node ids by local id, for resolving targets outside the owner's scope chain.
    by_local: HashMap<&'a str, Vec<String>>,
}

impl<'c, 'a> Walk<'c, 'a> {
    fn new(config: &'c BuildConfig) -> Self {
        Self {
            config,
            graph: Graph::new(),
            path: Vec::new(),
            pending: Vec::new(),
            scopes: HashMap::new(),
            by_local: HashMap::new(),
        }
    }

    fn visit_level(&mut self, entities: &'a EntityMap, level: Level) {
        for (id, entity) in entities {
            self.visit_entity(id, entity, level);
        }
    }

    fn visit_entity(&mut self, id: &'a str, entity: &'a Entity, level: Level) {
        let parent = EntityPath::from_segments(self.path.iter().cloned());
        let segment = self.segment(&parent, id, level);
        let own = parent.child(&segment);
        let node_id = self.node_id(&own, id);

        let node = Node::new(node_id.clone(), entity.label(id), level)
            .with_group(self.group(&parent, level))
            .with_caption(entity.caption())
            .with_description(entity.description());
        self.graph.add_node(node);

        if self.config.ids() == IdScheme::Path {
            self.by_local.entry(id).or_default().push(node_id.clone());
            self.scopes.entry(parent.clone()).or_default().push(ScopedChild {
                local: id,
                segment: segment.clone(),
                node_id: node_id.clone(),
            });
        }

        let relations = entity.relations();
        for (target, kind) in relations.to() {
            self.pending.push(PendingEdge {
                owner: own.clone(),
                owner_id: node_id.clone(),
                target,
                direction: Direction::To,
                label: kind.as_deref(),
            });
        }
        for (source, kind) in relations.from() {
            self.pending.push(PendingEdge {
                owner: own.clone(),
                owner_id: node_id.clone(),
                target: source,
                direction: Direction::From,
                label: kind.as_deref(),
            });
        }

        self.path.push(segment);
        for (sub_level, nested) in entity.sub_levels() {
            if self.config.includes(sub_level) {
                self.visit_level(nested, sub_level);
            } else {
                trace!(
                    path:% = own,
                    level = sub_level.as_str();
                    "Skipping level below the configured maximum"
                );
            }
        }
        self.path.pop();
    }

    /// Returns the path segment for `id` declared at `level` under `parent`.
    ///
    /// Under [`IdScheme::Path`] a key the parent already declared on another
    /// level gets the level name as prefix, e.g. `components::cache`.
    fn segment(&self, parent: &EntityPath, id: &str, level: Level) -> String {
        let taken = self.config.ids() == IdScheme::Path
            && self
                .scopes
                .get(parent)
                .is_some_and(|children| children.iter().any(|child| child.segment == id));
        if taken {
            let segment = format!("{}{SEPARATOR}{id}", level.as_str());
            debug!(parent:% = parent, id, segment = segment.as_str(); "Key repeated on another level");
            segment
        } else {
            id.to_string()
        }
    }

    fn node_id(&self, own: &EntityPath, id: &str) -> String {
        match self.config.ids() {
            IdScheme::Plain => id.to_string(),
            IdScheme::Path => own.to_string(),
        }
    }

    fn group(&self, parent: &EntityPath, level: Level) -> Option<String> {
        match self.config.grouping() {
            Grouping::None => None,
            Grouping::Level => Some(level.as_str().to_string()),
            Grouping::Parent if parent.is_root() => Some(ROOT_GROUP.to_string()),
            Grouping::Parent => Some(parent.to_string()),
        }
    }

    fn finish(mut self) -> Graph {
        let pending = std::mem::take(&mut self.pending);
        for edge in pending {
            let other = self.resolve(&edge.owner, edge.target);
            let (from, to) = match edge.direction {
                Direction::To => (edge.owner_id, other),
                Direction::From => (other, edge.owner_id),
            };
            self.graph
                .add_edge(Edge::new(from, to, edge.direction).with_label(edge.label));
        }
        self.graph
    }

    /// Maps a relation target, as written in the description, to a node id.
    ///
    /// Under [`IdScheme::Path`] the owner's children are searched first, then
    /// its siblings, then the siblings of each ancestor, then the whole tree
    /// when exactly one entity has that key. A target written as a full `::`
    /// path that names a node is used as is, and a level-prefixed key such as
    /// `components::cache` names the entity declared on that level. Targets
    /// that stay ambiguous or unknown are kept as written.
    fn resolve(&self, owner: &EntityPath, target: &'a str) -> String {
        if self.config.ids() == IdScheme::Plain {
            return target.to_string();
        }
        if target.contains(SEPARATOR) && self.graph.contains_node(target) {
            return target.to_string();
        }

        let mut scope = Some(owner.clone());
        while let Some(current) = scope {
            let candidates: Vec<&str> = self
                .scopes
                .get(&current)
                .into_iter()
                .flatten()
                .filter(|child| child.local == target || child.segment == target)
                .map(|child| child.node_id.as_str())
                .collect();
            match candidates.as_slice() {
                [] => {}
                [only] => return only.to_string(),
                _ => {
                    debug!(
                        owner:% = owner,
                        target,
                        candidates:?;
                        "Ambiguous relation target left unresolved"
                    );
                    return target.to_string();
                }
            }
            scope = current.parent();
        }

        match self.by_local.get(target).map(Vec::as_slice) {
            Some([only]) => only.clone(),
            Some(candidates) => {
                debug!(
                    owner:% = owner,
                    target,
                    candidates:?;
                    "Ambiguous relation target left unresolved"
                );
                target.to_string()
            }
            None => target.to_string(),
        }
    }
}
