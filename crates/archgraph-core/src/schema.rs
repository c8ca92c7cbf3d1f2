//! Architecture description model.
//!
//! An architecture description is a mapping from entity identifiers to
//! [`Entity`] records. Every entity may carry nested mappings for the finer
//! [`Level`]s below it, each of which has exactly the same shape, so the model
//! is a tree of id-to-entity mappings.
//!
//! # Example
//!
//! ```
//! use archgraph_core::schema::{Entity, EntityMap, Level};
//!
//! let mut containers = EntityMap::new();
//! containers.insert("api".to_string(), Entity::new().with_name("API"));
//!
//! let mut context = EntityMap::new();
//! context.insert(
//!     "shop".to_string(),
//!     Entity::new()
//!         .with_name("Shop")
//!         .with_relation_to("user", Some("serves"))
//!         .with_sub_level(Level::Containers, containers),
//! );
//!
//! assert_eq!(archgraph_core::schema::entity_count(&context), 2);
//! ```

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mapping from entity identifier to entity, in document order.
pub type EntityMap = IndexMap<String, Entity>;

/// Mapping from related entity identifier to an optional relation-kind label.
pub type RelationMap = IndexMap<String, Option<String>>;

/// Granularity levels of the architecture hierarchy, coarsest first.
///
/// [`Level::Context`] is the level of the top-level entities. The remaining
/// levels are the keys under which an entity nests finer entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Top-level entities: systems and the people using them.
    Context,
    /// Deployable units inside a system.
    Containers,
    /// Building blocks inside a container.
    Components,
    /// Code-level elements inside a component.
    Classes,
}

impl Level {
    /// Sub-level keys in the order they are unrolled.
    pub const NESTED: [Level; 3] = [Level::Containers, Level::Components, Level::Classes];

    /// Returns the document key of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Context => "context",
            Level::Containers => "containers",
            Level::Components => "components",
            Level::Classes => "classes",
        }
    }

    /// Returns the nested level whose document key is `key`.
    ///
    /// `context` is not a nested level and yields `None`.
    pub fn nested_from_key(key: &str) -> Option<Level> {
        Self::NESTED.into_iter().find(|level| level.as_str() == key)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string does not name a [`Level`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level `{0}`, expected one of: context, containers, components, classes")]
pub struct UnknownLevel(String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "context" => Ok(Level::Context),
            other => Self::nested_from_key(other).ok_or_else(|| UnknownLevel(other.to_string())),
        }
    }
}

/// Relations declared by an entity, from either endpoint's perspective.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    to: RelationMap,
    from: RelationMap,
}

impl Relations {
    /// Creates an empty relation block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an outgoing relation to `target`.
    pub fn with_to(mut self, target: impl Into<String>, kind: Option<&str>) -> Self {
        self.to.insert(target.into(), kind.map(str::to_string));
        self
    }

    /// Adds an incoming relation from `source`.
    pub fn with_from(mut self, source: impl Into<String>, kind: Option<&str>) -> Self {
        self.from.insert(source.into(), kind.map(str::to_string));
        self
    }

    /// Replaces the outgoing relations.
    pub fn set_to(&mut self, to: RelationMap) {
        self.to = to;
    }

    /// Replaces the incoming relations.
    pub fn set_from(&mut self, from: RelationMap) {
        self.from = from;
    }

    /// Outgoing relations keyed by target id.
    pub fn to(&self) -> &RelationMap {
        &self.to
    }

    /// Incoming relations keyed by source id.
    pub fn from(&self) -> &RelationMap {
        &self.from
    }

    /// Returns `true` when neither side declares a relation.
    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.from.is_empty()
    }
}

/// A system, container, component, or class in the architecture hierarchy.
///
/// Absent fields default: an entity without a name is labelled by its id, and
/// an entity without relations or sub-levels contributes only its own node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    name: Option<String>,
    caption: Option<String>,
    description: Option<String>,
    relations: Relations,
    sub_levels: IndexMap<Level, EntityMap>,
}

impl Entity {
    /// Creates an entity with no fields set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the relation block.
    pub fn with_relations(mut self, relations: Relations) -> Self {
        self.relations = relations;
        self
    }

    /// Adds an outgoing relation to `target`.
    pub fn with_relation_to(mut self, target: impl Into<String>, kind: Option<&str>) -> Self {
        self.relations = self.relations.with_to(target, kind);
        self
    }

    /// Adds an incoming relation from `source`.
    pub fn with_relation_from(mut self, source: impl Into<String>, kind: Option<&str>) -> Self {
        self.relations = self.relations.with_from(source, kind);
        self
    }

    /// Attaches a nested mapping of finer entities under `level`.
    ///
    /// [`Level::Context`] cannot be nested; such calls leave the entity unchanged.
    pub fn with_sub_level(mut self, level: Level, entities: EntityMap) -> Self {
        if level == Level::Context {
            log::warn!(level = level.as_str(); "Ignoring non-nestable level");
            return self;
        }
        self.sub_levels.insert(level, entities);
        self
    }

    /// The display name, if set.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The display label: the name, falling back to `id`.
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(id)
    }

    /// The caption, if set.
    pub fn caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    /// The description, if set.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The declared relations.
    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    /// The nested mapping for `level`, if present.
    pub fn sub_level(&self, level: Level) -> Option<&EntityMap> {
        self.sub_levels.get(&level)
    }

    /// Present sub-levels in unrolling order, regardless of insertion order.
    pub fn sub_levels(&self) -> impl Iterator<Item = (Level, &EntityMap)> {
        Level::NESTED
            .into_iter()
            .filter_map(|level| self.sub_level(level).map(|entities| (level, entities)))
    }
}

/// Counts every entity in `entities`, including all nested levels.
pub fn entity_count(entities: &EntityMap) -> usize {
    entities
        .values()
        .map(|entity| {
            1 + entity
                .sub_levels()
                .map(|(_, nested)| entity_count(nested))
                .sum::<usize>()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering_is_coarse_to_fine() {
        assert!(Level::Context < Level::Containers);
        assert!(Level::Containers < Level::Components);
        assert!(Level::Components < Level::Classes);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!("context".parse::<Level>(), Ok(Level::Context));
        assert_eq!("classes".parse::<Level>(), Ok(Level::Classes));
        assert!("modules".parse::<Level>().is_err());
    }

    #[test]
    fn test_nested_from_key_excludes_context() {
        assert_eq!(Level::nested_from_key("containers"), Some(Level::Containers));
        assert_eq!(Level::nested_from_key("context"), None);
    }

    #[test]
    fn test_label_falls_back_to_id() {
        let named = Entity::new().with_name("Web Application");
        let unnamed = Entity::new();
        assert_eq!(named.label("web"), "Web Application");
        assert_eq!(unnamed.label("web"), "web");
    }

    #[test]
    fn test_sub_levels_follow_unrolling_order() {
        let entity = Entity::new()
            .with_sub_level(Level::Classes, EntityMap::new())
            .with_sub_level(Level::Containers, EntityMap::new());

        let levels: Vec<Level> = entity.sub_levels().map(|(level, _)| level).collect();
        assert_eq!(levels, vec![Level::Containers, Level::Classes]);
    }

    #[test]
    fn test_context_is_not_nestable() {
        let entity = Entity::new().with_sub_level(Level::Context, EntityMap::new());
        assert_eq!(entity.sub_levels().count(), 0);
    }

    #[test]
    fn test_entity_count_includes_nested_levels() {
        let mut classes = EntityMap::new();
        classes.insert("Cart".to_string(), Entity::new());

        let mut components = EntityMap::new();
        components.insert(
            "orders".to_string(),
            Entity::new().with_sub_level(Level::Classes, classes),
        );

        let mut context = EntityMap::new();
        context.insert(
            "shop".to_string(),
            Entity::new().with_sub_level(Level::Components, components),
        );
        context.insert("user".to_string(), Entity::new());

        assert_eq!(entity_count(&context), 4);
    }
}
