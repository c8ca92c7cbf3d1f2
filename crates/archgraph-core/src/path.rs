//! Nesting paths for entities in the architecture hierarchy.
//!
//! Entity identifiers are only unique among siblings. An [`EntityPath`] records
//! the chain of ancestor identifiers leading to an entity so that two entities
//! sharing a key under different parents can still be told apart.

use std::fmt;

/// Separator placed between path segments when a path is rendered as a single identifier.
pub const SEPARATOR: &str = "::";

/// The chain of entity identifiers from the top-level `context` mapping down to an entity.
///
/// # Examples
///
/// ```
/// use archgraph_core::path::EntityPath;
///
/// let system = EntityPath::root().child("shop");
/// let api = system.child("api");
/// assert_eq!(api.to_string(), "shop::api");
/// assert_eq!(api.parent(), Some(system));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EntityPath {
    segments: Vec<String>,
}

impl EntityPath {
    /// Returns the empty path that denotes the top-level `context` mapping.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from its segments, outermost first.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a nested path by appending `id` to this path.
    pub fn child(&self, id: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(id.to_string());
        Self { segments }
    }

    /// Returns the path of the enclosing entity, or `None` for the root path.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// Returns the innermost identifier, or `None` for the root path.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns the path segments, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments. Top-level entities have depth 1.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` if `prefix` is an ancestor of, or equal to, this path.
    pub fn starts_with(&self, prefix: &EntityPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join(SEPARATOR))
    }
}
