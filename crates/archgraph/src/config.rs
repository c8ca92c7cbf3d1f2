//! Configuration types for archgraph.
//!
//! This module provides configuration structures that control how architecture
//! descriptions are read, how they are unrolled into graphs, where the source
//! text is persisted, and how the renderer is styled. All types implement
//! [`serde::Deserialize`] for flexible loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`ParsingConfig`] - Strict or lenient reading of the document shape.
//! - [`BuildConfig`] - Node identity, grouping, and level filtering.
//! - [`StorageConfig`] - Storage key (and directory) for the source text.
//! - [`StyleConfig`] - Options handed to the renderer.
//!
//! # Example
//!
//! ```
//! # use archgraph::config::{AppConfig, IdScheme};
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.build().ids(), IdScheme::Plain);
//! assert_eq!(config.storage().key(), "c4-yaml-config");
//! assert!(config.style().validate().is_ok());
//! ```

use std::{path::PathBuf, str::FromStr};

use color::DynamicColor;
use serde::Deserialize;

use archgraph_core::schema::Level;
use archgraph_parser::ParseConfig;

use crate::render::RenderOptions;

/// Storage key under which the source text is persisted by default.
pub const DEFAULT_STORAGE_KEY: &str = "c4-yaml-config";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Parsing configuration section.
    #[serde(default)]
    parse: ParsingConfig,

    /// Graph building configuration section.
    #[serde(default)]
    build: BuildConfig,

    /// Storage configuration section.
    #[serde(default)]
    storage: StorageConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        parse: ParsingConfig,
        build: BuildConfig,
        storage: StorageConfig,
        style: StyleConfig,
    ) -> Self {
        Self {
            parse,
            build,
            storage,
            style,
        }
    }

    /// Returns the parsing configuration.
    pub fn parse(&self) -> &ParsingConfig {
        &self.parse
    }

    /// Returns the graph building configuration.
    pub fn build(&self) -> &BuildConfig {
        &self.build
    }

    /// Returns the storage configuration.
    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns a copy with strict parsing switched on or off.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.parse.strict = strict;
        self
    }

    /// Returns a copy with the storage directory replaced.
    pub fn with_storage_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.storage.directory = Some(directory.into());
        self
    }
}

/// How strictly the document shape is checked.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsingConfig {
    /// Reject documents with structural problems instead of skipping them.
    #[serde(default)]
    strict: bool,
}

impl ParsingConfig {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Converts this section into the parser's configuration.
    pub fn to_parse_config(&self) -> ParseConfig {
        ParseConfig::new(self.strict)
    }
}

/// How graph node identifiers are derived from entity keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdScheme {
    /// The entity key is the node id. Keys repeated under different parents
    /// produce several nodes with the same id.
    #[default]
    Plain,
    /// The node id is the `::`-joined nesting path of the entity.
    Path,
}

/// How the `group` of a node is assigned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// Nodes carry no group.
    #[default]
    None,
    /// Nodes are grouped by the level they were declared at.
    Level,
    /// Nodes are grouped by the path of their parent entity.
    Parent,
}

/// Graph building configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    ids: IdScheme,

    #[serde(default)]
    grouping: Grouping,

    /// Deepest level to unroll; finer levels are left out of the graph.
    #[serde(default)]
    max_level: Option<Level>,
}

impl BuildConfig {
    /// Creates a new [`BuildConfig`].
    ///
    /// # Arguments
    ///
    /// * `ids` - Node identifier scheme.
    /// * `grouping` - Node grouping mode.
    /// * `max_level` - Deepest level to unroll, or `None` for all levels.
    pub fn new(ids: IdScheme, grouping: Grouping, max_level: Option<Level>) -> Self {
        Self {
            ids,
            grouping,
            max_level,
        }
    }

    pub fn ids(&self) -> IdScheme {
        self.ids
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn max_level(&self) -> Option<Level> {
        self.max_level
    }

    /// Returns `true` if entities declared at `level` belong in the graph.
    pub fn includes(&self, level: Level) -> bool {
        self.max_level.is_none_or(|max| level <= max)
    }
}

/// Where the source text is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Key the source text is stored under.
    #[serde(default = "default_storage_key")]
    key: String,

    /// Directory for file-backed storage. Hosts pick a default when unset.
    #[serde(default)]
    directory: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            directory: None,
        }
    }
}

impl StorageConfig {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn directory(&self) -> Option<&PathBuf> {
        self.directory.as_ref()
    }
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

/// Visual styling handed to the renderer.
///
/// Defaults give dark green boxes with light text, spread apart by
/// hierarchical repulsion. Edges stay out of the physics simulation.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_node_distance")]
    node_distance: f64,

    #[serde(default = "default_node_size")]
    node_size: f64,

    /// Node background, as a CSS color string.
    #[serde(default = "default_node_color")]
    node_color: String,

    /// Label color, as a CSS color string.
    #[serde(default = "default_font_color")]
    font_color: String,

    #[serde(default = "default_font_size")]
    font_size: f64,

    #[serde(default)]
    edge_physics: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            node_distance: default_node_distance(),
            node_size: default_node_size(),
            node_color: default_node_color(),
            font_color: default_font_color(),
            font_size: default_font_size(),
            edge_physics: false,
        }
    }
}

impl StyleConfig {
    /// Checks that the configured colors parse and the sizes are positive.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [("node_color", &self.node_color), ("font_color", &self.font_color)] {
            DynamicColor::from_str(value)
                .map_err(|err| format!("Invalid {field} `{value}` in config: {err}"))?;
        }
        for (field, value) in [
            ("node_distance", self.node_distance),
            ("node_size", self.node_size),
            ("font_size", self.font_size),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("Invalid {field} `{value}` in config: must be positive"));
            }
        }
        Ok(())
    }

    /// Builds the options handed to the renderer.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(
            self.node_distance,
            self.node_size,
            &self.node_color,
            &self.font_color,
            self.font_size,
            self.edge_physics,
        )
    }
}

fn default_node_distance() -> f64 {
    1000.0
}

fn default_node_size() -> f64 {
    40.0
}

fn default_node_color() -> String {
    "#006400".to_string()
}

fn default_font_color() -> String {
    "#eeeeee".to_string()
}

fn default_font_size() -> f64 {
    30.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_includes_levels_up_to_max() {
        let all = BuildConfig::default();
        assert!(all.includes(Level::Classes));

        let containers = BuildConfig::new(IdScheme::Plain, Grouping::None, Some(Level::Containers));
        assert!(containers.includes(Level::Context));
        assert!(containers.includes(Level::Containers));
        assert!(!containers.includes(Level::Components));
        assert!(!containers.includes(Level::Classes));
    }

    #[test]
    fn test_default_style_is_valid() {
        assert!(StyleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let style = StyleConfig {
            node_color: "definitely-not-a-color".to_string(),
            ..StyleConfig::default()
        };
        let err = style.validate().unwrap_err();
        assert!(err.contains("node_color"), "unexpected message: {err}");
    }

    #[test]
    fn test_non_positive_size_is_rejected() {
        let style = StyleConfig {
            font_size: 0.0,
            ..StyleConfig::default()
        };
        assert!(style.validate().is_err());
    }

    #[test]
    fn test_with_strict() {
        let config = AppConfig::default().with_strict(true);
        assert!(config.parse().strict());
        assert!(config.parse().to_parse_config().strict());
    }
}
