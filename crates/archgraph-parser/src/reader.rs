//! Conversion from a YAML value tree to the architecture description model.
//!
//! Every entity mapping, at any nesting level, is read by the same
//! [`Reader::read_entity_map`], so sub-levels need no special handling.

use log::debug;
use serde_yaml::{Mapping, Value};

use archgraph_core::schema::{Entity, EntityMap, Level, RelationMap, Relations};

use crate::{
    ParseConfig,
    error::{Diagnostic, DiagnosticCollector, ErrorCode, Severity},
};

const ROOT_KEY: &str = "context";
const RELATIONS_KEY: &str = "relations";

/// Reads one document, emitting diagnostics into a collector.
pub(crate) struct Reader<'a> {
    config: ParseConfig,
    collector: &'a mut DiagnosticCollector,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(config: ParseConfig, collector: &'a mut DiagnosticCollector) -> Self {
        Self { config, collector }
    }

    /// Reads the `context` mapping from the document root.
    ///
    /// Returns `None` when the root has no `context` key. An explicit
    /// `context:` with no entities reads as an empty mapping.
    pub(crate) fn read_document(&mut self, value: &Value) -> Option<EntityMap> {
        let root = match untagged(value) {
            Value::Mapping(mapping) => mapping,
            Value::Null => {
                self.report_missing_root();
                return None;
            }
            _ => {
                self.report(
                    ErrorCode::E100,
                    "document root is not a mapping",
                    "",
                    "start the document with a `context:` key",
                );
                return None;
            }
        };

        match root.get(ROOT_KEY) {
            Some(context) => Some(self.read_entity_map(context, ROOT_KEY)),
            None => {
                self.report_missing_root();
                None
            }
        }
    }

    /// Reads an id-to-entity mapping. Used for `context` and every sub-level.
    fn read_entity_map(&mut self, value: &Value, path: &str) -> EntityMap {
        let mut entities = EntityMap::new();
        let Some(mapping) = self.expect_mapping(value, path, "expected a mapping of entities") else {
            return entities;
        };

        for (key, entity) in mapping {
            let Some(id) = self.read_key(key, path) else {
                continue;
            };
            let entity_path = format!("{path}.{id}");
            let entity = self.read_entity(entity, &entity_path);
            if entities.insert(id, entity).is_some() {
                debug!(path = entity_path; "Entity key repeated, keeping the last one");
            }
        }
        entities
    }

    fn read_entity(&mut self, value: &Value, path: &str) -> Entity {
        let mut entity = Entity::new();
        let Some(mapping) = self.expect_mapping(value, path, "expected an entity mapping") else {
            return entity;
        };

        for (key, field) in mapping {
            let Some(key) = self.read_key(key, path) else {
                continue;
            };
            let field_path = format!("{path}.{key}");

            match key.as_str() {
                "name" => {
                    if let Some(name) = self.read_text(field, &field_path) {
                        entity = entity.with_name(name);
                    }
                }
                "caption" => {
                    if let Some(caption) = self.read_text(field, &field_path) {
                        entity = entity.with_caption(caption);
                    }
                }
                "description" => {
                    if let Some(description) = self.read_text(field, &field_path) {
                        entity = entity.with_description(description);
                    }
                }
                RELATIONS_KEY => {
                    entity = entity.with_relations(self.read_relations(field, &field_path));
                }
                other => match Level::nested_from_key(other) {
                    Some(level) => {
                        let nested = self.read_entity_map(field, &field_path);
                        entity = entity.with_sub_level(level, nested);
                    }
                    None if self.config.strict() => {
                        self.report(
                            ErrorCode::E105,
                            format!("unknown entity field `{other}`"),
                            &field_path,
                            "entities accept name, caption, description, relations, containers, components and classes",
                        );
                    }
                    None => debug!(path = field_path; "Ignoring unknown entity field"),
                },
            }
        }
        entity
    }

    fn read_relations(&mut self, value: &Value, path: &str) -> Relations {
        let mut relations = Relations::new();
        let Some(mapping) = self.expect_mapping(value, path, "expected `to` and `from` relation mappings")
        else {
            return relations;
        };

        for (key, side) in mapping {
            let Some(key) = self.read_key(key, path) else {
                continue;
            };
            let side_path = format!("{path}.{key}");
            match key.as_str() {
                "to" => relations.set_to(self.read_relation_map(side, &side_path)),
                "from" => relations.set_from(self.read_relation_map(side, &side_path)),
                other if self.config.strict() => {
                    self.report(
                        ErrorCode::E106,
                        format!("unknown relation side `{other}`"),
                        &side_path,
                        "relations are declared under `to` or `from`",
                    );
                }
                _ => debug!(path = side_path; "Ignoring unknown relation side"),
            }
        }
        relations
    }

    fn read_relation_map(&mut self, value: &Value, path: &str) -> RelationMap {
        let mut relation_map = RelationMap::new();
        let Some(mapping) = self.expect_mapping(value, path, "expected a mapping of related entity ids")
        else {
            return relation_map;
        };

        for (key, kind) in mapping {
            let Some(id) = self.read_key(key, path) else {
                continue;
            };
            let kind_path = format!("{path}.{id}");
            let kind = self.read_text(kind, &kind_path);
            relation_map.insert(id, kind);
        }
        relation_map
    }

    /// Returns the mapping in `value`. `null` counts as an empty mapping;
    /// any other shape is reported and yields `None`.
    fn expect_mapping<'v>(&mut self, value: &'v Value, path: &str, message: &str) -> Option<&'v Mapping> {
        match untagged(value) {
            Value::Mapping(mapping) => Some(mapping),
            Value::Null => None,
            other => {
                self.report(
                    ErrorCode::E102,
                    format!("{message}, found {}", kind_name(other)),
                    path,
                    "indent the entries below the key as `key: value` pairs",
                );
                None
            }
        }
    }

    fn read_key(&mut self, key: &Value, path: &str) -> Option<String> {
        match scalar_to_string(key) {
            Some(key) => Some(key),
            None => {
                self.report(
                    ErrorCode::E103,
                    format!("invalid key: {} cannot be used as an identifier", kind_name(untagged(key))),
                    path,
                    "use a plain string as the key",
                );
                None
            }
        }
    }

    /// Reads a text field. Numbers and booleans are stringified, `null` is absent.
    fn read_text(&mut self, value: &Value, path: &str) -> Option<String> {
        if untagged(value).is_null() {
            return None;
        }
        let text = scalar_to_string(value);
        if text.is_none() {
            self.report(
                ErrorCode::E104,
                format!("expected text, found {}", kind_name(untagged(value))),
                path,
                "write the value on the same line as its key",
            );
        }
        text
    }

    fn report_missing_root(&mut self) {
        self.report(
            ErrorCode::E101,
            "missing `context` key",
            "",
            "add a top-level `context:` mapping holding the entities",
        );
    }

    fn report(&mut self, code: ErrorCode, message: impl Into<String>, path: &str, help: &str) {
        let severity = if self.config.strict() {
            Severity::Error
        } else {
            Severity::Warning
        };
        let mut diagnostic = Diagnostic::with_severity(severity, message)
            .with_code(code)
            .with_help(help);
        if !path.is_empty() {
            diagnostic = diagnostic.with_path(path);
        }
        self.collector.emit(diagnostic);
    }
}

fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match untagged(value) {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
