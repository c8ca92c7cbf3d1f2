//! Unit tests for reading architecture descriptions.
//!
//! These tests verify that YAML documents are turned into the schema model,
//! that lenient reading skips malformed branches with warnings, and that
//! strict reading rejects them.

use proptest::prelude::*;

use archgraph_core::schema::{EntityMap, Level, entity_count};

use crate::{
    Document, ParseConfig,
    error::{ErrorCode, ParseError},
    parse,
};

/// Helper function to read a source leniently and assert success
fn parse_lenient(source: &str) -> Document {
    match parse(source, ParseConfig::default()) {
        Ok(document) => document,
        Err(err) => panic!("Expected reading to succeed, but got error: {}", err),
    }
}

/// Helper function to read a source strictly and assert failure
fn parse_strict_fails(source: &str) -> ParseError {
    match parse(source, ParseConfig::new(true)) {
        Ok(document) => panic!("Expected strict reading to fail, got {:?}", document),
        Err(err) => err,
    }
}

fn context(document: &Document) -> &EntityMap {
    document.context().expect("document should have a context")
}

fn warning_codes(document: &Document) -> Vec<ErrorCode> {
    document
        .warnings()
        .iter()
        .filter_map(|diag| diag.code())
        .collect()
}

#[test]
fn test_reads_entities_in_document_order() {
    let document = parse_lenient(
        r#"
context:
  zeta:
    name: Zeta
  alpha:
    name: Alpha
  mid: {}
"#,
    );

    let ids: Vec<&str> = context(&document).keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
    assert!(document.warnings().is_empty());
}

#[test]
fn test_reads_entity_fields() {
    let document = parse_lenient(
        r#"
context:
  user:
    name: User
    caption: Human
    description: Someone using the system
"#,
    );

    let user = &context(&document)["user"];
    assert_eq!(user.name(), Some("User"));
    assert_eq!(user.caption(), Some("Human"));
    assert_eq!(user.description(), Some("Someone using the system"));
}

#[test]
fn test_empty_fields_are_absent() {
    let document = parse_lenient(
        r#"
context:
  user:
    name:
    description:
  admin:
"#,
    );

    let ctx = context(&document);
    assert_eq!(ctx["user"].name(), None);
    assert_eq!(ctx["user"].description(), None);
    assert_eq!(ctx["admin"].label("admin"), "admin");
    assert!(document.warnings().is_empty());
}

#[test]
fn test_reads_relations_both_sides() {
    let document = parse_lenient(
        r#"
context:
  user:
    relations:
      to:
        shop: consumes
        admin: is
      from:
        mailer: notifies
        audit:
"#,
    );

    let relations = context(&document)["user"].relations();
    let targets: Vec<(&str, Option<&str>)> = relations
        .to()
        .iter()
        .map(|(id, kind)| (id.as_str(), kind.as_deref()))
        .collect();
    assert_eq!(targets, vec![("shop", Some("consumes")), ("admin", Some("is"))]);

    assert_eq!(relations.from().len(), 2);
    assert_eq!(relations.from()["mailer"].as_deref(), Some("notifies"));
    assert_eq!(relations.from()["audit"], None);
}

#[test]
fn test_reads_nested_levels() {
    let document = parse_lenient(
        r#"
context:
  shop:
    containers:
      api:
        components:
          orders:
            classes:
              Cart: {}
              Order: {}
      db: {}
"#,
    );

    let ctx = context(&document);
    assert_eq!(entity_count(ctx), 6);

    let containers = ctx["shop"]
        .sub_level(Level::Containers)
        .expect("shop should have containers");
    let components = containers["api"]
        .sub_level(Level::Components)
        .expect("api should have components");
    let classes = components["orders"]
        .sub_level(Level::Classes)
        .expect("orders should have classes");
    assert_eq!(classes.len(), 2);
}

#[test]
fn test_numeric_and_boolean_scalars_are_stringified() {
    let document = parse_lenient(
        r#"
context:
  404:
    name: 42
    relations:
      to:
        true: 7
"#,
    );

    let ctx = context(&document);
    let entity = &ctx["404"];
    assert_eq!(entity.name(), Some("42"));
    assert_eq!(entity.relations().to()["true"].as_deref(), Some("7"));
}

#[test]
fn test_empty_context_is_distinct_from_missing_context() {
    let empty = parse_lenient("context: {}\n");
    assert!(empty.has_root());
    assert!(context(&empty).is_empty());
    assert!(empty.warnings().is_empty());

    let null = parse_lenient("context:\n");
    assert!(null.has_root());
    assert!(context(&null).is_empty());

    let missing = parse_lenient("system:\n  name: Lost\n");
    assert!(!missing.has_root());
    assert_eq!(warning_codes(&missing), vec![ErrorCode::E101]);
}

#[test]
fn test_empty_source_has_no_root() {
    let document = parse_lenient("");
    assert!(!document.has_root());
    assert_eq!(warning_codes(&document), vec![ErrorCode::E101]);
}

#[test]
fn test_scalar_root_is_reported() {
    let document = parse_lenient("just some text\n");
    assert!(!document.has_root());
    assert_eq!(warning_codes(&document), vec![ErrorCode::E100]);
}

#[test]
fn test_lenient_skips_malformed_branches() {
    let document = parse_lenient(
        r#"
context:
  shop:
    name: [not, text]
    relations: everything
    containers:
      - api
  user:
    name: User
"#,
    );

    let ctx = context(&document);
    assert_eq!(ctx.len(), 2);
    assert_eq!(ctx["shop"].name(), None);
    assert!(ctx["shop"].relations().is_empty());
    assert_eq!(ctx["user"].name(), Some("User"));

    assert_eq!(
        warning_codes(&document),
        vec![ErrorCode::E104, ErrorCode::E102, ErrorCode::E102]
    );
    let paths: Vec<Option<&str>> = document.warnings().iter().map(|d| d.path()).collect();
    assert_eq!(
        paths,
        vec![
            Some("context.shop.name"),
            Some("context.shop.relations"),
            Some("context.shop.containers"),
        ]
    );
}

#[test]
fn test_lenient_ignores_unknown_fields() {
    let document = parse_lenient(
        r#"
context:
  shop:
    technology: Rust
    relations:
      via:
        queue: publishes
"#,
    );

    assert!(document.warnings().is_empty());
    assert!(context(&document)["shop"].relations().is_empty());
}

#[test]
fn test_malformed_yaml_is_syntax_error() {
    let source = "context:\n  shop: {name: Shop\n";
    for config in [ParseConfig::default(), ParseConfig::new(true)] {
        let err = parse(source, config).expect_err("unterminated flow mapping must fail");
        assert_eq!(err.diagnostics().len(), 1);
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert!(diag.is_error());
        assert!(diag.help().is_some());
    }
}

#[test]
fn test_syntax_error_label_is_inside_source() {
    let source = "context:\n  shop:\n    name: \"Shop\n";
    let err = parse(source, ParseConfig::default()).expect_err("unterminated string must fail");

    for label in err.diagnostics()[0].labels() {
        assert!(label.span().end() <= source.len());
    }
}

#[test]
fn test_strict_rejects_missing_context() {
    let err = parse_strict_fails("system: {}\n");
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E101));
}

#[test]
fn test_strict_collects_every_problem() {
    let err = parse_strict_fails(
        r#"
context:
  shop:
    technology: Rust
    relations:
      via: {}
      to: nowhere
  user: User
"#,
    );

    let codes: Vec<Option<ErrorCode>> = err.diagnostics().iter().map(|d| d.code()).collect();
    assert_eq!(
        codes,
        vec![
            Some(ErrorCode::E105),
            Some(ErrorCode::E106),
            Some(ErrorCode::E102),
            Some(ErrorCode::E102),
        ]
    );
    assert!(err.diagnostics().iter().all(|d| d.is_error()));
}

#[test]
fn test_strict_accepts_well_formed_document() {
    let source = r#"
context:
  shop:
    name: Shop
    caption: System
    description: Sells things
    relations:
      to:
        user: serves
    containers:
      api: {}
  user:
"#;
    let document = parse(source, ParseConfig::new(true)).expect("well-formed document");
    assert_eq!(entity_count(context(&document)), 3);
}

#[test]
fn test_merge_keys_are_applied() {
    let source = r#"
shared:
  reader: &reader
    relations:
      to:
        db: reads
context:
  api:
    <<: *reader
    name: API
  db: {}
"#;
    for config in [ParseConfig::default(), ParseConfig::new(true)] {
        let document = parse(source, config).expect("merged entity is well formed");
        assert!(document.warnings().is_empty());

        let api = &context(&document)["api"];
        assert_eq!(api.name(), Some("API"));
        assert_eq!(api.relations().to()["db"].as_deref(), Some("reads"));
    }
}

#[test]
fn test_merge_of_a_scalar_is_syntax_error() {
    let err = parse("context:\n  api:\n    <<: 5\n", ParseConfig::default())
        .expect_err("only mappings can be merged");
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E001));
}

proptest! {
    #[test]
    fn prop_arbitrary_text_never_panics(source in "\\PC{0,200}") {
        let _ = parse(&source, ParseConfig::default());
        let _ = parse(&source, ParseConfig::new(true));
    }

    #[test]
    fn prop_flat_context_keeps_every_entity(ids in prop::collection::btree_set("svc-[a-z0-9]{1,8}", 1..20)) {
        let mut source = String::from("context:\n");
        for id in &ids {
            source.push_str(&format!("  {id}:\n    name: Entity {id}\n"));
        }

        let document = parse(&source, ParseConfig::new(true)).expect("generated document is valid");
        let ctx = document.context().expect("context present");
        prop_assert_eq!(ctx.len(), ids.len());
        for id in &ids {
            let expected = format!("Entity {id}");
            prop_assert_eq!(ctx[id.as_str()].name(), Some(expected.as_str()));
        }
    }
}
