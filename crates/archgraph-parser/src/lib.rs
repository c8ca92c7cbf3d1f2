//! Reader for archgraph architecture descriptions.
//!
//! The source text is a YAML document with a top-level `context` key holding
//! a mapping of entities:
//!
//! ```yaml
//! context:
//!   shop:
//!     name: Shop
//!     relations:
//!       to:
//!         user: serves
//!     containers:
//!       api:
//!         name: API
//!   user:
//!     name: Customer
//! ```
//!
//! YAML syntax, anchors and `<<` merge keys are handled by `serde_yaml`; this
//! crate turns the resulting value tree into the [`archgraph_core::schema`]
//! model. Reading is lenient by default: absent fields default, and wrongly shaped branches are skipped and
//! reported as warnings on the returned [`Document`]. [`ParseConfig::strict`]
//! turns every structural problem into an error.
//!
//! # Example
//!
//! ```
//! use archgraph_parser::{ParseConfig, parse};
//!
//! let document = parse("context:\n  user:\n    name: User\n", ParseConfig::default())
//!     .expect("valid description");
//! assert!(document.has_root());
//! assert_eq!(document.context().map(|ctx| ctx.len()), Some(1));
//! ```

pub mod error;

mod reader;
mod span;

#[cfg(test)]
mod parser_tests;

pub use span::Span;

use log::{debug, trace};

use archgraph_core::schema::EntityMap;

use error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError};

/// Options controlling how strictly the document shape is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseConfig {
    strict: bool,
}

impl ParseConfig {
    /// Creates a new [`ParseConfig`].
    ///
    /// # Arguments
    ///
    /// * `strict` - Reject the document on any structural problem instead of
    ///   skipping the offending branch.
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Returns `true` when structural problems are errors.
    pub fn strict(&self) -> bool {
        self.strict
    }
}

/// A successfully read architecture description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    context: Option<EntityMap>,
    warnings: Vec<Diagnostic>,
}

impl Document {
    /// The top-level entity mapping, or `None` when the document has no `context` key.
    pub fn context(&self) -> Option<&EntityMap> {
        self.context.as_ref()
    }

    /// Returns `true` if the document has a `context` key.
    ///
    /// An empty `context` is present; a missing one is not.
    pub fn has_root(&self) -> bool {
        self.context.is_some()
    }

    /// Structural problems that were skipped while reading leniently.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// Parses the source text into a [`Document`].
///
/// # Errors
///
/// Returns a [`ParseError`] when the text is not valid YAML, or in strict mode
/// when the document shape deviates from the architecture description format.
pub fn parse(source: &str, config: ParseConfig) -> Result<Document, ParseError> {
    debug!(source_len = source.len(), strict = config.strict(); "Parsing architecture description");

    let value: serde_yaml::Value = if is_blank(source) {
        serde_yaml::Value::Null
    } else {
        let mut value: serde_yaml::Value =
            serde_yaml::from_str(source).map_err(|err| syntax_diagnostic(source, &err))?;
        value.apply_merge().map_err(|err| merge_diagnostic(&err))?;
        value
    };
    trace!(value:?; "Parsed YAML value");

    let mut collector = DiagnosticCollector::new();
    let context = reader::Reader::new(config, &mut collector).read_document(&value);
    let warnings = collector.finish()?;

    debug!(
        has_root = context.is_some(),
        warnings_count = warnings.len();
        "Architecture description read"
    );

    Ok(Document { context, warnings })
}

/// Returns `true` for text holding no YAML content, only blank lines and comments.
fn is_blank(source: &str) -> bool {
    source.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn merge_diagnostic(err: &serde_yaml::Error) -> Diagnostic {
    Diagnostic::error(err.to_string())
        .with_code(ErrorCode::E001)
        .with_help("a `<<` merge key takes an alias of a mapping, or a list of them")
}

fn syntax_diagnostic(source: &str, err: &serde_yaml::Error) -> Diagnostic {
    let diagnostic = Diagnostic::error(err.to_string())
        .with_code(ErrorCode::E001)
        .with_help("check the indentation and that every key is followed by `:`");

    match err.location() {
        Some(location) => {
            diagnostic.with_label(Span::at_char(source, location.index()), "invalid YAML here")
        }
        None => diagnostic,
    }
}
