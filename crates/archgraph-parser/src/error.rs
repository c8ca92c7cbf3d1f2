//! Error and diagnostic system for the archgraph parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled source spans for YAML syntax errors
//! - Key paths locating structural problems inside the document
//! - Severity levels, so lenient reading can report without failing
//! - Diagnostic collector for accumulating multiple problems
//!
//! # Example
//!
//! ```
//! # use archgraph_parser::error::{Diagnostic, ErrorCode};
//! # use archgraph_parser::Span;
//!
//! let diag = Diagnostic::error("expected a mapping of entities")
//!     .with_code(ErrorCode::E102)
//!     .with_path("context.shop.containers")
//!     .with_help("nest entities as `id:` keys with their fields indented below");
//!
//! let syntax = Diagnostic::error("mapping values are not allowed in this context")
//!     .with_code(ErrorCode::E001)
//!     .with_label(Span::new(12..13), "unexpected `:`");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
