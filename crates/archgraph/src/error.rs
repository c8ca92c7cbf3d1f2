//! Error types for archgraph operations.
//!
//! This module provides the main error type [`ArchGraphError`] which wraps
//! the error conditions of parsing, persisting, and rendering an architecture
//! description.

use std::io;

use thiserror::Error;

use archgraph_parser::error::ParseError;

use crate::{render::RenderError, storage::StorageError};

/// The main error type for archgraph operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries the structured diagnostics together with the
/// source text they point into, so hosts can render source snippets.
#[derive(Debug, Error)]
pub enum ArchGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ArchGraphError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
