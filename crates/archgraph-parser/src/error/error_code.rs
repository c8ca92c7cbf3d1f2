//! Error codes for the archgraph diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - YAML syntax errors
//! - `E1xx` - Structural errors in the architecture description

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E0xx)
    // =========================================================================
    /// Malformed YAML.
    ///
    /// The source text is not a well-formed YAML document, for example an
    /// unterminated flow collection or inconsistent indentation.
    E001,

    // =========================================================================
    // Structural Errors (E1xx)
    // =========================================================================
    /// Document root is not a mapping.
    ///
    /// The top of the document must be a mapping holding the `context` key.
    E100,

    /// Missing `context` key.
    ///
    /// The document has no top-level `context` mapping of entities.
    E101,

    /// Mapping expected.
    ///
    /// An entity list, an entity, a relation block, or a relation side was
    /// given as a scalar or sequence.
    E102,

    /// Invalid key.
    ///
    /// A mapping key is not a string, number, or boolean.
    E103,

    /// Scalar expected.
    ///
    /// A text field such as `name` or a relation kind was given as a mapping
    /// or sequence.
    E104,

    /// Unknown entity field.
    ///
    /// Reported in strict mode for entity keys other than `name`, `caption`,
    /// `description`, `relations`, `containers`, `components` and `classes`.
    E105,

    /// Unknown relation side.
    ///
    /// Reported in strict mode for relation keys other than `to` and `from`.
    E106,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed yaml",
            ErrorCode::E100 => "document root is not a mapping",
            ErrorCode::E101 => "missing context",
            ErrorCode::E102 => "mapping expected",
            ErrorCode::E103 => "invalid key",
            ErrorCode::E104 => "scalar expected",
            ErrorCode::E105 => "unknown entity field",
            ErrorCode::E106 => "unknown relation side",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E101.to_string(), "E101");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "malformed yaml");
        assert_eq!(ErrorCode::E101.description(), "missing context");
        assert_eq!(ErrorCode::E106.description(), "unknown relation side");
    }
}
