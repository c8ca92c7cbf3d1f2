//! Accumulates diagnostics while a document is read.

use crate::error::{Diagnostic, ParseError};

/// Collects every diagnostic emitted during one read of the source.
///
/// Reading continues after a problem is found so that all of them can be
/// reported at once.
#[derive(Debug, Default)]
pub(crate) struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Returns the warnings when no error was collected, otherwise a [`ParseError`]
    /// holding only the errors.
    pub(crate) fn finish(self) -> Result<Vec<Diagnostic>, ParseError> {
        if self.has_errors() {
            let errors = self
                .diagnostics
                .into_iter()
                .filter(Diagnostic::is_error)
                .collect::<Vec<_>>();
            return Err(ParseError::new(errors));
        }
        Ok(self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_with_only_warnings() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("skipped"));

        let warnings = collector.finish().expect("warnings should not fail");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_finish_keeps_only_errors() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("skipped"));
        collector.emit(Diagnostic::error("first"));
        collector.emit(Diagnostic::error("second"));
        assert!(collector.has_errors());

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert_eq!(err.diagnostics()[0].message(), "first");
    }
}
