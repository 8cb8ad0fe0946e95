//! Source-annotated diagnostics for lexer errors and parse failures.
//!
//! Reporters open a [`DiagnosticBuilder`] with [`Diagnostics::report`], attach
//! detail, notes and hints, then [`emit`](DiagnosticBuilder::emit) it. The
//! collected set renders either as one line per diagnostic or, given the
//! source text, as annotated snippets.

mod message;
mod printer;


use rowan::TextRange;

pub use message::{Diagnostic, DiagnosticKind, Note, Severity};
pub use printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a diagnostic titled after `kind`.
    pub fn report(&mut self, kind: DiagnosticKind, range: TextRange) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            sink: self,
            diagnostic: Diagnostic::new(kind, range),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn printer(&self) -> DiagnosticsPrinter<'_, '_> {
        DiagnosticsPrinter::new(self)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    sink: &'a mut Diagnostics,
    diagnostic: Diagnostic,
}

impl DiagnosticBuilder<'_> {
    /// Completes the kind's title with `detail`.
    pub fn message(mut self, detail: impl AsRef<str>) -> Self {
        self.diagnostic.title = self.diagnostic.kind.describe(detail.as_ref());
        self
    }

    /// Points at a second location, such as where the failing construct began.
    pub fn note(mut self, label: impl Into<String>, range: TextRange) -> Self {
        self.diagnostic.notes.push(Note {
            range,
            label: label.into(),
        });
        self
    }

    /// The last hint labels the primary span when rendered with source.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.diagnostic.hints.push(hint.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.diagnostic.severity = severity;
        self
    }

    pub fn emit(self) {
        self.sink.items.push(self.diagnostic);
    }
}
