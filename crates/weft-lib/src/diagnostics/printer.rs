use std::fmt::{self, Write};
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use rowan::TextRange;

use super::{Diagnostics, Severity};

/// Renders a [`Diagnostics`] set.
///
/// Without source text every diagnostic prints on one line. With source,
/// each becomes an annotated snippet.
pub struct DiagnosticsPrinter<'d, 's> {
    diagnostics: &'d Diagnostics,
    source: Option<&'s str>,
    path: Option<&'s str>,
    colored: bool,
}

impl<'d, 's> DiagnosticsPrinter<'d, 's> {
    pub fn new(diagnostics: &'d Diagnostics) -> Self {
        Self {
            diagnostics,
            source: None,
            path: None,
            colored: false,
        }
    }

    pub fn source(self, source: &'s str) -> Self {
        Self {
            source: Some(source),
            ..self
        }
    }

    pub fn path(self, path: &'s str) -> Self {
        Self {
            path: Some(path),
            ..self
        }
    }

    pub fn colored(self, colored: bool) -> Self {
        Self { colored, ..self }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DiagnosticsPrinter<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let renderer = match self.colored {
            true => Renderer::styled(),
            false => Renderer::plain(),
        };

        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            let Some(source) = self.source else {
                write!(f, "{diagnostic}")?;
                continue;
            };
            let level = match diagnostic.severity() {
                Severity::Error => Level::ERROR,
                Severity::Warning => Level::WARNING,
            };

            let mut primary = AnnotationKind::Primary.span(clamp(diagnostic.range(), source.len()));
            if let Some(hint) = diagnostic.hints().last() {
                primary = primary.label(hint);
            }
            let mut snippet = Snippet::source(source).line_start(1).annotation(primary);
            if let Some(path) = self.path {
                snippet = snippet.path(path);
            }
            for note in diagnostic.notes() {
                snippet = snippet.annotation(
                    AnnotationKind::Context
                        .span(clamp(note.range, source.len()))
                        .label(&note.label),
                );
            }

            let report: Vec<Group<'_>> =
                vec![level.primary_title(diagnostic.message()).element(snippet)];
            write!(f, "{}", renderer.render(&report))?;
        }
        Ok(())
    }
}

/// Widens an empty range to one byte so end-of-input still gets a caret.
fn clamp(range: TextRange, len: usize) -> Range<usize> {
    let start = usize::from(range.start());
    let end = usize::from(range.end());
    match start == end {
        true => start..(start + 1).min(len),
        false => start..end,
    }
}
