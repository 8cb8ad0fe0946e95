use std::fmt;

use rowan::TextRange;

/// What went wrong. Lexer kinds sort before parser kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    InvalidCharacter,
    UnexpectedToken,
    UnexpectedEof,
    TrailingInput,
}

impl DiagnosticKind {
    /// Title shown when the reporter adds no detail.
    pub fn title(self) -> &'static str {
        match self {
            Self::InvalidCharacter => "invalid character",
            Self::UnexpectedToken => "unexpected token",
            Self::UnexpectedEof => "unexpected end of input",
            Self::TrailingInput => "unconsumed input",
        }
    }

    /// Title completed with reporter-supplied detail.
    pub fn describe(self, detail: &str) -> String {
        match self {
            Self::InvalidCharacter => format!("invalid character {detail}"),
            Self::TrailingInput => format!("unconsumed input starting at {detail}"),
            Self::UnexpectedToken | Self::UnexpectedEof => format!("{}: {detail}", self.title()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
        })
    }
}

/// Secondary location attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub range: TextRange,
    pub label: String,
}

/// One reported problem, located in source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(super) kind: DiagnosticKind,
    pub(super) severity: Severity,
    pub(super) range: TextRange,
    pub(super) title: String,
    pub(super) notes: Vec<Note>,
    pub(super) hints: Vec<String>,
}

impl Diagnostic {
    pub(super) fn new(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            range,
            title: kind.title().to_owned(),
            notes: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.title
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Single-line form: `error[4..5]: title; note 0..1: label; help: hint`.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, span(self.range), self.title)?;
        for note in &self.notes {
            write!(f, "; note {}: {}", span(note.range), note.label)?;
        }
        for hint in &self.hints {
            write!(f, "; help: {hint}")?;
        }
        Ok(())
    }
}

fn span(range: TextRange) -> String {
    format!("{}..{}", u32::from(range.start()), u32::from(range.end()))
}
