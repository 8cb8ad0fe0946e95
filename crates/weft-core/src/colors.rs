//! ANSI styling for trace and tree dump output.

use std::fmt::Display;

/// What a piece of output shows; each role maps to one 16-color ANSI code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Rule names.
    Rule,
    /// Terminals that matched.
    Matched,
    /// Failed attempts and guard cuts.
    Failed,
    /// Positions, cache and backtrack markers.
    Muted,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Self::Rule => "\x1b[34m",
            Self::Matched => "\x1b[32m",
            Self::Failed => "\x1b[31m",
            Self::Muted => "\x1b[2m",
        }
    }
}

const RESET: &str = "\x1b[0m";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Colors {
    enabled: bool,
}

impl Colors {
    pub const ON: Self = Self { enabled: true };
    pub const OFF: Self = Self { enabled: false };

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(self) -> bool {
        self.enabled
    }

    /// Wraps `text` in the role's escape codes; plain text when disabled.
    pub fn paint(self, style: Style, text: impl Display) -> String {
        match self.enabled {
            true => format!("{}{text}{RESET}", style.code()),
            false => text.to_string(),
        }
    }
}
