//! Static grammar analysis.
//!
//! Runs without input. For every alternation, checks that the leading tokens
//! tell its branches apart: with ordered choice, an earlier branch that matches
//! a prefix of a later one silently shadows it. Also reports left recursion and
//! repetition over nullable expressions.
//!
//! Everything found is collected into one [`ValidationReport`], so a grammar
//! author sees all defects at once.

mod conflicts;
mod model;
mod paths;
mod recursion;
mod trie;

#[cfg(test)]
mod analyze_tests;
#[cfg(test)]
mod paths_tests;

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::grammar::Grammar;

pub use conflicts::{Conflict, ConflictKind};
pub use model::{AltSite, GrammarModel};
pub use paths::{Path, PathEnd};
pub use recursion::{LeftRecursion, NullableRepetition};

/// Bounds for path enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Longest token path compared between branches.
    pub max_lookahead: usize,
    /// Distinct paths enumerated per branch and round.
    pub max_paths: usize,
    /// Rules expanded along one path, the alternation's own rule included.
    pub max_depth: usize,
    /// Report branches whose paths are cut at the same point as identical.
    /// Off, such branches are left to backtracking, so conflicts hidden past
    /// the bounds or behind recursion go unreported.
    pub strict: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_lookahead: 4,
            max_paths: 512,
            max_depth: 16,
            strict: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn with_max_lookahead(mut self, max_lookahead: usize) -> Self {
        self.max_lookahead = max_lookahead;
        self
    }

    pub fn with_max_paths(mut self, max_paths: usize) -> Self {
        self.max_paths = max_paths;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// A branch whose path budget ran out; its conflicts may be incomplete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExhaustedBranch {
    pub rule: String,
    pub alternation: u32,
    pub branch: u32,
}

impl fmt::Display for ExhaustedBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rule `{}` alternation #{} branch {}: path budget exhausted",
            self.rule, self.alternation, self.branch
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    pub rules: usize,
    pub alternations: usize,
    pub rounds: usize,
    pub paths: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub conflicts: Vec<Conflict>,
    pub left_recursion: Vec<LeftRecursion>,
    pub nullable_repetitions: Vec<NullableRepetition>,
    /// Warnings only.
    pub exhausted: Vec<ExhaustedBranch>,
    pub stats: AnalysisStats,
}

impl ValidationReport {
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn error_count(&self) -> usize {
        self.conflicts.len() + self.left_recursion.len() + self.nullable_repetitions.len()
    }

    pub fn warning_count(&self) -> usize {
        self.exhausted.len()
    }

    /// One line per finding, errors first.
    pub fn dump(&self) -> String {
        self.to_string()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_errors() && self.exhausted.is_empty() {
            return writeln!(f, "no defects");
        }
        for conflict in &self.conflicts {
            writeln!(f, "error: {conflict}")?;
        }
        for recursion in &self.left_recursion {
            writeln!(f, "error: {recursion}")?;
        }
        for repetition in &self.nullable_repetitions {
            writeln!(f, "error: {repetition}")?;
        }
        for branch in &self.exhausted {
            writeln!(f, "warning: {branch}")?;
        }
        Ok(())
    }
}

/// Analyzer defects of a grammar, carrying the full report.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("grammar validation failed: {} defect(s)", .report.error_count())]
pub struct GrammarValidationError {
    report: ValidationReport,
}

impl GrammarValidationError {
    pub fn new(report: ValidationReport) -> Self {
        Self { report }
    }

    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    pub fn into_report(self) -> ValidationReport {
        self.report
    }
}

/// Analyzes every alternation and rule of `grammar`.
pub fn analyze(grammar: &Grammar, config: &AnalyzerConfig) -> ValidationReport {
    let model = grammar.model();
    let mut report = ValidationReport {
        stats: AnalysisStats {
            rules: grammar.len(),
            alternations: model.sites().len(),
            ..AnalysisStats::default()
        },
        ..ValidationReport::default()
    };

    for site in model.sites() {
        let site_report = conflicts::analyze_site(grammar, site, config);
        let rule = grammar.get(site.rule).name();
        trace!(
            rule,
            alternation = site.ordinal,
            rounds = site_report.rounds,
            conflicts = site_report.conflicts.len(),
            "alternation analyzed"
        );

        report.stats.rounds += site_report.rounds;
        report.stats.paths += site_report.paths;
        report.conflicts.extend(site_report.conflicts);
        report
            .exhausted
            .extend(site_report.exhausted.into_iter().map(|branch| ExhaustedBranch {
                rule: rule.to_owned(),
                alternation: site.ordinal,
                branch,
            }));
    }

    report.left_recursion = recursion::left_recursion(grammar, model);
    report.nullable_repetitions = recursion::nullable_repetitions(grammar, model);

    debug!(
        rules = report.stats.rules,
        alternations = report.stats.alternations,
        errors = report.error_count(),
        warnings = report.warning_count(),
        "grammar analyzed"
    );

    report
}
