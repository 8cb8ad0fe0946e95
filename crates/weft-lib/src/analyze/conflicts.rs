//! Alternation conflict detection.
//!
//! Each alternation is analyzed in rounds of growing lookahead. Round `k`
//! enumerates paths of up to `k` tokens, keeping only states whose first `k - 1`
//! tokens were still shared by two or more branches after round `k - 1`, and
//! inserts them into a fresh [`PrefixTrie`]. Analysis of a site stops once no
//! prefix is shared or `max_lookahead` is reached.

use std::fmt;

use indexmap::IndexSet;
use serde::Serialize;
use weft_core::Symbol;

use super::AnalyzerConfig;
use super::model::AltSite;
use super::paths::{self, PathExplorer};
use super::trie::PrefixTrie;
use crate::grammar::{Expr, Grammar};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    /// Both branches match the same complete token path.
    Identical,
    /// The earlier branch matches a strict prefix of what the later one would.
    Prefix,
}

/// Two branches of one alternation that the leading tokens cannot tell apart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub rule: String,
    /// Preorder index of the alternation within its rule.
    pub alternation: u32,
    pub kind: ConflictKind,
    pub branches: (u32, u32),
    /// Witness token paths, earlier branch first.
    pub paths: (Vec<String>, Vec<String>),
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.branches;
        write!(f, "rule `{}` alternation #{}: ", self.rule, self.alternation)?;
        match self.kind {
            ConflictKind::Identical => write!(
                f,
                "branches {a} and {b} both match [{}]",
                self.paths.0.join(" ")
            ),
            ConflictKind::Prefix => write!(
                f,
                "branch {a} [{}] is a prefix of branch {b} [{}]",
                self.paths.0.join(" "),
                self.paths.1.join(" ")
            ),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct SiteAnalysis {
    pub conflicts: Vec<Conflict>,
    /// Branches whose path budget ran out in some round.
    pub exhausted: Vec<u32>,
    pub rounds: usize,
    pub paths: usize,
}

pub(crate) fn analyze_site(
    grammar: &Grammar,
    site: &AltSite,
    config: &AnalyzerConfig,
) -> SiteAnalysis {
    let mut out = SiteAnalysis::default();
    let rule = grammar.get(site.rule);
    let Some(Expr::Alt(branches)) = rule.body().at(&site.path) else {
        return out;
    };

    let explorer = PathExplorer::new(grammar, config);
    let mut reported = IndexSet::new();
    let mut exhausted = IndexSet::new();
    let mut contested: Option<IndexSet<Vec<Symbol>>> = None;

    for bound in 1..=config.max_lookahead {
        out.rounds += 1;
        let mut trie = PrefixTrie::new();

        for (i, branch) in branches.iter().enumerate() {
            let keep = |tokens: &[Symbol]| match &contested {
                Some(shared) if tokens.len() == bound - 1 => shared.contains(tokens),
                _ => true,
            };
            let exploration = explorer.explore(site.rule, branch, bound, keep);
            if exploration.exhausted {
                exhausted.insert(i as u32);
            }
            for path in exploration.paths {
                trie.insert(i as u32, path);
            }
        }
        out.paths += trie.len();

        let final_round = bound == config.max_lookahead;
        for collision in trie.collisions(final_round, config.strict) {
            let (a, first) = trie.path(collision.first);
            let (b, second) = trie.path(collision.second);
            if !reported.insert((a, b)) {
                continue;
            }

            let second_tokens = match collision.kind {
                ConflictKind::Identical => second.tokens.clone(),
                ConflictKind::Prefix => extend_witness(
                    &explorer,
                    site,
                    &branches[b as usize],
                    &second.tokens,
                    config.max_lookahead,
                ),
            };
            out.conflicts.push(Conflict {
                rule: rule.name().to_owned(),
                alternation: site.ordinal,
                kind: collision.kind,
                branches: (a, b),
                paths: (
                    first.names(grammar),
                    paths::names(grammar, &second_tokens),
                ),
            });
        }

        let shared = trie.shared_at(bound);
        if shared.is_empty() {
            break;
        }
        contested = Some(shared);
    }

    out.exhausted = exhausted.into_iter().collect();
    out
}

/// Longest path of `branch` starting with `prefix`, up to `bound` tokens.
fn extend_witness<'g>(
    explorer: &PathExplorer<'g>,
    site: &AltSite,
    branch: &'g Expr,
    prefix: &[Symbol],
    bound: usize,
) -> Vec<Symbol> {
    let keep = |tokens: &[Symbol]| {
        let n = tokens.len().min(prefix.len());
        tokens[..n] == prefix[..n]
    };
    explorer
        .explore(site.rule, branch, bound, keep)
        .paths
        .into_iter()
        .map(|path| path.tokens)
        .filter(|tokens| tokens.starts_with(prefix))
        .reduce(|best, tokens| if tokens.len() > best.len() { tokens } else { best })
        .unwrap_or_else(|| prefix.to_vec())
}
