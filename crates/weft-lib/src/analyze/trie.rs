//! Prefix trie over the paths of one alternation, tagged by branch.

use indexmap::{IndexMap, IndexSet};
use weft_core::Symbol;

use super::conflicts::ConflictKind;
use super::paths::{Path, PathEnd};

#[derive(Debug, Default)]
struct TrieNode {
    parent: Option<(usize, Symbol)>,
    depth: usize,
    children: IndexMap<Symbol, usize>,
    /// Paths ending at this node.
    ends: Vec<usize>,
    /// First path of each branch that continues past this node.
    through: IndexMap<u32, usize>,
}

/// Two paths from different branches that collide, earlier branch first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Collision {
    pub kind: ConflictKind,
    pub first: usize,
    pub second: usize,
}

#[derive(Debug)]
pub(crate) struct PrefixTrie {
    nodes: Vec<TrieNode>,
    paths: Vec<(u32, Path)>,
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            paths: Vec::new(),
        }
    }

    pub fn insert(&mut self, branch: u32, path: Path) {
        let idx = self.paths.len();
        let mut node = 0;
        for &sym in &path.tokens {
            self.nodes[node].through.entry(branch).or_insert(idx);
            node = self.child(node, sym);
        }
        self.nodes[node].ends.push(idx);
        self.paths.push((branch, path));
    }

    fn child(&mut self, node: usize, sym: Symbol) -> usize {
        if let Some(&child) = self.nodes[node].children.get(&sym) {
            return child;
        }
        let child = self.nodes.len();
        let depth = self.nodes[node].depth + 1;
        self.nodes.push(TrieNode {
            parent: Some((node, sym)),
            depth,
            ..TrieNode::default()
        });
        self.nodes[node].children.insert(sym, child);
        child
    }

    /// Branch and path stored under `idx`.
    pub fn path(&self, idx: usize) -> (u32, &Path) {
        let (branch, path) = &self.paths[idx];
        (*branch, path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Collisions in node order.
    ///
    /// A complete path of branch `a` collides with any later branch `b` that
    /// ends on it (identical when `b` is complete too) or continues past it. A
    /// complete path of a later branch never collides with an earlier one.
    /// Cut paths of two branches ending on the same node are identical under
    /// `strict`; truncated ones only in the final round, while a deeper round
    /// may still separate them.
    pub fn collisions(&self, final_round: bool, strict: bool) -> Vec<Collision> {
        let mut out = Vec::new();
        for node in &self.nodes {
            for &a in &node.ends {
                let (branch_a, path_a) = self.path(a);
                for &b in &node.ends {
                    let (branch_b, path_b) = self.path(b);
                    if branch_b <= branch_a {
                        continue;
                    }
                    let kind = match (path_a.is_complete(), path_b.is_complete()) {
                        (true, true) => ConflictKind::Identical,
                        (true, false) => ConflictKind::Prefix,
                        (false, false) if strict && cuts_settled(path_a, path_b, final_round) => {
                            ConflictKind::Identical
                        }
                        _ => continue,
                    };
                    out.push(Collision {
                        kind,
                        first: a,
                        second: b,
                    });
                }

                if !path_a.is_complete() {
                    continue;
                }
                for (&branch_b, &b) in &node.through {
                    if branch_b > branch_a {
                        out.push(Collision {
                            kind: ConflictKind::Prefix,
                            first: a,
                            second: b,
                        });
                    }
                }
            }
        }
        out
    }

    /// Prefixes of length `depth` that two or more branches can still extend.
    pub fn shared_at(&self, depth: usize) -> IndexSet<Vec<Symbol>> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.depth == depth)
            .filter(|(_, node)| {
                let branches: IndexSet<u32> = node
                    .ends
                    .iter()
                    .map(|&idx| self.paths[idx].0)
                    .chain(node.through.keys().copied())
                    .collect();
                branches.len() >= 2
            })
            .map(|(idx, _)| self.prefix(idx))
            .collect()
    }

    fn prefix(&self, mut node: usize) -> Vec<Symbol> {
        let mut tokens = Vec::with_capacity(self.nodes[node].depth);
        while let Some((parent, sym)) = self.nodes[node].parent {
            tokens.push(sym);
            node = parent;
        }
        tokens.reverse();
        tokens
    }
}

fn cuts_settled(a: &Path, b: &Path, final_round: bool) -> bool {
    final_round || (a.end != PathEnd::Truncated && b.end != PathEnd::Truncated)
}
