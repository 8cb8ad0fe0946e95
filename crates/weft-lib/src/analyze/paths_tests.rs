use weft_core::Symbol;

use super::AnalyzerConfig;
use super::paths::{Exploration, PathExplorer};
use crate::grammar::{Expr, Grammar, alt, many, opt, rule, seq, term};

/// Enumerates the paths of branch `branch` of the first alternation in `owner`,
/// or of the whole body when it has none.
fn explore_with(
    grammar: &Grammar,
    owner: &str,
    branch: usize,
    bound: usize,
    config: &AnalyzerConfig,
    keep: impl Fn(&[Symbol]) -> bool,
) -> Exploration {
    let rule = grammar.rule(owner).unwrap();
    let expr = match rule.body() {
        Expr::Alt(branches) => &branches[branch],
        body => body,
    };
    PathExplorer::new(grammar, config).explore(rule.id(), expr, bound, keep)
}

fn render(grammar: &Grammar, exploration: &Exploration) -> String {
    let mut lines: Vec<String> = exploration
        .paths
        .iter()
        .map(|path| format!("[{}] {:?}", path.names(grammar).join(" "), path.end))
        .collect();
    if exploration.exhausted {
        lines.push("exhausted".to_owned());
    }
    lines.join("\n")
}

fn paths(grammar: &Grammar, owner: &str, branch: usize, bound: usize) -> String {
    let config = AnalyzerConfig::default();
    let exploration = explore_with(grammar, owner, branch, bound, &config, |_| true);
    render(grammar, &exploration)
}

#[test]
fn sequence_walks_past_its_first_element() {
    let grammar = Grammar::builder()
        .rule("S", seq([term("A"), opt(term("B")), term("C")]))
        .build()
        .unwrap();

    insta::assert_snapshot!(paths(&grammar, "S", 0, 4), @r"
    [A B C] Complete
    [A C] Complete
    ");
}

#[test]
fn bound_truncates_or_completes() {
    let grammar = Grammar::builder()
        .rule("S", seq([term("A"), opt(term("B")), term("C")]))
        .rule("T", seq([term("A"), opt(term("B"))]))
        .build()
        .unwrap();

    insta::assert_snapshot!(paths(&grammar, "S", 0, 1), @"[A] Truncated");
    insta::assert_snapshot!(paths(&grammar, "T", 0, 1), @"[A] Complete");
}

#[test]
fn repetition_takes_first() {
    let grammar = Grammar::builder()
        .rule("S", seq([many(term("A")), term("B")]))
        .build()
        .unwrap();

    insta::assert_snapshot!(paths(&grammar, "S", 0, 3), @r"
    [A A A] Truncated
    [A A B] Complete
    [A B] Complete
    [B] Complete
    ");
}

#[test]
fn zero_width_iteration_ends_repetition() {
    let grammar = Grammar::builder()
        .rule("S", seq([many(opt(term("A"))), term("B")]))
        .build()
        .unwrap();

    insta::assert_snapshot!(paths(&grammar, "S", 0, 2), @r"
    [A A] Truncated
    [A B] Complete
    [B] Complete
    ");
}

#[test]
fn owning_rule_cuts_the_path() {
    let grammar = Grammar::builder()
        .rule(
            "Item",
            alt([seq([term("LParen"), rule("Item"), term("RParen")]), term("Atom")]),
        )
        .build()
        .unwrap();

    insta::assert_snapshot!(paths(&grammar, "Item", 0, 4), @"[LParen] Cyclic");
}

#[test]
fn depth_bound_cuts_the_path() {
    let grammar = Grammar::builder()
        .rule("A", alt([rule("B"), term("X")]))
        .rule("B", seq([rule("C")]))
        .rule("C", term("Y"))
        .build()
        .unwrap();

    let shallow = AnalyzerConfig::default().with_max_depth(2);
    let exploration = explore_with(&grammar, "A", 0, 4, &shallow, |_| true);
    insta::assert_snapshot!(render(&grammar, &exploration), @"[] DepthLimit");

    insta::assert_snapshot!(paths(&grammar, "A", 0, 4), @"[Y] Complete");
}

#[test]
fn keep_filter_drops_states() {
    let grammar = Grammar::builder()
        .rule("S", seq([term("A"), alt([term("B"), term("C")])]))
        .build()
        .unwrap();
    let c = grammar.terminal("C").unwrap();

    let config = AnalyzerConfig::default();
    let keep = |tokens: &[Symbol]| tokens.len() < 2 || tokens[1] == c;
    let exploration = explore_with(&grammar, "S", 0, 4, &config, keep);
    insta::assert_snapshot!(render(&grammar, &exploration), @"[A C] Complete");
}

#[test]
fn path_budget_marks_exhaustion() {
    let grammar = Grammar::builder()
        .rule("S", alt([term("A"), term("B"), term("C")]))
        .rule("T", seq([rule("S"), rule("S")]))
        .build()
        .unwrap();

    let config = AnalyzerConfig::default().with_max_paths(3);
    let exploration = explore_with(&grammar, "T", 0, 2, &config, |_| true);
    insta::assert_snapshot!(render(&grammar, &exploration), @r"
    [A A] Complete
    [A B] Complete
    [A C] Complete
    exhausted
    ");
}
