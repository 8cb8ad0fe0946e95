use indoc::indoc;

use super::*;
use crate::grammar::{Grammar, alt, many, opt, rule, seq, term};
use crate::test_utils::{parse_prefix_dump, toks};

fn member_grammar() -> Grammar {
    Grammar::builder()
        .rule(
            "Member",
            alt([
                seq([term("Identifier")]),
                seq([term("Identifier"), term("Dot"), term("Identifier")]),
            ]),
        )
        .build()
        .unwrap()
}

fn dump(grammar: &Grammar) -> String {
    grammar.analyze(&AnalyzerConfig::default()).dump()
}

#[test]
fn shorter_branch_first_is_a_prefix_conflict() {
    let grammar = member_grammar();

    insta::assert_snapshot!(dump(&grammar), @"error: rule `Member` alternation #0: branch 0 [Identifier] is a prefix of branch 1 [Identifier Dot Identifier]");
}

#[test]
fn ordered_choice_takes_the_shadowing_branch() {
    let grammar = member_grammar();
    let tokens = toks(&["Identifier", "Dot", "Identifier"]);

    insta::assert_snapshot!(parse_prefix_dump(&grammar, "Member", &tokens), @r#"
    Member 0..1
      Identifier "identifier"
    end: 1
    "#);
}

#[test]
fn longer_branch_first_is_not_reported() {
    let grammar = Grammar::builder()
        .rule(
            "Member",
            alt([
                seq([term("Identifier"), term("Dot"), term("Identifier")]),
                seq([term("Identifier")]),
            ]),
        )
        .build()
        .unwrap();

    insta::assert_snapshot!(dump(&grammar), @"no defects");
}

#[test]
fn disjoint_branches_have_no_conflicts() {
    let grammar = Grammar::builder()
        .rule("Choice", alt([term("A"), term("B")]))
        .build()
        .unwrap();

    let report = grammar.validate().unwrap();
    assert!(report.conflicts.is_empty());
    assert_eq!(report.stats.alternations, 1);
    assert_eq!(report.stats.rounds, 1);
}

#[test]
fn identical_branches() {
    let grammar = Grammar::builder()
        .rule("Pair", alt([seq([term("A"), term("B")]), seq([term("A"), term("B")])]))
        .build()
        .unwrap();

    insta::assert_snapshot!(dump(&grammar), @"error: rule `Pair` alternation #0: branches 0 and 1 both match [A B]");
}

#[test]
fn optional_tail_makes_the_shorter_path_complete() {
    let grammar = Grammar::builder()
        .rule(
            "Access",
            alt([
                seq([term("Identifier"), opt(seq([term("Dot"), term("Identifier")]))]),
                seq([term("Identifier"), term("LParen"), term("RParen")]),
            ]),
        )
        .build()
        .unwrap();

    insta::assert_snapshot!(dump(&grammar), @"error: rule `Access` alternation #0: branch 0 [Identifier] is a prefix of branch 1 [Identifier LParen RParen]");
}

#[test]
fn conflicts_behind_rule_references() {
    let grammar = Grammar::builder()
        .rule("Statement", alt([rule("Call"), rule("Assign")]))
        .rule("Call", seq([rule("Name"), term("LParen"), term("RParen")]))
        .rule("Assign", seq([rule("Name"), term("LParen"), term("RParen"), term("Eq")]))
        .rule("Name", term("Identifier"))
        .build()
        .unwrap();

    insta::assert_snapshot!(dump(&grammar), @"error: rule `Statement` alternation #0: branch 0 [Identifier LParen RParen] is a prefix of branch 1 [Identifier LParen RParen Eq]");
}

#[test]
fn branches_the_lookahead_cannot_separate() {
    let grammar = Grammar::builder()
        .rule(
            "Long",
            alt([
                seq([term("A"), term("A"), term("A"), term("B")]),
                seq([term("A"), term("A"), term("A"), term("C")]),
            ]),
        )
        .build()
        .unwrap();

    let shallow = AnalyzerConfig::default().with_max_lookahead(3);
    insta::assert_snapshot!(grammar.analyze(&shallow).dump(), @"error: rule `Long` alternation #0: branches 0 and 1 both match [A A A]");
    assert!(grammar.analyze(&shallow.with_strict(false)).conflicts.is_empty());
    assert!(!grammar.analyze(&AnalyzerConfig::default()).has_errors());
}

#[test]
fn shared_prefix_longer_than_lookahead() {
    let grammar = Grammar::builder()
        .rule(
            "Long",
            alt([
                seq([term("A"), term("B"), term("C"), term("D"), term("E")]),
                seq([term("A"), term("B"), term("C"), term("D"), term("E"), term("F")]),
            ]),
        )
        .build()
        .unwrap();

    insta::assert_snapshot!(dump(&grammar), @"error: rule `Long` alternation #0: branches 0 and 1 both match [A B C D]");
    assert!(grammar.validate().is_err());

    let wide = AnalyzerConfig::default().with_max_lookahead(8);
    insta::assert_snapshot!(grammar.analyze(&wide).dump(), @"error: rule `Long` alternation #0: branch 0 [A B C D E] is a prefix of branch 1 [A B C D E F]");

    let tokens = toks(&["A", "B", "C", "D", "E", "F"]);
    insta::assert_snapshot!(parse_prefix_dump(&grammar, "Long", &tokens), @r#"
    Long 0..5
      A "a"
      B "b"
      C "c"
      D "d"
      E "e"
    end: 5
    "#);
}

#[test]
fn dangling_else_is_reported() {
    let grammar = Grammar::builder()
        .rule(
            "Stmt",
            alt([
                seq([
                    term("If"),
                    term("LParen"),
                    term("Identifier"),
                    term("RParen"),
                    rule("Stmt"),
                ]),
                seq([
                    term("If"),
                    term("LParen"),
                    term("Identifier"),
                    term("RParen"),
                    rule("Stmt"),
                    term("Else"),
                    rule("Stmt"),
                ]),
                term("Semi"),
            ]),
        )
        .build()
        .unwrap();

    let expected = indoc! {"
        error: rule `Stmt` alternation #0: branches 0 and 1 both match [If LParen Identifier RParen]
    "};
    for max_lookahead in [4, 8] {
        let config = AnalyzerConfig::default().with_max_lookahead(max_lookahead);
        assert_eq!(grammar.analyze(&config).dump(), expected, "lookahead {max_lookahead}");
    }
    assert!(grammar.validate().is_err());
}

#[test]
fn equal_cycle_cuts_are_identical() {
    let grammar = Grammar::builder()
        .rule("Nest", alt([seq([term("A"), rule("Nest")]), seq([term("A"), rule("Nest")])]))
        .build()
        .unwrap();

    insta::assert_snapshot!(dump(&grammar), @"error: rule `Nest` alternation #0: branches 0 and 1 both match [A]");

    let relaxed = AnalyzerConfig::default().with_strict(false);
    insta::assert_snapshot!(grammar.analyze(&relaxed).dump(), @"no defects");
}

#[test]
fn direct_left_recursion() {
    let grammar = Grammar::builder()
        .rule(
            "Sum",
            alt([seq([rule("Sum"), term("Plus"), term("Number")]), term("Number")]),
        )
        .build()
        .unwrap();

    insta::assert_snapshot!(dump(&grammar), @"error: left recursion: `Sum` -> `Sum`");
}

#[test]
fn indirect_left_recursion() {
    let grammar = Grammar::builder()
        .rule("A", seq([rule("B"), term("X")]))
        .rule("B", alt([seq([opt(term("Y")), rule("A")]), term("Z")]))
        .build()
        .unwrap();

    let report = grammar.analyze(&AnalyzerConfig::default());
    insta::assert_snapshot!(report.dump(), @"error: left recursion: `A` -> `B` -> `A`");
}

#[test]
fn right_recursion_is_fine() {
    let grammar = Grammar::builder()
        .rule("List", seq([term("Item"), opt(seq([term("Comma"), rule("List")]))]))
        .build()
        .unwrap();

    assert!(grammar.validate().is_ok());
}

#[test]
fn nullable_repetition() {
    let grammar = Grammar::builder()
        .rule("Items", many(opt(term("A"))))
        .rule("Wrapped", many(rule("Maybe")))
        .rule("Maybe", opt(term("B")))
        .build()
        .unwrap();

    insta::assert_snapshot!(dump(&grammar), @r"
    error: rule `Items` repeats an expression that matches empty input: (A?)*
    error: rule `Wrapped` repeats an expression that matches empty input: <Maybe>*
    ");
}

#[test]
fn exhausted_budget_is_a_warning() {
    let grammar = Grammar::builder()
        .rule(
            "Wide",
            alt([
                seq([many(alt([term("A"), term("B"), term("C")])), term("D")]),
                term("E"),
            ]),
        )
        .build()
        .unwrap();

    let config = AnalyzerConfig::default().with_max_paths(2);
    let report = grammar.validate_with(&config).unwrap();
    insta::assert_snapshot!(report.dump(), @"warning: rule `Wide` alternation #0 branch 0: path budget exhausted");
    assert_eq!(report.warning_count(), 1);
}

#[test]
fn validate_collects_every_defect() {
    let grammar = Grammar::builder()
        .rule(
            "Member",
            alt([
                seq([term("Identifier")]),
                seq([term("Identifier"), term("Dot"), term("Identifier")]),
            ]),
        )
        .rule("Sum", alt([seq([rule("Sum"), term("Plus")]), term("Number")]))
        .build()
        .unwrap();

    let err = grammar.validate().unwrap_err();
    insta::assert_snapshot!(err, @"grammar validation failed: 2 defect(s)");
    assert_eq!(err.report().conflicts.len(), 1);
    assert_eq!(err.report().left_recursion.len(), 1);

    let err: crate::Error = err.into();
    assert!(matches!(err, crate::Error::Validation(_)));
}

#[test]
fn report_serializes_to_json() {
    let report = member_grammar().analyze(&AnalyzerConfig::default());
    let json = report.to_json().unwrap();

    assert!(json.contains(r#""kind": "prefix""#));
    assert!(json.contains(r#""rule": "Member""#));
}

#[test]
fn model_inventories_alternations() {
    let grammar = Grammar::builder()
        .rule("Stmt", seq([alt([term("A"), term("B")]), opt(alt([term("C"), rule("Empty")]))]))
        .rule("Empty", opt(term("D")))
        .build()
        .unwrap();
    let model = grammar.model();

    let stmt = grammar.rule_id("Stmt").unwrap();
    let empty = grammar.rule_id("Empty").unwrap();
    let sites: Vec<_> = model
        .sites()
        .iter()
        .map(|site| (site.ordinal, site.path.clone(), site.branches))
        .collect();
    assert_eq!(sites, [(0, vec![0], 2), (1, vec![1, 0], 2)]);
    assert_eq!(model.sites_of(stmt).count(), 2);
    assert!(model.is_nullable(empty));
    assert!(!model.is_nullable(stmt));
    assert!(model.references(stmt).contains(&empty));
    assert!(model.left_calls(stmt).is_empty());
}
