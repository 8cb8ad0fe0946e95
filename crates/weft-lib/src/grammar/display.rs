//! EBNF-like rendering of rule bodies.
//!
//! Terminals print bare, rule references as `<Name>`, alternation with `|`,
//! and `?`/`*` as postfix operators. Parentheses appear only where needed to
//! keep the structure unambiguous.

use std::fmt::{self, Display, Formatter};

use super::{Expr, Grammar};

/// Display adapter for an [`Expr`] of a specific grammar.
pub struct ExprDisplay<'g> {
    grammar: &'g Grammar,
    expr: &'g Expr,
}

impl<'g> ExprDisplay<'g> {
    pub(crate) fn new(grammar: &'g Grammar, expr: &'g Expr) -> Self {
        Self { grammar, expr }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Position {
    Top,
    SeqItem,
    AltBranch,
    Postfix,
}

impl Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_expr(f, self.grammar, self.expr, Position::Top)
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{} = {}", rule.name(), self.display(rule.body()))?;
        }
        Ok(())
    }
}

fn write_expr(f: &mut Formatter<'_>, g: &Grammar, expr: &Expr, pos: Position) -> fmt::Result {
    match expr {
        Expr::Term(sym) => f.write_str(g.terminal_name(*sym)),
        Expr::Ref(id) => write!(f, "<{}>", g.get(*id).name()),
        Expr::Opt(inner) => {
            write_operand(f, g, inner)?;
            f.write_str("?")
        }
        Expr::Many(inner) => {
            write_operand(f, g, inner)?;
            f.write_str("*")
        }
        Expr::Seq(items) => match items.as_slice() {
            [] => f.write_str("()"),
            [only] => write_expr(f, g, only, pos),
            _ => {
                let grouped = matches!(pos, Position::SeqItem | Position::Postfix);
                write_joined(f, g, items, " ", Position::SeqItem, grouped)
            }
        },
        Expr::Alt(branches) => match branches.as_slice() {
            [] => f.write_str("[]"),
            [only] => write_expr(f, g, only, pos),
            _ => {
                let grouped = pos != Position::Top;
                write_joined(f, g, branches, " | ", Position::AltBranch, grouped)
            }
        },
    }
}

fn write_operand(f: &mut Formatter<'_>, g: &Grammar, inner: &Expr) -> fmt::Result {
    if matches!(inner, Expr::Opt(_) | Expr::Many(_)) {
        f.write_str("(")?;
        write_expr(f, g, inner, Position::Top)?;
        return f.write_str(")");
    }
    write_expr(f, g, inner, Position::Postfix)
}

fn write_joined(
    f: &mut Formatter<'_>,
    g: &Grammar,
    items: &[Expr],
    sep: &str,
    pos: Position,
    grouped: bool,
) -> fmt::Result {
    if grouped {
        f.write_str("(")?;
    }
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write_expr(f, g, item, pos)?;
    }
    if grouped {
        f.write_str(")")?;
    }
    Ok(())
}
