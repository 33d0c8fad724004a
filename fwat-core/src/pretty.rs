//! Canonical source rendering.
//!
//! Output of [`render`] parses back to the same tree for programs without
//! `case` expressions.
//!
//! Rendering recurses once per nesting level. Trees from
//! [`crate::parser::parse`] never exceed [`crate::limits::MAX_NESTING_DEPTH`];
//! hand-built trees nested far deeper can exhaust the stack.

use crate::ast::{CaseArm, Expr};

const INDENT: &str = "  ";

/// Render top-level expressions, separated by a blank line.
pub fn render(program: &[Expr]) -> String {
    program
        .iter()
        .map(render_expr)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Render one expression.
///
/// A declaration header is `name p1 p2 =` followed directly by a newline,
/// with no space after `=`, and the body indented one step below it.
pub fn render_expr(expr: &Expr) -> String {
    match expr {
        Expr::Number(value) => value.to_string(),
        Expr::Identifier(name) => name.clone(),
        Expr::Infix { op, left, right } => format!(
            "{} {} {}",
            render_expr(left),
            op.symbol(),
            render_expr(right)
        ),
        Expr::Assignment { name, params, body } => {
            let mut header = name.clone();
            for param in params {
                header.push(' ');
                header.push_str(param);
            }
            format!("{header} =\n{}", indent(&render_expr(body)))
        }
        Expr::Call { name, args } => {
            let mut parts = vec![name.clone()];
            parts.extend(args.iter().map(render_expr));
            parts.join(" ")
        }
        Expr::Case { scrutinee, arms } => {
            let arms = arms.iter().map(render_arm).collect::<Vec<_>>().join("\n");
            format!("case {} of\n{}", render_expr(scrutinee), indent(&arms))
        }
        Expr::BetweenParens(inner) => format!("({})", render_expr(inner)),
    }
}

fn render_arm(arm: &CaseArm) -> String {
    format!("{} -> {}", render_expr(&arm.pattern), render_expr(&arm.result))
}

/// Prefix every line of `block` with one indentation step.
fn indent(block: &str) -> String {
    block
        .lines()
        .map(|line| format!("{INDENT}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
