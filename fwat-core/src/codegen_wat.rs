//! WebAssembly text-format backend.
//!
//! Every value is an `i32`. Declarations become exported functions whose
//! parameters are `i32` locals; all other expressions lower to folded
//! s-expression instructions, one form per line.
//!
//! `case` lowers to a chain of `if` blocks comparing the scrutinee with
//! each pattern in turn. The last arm is the fallback: its result is
//! emitted as the innermost `else` without another comparison, so every
//! `(if (result i32) ...)` has both branches.
//!
//! Apart from `case` arms, lowering recurses once per nesting level. Trees
//! from [`crate::parser::parse`] stay within
//! [`crate::limits::MAX_NESTING_DEPTH`]; hand-built trees nested far deeper
//! can exhaust the stack.

use crate::ast::{CaseArm, Expr, Operator};

/// Render a whole program as a `(module ...)`.
pub fn emit(program: &[Expr]) -> String {
    let mut writer = WatWriter::default();
    writer.open("(module");
    for expr in program {
        emit_into(expr, &mut writer);
    }
    writer.close();
    writer.finish()
}

/// Render a single expression without the module wrapper.
pub fn emit_expr(expr: &Expr) -> String {
    let mut writer = WatWriter::default();
    emit_into(expr, &mut writer);
    writer.finish()
}

fn instruction(op: Operator) -> &'static str {
    match op {
        Operator::Add => "i32.add",
        Operator::Subtract => "i32.sub",
        Operator::Multiply => "i32.mul",
        // Traps at run time on a zero divisor or i32::MIN / -1.
        Operator::Divide => "i32.div_s",
    }
}

fn emit_into(expr: &Expr, writer: &mut WatWriter) {
    match expr {
        Expr::Number(value) => writer.line(&format!("(i32.const {value})")),
        Expr::Identifier(name) => writer.line(&format!("(get_local ${name})")),
        Expr::Infix { op, left, right } => {
            writer.open(&format!("({}", instruction(*op)));
            emit_into(left, writer);
            emit_into(right, writer);
            writer.close();
        }
        Expr::Call { name, args } => {
            writer.open(&format!("(call ${name}"));
            for arg in args {
                emit_into(arg, writer);
            }
            writer.close();
        }
        Expr::BetweenParens(inner) => emit_into(inner, writer),
        Expr::Assignment { name, params, body } => {
            writer.line(&format!("(export \"{name}\" (func ${name}))"));
            let mut header = format!("(func ${name}");
            for param in params {
                header.push_str(&format!(" (param ${param} i32)"));
            }
            header.push_str(" (result i32)");
            writer.open(&header);
            writer.open("(return");
            emit_into(body, writer);
            writer.close();
            writer.close();
        }
        Expr::Case { scrutinee, arms } => emit_case(scrutinee, arms, writer),
    }
}

// Opens one `if`/`else` pair per tested arm, then closes them all, so the
// number of arms never adds to recursion depth.
fn emit_case(scrutinee: &Expr, arms: &[CaseArm], writer: &mut WatWriter) {
    let Some((fallback, tested)) = arms.split_last() else {
        writer.line("(unreachable)");
        return;
    };

    for arm in tested {
        writer.open("(if (result i32)");
        writer.open("(i32.eq");
        emit_into(scrutinee, writer);
        emit_into(&arm.pattern, writer);
        writer.close();
        writer.open("(then");
        emit_into(&arm.result, writer);
        writer.close();
        writer.open("(else");
    }
    emit_into(&fallback.result, writer);
    for _ in tested {
        writer.close(); // else
        writer.close(); // if
    }
}

/// Line-oriented output buffer that tracks s-expression nesting.
#[derive(Debug, Default)]
struct WatWriter {
    out: String,
    depth: usize,
}

impl WatWriter {
    fn line(&mut self, text: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line(")");
    }

    fn finish(self) -> String {
        self.out
    }
}
