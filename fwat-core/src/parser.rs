//! Ordered-choice parser working directly on source text.
//!
//! Every expression is parsed by trying a fixed list of alternatives in
//! order and keeping the first that succeeds. A failed alternative rewinds
//! the cursor to where it started, so later alternatives see the same
//! input. The order matters: a name followed by more input could be an
//! infix operand, a declaration, a call or a plain identifier, and only
//! the order below decides which one wins.
//!
//!   expression := parenthesized | case | infix | number
//!               | declaration | call | identifier
//!
//! Two whitespace classes are used. *Inline* whitespace (spaces, tabs)
//! separates the pieces of a single line: operands, operators, parameters
//! and call arguments. *Layout* whitespace also admits line breaks and is
//! accepted after `=`, around `case` arms, inside parentheses and between
//! top-level expressions.

use std::collections::BTreeSet;

use crate::ast::{CaseArm, Expr, Operator};
use crate::error::ParseError;
use crate::limits::MAX_NESTING_DEPTH;
use crate::span::Location;

const EXPECT_LPAREN: &str = "\"(\"";
const EXPECT_RPAREN: &str = "\")\"";
const EXPECT_CASE: &str = "\"case\"";
const EXPECT_OF: &str = "\"of\"";
const EXPECT_ARROW: &str = "\"->\"";
const EXPECT_EQUAL: &str = "\"=\"";
const EXPECT_DIGIT: &str = "digit";
const EXPECT_LETTER: &str = "letter";
const EXPECT_OPERATOR: &str = "operator";
const EXPECT_WHITESPACE: &str = "whitespace";
const EXPECT_EOF: &str = "end of input";

/// Parse a whole source text into its top-level expressions.
///
/// Either the entire input is consumed or an error is returned; no
/// partial tree is ever handed back.
pub fn parse(source: &str) -> Result<Vec<Expr>, ParseError> {
    let parser = Parser {
        source,
        chars: source.as_bytes(),
        len: source.len(),
        index: 0,
        depth: 0,
        farthest: 0,
        expected: BTreeSet::new(),
        fatal: None,
    };
    parser.run()
}

struct Parser<'src> {
    source: &'src str,
    chars: &'src [u8],
    len: usize,
    index: usize,
    depth: usize,
    /// Farthest offset at which an alternative failed, and what it wanted there.
    farthest: usize,
    expected: BTreeSet<&'static str>,
    /// Set once an error occurs that no alternative can recover from.
    fatal: Option<ParseError>,
}

impl<'src> Parser<'src> {
    fn run(mut self) -> Result<Vec<Expr>, ParseError> {
        self.skip_layout();
        let mut program = Vec::new();
        while let Some(expr) = self.attempt(Self::expression) {
            program.push(expr);
            if !self.layout_gap() {
                break;
            }
        }

        if let Some(err) = self.fatal.take() {
            return Err(err);
        }
        if program.is_empty() || self.index < self.len {
            if !program.is_empty() {
                self.expect(EXPECT_EOF);
            }
            return Err(self.unexpected());
        }
        Ok(program)
    }

    /// Run `rule`, rewinding the cursor if it does not match.
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let start = self.index;
        let result = rule(self);
        if result.is_none() {
            self.index = start;
        }
        result
    }

    fn expression(&mut self) -> Option<Expr> {
        if self.fatal.is_some() {
            return None;
        }
        if self.depth >= MAX_NESTING_DEPTH {
            self.fail(ParseError::NestingTooDeep {
                location: self.locate(self.index),
                limit: MAX_NESTING_DEPTH,
            });
            return None;
        }

        self.depth += 1;
        let expr = self
            .attempt(Self::parenthesized)
            .or_else(|| self.attempt(Self::case))
            .or_else(|| self.attempt(Self::infix))
            .or_else(|| self.attempt(Self::number))
            .or_else(|| self.attempt(Self::declaration))
            .or_else(|| self.attempt(Self::call))
            .or_else(|| self.attempt(Self::identifier));
        self.depth -= 1;
        expr
    }

    fn parenthesized(&mut self) -> Option<Expr> {
        if !self.symbol(b'(', EXPECT_LPAREN) {
            return None;
        }
        self.skip_layout();
        let inner = self.expression()?;
        self.skip_layout();
        if !self.symbol(b')', EXPECT_RPAREN) {
            return None;
        }
        Some(Expr::BetweenParens(Box::new(inner)))
    }

    // case <identifier> of <arm>+
    fn case(&mut self) -> Option<Expr> {
        if !self.keyword("case", EXPECT_CASE) || !self.layout_gap() {
            return None;
        }
        let scrutinee = self.identifier()?;
        if !self.layout_gap() || !self.keyword("of", EXPECT_OF) || !self.layout_gap() {
            return None;
        }

        let mut arms = vec![self.case_arm()?];
        while let Some(arm) = self.attempt(|p| {
            if !p.layout_gap() {
                return None;
            }
            p.case_arm()
        }) {
            arms.push(arm);
        }
        Some(Expr::Case {
            scrutinee: Box::new(scrutinee),
            arms,
        })
    }

    fn case_arm(&mut self) -> Option<CaseArm> {
        let pattern = self.operand()?;
        self.skip_inline();
        if !self.literal("->", EXPECT_ARROW) {
            return None;
        }
        self.skip_layout();
        let result = self.expression()?;
        Some(CaseArm { pattern, result })
    }

    // The left side is a single operand and the right side a whole
    // expression, so `a - b - c` groups as `a - (b - c)`.
    fn infix(&mut self) -> Option<Expr> {
        let left = self.operand()?;
        self.skip_inline();
        let op = self.operator()?;
        self.skip_inline();
        let right = self.expression()?;
        Some(Expr::infix(op, left, right))
    }

    fn operand(&mut self) -> Option<Expr> {
        self.attempt(Self::number)
            .or_else(|| self.attempt(Self::identifier))
    }

    fn operator(&mut self) -> Option<Operator> {
        match self.peek_char().and_then(Operator::from_symbol) {
            Some(op) => {
                self.consume_char();
                Some(op)
            }
            None => {
                self.expect(EXPECT_OPERATOR);
                None
            }
        }
    }

    fn number(&mut self) -> Option<Expr> {
        let start = self.index;
        while self.peek_char().is_some_and(|ch| ch.is_ascii_digit()) {
            self.consume_char();
        }
        if self.index == start {
            self.expect(EXPECT_DIGIT);
            return None;
        }

        match self.source[start..self.index].parse::<u32>() {
            Ok(value) => Some(Expr::Number(value)),
            Err(_) => {
                self.fail(ParseError::LiteralOutOfRange {
                    location: self.locate(start),
                });
                None
            }
        }
    }

    // <name> <param>* = <expression>
    fn declaration(&mut self) -> Option<Expr> {
        let name = self.name()?;
        self.skip_inline();
        let mut params = Vec::new();
        while let Some(param) = self.attempt(|p| {
            let param = p.name()?;
            p.skip_inline();
            Some(param)
        }) {
            params.push(param);
        }
        if !self.symbol(b'=', EXPECT_EQUAL) {
            return None;
        }
        self.skip_layout();
        let body = self.expression()?;
        Some(Expr::Assignment {
            name,
            params,
            body: Box::new(body),
        })
    }

    fn call(&mut self) -> Option<Expr> {
        let name = self.name()?;
        let mut args = vec![self.call_argument()?];
        while let Some(arg) = self.attempt(Self::call_argument) {
            args.push(arg);
        }
        Some(Expr::Call { name, args })
    }

    // Arguments never start another bare call: `f a b` is `f` applied to
    // `a` and `b`. Nested calls must be parenthesised.
    fn call_argument(&mut self) -> Option<Expr> {
        if !self.inline_gap() {
            return None;
        }
        self.attempt(Self::parenthesized)
            .or_else(|| self.attempt(Self::infix))
            .or_else(|| self.attempt(Self::number))
            .or_else(|| self.attempt(Self::identifier))
    }

    fn identifier(&mut self) -> Option<Expr> {
        self.name().map(Expr::Identifier)
    }

    fn name(&mut self) -> Option<String> {
        let start = self.index;
        while self.peek_char().is_some_and(|ch| ch.is_ascii_alphabetic()) {
            self.consume_char();
        }
        if self.index == start {
            self.expect(EXPECT_LETTER);
            return None;
        }
        Some(self.source[start..self.index].to_string())
    }

    fn keyword(&mut self, word: &str, label: &'static str) -> bool {
        let rest = &self.chars[self.index..];
        let ends_word = !rest
            .get(word.len())
            .is_some_and(|ch| ch.is_ascii_alphabetic());
        if rest.starts_with(word.as_bytes()) && ends_word {
            self.index += word.len();
            true
        } else {
            self.expect(label);
            false
        }
    }

    fn literal(&mut self, text: &str, label: &'static str) -> bool {
        if self.chars[self.index..].starts_with(text.as_bytes()) {
            self.index += text.len();
            true
        } else {
            self.expect(label);
            false
        }
    }

    fn symbol(&mut self, ch: u8, label: &'static str) -> bool {
        if self.peek_char() == Some(ch) {
            self.consume_char();
            true
        } else {
            self.expect(label);
            false
        }
    }

    fn skip_inline(&mut self) {
        while self.peek_char().is_some_and(is_inline_space) {
            self.consume_char();
        }
    }

    fn skip_layout(&mut self) {
        while self.peek_char().is_some_and(is_layout_space) {
            self.consume_char();
        }
    }

    fn inline_gap(&mut self) -> bool {
        let start = self.index;
        self.skip_inline();
        self.require_gap(start)
    }

    fn layout_gap(&mut self) -> bool {
        let start = self.index;
        self.skip_layout();
        self.require_gap(start)
    }

    fn require_gap(&mut self, start: usize) -> bool {
        if self.index == start {
            self.expect(EXPECT_WHITESPACE);
            false
        } else {
            true
        }
    }

    /// Record that `label` would have been accepted at the cursor.
    fn expect(&mut self, label: &'static str) {
        if self.index > self.farthest {
            self.farthest = self.index;
            self.expected.clear();
        }
        if self.index == self.farthest {
            self.expected.insert(label);
        }
    }

    fn fail(&mut self, err: ParseError) {
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
    }

    fn unexpected(&mut self) -> ParseError {
        ParseError::Unexpected {
            location: self.locate(self.farthest),
            expected: std::mem::take(&mut self.expected),
        }
    }

    fn locate(&self, offset: usize) -> Location {
        Location::locate(self.source, offset)
    }

    fn peek_char(&self) -> Option<u8> {
        self.chars.get(self.index).copied()
    }

    fn consume_char(&mut self) {
        if self.index < self.len {
            self.index += 1;
        }
    }
}

fn is_inline_space(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t')
}

fn is_layout_space(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> Expr {
        Expr::identifier(name)
    }

    fn single(source: &str) -> Expr {
        let mut program = parse(source).expect("parse");
        assert_eq!(program.len(), 1, "expected one top-level expression");
        program.remove(0)
    }

    #[test]
    fn parses_numbers_ignoring_leading_zeros() {
        assert_eq!(single("007"), Expr::Number(7));
        assert_eq!(single("0"), Expr::Number(0));
        assert_eq!(single("4294967295"), Expr::Number(u32::MAX));
    }

    #[test]
    fn parses_simple_infix() {
        assert_eq!(
            single("a + b"),
            Expr::infix(Operator::Add, ident("a"), ident("b"))
        );
        assert_eq!(
            single("6/3"),
            Expr::infix(Operator::Divide, Expr::Number(6), Expr::Number(3))
        );
    }

    #[test]
    fn infix_chains_are_right_associative() {
        assert_eq!(
            single("1 + 2 + 3"),
            Expr::infix(
                Operator::Add,
                Expr::Number(1),
                Expr::infix(Operator::Add, Expr::Number(2), Expr::Number(3)),
            )
        );
    }

    #[test]
    fn operators_share_one_precedence_level() {
        assert_eq!(
            single("a * b - c"),
            Expr::infix(
                Operator::Multiply,
                ident("a"),
                Expr::infix(Operator::Subtract, ident("b"), ident("c")),
            )
        );
    }

    #[test]
    fn parses_declaration_with_params() {
        assert_eq!(
            single("add a b =\n  a + b"),
            Expr::Assignment {
                name: "add".to_string(),
                params: vec!["a".to_string(), "b".to_string()],
                body: Box::new(Expr::infix(Operator::Add, ident("a"), ident("b"))),
            }
        );
    }

    #[test]
    fn parses_declaration_without_params() {
        assert_eq!(
            single("answer = 42"),
            Expr::Assignment {
                name: "answer".to_string(),
                params: vec![],
                body: Box::new(Expr::Number(42)),
            }
        );
    }

    #[test]
    fn call_arguments_are_separate_operands() {
        assert_eq!(
            single("add a b"),
            Expr::Call {
                name: "add".to_string(),
                args: vec![ident("a"), ident("b")],
            }
        );
        assert_eq!(
            single("add 1 2"),
            Expr::Call {
                name: "add".to_string(),
                args: vec![Expr::Number(1), Expr::Number(2)],
            }
        );
    }

    #[test]
    fn call_argument_may_be_infix_or_parenthesised() {
        assert_eq!(
            single("f (g x) y + 1"),
            Expr::Call {
                name: "f".to_string(),
                args: vec![
                    Expr::BetweenParens(Box::new(Expr::Call {
                        name: "g".to_string(),
                        args: vec![ident("x")],
                    })),
                    Expr::infix(Operator::Add, ident("y"), Expr::Number(1)),
                ],
            }
        );
    }

    #[test]
    fn bare_name_is_an_identifier() {
        assert_eq!(single("x"), ident("x"));
        assert_eq!(single("  x \n"), ident("x"));
    }

    #[test]
    fn parentheses_are_kept_in_the_tree() {
        assert_eq!(
            single("(1 + 2)"),
            Expr::BetweenParens(Box::new(Expr::infix(
                Operator::Add,
                Expr::Number(1),
                Expr::Number(2),
            )))
        );
    }

    #[test]
    fn parses_case_arms_in_order() {
        let expr = single("f x = case x of\n  1 -> 2\n  2 -> 3");
        let Expr::Assignment { body, .. } = expr else {
            panic!("expected an assignment");
        };
        assert_eq!(
            *body,
            Expr::Case {
                scrutinee: Box::new(ident("x")),
                arms: vec![
                    CaseArm {
                        pattern: Expr::Number(1),
                        result: Expr::Number(2),
                    },
                    CaseArm {
                        pattern: Expr::Number(2),
                        result: Expr::Number(3),
                    },
                ],
            }
        );
    }

    #[test]
    fn case_arm_results_may_be_calls() {
        let expr = single("case n of\n  0 -> one\n  m -> mul n (fact (n - 1))");
        let Expr::Case { arms, .. } = expr else {
            panic!("expected a case");
        };
        assert_eq!(arms.len(), 2);
        assert_eq!(arms[0].result, ident("one"));
        assert!(arms[1].result.is_call("mul"));
        assert_eq!(arms[1].pattern, ident("m"));
    }

    #[test]
    fn keeps_declarations_on_separate_lines_apart() {
        let program = parse("add a b =\n  a + b\n\nmain =\n  add 1 2").expect("parse");
        assert_eq!(program.len(), 2);
        assert!(matches!(&program[0], Expr::Assignment { name, .. } if name == "add"));
        let Expr::Assignment { name, body, .. } = &program[1] else {
            panic!("expected an assignment");
        };
        assert_eq!(name, "main");
        assert!(body.is_call("add"));
    }

    #[test]
    fn case_ends_before_the_next_declaration() {
        let program = parse("f x = case x of\n  1 -> 2\n\ng = 3").expect("parse");
        assert_eq!(program.len(), 2);
        let Expr::Assignment { body, .. } = &program[0] else {
            panic!("expected an assignment");
        };
        assert!(matches!(body.as_ref(), Expr::Case { arms, .. } if arms.len() == 1));
    }

    #[test]
    fn missing_body_fails_at_end_of_input() {
        let err = parse("f x = ").unwrap_err();
        assert_eq!(err.position(), 6);
        let ParseError::Unexpected { expected, .. } = err else {
            panic!("unexpected error kind");
        };
        assert!(expected.contains(EXPECT_DIGIT));
        assert!(expected.contains(EXPECT_LETTER));
        assert!(expected.contains(EXPECT_LPAREN));
    }

    #[test]
    fn unclosed_parenthesis_expects_closer() {
        let err = parse("(1").unwrap_err();
        assert_eq!(err.position(), 2);
        let ParseError::Unexpected { expected, .. } = err else {
            panic!("unexpected error kind");
        };
        assert!(expected.contains(EXPECT_RPAREN));
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse("   ").unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { .. }));
    }

    #[test]
    fn rejects_trailing_garbage() {
        let err = parse("1 + 2 )").unwrap_err();
        assert_eq!(err.position(), 6);
        let ParseError::Unexpected { expected, .. } = err else {
            panic!("unexpected error kind");
        };
        assert!(expected.contains(EXPECT_EOF));
    }

    #[test]
    fn top_level_expressions_need_separating_whitespace() {
        assert_eq!(parse("a(b)").unwrap_err().position(), 1);
        assert_eq!(parse("1(2)").unwrap_err().position(), 1);
        let err = parse("f x = 1(2)").unwrap_err();
        assert_eq!(err.position(), 7);
        let ParseError::Unexpected { expected, .. } = err else {
            panic!("unexpected error kind");
        };
        assert!(expected.contains(EXPECT_WHITESPACE));
        assert!(expected.contains(EXPECT_EOF));
        assert_eq!(parse("a (b)").map(|program| program.len()), Ok(2));
    }

    #[test]
    fn rejects_identifiers_with_digits_or_underscores() {
        assert!(parse("foo_bar").is_err());
        assert!(parse("x1 = 2").is_err());
    }

    #[test]
    fn rejects_literals_wider_than_32_bits() {
        let err = parse("4294967296").unwrap_err();
        assert!(matches!(err, ParseError::LiteralOutOfRange { .. }));
        assert_eq!(err.position(), 0);
    }

    #[test]
    fn rejects_excessive_nesting() {
        let depth = MAX_NESTING_DEPTH + 10;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let err = parse(&source).unwrap_err();
        assert!(matches!(
            err,
            ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                ..
            }
        ));
    }

    #[test]
    fn accepts_nesting_within_the_limit() {
        let depth = MAX_NESTING_DEPTH - 1;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        assert!(parse(&source).is_ok());
    }
}
