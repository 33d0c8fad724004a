//! Surface syntax tree.
//!
//! Nodes are built once by the parser and only read afterwards.

/// Binary arithmetic operators. All of them bind with the same strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn from_symbol(symbol: u8) -> Option<Self> {
        match symbol {
            b'+' => Some(Operator::Add),
            b'-' => Some(Operator::Subtract),
            b'*' => Some(Operator::Multiply),
            b'/' => Some(Operator::Divide),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

/// One arm of a `case` expression: `pattern -> result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseArm {
    pub pattern: Expr,
    pub result: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Identifier(String),
    Number(u32),
    Assignment {
        name: String,
        params: Vec<String>,
        body: Box<Expr>,
    },
    Infix {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    /// Arms are tried top to bottom; the parser never produces an empty list.
    Case {
        scrutinee: Box<Expr>,
        arms: Vec<CaseArm>,
    },
    BetweenParens(Box<Expr>),
}

impl Expr {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expr::Identifier(name.into())
    }

    pub fn infix(op: Operator, left: Expr, right: Expr) -> Self {
        Expr::Infix {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    #[cfg(test)]
    pub fn is_call(&self, name: &str) -> bool {
        matches!(self, Expr::Call { name: n, .. } if n == name)
    }
}
