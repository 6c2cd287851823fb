use serde::Serialize;

use crate::token::Token;
use crate::value::Value;

/// **Abstract‑Syntax‑Tree node** for every kind of *expression*.  Lifetime
/// `'a` ties nodes that reference tokens back to the token slice the
/// [`Parser`](crate::parser::Parser) was built over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr<'a> {
    /// A literal constant: number, string, `true`, `false`, or `null`.
    Literal(Value),

    /// Parenthesised sub‑expression: `"(" expression ")"`.
    Grouping(Box<Expr<'a>>),

    /// Prefix unary operator expression
    /// *Example:* `!isReady` or `-42`
    Unary {
        /// The operator token (`!` or `-`).
        operator: &'a Token<'a>,
        right: Box<Expr<'a>>,
    },

    /// Infix binary operator expression
    /// *Example:* `a + b`, `x <= y`
    Binary {
        left: Box<Expr<'a>>,
        operator: &'a Token<'a>,
        right: Box<Expr<'a>>,
    },

    /// Short‑circuiting logical operators `and` / `or`.
    Logical {
        left: Box<Expr<'a>>,
        operator: &'a Token<'a>, // `AND` or `OR`
        right: Box<Expr<'a>>,
    },

    /// Variable access.
    Variable(&'a Token<'a>),

    /// Assignment expression: `identifier "=" expression`
    Assign {
        name: &'a Token<'a>,
        value: Box<Expr<'a>>,
    },
}
