//! Statement and expression AST nodes
//!
//! The tree the executor consumes. It is produced by an external parser (or
//! deserialized from JSON by the CLI); this crate never lexes source text.

use super::{Span, Spanned};
use serde::{Deserialize, Serialize};

/// Statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// `var name;` or `var name = init;`
    ///
    /// Function-scoped and hoisted: the binding exists (as undefined) for the
    /// whole enclosing function body, the initializer runs here.
    VarDecl {
        name: String,
        init: Option<Spanned<Expr>>,
    },

    /// Bare assignment, no declaration keyword: `name = expr;` or
    /// `obj.prop = expr;`. A name with no existing binding anywhere in the
    /// scope chain is created in the root scope (implicit global).
    Assign {
        target: AssignTarget,
        value: Spanned<Expr>,
    },

    /// Expression statement: `f();`
    Expr(Spanned<Expr>),

    /// `return;` or `return expr;`
    Return(Option<Spanned<Expr>>),

    /// `{ ... }` - statement grouping only, NOT a scope boundary
    /// (`var` is function-scoped)
    Block(Vec<Spanned<Stmt>>),

    /// `if (cond) then else alt`
    If {
        cond: Spanned<Expr>,
        then_branch: Box<Spanned<Stmt>>,
        else_branch: Option<Box<Spanned<Stmt>>>,
    },

    /// `while (cond) body`
    While {
        cond: Spanned<Expr>,
        body: Box<Spanned<Stmt>>,
    },
}

/// Left-hand side of a bare assignment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AssignTarget {
    /// `name = ...`
    Name(String),
    /// `obj.prop = ...`
    Property {
        object: Box<Spanned<Expr>>,
        name: String,
    },
}

/// Expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// Literal value
    Literal(Literal),

    /// Identifier reference, resolved through the scope chain
    Ident(String),

    /// `obj.prop` - yields undefined for a missing property, never an error
    Property {
        object: Box<Spanned<Expr>>,
        name: String,
    },

    /// `{ key: value, ... }`
    ObjectLit(Vec<(String, Spanned<Expr>)>),

    /// `function (params) { body }` - captures the defining environment
    Function {
        params: Vec<String>,
        body: Vec<Spanned<Stmt>>,
    },

    /// `callee(args)`
    Call {
        callee: Box<Spanned<Expr>>,
        args: Vec<Spanned<Expr>>,
    },

    /// `==`, `!=`, `===`, `!==`
    Compare {
        op: CmpOp,
        left: Box<Spanned<Expr>>,
        right: Box<Spanned<Expr>>,
    },
}

/// Literal value in source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Literal {
    Undefined,
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

/// Equality comparison kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    /// `==` - coercing
    LooseEq,
    /// `!=`
    LooseNe,
    /// `===` - same variant kind required
    StrictEq,
    /// `!==`
    StrictNe,
}

impl Stmt {
    /// Wrap without a source location (synthesized trees, tests)
    pub fn synthetic(self) -> Spanned<Stmt> {
        Spanned::new(self, Span::none())
    }
}

impl Expr {
    /// Wrap without a source location (synthesized trees, tests)
    pub fn synthetic(self) -> Spanned<Expr> {
        Spanned::new(self, Span::none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stmt_json_round_trip() {
        let stmt = Stmt::VarDecl {
            name: "x".to_string(),
            init: Some(Expr::Literal(Literal::Int(7)).synthetic()),
        };
        let json = serde_json::to_string(&stmt).unwrap();
        let back: Stmt = serde_json::from_str(&json).unwrap();
        match back {
            Stmt::VarDecl { name, init } => {
                assert_eq!(name, "x");
                assert!(init.is_some());
            }
            other => panic!("expected VarDecl, got {other:?}"),
        }
    }

    #[test]
    fn test_cmp_op_serializes_as_name() {
        let json = serde_json::to_string(&CmpOp::StrictEq).unwrap();
        assert_eq!(json, "\"StrictEq\"");
    }
}
