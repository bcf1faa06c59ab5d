use std::rc::Rc;

use crate::diagnostic::Span;

/// The four arithmetic operations, each tied to its own sentence template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

/// The expression sub-grammar: a literal, a variable reference, or a
/// function call. No infix operators exist; all arithmetic goes through
/// the arithmetic sentence templates.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Number(i64),
    Ident(Rc<str>),
    Call { name: Rc<str>, args: Vec<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `<ident> は <expr> とする。`
    Assign { name: Rc<str>, value: Expr },
    /// `<expr> を出力する。`
    Output { value: Expr },
    /// The four arithmetic templates, e.g. `<x> に <y> を加えた数を <z> とする。`
    Arith {
        left: Expr,
        right: Expr,
        op: BinaryOp,
        target: Rc<str>,
    },
    /// `<expr> 回、以下を行う。 … 以上。`
    Loop { count: Expr, body: Vec<Stmt> },
    /// `<ident>(<params>) を定義する。 … 以上。`
    FunctionDef {
        name: Rc<str>,
        params: Vec<Rc<str>>,
        body: Vec<Stmt>,
    },
    /// A call sentence: `<ident>(<args>)。`
    Call(Expr),
    /// `もし <expr> が 0 なら[ば]、以下を行う。 … 以上。` with an
    /// optional `そうでなければ` branch. The comparison target is fixed
    /// to the literal zero; `negated` records a trailing でなければ.
    Conditional {
        condition: Expr,
        compares_to_zero: bool,
        negated: bool,
        then_body: Vec<Stmt>,
        else_body: Option<Vec<Stmt>>,
    },
    /// `<expr>（以下「<ident>」という。）` — assignment in contract clothing.
    Alias { value: Expr, name: Rc<str> },
}

/// A defined function: parameter names plus the body statements. Stored
/// behind `Rc` in the function table so recursive calls can hold on to the
/// definition while the table stays mutable.
#[derive(Debug, Clone)]
pub struct Function {
    pub params: Vec<Rc<str>>,
    pub body: Vec<Stmt>,
}
