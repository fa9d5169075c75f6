//! Expression nodes.

use serde::{Deserialize, Serialize};

use super::{Comment, Name, Query};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A possibly-dotted, possibly-quoted name; also covers `@vars`, `:params`
    /// and `$N` placeholders, whose lexemes are preserved verbatim.
    Identifier(Name),
    /// Any literal lexeme: strings, numbers, NULL, TRUE, CURRENT_TIMESTAMP.
    Literal(String),
    Star {
        qualifier: Option<Name>,
    },
    Binary {
        left: Box<Expr>,
        /// Uppercased for word operators (`AND`, `NOT IN`), verbatim for
        /// symbolic ones.
        op: String,
        right: Box<Expr>,
    },
    Unary {
        op: String,
        expr: Box<Expr>,
        /// `x IS NULL` and friends render after the operand.
        postfix: bool,
    },
    FunctionCall(Box<FunctionCall>),
    Case(Box<CaseExpr>),
    Cast {
        expr: Box<Expr>,
        ty: TypeName,
    },
    /// `expr::type`
    PgCast {
        expr: Box<Expr>,
        ty: TypeName,
    },
    Extract {
        field: String,
        expr: Box<Expr>,
    },
    Position {
        needle: Box<Expr>,
        haystack: Box<Expr>,
    },
    Substring {
        expr: Box<Expr>,
        from: Option<Box<Expr>>,
        for_: Option<Box<Expr>>,
    },
    Overlay {
        expr: Box<Expr>,
        placing: Box<Expr>,
        from: Box<Expr>,
        for_: Option<Box<Expr>>,
    },
    Trim {
        /// LEADING | TRAILING | BOTH, when present.
        spec: Option<String>,
        pattern: Option<Box<Expr>>,
        expr: Box<Expr>,
    },
    Subquery(Box<Query>),
    Paren(Box<Expr>),
    /// A parenthesized comma list: `IN (1, 2)`, row values `(a, b)`.
    Row(Vec<Expr>),
    ArraySubscript {
        expr: Box<Expr>,
        index: Box<Subscript>,
    },
    Collate {
        expr: Box<Expr>,
        collation: Name,
    },
    /// A fragment kept verbatim because no structured form exists for it.
    Raw(String),
}

impl Expr {
    pub fn binary(left: Expr, op: impl Into<String>, right: Expr) -> Expr {
        Expr::Binary {
            left: Box::new(left),
            op: op.into(),
            right: Box::new(right),
        }
    }
}

/// `a[1]` or `a[1:2]` slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    pub lower: Option<Expr>,
    pub upper: Option<Expr>,
    pub slice: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: Name,
    pub distinct: bool,
    pub args: Vec<Expr>,
    /// Aggregate-internal ORDER BY (`array_agg(x ORDER BY y)`).
    pub order_by: Vec<OrderItem>,
    /// MySQL `GROUP_CONCAT(... SEPARATOR 'x')`; the string lexeme.
    pub separator: Option<String>,
    pub within_group: Vec<OrderItem>,
    pub filter: Option<Box<Expr>>,
    pub over: Option<Over>,
}

impl FunctionCall {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            distinct: false,
            args: Vec::new(),
            order_by: Vec::new(),
            separator: None,
            within_group: Vec::new(),
            filter: None,
            over: None,
        }
    }
}

/// The windowing attachment of a function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Over {
    Name(String),
    Spec(WindowSpec),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WindowSpec {
    pub base: Option<String>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderItem>,
    pub frame: Option<WindowFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    /// ROWS | RANGE | GROUPS
    pub units: String,
    pub start: FrameBound,
    pub end: Option<FrameBound>,
    /// Trailing `EXCLUDE ...` fragment, captured verbatim.
    pub exclude: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameBound {
    CurrentRow,
    UnboundedPreceding,
    UnboundedFollowing,
    Preceding(Expr),
    Following(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseExpr {
    pub operand: Option<Expr>,
    pub branches: Vec<CaseWhen>,
    pub else_: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseWhen {
    pub condition: Expr,
    pub result: Expr,
}

/// A type specifier as it appears in CAST, `::` and column definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeName {
    /// The (possibly multi-word) base name, source-cased.
    pub name: String,
    /// Parenthesized parameters, verbatim, without the parens.
    pub params: Option<String>,
    /// `WITH TIME ZONE` and similar word suffixes.
    pub suffix: Option<String>,
    /// Number of `[]` array suffixes.
    pub array_dims: u8,
}

/// An expression in an ORDER BY-like position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub expr: Expr,
    pub direction: Option<OrderDirection>,
    pub nulls: Option<NullsOrder>,
    pub trailing_comment: Option<Comment>,
}

impl OrderItem {
    pub fn plain(expr: Expr) -> Self {
        Self {
            expr,
            direction: None,
            nulls: None,
            trailing_comment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDirection {
    Asc,
    Desc,
    Using(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullsOrder {
    First,
    Last,
}
