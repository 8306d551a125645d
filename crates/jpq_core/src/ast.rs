//! AST definitions for dot-notation path expressions

/// A parsed path expression
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub segments: Vec<Segment>,
}

/// A segment in a path expression
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Field access: `.name` or `['name']`
    Field(String),
    /// Index access: `[0]` or `[-1]`
    Index(i64),
    /// Wildcard: `.*` or `[*]`
    Wildcard,
    /// Predicate filter: `findAll { expr }` or `name { expr }`
    Predicate(Expr),
    /// Aggregate function call: `size()`
    Function(Function),
}

/// Aggregate functions callable at the end of a segment chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    /// Element count of a sequence, key count of a mapping: `size()`
    Size,
}

/// An expression inside a predicate group
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// The element under test, alone: `it`
    Element,
    /// Field chain on the element under test: `it.price` or `price`
    Field(Vec<String>),
    /// Literal value
    Literal(Literal),
    /// Comparison expression: `it.price < 10`
    Comparison {
        left: Box<Expr>,
        op: CompOp,
        right: Box<Expr>,
    },
    /// Logical AND/OR expression: `it.a && it.b`
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    /// Logical NOT expression: `!it.archived`
    Not(Box<Expr>),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompOp {
    /// Equal: `==`
    Eq,
    /// Not equal: `!=`
    Ne,
    /// Less than: `<`
    Lt,
    /// Greater than: `>`
    Gt,
    /// Less than or equal: `<=`
    Le,
    /// Greater than or equal: `>=`
    Ge,
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// Logical AND: `&&`
    And,
    /// Logical OR: `||`
    Or,
}

/// Literal values in predicate expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer number
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// String value
    String(String),
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}
