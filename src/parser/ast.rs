use std::collections::HashMap;

use serde_json::Value;

/// `==` and `!=`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
}

/// `and` binds tighter than `or`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// A filter, a function or a view helper, with its keyword arguments
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: HashMap<String, Expr>,
}

impl Call {
    /// A call without arguments, eg the `upper` in `name | upper`
    pub fn bare(name: &str) -> Call {
        Call { name: name.to_string(), args: HashMap::new() }
    }
}

/// Anything that can appear in `{{ }}`, as an argument or as a condition
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A string, number, boolean or `null` written in the template
    Literal(Value),
    Array(Vec<Expr>),
    /// A variable, dotted to reach inside it: `user.name`, `rows.0`
    Ident(String),
    Call(Call),
    /// `value | filter | filter(arg=..)`, never with an empty filter list
    Filtered { value: Box<Expr>, filters: Vec<Call> },
    Not(Box<Expr>),
    Compare { lhs: Box<Expr>, op: CompareOp, rhs: Box<Expr> },
    Logic { lhs: Box<Expr>, op: LogicOp, rhs: Box<Expr> },
}

impl Expr {
    /// The filters applied to this expression, in order
    pub fn filters(&self) -> &[Call] {
        match *self {
            Expr::Filtered { ref filters, .. } => filters.as_slice(),
            _ => &[],
        }
    }

    /// Which variable or call an expression reads from, for error messages
    pub fn source_name(&self) -> &str {
        match *self {
            Expr::Ident(ref name) | Expr::Call(Call { ref name, .. }) => name.as_str(),
            Expr::Filtered { ref value, .. } => value.source_name(),
            Expr::Array(_) => "an array literal",
            _ => "an expression",
        }
    }
}

/// `{% set key = value %}`
#[derive(Clone, Debug, PartialEq)]
pub struct Set {
    pub key: String,
    pub value: Expr,
}

/// `{% for value in container %}` or `{% for key, value in container %}`
#[derive(Clone, Debug, PartialEq)]
pub struct Loop {
    /// Only set when iterating on the entries of an object
    pub key: Option<String>,
    pub value: String,
    pub container: Expr,
    pub body: Vec<Node>,
}

/// `{% if %}`, its `elif` branches and the optional `else`
#[derive(Clone, Debug, PartialEq)]
pub struct Conditional {
    /// The `if` branch then every `elif`, tried in order
    pub branches: Vec<(Expr, Vec<Node>)>,
    pub otherwise: Option<Vec<Node>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Text(String),
    /// `{# #}`, kept in the tree but never rendered
    Comment(String),
    /// `{{ expr }}`
    Output(Expr),
    Set(Set),
    Loop(Loop),
    If(Conditional),
}
