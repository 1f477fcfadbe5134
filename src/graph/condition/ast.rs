// SPDX-License-Identifier: MIT

//! Abstract Syntax Tree for choice conditions

use std::fmt;

use crate::jsonata::ToExpression;

/// A choice rule predicate
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Comparison expression: left op right
    Compare {
        left: String,
        op: CompareOp,
        right: Literal,
    },
    /// Logical AND
    And(Box<Condition>, Box<Condition>),
    /// Logical OR
    Or(Box<Condition>, Box<Condition>),
    /// Logical NOT
    Not(Box<Condition>),
    /// Literal true
    True,
    /// Literal false
    False,
    /// Hand-written JSONata, passed through untouched
    Jsonata(String),
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// =
    Eq,
    /// !=
    NotEq,
    /// >
    Gt,
    /// >=
    Gte,
    /// <
    Lt,
    /// <=
    Lte,
    /// $contains (strings only)
    Contains,
}

/// Literal values in expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
}

impl Condition {
    /// `left = right`
    pub fn equals(left: impl ToExpression, right: impl Into<Literal>) -> Self {
        Self::compare(left, CompareOp::Eq, right)
    }

    /// `left != right`
    pub fn not_equals(left: impl ToExpression, right: impl Into<Literal>) -> Self {
        Self::compare(left, CompareOp::NotEq, right)
    }

    /// `$contains(left, right)`
    pub fn contains(left: impl ToExpression, right: impl Into<String>) -> Self {
        Self::compare(left, CompareOp::Contains, Literal::String(right.into()))
    }

    pub fn compare(left: impl ToExpression, op: CompareOp, right: impl Into<Literal>) -> Self {
        Self::Compare {
            left: left.to_expression(),
            op,
            right: right.into(),
        }
    }

    pub fn and(self, other: Condition) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Condition) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Raw JSONata, with or without the `{% %}` delimiters
    pub fn jsonata(expr: impl Into<String>) -> Self {
        Self::Jsonata(expr.into())
    }

    /// Render as a bare JSONata expression
    pub fn expression(&self) -> String {
        match self {
            Condition::Compare {
                left,
                op: CompareOp::Contains,
                right,
            } => format!("$contains({}, {})", left, right),
            Condition::Compare { left, op, right } => format!("{} {} {}", left, op, right),
            Condition::And(l, r) => format!("({}) and ({})", l.expression(), r.expression()),
            Condition::Or(l, r) => format!("({}) or ({})", l.expression(), r.expression()),
            Condition::Not(inner) => format!("$not({})", inner.expression()),
            Condition::True => "true".to_string(),
            Condition::False => "false".to_string(),
            Condition::Jsonata(raw) => strip_template(raw).to_string(),
        }
    }

    /// Render in `{% ... %}` form, as the `Condition` field of a choice rule
    pub fn to_template(&self) -> String {
        format!("{{% {} %}}", self.expression())
    }
}

fn strip_template(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("{%")
        .and_then(|s| s.strip_suffix("%}"))
        .map(str::trim)
        .unwrap_or(trimmed)
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareOp::Eq => write!(f, "="),
            CompareOp::NotEq => write!(f, "!="),
            CompareOp::Gt => write!(f, ">"),
            CompareOp::Gte => write!(f, ">="),
            CompareOp::Lt => write!(f, "<"),
            CompareOp::Lte => write!(f, "<="),
            CompareOp::Contains => write!(f, "$contains"),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // JSON string escaping is valid JSONata string syntax
            Literal::String(s) => write!(f, "{}", serde_json::Value::from(s.as_str())),
            // f64 Display prints whole numbers without a fraction or exponent
            Literal::Number(n) => write!(f, "{}", n),
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Null => write!(f, "null"),
        }
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Number(n)
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Number(n as f64)
    }
}

impl From<bool> for Literal {
    fn from(b: bool) -> Self {
        Literal::Boolean(b)
    }
}
