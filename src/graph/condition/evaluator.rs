//! Condition evaluator
//!
//! Resolves structured conditions against a map of captured variables.
//! Only `$Name.field.field` references can be resolved; anything else,
//! including raw JSONata, evaluates to `None`.

use serde_json::{Map, Value};

use super::ast::{CompareOp, Condition, Literal};

/// Evaluate a condition against captured variables.
///
/// Returns `None` when the outcome depends on JSONata this module cannot
/// interpret.
pub fn evaluate(condition: &Condition, variables: &Map<String, Value>) -> Option<bool> {
    match condition {
        Condition::True => Some(true),
        Condition::False => Some(false),
        Condition::Jsonata(_) => None,
        Condition::Compare { left, op, right } => evaluate_compare(left, *op, right, variables),
        Condition::And(l, r) => match (evaluate(l, variables), evaluate(r, variables)) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        Condition::Or(l, r) => match (evaluate(l, variables), evaluate(r, variables)) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
        Condition::Not(inner) => evaluate(inner, variables).map(|b| !b),
    }
}

fn evaluate_compare(
    left: &str,
    op: CompareOp,
    right: &Literal,
    variables: &Map<String, Value>,
) -> Option<bool> {
    let parts = parse_reference(left)?;
    let left_value = lookup(&parts, variables);

    Some(match op {
        CompareOp::Eq => values_equal(left_value, right),
        CompareOp::NotEq => !values_equal(left_value, right),
        CompareOp::Gt => compare_numbers(left_value, right, |a, b| a > b),
        CompareOp::Gte => compare_numbers(left_value, right, |a, b| a >= b),
        CompareOp::Lt => compare_numbers(left_value, right, |a, b| a < b),
        CompareOp::Lte => compare_numbers(left_value, right, |a, b| a <= b),
        CompareOp::Contains => match (left_value, right) {
            (Some(Value::String(s)), Literal::String(substr)) => s.contains(substr.as_str()),
            _ => false,
        },
    })
}

/// Split `$Name.a.b` into `["Name", "a", "b"]`
fn parse_reference(expr: &str) -> Option<Vec<&str>> {
    let body = expr.trim().strip_prefix('$')?;
    let parts: Vec<&str> = body.split('.').collect();
    let valid = parts
        .iter()
        .all(|p| !p.is_empty() && p.chars().all(|c| c.is_alphanumeric() || c == '_'));
    valid.then_some(parts)
}

fn lookup<'a>(parts: &[&str], variables: &'a Map<String, Value>) -> Option<&'a Value> {
    let (first, rest) = parts.split_first()?;
    let mut current = variables.get(*first)?;
    for part in rest {
        current = current.get(*part)?;
    }
    Some(current)
}

fn values_equal(left: Option<&Value>, right: &Literal) -> bool {
    match (left, right) {
        (None, Literal::Null) => true,
        (None, _) => false,
        (Some(Value::Null), Literal::Null) => true,
        (Some(Value::String(s)), Literal::String(rs)) => s == rs,
        (Some(Value::Number(n)), Literal::Number(rn)) => n
            .as_f64()
            .map(|f| (f - rn).abs() < f64::EPSILON)
            .unwrap_or(false),
        (Some(Value::Bool(b)), Literal::Boolean(rb)) => b == rb,
        _ => false,
    }
}

fn compare_numbers<F>(left: Option<&Value>, right: &Literal, cmp: F) -> bool
where
    F: Fn(f64, f64) -> bool,
{
    match (left, right) {
        (Some(Value::Number(n)), Literal::Number(rn)) => {
            n.as_f64().map(|f| cmp(f, *rn)).unwrap_or(false)
        }
        _ => false,
    }
}
