// SPDX-License-Identifier: MIT

//! Small helpers for composing JSONata expression text

use super::path::ToExpression;

/// `{% expr %}`, the template form node fields expect
pub fn template(expr: impl ToExpression) -> String {
    format!("{{% {} %}}", expr.to_expression())
}

/// `$map(arr, func)`
pub fn map(arr: impl ToExpression, func: impl ToExpression) -> String {
    format!("$map({}, {})", arr.to_expression(), func.to_expression())
}

/// `$exists(expr)`
pub fn exists(expr: impl ToExpression) -> String {
    format!("$exists({})", expr.to_expression())
}

/// `$exists(expr) ? expr : null`, for optional input fields
pub fn exists_or_null(expr: impl ToExpression) -> String {
    let expr = expr.to_expression();
    format!("$exists({}) ? {} : null", expr, expr)
}
