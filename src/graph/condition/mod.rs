// SPDX-License-Identifier: MIT

//! Choice rule conditions
//!
//! Conditions are built as a small AST and rendered to JSONata for the
//! `Condition` field of a choice rule, e.g. `{% $RequestType = "Create" %}`.
//! The evaluator resolves them against captured variables so dispatch can be
//! probed without running the graph.

mod ast;
mod evaluator;

pub use ast::{CompareOp, Condition, Literal};
pub use evaluator::evaluate;
