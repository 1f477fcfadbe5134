// SPDX-License-Identifier: MIT

//! State graph construction
//!
//! A small arena-based model of JSONata-mode state machines: pass, choice,
//! task and fail states, fragments with one entry and many exits, and
//! rendering to a definition document.

pub mod condition;
pub mod definition;
mod fragment;
mod state;
mod state_graph;

pub use condition::{CompareOp, Condition, Literal};
pub use fragment::{Chainable, Fragment, StateId};
pub use state::{
    Catch, CatchProps, Choice, ChoiceRule, Fail, Pass, Selection, State, StateKind, Task,
    ERRORS_ALL,
};
pub use state_graph::StateGraph;
