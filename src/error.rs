// SPDX-License-Identifier: MIT

//! Typed error handling for lambdaless-flow
//!
//! Path building is total and never fails. Everything that can go wrong
//! happens while a graph is being assembled, and surfaces here.

use thiserror::Error;

/// Top-level error type for lambdaless-flow
#[derive(Debug, Error)]
pub enum FlowError {
    /// The caller wired something that can never produce a usable graph
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Structural violation while building the state graph
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

/// Errors raised by the state graph arena
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// Two states in one graph share a name
    #[error("State name '{0}' is already in use")]
    DuplicateStateName(String),

    /// A transition was set on a state that already has one
    #[error("State '{0}' already has a next state")]
    AlreadyHasNext(String),

    /// Fail and Choice states cannot be followed by `next`
    #[error("State '{0}' cannot have a next state")]
    NotNextable(String),

    /// A choice-only operation was applied to another state kind
    #[error("State '{0}' is not a Choice state")]
    NotAChoice(String),

    /// Catchers can only be attached to task states
    #[error("State '{0}' does not support error catchers")]
    NotCatchable(String),

    /// A handle from another graph (or a stale handle) was used
    #[error("Unknown state id: {0}")]
    UnknownState(usize),
}

impl FlowError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}
