// SPDX-License-Identifier: MIT

//! State node definitions
//!
//! Nodes are plain data. Transitions between them live on [`State`] and are
//! only wired through [`StateGraph`](super::StateGraph), which owns every
//! node and hands out [`StateId`] handles.

use serde_json::{Map, Value};

use super::condition::Condition;
use super::fragment::StateId;

/// Error name matching every failure
pub const ERRORS_ALL: &str = "States.ALL";

/// A named node plus its outgoing `next` transition
#[derive(Debug, Clone)]
pub struct State {
    pub(crate) name: String,
    pub(crate) kind: StateKind,
    pub(crate) next: Option<StateId>,
}

impl State {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &StateKind {
        &self.kind
    }

    /// Successor set with `next`, if any
    pub fn next(&self) -> Option<StateId> {
        self.next
    }

    /// Whether a `next` transition may be attached
    pub fn is_nextable(&self) -> bool {
        matches!(self.kind, StateKind::Pass(_) | StateKind::Task(_))
    }

    /// Every state this one can transition to, in rendering order
    pub(crate) fn successors(&self) -> Vec<StateId> {
        let mut out: Vec<StateId> = self.next.into_iter().collect();
        match &self.kind {
            StateKind::Choice(choice) => {
                out.extend(choice.rules.iter().map(|r| r.next));
                out.extend(choice.otherwise);
            }
            StateKind::Task(task) => out.extend(task.catches.iter().map(|c| c.next)),
            StateKind::Pass(_) | StateKind::Fail(_) => {}
        }
        out
    }
}

#[derive(Debug, Clone)]
pub enum StateKind {
    Pass(Pass),
    Choice(Choice),
    Task(Task),
    Fail(Fail),
}

impl StateKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            StateKind::Pass(_) => "Pass",
            StateKind::Choice(_) => "Choice",
            StateKind::Task(_) => "Task",
            StateKind::Fail(_) => "Fail",
        }
    }
}

/// Pass-through node; optionally assigns variables or reshapes output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pass {
    pub assign: Map<String, Value>,
    pub outputs: Option<Value>,
    pub comment: Option<String>,
}

impl Pass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(mut self, variable: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assign.insert(variable.into(), value.into());
        self
    }

    pub fn outputs(mut self, outputs: impl Into<Value>) -> Self {
        self.outputs = Some(outputs.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Conditional branch node
#[derive(Debug, Clone, Default)]
pub struct Choice {
    pub rules: Vec<ChoiceRule>,
    pub otherwise: Option<StateId>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChoiceRule {
    pub condition: Condition,
    pub next: StateId,
}

/// Outcome of probing a choice node against captured variables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Rule at this index matched first
    Rule(usize, StateId),
    /// No rule matched; the default branch is taken
    Otherwise(StateId),
    /// No rule matched and there is no default branch
    NoMatch,
    /// A rule that could not be evaluated was reached before any match
    Undecidable(usize),
}

/// AWS SDK service integration (`arn:aws:states:::aws-sdk:<service>:<action>`)
#[derive(Debug, Clone)]
pub struct Task {
    pub service: String,
    pub action: String,
    pub parameters: Option<Value>,
    pub assign: Map<String, Value>,
    pub outputs: Option<Value>,
    pub comment: Option<String>,
    pub(crate) catches: Vec<Catch>,
}

impl Task {
    pub fn aws_sdk(service: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            action: action.into(),
            parameters: None,
            assign: Map::new(),
            outputs: None,
            comment: None,
            catches: Vec::new(),
        }
    }

    pub fn parameters(mut self, parameters: impl Into<Value>) -> Self {
        self.parameters = Some(parameters.into());
        self
    }

    pub fn assign(mut self, variable: impl Into<String>, value: impl Into<Value>) -> Self {
        self.assign.insert(variable.into(), value.into());
        self
    }

    pub fn outputs(mut self, outputs: impl Into<Value>) -> Self {
        self.outputs = Some(outputs.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn resource(&self) -> String {
        format!("arn:aws:states:::aws-sdk:{}:{}", self.service, self.action)
    }

    pub fn catches(&self) -> &[Catch] {
        &self.catches
    }
}

#[derive(Debug, Clone)]
pub struct Catch {
    pub errors: Vec<String>,
    pub next: StateId,
    pub outputs: Option<Value>,
}

/// Options for [`StateGraph::add_catch`](super::StateGraph::add_catch)
#[derive(Debug, Clone, PartialEq)]
pub struct CatchProps {
    pub errors: Vec<String>,
    pub outputs: Option<Value>,
}

impl Default for CatchProps {
    fn default() -> Self {
        Self {
            errors: vec![ERRORS_ALL.to_string()],
            outputs: None,
        }
    }
}

impl CatchProps {
    pub fn outputs(mut self, outputs: impl Into<Value>) -> Self {
        self.outputs = Some(outputs.into());
        self
    }

    pub fn errors(mut self, errors: Vec<String>) -> Self {
        self.errors = errors;
        self
    }
}

/// Terminal failure node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fail {
    pub error: Option<String>,
    pub cause: Option<String>,
    pub comment: Option<String>,
}

impl Fail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_task_resource_arn() {
        let task = Task::aws_sdk("s3", "getBucketTagging");
        assert_eq!(task.resource(), "arn:aws:states:::aws-sdk:s3:getBucketTagging");
    }

    #[test]
    fn test_pass_builder() {
        let pass = Pass::new()
            .assign("IsTagged", "{% true %}")
            .outputs(json!({"PhysicalResourceId": "{% $ResourceProperties.BucketName %}"}))
            .comment("noop");
        assert_eq!(pass.assign["IsTagged"], json!("{% true %}"));
        assert_eq!(pass.comment.as_deref(), Some("noop"));
        assert!(pass.outputs.is_some());
    }

    #[test]
    fn test_catch_props_default_to_all_errors() {
        let props = CatchProps::default();
        assert_eq!(props.errors, vec!["States.ALL".to_string()]);
        assert!(props.outputs.is_none());
    }

    #[test]
    fn test_only_pass_and_task_are_nextable() {
        let state = |kind| State {
            name: "s".to_string(),
            kind,
            next: None,
        };
        assert!(state(StateKind::Pass(Pass::new())).is_nextable());
        assert!(state(StateKind::Task(Task::aws_sdk("ec2", "describeVpcs"))).is_nextable());
        assert!(!state(StateKind::Fail(Fail::new())).is_nextable());
        assert!(!state(StateKind::Choice(Choice::default())).is_nextable());
    }
}
