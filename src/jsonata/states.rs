// SPDX-License-Identifier: MIT

//! Well-known `$states` fields
//!
//! The JSONata runtime exposes a fixed set of root fields to every state.
//! Scalar leaves are plain expression strings; leaves whose shape depends on
//! the caller (`input`, `result`, the execution input) are [`JsonataPath`]s
//! so further field access keeps working.
//!
//! Every container renders to its own root text as well, so
//! `states().context.execution` can be used as a whole-object reference or
//! drilled into.

use once_cell::sync::Lazy;
use std::fmt;

use super::path::{JsonataPath, ToExpression};

/// Root of the catalog
#[derive(Debug)]
pub struct States {
    /// Input of the current state
    pub input: JsonataPath,
    /// Result of the current state's task
    pub result: JsonataPath,
    /// Error payload inside a catcher
    pub error_output: ErrorOutput,
    /// Context object
    pub context: Context,
}

#[derive(Debug)]
pub struct ErrorOutput {
    pub error: &'static str,
    pub cause: &'static str,
}

#[derive(Debug)]
pub struct Context {
    pub execution: ExecutionContext,
    pub state: StateContext,
    pub state_machine: StateMachineContext,
    pub task: TaskContext,
}

#[derive(Debug)]
pub struct ExecutionContext {
    pub id: &'static str,
    pub input: JsonataPath,
    pub name: &'static str,
    pub role_arn: &'static str,
    pub start_time: &'static str,
    pub redrive_count: &'static str,
    pub redrive_time: &'static str,
}

#[derive(Debug)]
pub struct StateContext {
    pub entered_time: &'static str,
    pub name: &'static str,
    pub retry_count: &'static str,
}

#[derive(Debug)]
pub struct StateMachineContext {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug)]
pub struct TaskContext {
    /// Callback token for `.waitForTaskToken` integrations
    pub token: &'static str,
}

const STATES_ROOT: &str = "$states";
const ERROR_OUTPUT_ROOT: &str = "$states.errorOutput";
const CONTEXT_ROOT: &str = "$states.context";
const EXECUTION_ROOT: &str = "$states.context.Execution";
const STATE_ROOT: &str = "$states.context.State";
const STATE_MACHINE_ROOT: &str = "$states.context.StateMachine";
const TASK_ROOT: &str = "$states.context.Task";

static STATES: Lazy<States> = Lazy::new(|| States {
    input: JsonataPath::of("$states.input"),
    result: JsonataPath::of("$states.result"),
    error_output: ErrorOutput {
        error: "$states.errorOutput.Error",
        cause: "$states.errorOutput.Cause",
    },
    context: Context {
        execution: ExecutionContext {
            id: "$states.context.Execution.Id",
            input: JsonataPath::of("$states.context.Execution.Input"),
            name: "$states.context.Execution.Name",
            role_arn: "$states.context.Execution.RoleArn",
            start_time: "$states.context.Execution.StartTime",
            redrive_count: "$states.context.Execution.RedriveCount",
            redrive_time: "$states.context.Execution.RedriveTime",
        },
        state: StateContext {
            entered_time: "$states.context.State.EnteredTime",
            name: "$states.context.State.Name",
            retry_count: "$states.context.State.RetryCount",
        },
        state_machine: StateMachineContext {
            id: "$states.context.StateMachine.Id",
            name: "$states.context.StateMachine.Name",
        },
        task: TaskContext {
            token: "$states.context.Task.Token",
        },
    },
});

/// Process-wide catalog, built on first use and never mutated afterwards
pub fn states() -> &'static States {
    &STATES
}

macro_rules! root_expression {
    ($($ty:ty => $root:expr),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str($root)
                }
            }

            impl ToExpression for $ty {
                fn to_expression(&self) -> String {
                    $root.to_string()
                }
            }
        )*
    };
}

root_expression! {
    States => STATES_ROOT,
    ErrorOutput => ERROR_OUTPUT_ROOT,
    Context => CONTEXT_ROOT,
    ExecutionContext => EXECUTION_ROOT,
    StateContext => STATE_ROOT,
    StateMachineContext => STATE_MACHINE_ROOT,
    TaskContext => TASK_ROOT,
}
