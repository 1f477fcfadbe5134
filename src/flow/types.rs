// SPDX-License-Identifier: MIT

//! YAML schema types for custom resource flow definitions
//!
//! ```yaml
//! name: AutoDeleteObjects
//! on_delete:
//!   - type: task
//!     name: GetBucketTagging
//!     service: s3
//!     action: getBucketTagging
//!     parameters:
//!       Bucket: "{% $ResourceProperties.BucketName %}"
//!   - type: pass
//!     name: Done
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::graph::ERRORS_ALL;

/// Top-level flow definition
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FlowDefinition {
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    /// Prepended to every state name of the assembled flow
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub on_create: Option<Vec<StepDefinition>>,
    #[serde(default)]
    pub on_update: Option<Vec<StepDefinition>>,
    #[serde(default)]
    pub on_delete: Option<Vec<StepDefinition>>,
}

/// One step of a branch; steps in a list run in order
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StepDefinition {
    Pass(PassStep),
    Task(TaskStep),
    Fail(FailStep),
}

impl StepDefinition {
    pub fn name(&self) -> &str {
        match self {
            StepDefinition::Pass(s) => &s.name,
            StepDefinition::Task(s) => &s.name,
            StepDefinition::Fail(s) => &s.name,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PassStep {
    pub name: String,
    #[serde(default)]
    pub assign: Map<String, Value>,
    #[serde(default)]
    pub outputs: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// AWS SDK service call
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TaskStep {
    pub name: String,
    pub service: String,
    pub action: String,
    #[serde(default)]
    pub parameters: Option<Value>,
    #[serde(default)]
    pub assign: Map<String, Value>,
    #[serde(default)]
    pub outputs: Option<Value>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub catch: Vec<CatchDefinition>,
}

/// Error handler attached to a task step
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatchDefinition {
    #[serde(default = "default_errors")]
    pub errors: Vec<String>,
    #[serde(default)]
    pub outputs: Option<Value>,
    /// Handler steps, run in order
    pub steps: Vec<StepDefinition>,
    /// Name of a state to continue with once the handler steps finish
    #[serde(default)]
    pub then: Option<String>,
}

fn default_errors() -> Vec<String> {
    vec![ERRORS_ALL.to_string()]
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FailStep {
    pub name: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
}
