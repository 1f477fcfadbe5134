// SPDX-License-Identifier: MIT

//! Flow builder - turns flow definitions into assembled state graphs

use serde_json::Value;
use std::path::Path;

use super::custom_resource::{CustomResourceFlow, CustomResourceFlowProps};
use super::loader::FlowLoader;
use super::types::{FlowDefinition, StepDefinition};
use crate::error::FlowError;
use crate::graph::{CatchProps, Fail, Fragment, Pass, StateGraph, StateId, Task};

/// A graph together with the flow assembled inside it
#[derive(Debug, Clone)]
pub struct BuiltFlow {
    pub name: String,
    pub comment: Option<String>,
    pub graph: StateGraph,
    pub flow: CustomResourceFlow,
}

impl BuiltFlow {
    /// Render the flow as a JSONata state-language definition
    pub fn definition(&self) -> Result<Value, FlowError> {
        Ok(self.graph.to_definition(&self.flow, self.comment.as_deref())?)
    }
}

/// Handler waiting to be continued by a named state
struct PendingJoin {
    handler: Fragment,
    target: String,
}

/// High-level builder for constructing flows from YAML definitions
pub struct FlowBuilder {
    loader: FlowLoader,
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self {
            loader: FlowLoader::new(),
        }
    }

    /// Build a flow from a YAML file path
    pub fn build_from_file<P: AsRef<Path>>(&self, path: P) -> Result<BuiltFlow, FlowError> {
        let def = self.loader.load_flow(path)?;
        self.build(&def)
    }

    /// Build a flow from a parsed definition
    pub fn build(&self, def: &FlowDefinition) -> Result<BuiltFlow, FlowError> {
        let mut graph = StateGraph::new();
        let mut joins = Vec::new();

        let mut branch = |label: &str, steps: &Option<Vec<StepDefinition>>, graph: &mut StateGraph| {
            steps
                .as_ref()
                .map(|steps| build_steps(graph, label, steps, &mut joins))
                .transpose()
        };
        let on_create = branch("on_create", &def.on_create, &mut graph)?;
        let on_update = branch("on_update", &def.on_update, &mut graph)?;
        let on_delete = branch("on_delete", &def.on_delete, &mut graph)?;

        for join in joins {
            let target = graph.find(&join.target).ok_or_else(|| {
                FlowError::configuration(format!(
                    "Catch handler continues with unknown state '{}'",
                    join.target
                ))
            })?;
            for end in join.handler.ends() {
                graph.set_next(*end, target)?;
            }
        }

        let flow = CustomResourceFlow::new(
            &mut graph,
            CustomResourceFlowProps {
                on_create,
                on_update,
                on_delete,
            },
        )?;

        if let Some(prefix) = &def.prefix {
            flow.prefix_states(&mut graph, prefix)?;
        }

        log::info!("Built flow '{}' with {} states", def.name, graph.len());

        Ok(BuiltFlow {
            name: def.name.clone(),
            comment: def.comment.clone(),
            graph,
            flow,
        })
    }
}

impl Default for FlowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_steps(
    graph: &mut StateGraph,
    label: &str,
    steps: &[StepDefinition],
    joins: &mut Vec<PendingJoin>,
) -> Result<Fragment, FlowError> {
    let Some((last, init)) = steps.split_last() else {
        return Err(FlowError::configuration(format!("'{}' has no steps", label)));
    };
    if let Some(fail) = init.iter().find(|s| matches!(s, StepDefinition::Fail(_))) {
        return Err(FlowError::configuration(format!(
            "Fail step '{}' in '{}' must be the last step",
            fail.name(),
            label
        )));
    }

    let mut chain: Option<Fragment> = None;
    for step in init.iter().chain(std::iter::once(last)) {
        let id = add_step(graph, step, joins)?;
        let fragment = graph.fragment(id)?;
        chain = Some(match chain {
            Some(prev) => graph.chain(&prev, &fragment)?,
            None => fragment,
        });
    }
    chain.ok_or_else(|| FlowError::configuration(format!("'{}' has no steps", label)))
}

fn add_step(
    graph: &mut StateGraph,
    step: &StepDefinition,
    joins: &mut Vec<PendingJoin>,
) -> Result<StateId, FlowError> {
    let id = match step {
        StepDefinition::Pass(p) => {
            let mut pass = Pass::new();
            pass.assign = p.assign.clone();
            pass.outputs = p.outputs.clone();
            pass.comment = p.comment.clone();
            graph.add_pass(&p.name, pass)?
        }
        StepDefinition::Fail(f) => graph.add_fail(
            &f.name,
            Fail {
                error: f.error.clone(),
                cause: f.cause.clone(),
                comment: f.comment.clone(),
            },
        )?,
        StepDefinition::Task(t) => {
            let mut task = Task::aws_sdk(&t.service, &t.action);
            task.parameters = t.parameters.clone();
            task.assign = t.assign.clone();
            task.outputs = t.outputs.clone();
            task.comment = t.comment.clone();
            let id = graph.add_task(&t.name, task)?;

            for (i, catch) in t.catch.iter().enumerate() {
                let label = format!("{} catch #{}", t.name, i);
                let handler = build_steps(graph, &label, &catch.steps, joins)?;
                graph.add_catch(
                    id,
                    &handler,
                    CatchProps {
                        errors: catch.errors.clone(),
                        outputs: catch.outputs.clone(),
                    },
                )?;
                if let Some(target) = &catch.then {
                    if handler.ends().is_empty() {
                        return Err(FlowError::configuration(format!(
                            "'{}' cannot continue with '{}' because its last step is a fail",
                            label, target
                        )));
                    }
                    joins.push(PendingJoin {
                        handler,
                        target: target.clone(),
                    });
                }
            }
            id
        }
    };
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::custom_resource::RequestType;
    use crate::graph::Chainable;
    use serde_json::json;

    #[test]
    fn test_build_chains_steps_in_order() {
        let def = FlowLoader::parse_yaml(
            r#"
name: Chain
on_delete:
  - type: task
    name: GetBucketTagging
    service: s3
    action: getBucketTagging
  - type: pass
    name: Done
"#,
        )
        .unwrap();
        let built = FlowBuilder::new().build(&def).unwrap();
        let graph = &built.graph;

        let get = graph.find("GetBucketTagging").unwrap();
        let done = graph.find("Done").unwrap();
        assert_eq!(graph.state(get).unwrap().next(), Some(done));
        assert_eq!(built.flow.branch(RequestType::Delete).start(), get);
        assert!(built.flow.end_states().contains(&done));
    }

    #[test]
    fn test_empty_definition_is_configuration_error() {
        let def = FlowLoader::parse_yaml("name: Empty\n").unwrap();
        let err = FlowBuilder::new().build(&def).unwrap_err();
        assert!(matches!(err, FlowError::Configuration(_)));
    }

    #[test]
    fn test_empty_step_list_rejected() {
        let def = FlowLoader::parse_yaml("name: Empty\non_update: []\n").unwrap();
        let err = FlowBuilder::new().build(&def).unwrap_err();
        assert!(err.to_string().contains("'on_update' has no steps"));
    }

    #[test]
    fn test_fail_must_be_last() {
        let def = FlowLoader::parse_yaml(
            r#"
name: BadFail
on_delete:
  - type: fail
    name: Boom
  - type: pass
    name: Never
"#,
        )
        .unwrap();
        let err = FlowBuilder::new().build(&def).unwrap_err();
        assert!(err.to_string().contains("Fail step 'Boom'"));
    }

    #[test]
    fn test_catch_handler_rejoins_named_state() {
        let def = FlowLoader::parse_yaml(
            r#"
name: Rejoin
on_delete:
  - type: task
    name: GetBucketPolicy
    service: s3
    action: getBucketPolicy
    catch:
      - outputs: "{% $states.errorOutput %}"
        then: DenyWrites
        steps:
          - type: pass
            name: NoPolicyFound
  - type: task
    name: DenyWrites
    service: s3
    action: putBucketPolicy
"#,
        )
        .unwrap();
        let built = FlowBuilder::new().build(&def).unwrap();
        let def = built.definition().unwrap();
        assert_eq!(def["States"]["NoPolicyFound"]["Next"], json!("DenyWrites"));
        assert_eq!(
            def["States"]["GetBucketPolicy"]["Catch"][0]["Next"],
            json!("NoPolicyFound")
        );
    }

    #[test]
    fn test_catch_with_unknown_target() {
        let def = FlowLoader::parse_yaml(
            r#"
name: Dangling
on_delete:
  - type: task
    name: Get
    service: s3
    action: getBucketPolicy
    catch:
      - then: Nowhere
        steps:
          - type: pass
            name: Handle
"#,
        )
        .unwrap();
        let err = FlowBuilder::new().build(&def).unwrap_err();
        assert!(err.to_string().contains("unknown state 'Nowhere'"));
    }

    #[test]
    fn test_catch_continuation_after_fail_rejected() {
        let def = FlowLoader::parse_yaml(
            r#"
name: FailThenJoin
on_delete:
  - type: task
    name: Get
    service: s3
    action: getBucketPolicy
    catch:
      - then: Done
        steps:
          - type: fail
            name: GetFailed
  - type: pass
    name: Done
"#,
        )
        .unwrap();
        let err = FlowBuilder::new().build(&def).unwrap_err();
        assert!(matches!(err, FlowError::Configuration(_)));
        assert!(err
            .to_string()
            .contains("'Get catch #0' cannot continue with 'Done'"));
    }

    #[test]
    fn test_prefix_applies_to_whole_flow() {
        let def = FlowLoader::parse_yaml(
            r#"
name: Prefixed
prefix: "Bucket/"
on_update:
  - type: pass
    name: Update
"#,
        )
        .unwrap();
        let built = FlowBuilder::new().build(&def).unwrap();
        let doc = built.definition().unwrap();
        assert_eq!(doc["StartAt"], json!("Bucket/Initialize"));
        let states = doc["States"].as_object().unwrap();
        assert!(states.keys().all(|k| k.starts_with("Bucket/")));
        assert!(states.contains_key("Bucket/Which Request Type?"));
        assert!(states.contains_key("Bucket/Delete"));
    }
}
